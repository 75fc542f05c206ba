//! # curator-alloc — Calibrated voting-budget allocation engine.
//!
//! Divides a multiplicatively decaying 0–100 voting-power pool across
//! competing categories and items while converging on a configured
//! consumption ceiling:
//! - **Compounding consumption**: each vote removes a fraction of the
//!   *remaining* pool, so identical weights cost less the later they land.
//! - **Priority planning**: static category weights become nominal shares of
//!   the budget.
//! - **Surplus redistribution**: planned share a category cannot use flows
//!   to the categories that need more.
//! - **Logarithmic calibration**: a feedback correction compensates for the
//!   compounding law, so the *actual* total usage hits the ceiling instead
//!   of the naive linear estimate.
//!
//! The whole computation is pure and single-threaded; one run owns its pool
//! exclusively and all external I/O happens after the grant list is final.

pub mod calibrator;
pub mod driver;
pub mod estimator;
pub mod planner;
pub mod pool;
pub mod reconciler;
pub mod report;

pub use driver::AllocationDriver;
pub use pool::VotingPool;
pub use report::{CategorySnapshot, RunReport};
