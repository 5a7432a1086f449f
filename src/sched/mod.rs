//! Procurement scheduling and the purchase-frequency sweep.

pub mod params;
/// Near-equal index partitioning.
pub mod partition;
pub mod scheduler;
pub mod sweep;

pub use params::ProcurementParams;
pub use scheduler::{Purchase, SchedulerRun, sched_proc};
pub use sweep::{DEFAULT_CANDIDATES, SweepEntry, SweepResult, feasible_candidates, sweep};
