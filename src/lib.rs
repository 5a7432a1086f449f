//! Day-ahead energy procurement scheduling and purchase-frequency comparison.

pub mod cli;
pub mod config;
pub mod error;
/// Price import and result export.
pub mod io;
pub mod prices;
/// Procurement scheduler and frequency sweep.
pub mod sched;
