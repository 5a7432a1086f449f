//! File glue around the scheduler: price import and result export.

pub mod export;
pub mod import;
