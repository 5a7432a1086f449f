//! Price observations and the daily series the scheduler consumes.

/// Hourly-to-daily averaging.
pub mod daily;
pub mod moving_average;
pub mod stats;
/// Seeded synthetic price year.
pub mod synthetic;
pub mod types;

pub use daily::prepare_daily_series;
pub use moving_average::{MovingAverageParams, SmoothedPrice, moving_average};
pub use stats::PriceSummary;
pub use synthetic::SyntheticPrices;
pub use types::{DailyPriceSeries, PriceObservation};
