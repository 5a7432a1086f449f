//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use proc_sched::prices::{DailyPriceSeries, SyntheticPrices, prepare_daily_series};

/// First day of every fixture series.
pub fn start_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

/// Consecutive-day series starting at [`start_day`].
pub fn series(prices: &[f64]) -> DailyPriceSeries {
    DailyPriceSeries::from_pairs(
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| (start_day() + Duration::days(i as i64), p)),
    )
    .expect("fixture series should be valid")
}

/// Daily series of the default synthetic 2024 year in Brussels time.
pub fn synthetic_year() -> DailyPriceSeries {
    let tz = chrono_tz::Europe::Brussels;
    let obs = SyntheticPrices::default().hourly(tz);
    prepare_daily_series(&obs, tz).expect("synthetic year should prepare")
}

/// Small hand-written hourly CSV covering three Brussels days.
pub const SAMPLE_CSV: &str = "\
time,price
2024-03-01 00:00:00+01:00,80.0
2024-03-01 12:00:00+01:00,100.0
2024-03-02 00:00:00+01:00,60.0
2024-03-02 12:00:00+01:00,70.0
2024-03-03 00:00:00+01:00,120.0
2024-03-03 12:00:00+01:00,140.0
";
