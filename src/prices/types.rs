//! Price observation and daily series types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::error::DataError;

/// One raw price observation (currency/MWh) at an absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceObservation {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PriceObservation {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Chronologically ordered daily average prices.
///
/// Holds at least one entry, days are strictly increasing and every
/// price is finite. Calendar days with no data are simply absent, so
/// indices into the series are positions, not day offsets.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use proc_sched::prices::DailyPriceSeries;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let series = DailyPriceSeries::from_pairs([(d(1), 80.0), (d(2), 95.5)]).unwrap();
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.prices(), &[80.0, 95.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPriceSeries {
    days: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl DailyPriceSeries {
    /// Builds a series from ordered `(day, price)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Empty` for no pairs, `DataError::UnorderedDay`
    /// if a day does not follow its predecessor, and
    /// `DataError::NonFinitePrice` for NaN or infinite prices.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut days: Vec<NaiveDate> = Vec::new();
        let mut prices = Vec::new();

        for (day, price) in pairs {
            if let Some(&prev) = days.last()
                && day <= prev
            {
                return Err(DataError::UnorderedDay { day });
            }
            if !price.is_finite() {
                return Err(DataError::NonFinitePrice { day, price });
            }
            days.push(day);
            prices.push(price);
        }

        if days.is_empty() {
            return Err(DataError::Empty);
        }
        Ok(Self { days, prices })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Always false for a constructed series; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn first_day(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days[self.days.len() - 1]
    }

    /// Number of calendar days between the first and last day that have no entry.
    pub fn missing_days(&self) -> usize {
        let span = (self.last_day() - self.first_day()).num_days() as usize + 1;
        span - self.len()
    }

    /// Sub-series restricted to one calendar year, or `None` if the year has no data.
    pub fn for_year(&self, year: i32) -> Option<Self> {
        self.filtered(|day| day.year() == year)
    }

    /// Sub-series covering the last `n` calendar days ending at `last_day()`.
    pub fn last_days(&self, n: usize) -> Option<Self> {
        let n = i64::try_from(n).ok()?;
        if n == 0 {
            return None;
        }
        let cutoff = self.last_day() - chrono::Duration::days(n - 1);
        self.filtered(|day| day >= cutoff)
    }

    fn filtered(&self, keep: impl Fn(NaiveDate) -> bool) -> Option<Self> {
        let (days, prices): (Vec<_>, Vec<_>) = self
            .days
            .iter()
            .zip(&self.prices)
            .filter(|(day, _)| keep(**day))
            .map(|(&day, &price)| (day, price))
            .unzip();
        if days.is_empty() {
            None
        } else {
            Some(Self { days, prices })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn from_pairs_rejects_empty() {
        let err = DailyPriceSeries::from_pairs(Vec::new()).unwrap_err();
        assert!(matches!(err, DataError::Empty));
    }

    #[test]
    fn from_pairs_rejects_duplicate_day() {
        let err = DailyPriceSeries::from_pairs([(d(2024, 1, 1), 1.0), (d(2024, 1, 1), 2.0)])
            .unwrap_err();
        assert!(matches!(err, DataError::UnorderedDay { .. }));
    }

    #[test]
    fn from_pairs_rejects_nan() {
        let err = DailyPriceSeries::from_pairs([(d(2024, 1, 1), f64::NAN)]).unwrap_err();
        assert!(matches!(err, DataError::NonFinitePrice { .. }));
    }

    #[test]
    fn missing_days_counts_gaps() {
        let s = DailyPriceSeries::from_pairs([
            (d(2024, 1, 1), 1.0),
            (d(2024, 1, 2), 1.0),
            (d(2024, 1, 5), 1.0),
        ])
        .unwrap();
        assert_eq!(s.missing_days(), 2);
    }

    #[test]
    fn for_year_selects_single_year() {
        let s = DailyPriceSeries::from_pairs([
            (d(2023, 12, 31), 1.0),
            (d(2024, 1, 1), 2.0),
            (d(2024, 6, 1), 3.0),
        ])
        .unwrap();
        let y = s.for_year(2024).unwrap();
        assert_eq!(y.prices(), &[2.0, 3.0]);
        assert!(s.for_year(2022).is_none());
    }

    #[test]
    fn last_days_is_calendar_based() {
        let s = DailyPriceSeries::from_pairs([
            (d(2024, 1, 1), 1.0),
            (d(2024, 1, 8), 2.0),
            (d(2024, 1, 10), 3.0),
        ])
        .unwrap();
        let tail = s.last_days(3).unwrap();
        assert_eq!(tail.days(), &[d(2024, 1, 8), d(2024, 1, 10)]);
        assert!(s.last_days(0).is_none());
    }
}
