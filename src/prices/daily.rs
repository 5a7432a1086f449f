//! Reduction of raw price observations to daily averages.

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{debug, warn};

use super::types::{DailyPriceSeries, PriceObservation};
use crate::error::DataError;

/// Averages chronologically ordered observations per calendar day in `tz`.
///
/// Days without observations are absent from the output.
///
/// # Errors
///
/// Returns `DataError::Empty` for no observations, `DataError::Unordered`
/// if a timestamp precedes its predecessor and
/// `DataError::NonFinitePrice` if a price is NaN or infinite.
pub fn prepare_daily_series(
    observations: &[PriceObservation],
    tz: Tz,
) -> Result<DailyPriceSeries, DataError> {
    if observations.is_empty() {
        return Err(DataError::Empty);
    }

    let mut daily: Vec<(NaiveDate, f64)> = Vec::new();
    let mut current: Option<(NaiveDate, f64, usize)> = None;

    for (index, obs) in observations.iter().enumerate() {
        if index > 0 && obs.timestamp < observations[index - 1].timestamp {
            return Err(DataError::Unordered { index });
        }
        let day = obs.timestamp.with_timezone(&tz).date_naive();
        if !obs.price.is_finite() {
            return Err(DataError::NonFinitePrice {
                day,
                price: obs.price,
            });
        }

        // Incremental mean; a running sum can overflow on finite prices.
        current = match current {
            Some((d, mean, n)) if d == day => {
                let n = n + 1;
                Some((d, mean + (obs.price - mean) / n as f64, n))
            }
            Some((d, mean, _)) => {
                daily.push((d, mean));
                Some((day, obs.price, 1))
            }
            None => Some((day, obs.price, 1)),
        };
    }
    if let Some((d, mean, _)) = current {
        daily.push((d, mean));
    }

    let series = DailyPriceSeries::from_pairs(daily)?;
    if series.missing_days() > 0 {
        warn!(
            missing = series.missing_days(),
            first = %series.first_day(),
            last = %series.last_day(),
            "daily series has gaps"
        );
    }
    debug!(
        observations = observations.len(),
        days = series.len(),
        "prepared daily series"
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn obs(y: i32, m: u32, d: u32, h: u32, price: f64) -> PriceObservation {
        PriceObservation::new(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(), price)
    }

    #[test]
    fn empty_input_is_data_error() {
        let err = prepare_daily_series(&[], chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, DataError::Empty));
    }

    #[test]
    fn averages_per_day() {
        let input = vec![
            obs(2024, 1, 1, 0, 10.0),
            obs(2024, 1, 1, 1, 20.0),
            obs(2024, 1, 1, 2, 30.0),
            obs(2024, 1, 2, 0, 5.0),
        ];
        let s = prepare_daily_series(&input, chrono_tz::UTC).unwrap();
        assert_eq!(s.prices(), &[20.0, 5.0]);
        assert_eq!(s.days()[1], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn days_without_data_are_absent() {
        let input = vec![obs(2024, 1, 1, 0, 10.0), obs(2024, 1, 4, 0, 40.0)];
        let s = prepare_daily_series(&input, chrono_tz::UTC).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.missing_days(), 2);
    }

    #[test]
    fn groups_by_local_calendar_day() {
        // 23:00 UTC on Jan 1 is already Jan 2 in Brussels (UTC+1).
        let input = vec![obs(2024, 1, 1, 12, 10.0), obs(2024, 1, 1, 23, 30.0)];
        let s = prepare_daily_series(&input, chrono_tz::Europe::Brussels).unwrap();
        assert_eq!(s.prices(), &[10.0, 30.0]);
        assert_eq!(s.days()[1], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn huge_finite_prices_average_without_overflow() {
        let input = vec![obs(2024, 1, 1, 0, 1e308), obs(2024, 1, 1, 1, 1e308)];
        let s = prepare_daily_series(&input, chrono_tz::UTC).unwrap();
        assert_eq!(s.prices(), &[1e308]);
    }

    #[test]
    fn unordered_input_is_rejected() {
        let input = vec![obs(2024, 1, 2, 0, 10.0), obs(2024, 1, 1, 0, 20.0)];
        let err = prepare_daily_series(&input, chrono_tz::UTC).unwrap_err();
        assert!(matches!(err, DataError::Unordered { index: 1 }));
    }
}
