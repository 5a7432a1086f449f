use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;

use super::types::PriceObservation;

/// Seeded generator of an hourly day-ahead price year.
///
/// Prices combine a seasonal cosine peaking on January 1st, a morning
/// and evening intraday peak, and Gaussian noise.
///
/// # Examples
///
/// ```
/// use proc_sched::prices::SyntheticPrices;
///
/// let generator = SyntheticPrices::default();
/// let obs = generator.hourly(chrono_tz::Europe::Brussels);
/// assert!(obs.len() >= 365 * 24 - 1);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticPrices {
    /// Calendar year to generate.
    pub year: i32,
    /// Annual mean price (currency/MWh).
    pub base_price: f64,
    /// Amplitude of the seasonal component.
    pub seasonal_amp: f64,
    /// Amplitude of the intraday component.
    pub intraday_amp: f64,
    /// Standard deviation of the hourly noise.
    pub noise_std: f64,
    /// Random seed.
    pub seed: u64,
}

impl Default for SyntheticPrices {
    fn default() -> Self {
        Self {
            year: 2024,
            base_price: 90.0,
            seasonal_amp: 30.0,
            intraday_amp: 20.0,
            noise_std: 15.0,
            seed: 42,
        }
    }
}

impl SyntheticPrices {
    /// Generates one observation per local hour of `year` in `tz`.
    ///
    /// Local hours skipped by a DST transition are left out.
    pub fn hourly(&self, tz: Tz) -> Vec<PriceObservation> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let Some(start) = NaiveDate::from_ymd_opt(self.year, 1, 1) else {
            return Vec::new();
        };
        let days_in_year = if start.leap_year() { 366 } else { 365 };
        let mut out = Vec::with_capacity(days_in_year * 24);

        for day_idx in 0..days_in_year {
            let day = start + Duration::days(day_idx as i64);
            let season = (2.0 * std::f64::consts::PI * day_idx as f64 / days_in_year as f64).cos();

            for hour in 0..24u32 {
                let Some(local) = day.and_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let Some(ts) = tz.from_local_datetime(&local).earliest() else {
                    continue;
                };

                let intraday = intraday_shape(hour);
                let noise = gaussian(&mut rng) * self.noise_std;
                let price = self.base_price
                    + self.seasonal_amp * season
                    + self.intraday_amp * intraday
                    + noise;
                out.push(PriceObservation::new(ts.with_timezone(&Utc), price));
            }
        }
        out
    }
}

/// Two-peak daily shape in [-1, 1]: morning around 08:00, evening around 19:00.
fn intraday_shape(hour: u32) -> f64 {
    let h = f64::from(hour);
    let morning = (-(h - 8.0).powi(2) / 6.0).exp();
    let evening = (-(h - 19.0).powi(2) / 8.0).exp();
    2.0 * (0.6 * morning + evening).min(1.0) - 1.0
}

/// Standard normal sample via Box-Muller.
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_prices() {
        let generator = SyntheticPrices::default();
        assert_eq!(generator.hourly(chrono_tz::UTC), generator.hourly(chrono_tz::UTC));
    }

    #[test]
    fn different_seed_different_prices() {
        let a = SyntheticPrices::default();
        let b = SyntheticPrices {
            seed: 7,
            ..SyntheticPrices::default()
        };
        assert_ne!(a.hourly(chrono_tz::UTC), b.hourly(chrono_tz::UTC));
    }

    #[test]
    fn leap_year_has_all_utc_hours() {
        let generator = SyntheticPrices::default();
        assert_eq!(generator.hourly(chrono_tz::UTC).len(), 366 * 24);
    }

    #[test]
    fn output_is_chronological() {
        let obs = SyntheticPrices::default().hourly(chrono_tz::Europe::Brussels);
        assert!(obs.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn noiseless_winter_is_pricier_than_summer() {
        let generator = SyntheticPrices {
            noise_std: 0.0,
            ..SyntheticPrices::default()
        };
        let obs = generator.hourly(chrono_tz::UTC);
        assert!(obs[12].price > obs[182 * 24 + 12].price);
    }
}
