//! Descriptive statistics over a daily price series.

use std::fmt;

use serde::Serialize;

use super::types::DailyPriceSeries;

/// Count, moments and quantiles of the daily prices.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSummary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl PriceSummary {
    pub fn from_series(series: &DailyPriceSeries) -> Self {
        let prices = series.prices();
        let n = prices.len() as f64;
        let mean = prices.iter().sum::<f64>() / n;
        let var = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = prices.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            count: prices.len(),
            mean,
            std: var.sqrt(),
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        }
    }
}

/// Linearly interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl fmt::Display for PriceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Daily Price Summary ---")?;
        writeln!(f, "Days:     {}", self.count)?;
        writeln!(f, "Mean:     {:.2} /MWh (std {:.2})", self.mean, self.std)?;
        writeln!(f, "Min:      {:.2}", self.min)?;
        writeln!(
            f,
            "Quartiles: {:.2} / {:.2} / {:.2}",
            self.p25, self.median, self.p75
        )?;
        write!(f, "Max:      {:.2}", self.max)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn series(prices: &[f64]) -> DailyPriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        DailyPriceSeries::from_pairs(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| (start + chrono::Duration::days(i as i64), p)),
        )
        .unwrap()
    }

    #[test]
    fn summary_of_known_values() {
        let s = PriceSummary::from_series(&series(&[4.0, 1.0, 3.0, 2.0, 5.0]));
        assert_eq!(s.count, 5);
        assert_eq!(s.mean, 3.0);
        assert!((s.std - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.p25, 2.0);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.p75, 4.0);
        assert_eq!(s.max, 5.0);
    }

    #[test]
    fn quantiles_interpolate() {
        let s = PriceSummary::from_series(&series(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(s.median, 2.5);
        assert_eq!(s.p25, 1.75);
    }

    #[test]
    fn single_day_summary() {
        let s = PriceSummary::from_series(&series(&[42.0]));
        assert_eq!(s.std, 0.0);
        assert_eq!(s.median, 42.0);
        assert!(!format!("{s}").is_empty());
    }
}
