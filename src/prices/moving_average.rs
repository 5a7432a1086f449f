//! Time-windowed rolling mean over raw price observations.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::PriceObservation;
use crate::error::{ConfigError, DataError, Result};

/// Rolling-mean window settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovingAverageParams {
    /// Window length in hours.
    pub window_hours: u32,
    /// Centre the window on each observation instead of trailing it.
    pub center: bool,
}

impl Default for MovingAverageParams {
    fn default() -> Self {
        Self {
            window_hours: 24,
            center: true,
        }
    }
}

impl MovingAverageParams {
    pub fn new(window_hours: u32, center: bool) -> Self {
        Self {
            window_hours,
            center,
        }
    }

    /// # Errors
    ///
    /// Returns a `ConfigError` on `window_hours` if it is zero.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.window_hours == 0 {
            return Err(ConfigError::new("window_hours", "must be > 0"));
        }
        Ok(())
    }

    pub fn window(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.window_hours))
    }
}

/// One observation with the mean of its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmoothedPrice {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub mean: f64,
}

/// Computes a rolling mean over a time window for every observation.
///
/// A trailing window at `t` covers `(t - w, t]`; a centred one covers
/// `(t - w/2, t + w/2]`. Each window holds at least its own observation
/// when trailing, so irregular spacing and gaps are handled without
/// resampling.
///
/// # Errors
///
/// Returns `Error::Config` for a zero window and `Error::Data` if a
/// timestamp precedes its predecessor.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use proc_sched::prices::{MovingAverageParams, PriceObservation, moving_average};
///
/// let obs: Vec<_> = [10.0, 20.0, 30.0]
///     .into_iter()
///     .enumerate()
///     .map(|(h, p)| PriceObservation::new(Utc.with_ymd_and_hms(2024, 1, 1, h as u32, 0, 0).unwrap(), p))
///     .collect();
/// let ma = moving_average(&obs, &MovingAverageParams::new(2, false)).unwrap();
/// let means: Vec<f64> = ma.iter().map(|m| m.mean).collect();
/// assert_eq!(means, vec![10.0, 15.0, 25.0]);
/// ```
pub fn moving_average(
    observations: &[PriceObservation],
    params: &MovingAverageParams,
) -> Result<Vec<SmoothedPrice>> {
    params.validate().map_err(|e| {
        ConfigError::new(format!("moving_average.{}", e.field), e.message)
    })?;
    if observations.is_empty() {
        warn!("no observations for moving average");
        return Ok(Vec::new());
    }
    if let Some(index) = (1..observations.len())
        .find(|&i| observations[i].timestamp < observations[i - 1].timestamp)
    {
        return Err(DataError::Unordered { index }.into());
    }

    let window = params.window();
    let (behind, ahead) = if params.center {
        (window / 2, window / 2)
    } else {
        (window, TimeDelta::zero())
    };

    let mut out = Vec::with_capacity(observations.len());
    let mut start = 0usize;
    let mut end = 0usize;
    for obs in observations {
        let lo = obs.timestamp - behind;
        let hi = obs.timestamp + ahead;
        while start < observations.len() && observations[start].timestamp <= lo {
            start += 1;
        }
        while end < observations.len() && observations[end].timestamp <= hi {
            end += 1;
        }

        // Incremental mean; a running sum can overflow on finite prices.
        let mean = observations[start..end]
            .iter()
            .enumerate()
            .fold(0.0, |mean, (k, o)| mean + (o.price - mean) / (k + 1) as f64);
        out.push(SmoothedPrice {
            timestamp: obs.timestamp,
            price: obs.price,
            mean,
        });
    }

    debug!(
        points = out.len(),
        window_hours = params.window_hours,
        center = params.center,
        "moving average computed"
    );
    Ok(out)
}
