use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Strategy parameters for one scheduler run.
///
/// # Examples
///
/// ```
/// use proc_sched::sched::ProcurementParams;
///
/// let p = ProcurementParams::default();
/// assert_eq!((p.mwhs, p.n_parts, p.limit), (1000.0, 4, 10.0));
/// assert!(p.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcurementParams {
    /// Total energy volume to procure (MWh, must be > 0).
    pub mwhs: f64,
    /// Number of purchases, one per partition (must be > 0).
    pub n_parts: usize,
    /// Rise above the running minimum that triggers a purchase (currency/MWh, >= 0).
    pub limit: f64,
}

impl Default for ProcurementParams {
    fn default() -> Self {
        Self {
            mwhs: 1000.0,
            n_parts: 4,
            limit: 10.0,
        }
    }
}

impl ProcurementParams {
    pub fn new(mwhs: f64, n_parts: usize, limit: f64) -> Self {
        Self {
            mwhs,
            n_parts,
            limit,
        }
    }

    /// Checks the parameters, returning the first violation.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming `n_parts`, `mwhs` or `limit`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_parts == 0 {
            return Err(ConfigError::new("n_parts", "must be > 0"));
        }
        if !self.mwhs.is_finite() || self.mwhs <= 0.0 {
            return Err(ConfigError::new(
                "mwhs",
                format!("must be a finite value > 0, got {}", self.mwhs),
            ));
        }
        if !self.limit.is_finite() || self.limit < 0.0 {
            return Err(ConfigError::new(
                "limit",
                format!("must be a finite value >= 0, got {}", self.limit),
            ));
        }
        Ok(())
    }

    /// Volume bought at each purchase.
    pub fn volume_per_part(&self) -> f64 {
        self.mwhs / self.n_parts as f64
    }
}
