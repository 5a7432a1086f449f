//! TOML-based run configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::prices::{MovingAverageParams, SyntheticPrices};
use crate::sched::{DEFAULT_CANDIDATES, ProcurementParams};

/// Top-level run configuration parsed from TOML.
///
/// All fields have defaults matching the baseline run. Load from TOML
/// with [`RunConfig::from_toml_file`] or use [`RunConfig::baseline`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Price data source and calendar settings.
    #[serde(default)]
    pub data: DataConfig,
    /// Parameters of the primary scheduler run.
    #[serde(default)]
    pub procurement: ProcurementParams,
    /// Purchase frequencies to compare.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Generator used when `data.prices` is empty.
    #[serde(default)]
    pub synthetic: SyntheticPrices,
    /// Rolling-mean window over the raw observations.
    #[serde(default)]
    pub moving_average: MovingAverageParams,
    /// Optional export destinations.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Price data source and calendar settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// CSV price files; empty means synthetic prices.
    pub prices: Vec<PathBuf>,
    /// IANA timezone defining calendar days.
    pub timezone: String,
    /// Restrict the daily series to one calendar year.
    pub year: Option<i32>,
    /// Keep only the last N calendar days, applied after `year`.
    pub last_days: Option<usize>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            prices: Vec::new(),
            timezone: "Europe/Brussels".to_string(),
            year: None,
            last_days: None,
        }
    }
}

/// Purchase frequencies to compare.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Candidate partition counts, evaluated in order.
    pub candidates: Vec<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.to_vec(),
        }
    }
}

/// Optional export destinations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub purchases_csv: Option<PathBuf>,
    pub sweep_csv: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    /// Observations with their rolling mean.
    pub moving_average_csv: Option<PathBuf>,
}

impl RunConfig {
    /// Returns the baseline run: default parameters on a synthetic year.
    pub fn baseline() -> Self {
        Self {
            data: DataConfig::default(),
            procurement: ProcurementParams::default(),
            sweep: SweepConfig::default(),
            synthetic: SyntheticPrices::default(),
            moving_average: MovingAverageParams::default(),
            output: OutputConfig::default(),
        }
    }

    /// Returns the volatile preset: noisy prices and a wider trigger.
    pub fn volatile() -> Self {
        Self {
            procurement: ProcurementParams {
                limit: 25.0,
                ..ProcurementParams::default()
            },
            synthetic: SyntheticPrices {
                noise_std: 40.0,
                intraday_amp: 35.0,
                ..SyntheticPrices::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the flat preset: a quiet market where most purchases are forced.
    pub fn flat() -> Self {
        Self {
            procurement: ProcurementParams {
                limit: 5.0,
                ..ProcurementParams::default()
            },
            synthetic: SyntheticPrices {
                seasonal_amp: 5.0,
                intraday_amp: 5.0,
                noise_std: 2.0,
                ..SyntheticPrices::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "volatile", "flat"];

    /// Loads a run configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "volatile" => Ok(Self::volatile()),
            "flat" => Ok(Self::flat()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a run configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a run configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parses `data.timezone`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the name is not a known IANA timezone.
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.data.timezone.parse::<Tz>().map_err(|e| {
            ConfigError::new(
                "data.timezone",
                format!("unknown timezone \"{}\": {e}", self.data.timezone),
            )
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = self.timezone() {
            errors.push(e);
        }

        if let Err(e) = self.procurement.validate() {
            errors.push(ConfigError::new(
                format!("procurement.{}", e.field),
                e.message,
            ));
        }

        if self.data.last_days == Some(0) {
            errors.push(ConfigError::new("data.last_days", "must be > 0"));
        }

        if let Err(e) = self.moving_average.validate() {
            errors.push(ConfigError::new(
                format!("moving_average.{}", e.field),
                e.message,
            ));
        }

        let sw = &self.sweep;
        if sw.candidates.is_empty() {
            errors.push(ConfigError::new("sweep.candidates", "must not be empty"));
        }
        if sw.candidates.contains(&0) {
            errors.push(ConfigError::new(
                "sweep.candidates",
                "every candidate must be > 0",
            ));
        }
        for (i, n) in sw.candidates.iter().enumerate() {
            if sw.candidates[..i].contains(n) {
                errors.push(ConfigError::new(
                    "sweep.candidates",
                    format!("duplicate candidate {n}"),
                ));
            }
        }

        if self.data.prices.is_empty() {
            let syn = &self.synthetic;
            if !syn.noise_std.is_finite() || syn.noise_std < 0.0 {
                errors.push(ConfigError::new("synthetic.noise_std", "must be >= 0"));
            }
            if let Some(year) = self.data.year
                && year != syn.year
            {
                errors.push(ConfigError::new(
                    "data.year",
                    format!("must match synthetic.year ({}) when no price files are set", syn.year),
                ));
            }
        }

        errors
    }
}
