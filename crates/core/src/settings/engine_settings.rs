use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_VALUATION_TZ_NAME;
use crate::errors::{Error, Result};
use crate::utils::time_utils::{parse_timezone, valuation_date_from_utc};

/// Tunables for the derivation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Hard cap on root-finder iterations.
    pub xirr_max_iterations: u32,
    /// Convergence threshold on `|NPV|`.
    pub xirr_tolerance: f64,
    pub xirr_lower_bound: f64,
    pub xirr_upper_bound: f64,
    pub xirr_initial_guess: f64,
    /// IANA timezone deciding what "today" is when the caller does not pass a date.
    pub valuation_timezone: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            xirr_max_iterations: 100,
            xirr_tolerance: 1e-6,
            xirr_lower_bound: -0.999,
            xirr_upper_bound: 10.0,
            xirr_initial_guess: 0.1,
            valuation_timezone: DEFAULT_VALUATION_TZ_NAME.to_string(),
        }
    }
}

/// Partial update; `None` leaves the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettingsUpdate {
    pub xirr_max_iterations: Option<u32>,
    pub xirr_tolerance: Option<f64>,
    pub xirr_lower_bound: Option<f64>,
    pub xirr_upper_bound: Option<f64>,
    pub xirr_initial_guess: Option<f64>,
    pub valuation_timezone: Option<String>,
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.xirr_max_iterations == 0 {
            return Err(Error::InvalidConfigValue(
                "xirrMaxIterations must be greater than zero".to_string(),
            ));
        }
        if !(self.xirr_tolerance.is_finite() && self.xirr_tolerance > 0.0) {
            return Err(Error::InvalidConfigValue(format!(
                "xirrTolerance must be a positive number, got {}",
                self.xirr_tolerance
            )));
        }
        if self.xirr_lower_bound <= -1.0 || self.xirr_lower_bound >= self.xirr_upper_bound {
            return Err(Error::InvalidConfigValue(format!(
                "XIRR bounds must satisfy -1 < lower < upper, got [{}, {}]",
                self.xirr_lower_bound, self.xirr_upper_bound
            )));
        }
        if !(self.xirr_lower_bound..=self.xirr_upper_bound).contains(&self.xirr_initial_guess) {
            return Err(Error::InvalidConfigValue(format!(
                "xirrInitialGuess {} is outside [{}, {}]",
                self.xirr_initial_guess, self.xirr_lower_bound, self.xirr_upper_bound
            )));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.valuation_timezone)
    }

    /// Today in the configured timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(valuation_date_from_utc(chrono::Utc::now(), self.timezone()?))
    }

    /// Returns the updated settings, validated. `self` is untouched on error.
    pub fn apply_update(&self, update: EngineSettingsUpdate) -> Result<EngineSettings> {
        let updated = EngineSettings {
            xirr_max_iterations: update
                .xirr_max_iterations
                .unwrap_or(self.xirr_max_iterations),
            xirr_tolerance: update.xirr_tolerance.unwrap_or(self.xirr_tolerance),
            xirr_lower_bound: update.xirr_lower_bound.unwrap_or(self.xirr_lower_bound),
            xirr_upper_bound: update.xirr_upper_bound.unwrap_or(self.xirr_upper_bound),
            xirr_initial_guess: update.xirr_initial_guess.unwrap_or(self.xirr_initial_guess),
            valuation_timezone: update
                .valuation_timezone
                .unwrap_or_else(|| self.valuation_timezone.clone()),
        };
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineSettings::default().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"valuationTimezone":"Asia/Taipei"}"#).unwrap();
        assert_eq!(settings.xirr_max_iterations, 100);
        assert_eq!(settings.valuation_timezone, "Asia/Taipei");
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let update = EngineSettingsUpdate {
            xirr_lower_bound: Some(5.0),
            xirr_upper_bound: Some(1.0),
            ..Default::default()
        };
        assert!(EngineSettings::default().apply_update(update).is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let settings = EngineSettings {
            xirr_max_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidConfigValue(_))
        ));
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let update = EngineSettingsUpdate {
            valuation_timezone: Some("Nowhere/Special".to_string()),
            ..Default::default()
        };
        assert!(EngineSettings::default().apply_update(update).is_err());
    }
}
