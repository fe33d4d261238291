use config::{Config, ConfigError, File};
use serde::Deserialize;
use shared::{EngineError, EngineResult};
use std::collections::BTreeSet;

/// Per-rule penalty weights, keyed by rule name.
#[derive(Debug, Deserialize, Clone)]
pub struct RuleWeights {
    #[serde(default = "default_night_spread")]
    pub night_spread: f64,
    #[serde(default = "default_night_remote_same_day")]
    pub night_remote_same_day: f64,
    #[serde(default = "default_night_balance")]
    pub night_balance: f64,
    #[serde(default = "default_weekday_balance")]
    pub weekday_balance: f64,
    #[serde(default = "default_rest_after_night")]
    pub rest_after_night: f64,
    #[serde(default = "default_desired_preference")]
    pub desired_preference: f64,
    #[serde(default = "default_available_preference")]
    pub available_preference: f64,
}

fn default_night_spread() -> f64 {
    5.0
}

fn default_night_remote_same_day() -> f64 {
    3.0
}

fn default_night_balance() -> f64 {
    2.0
}

fn default_weekday_balance() -> f64 {
    1.0
}

fn default_rest_after_night() -> f64 {
    4.0
}

fn default_desired_preference() -> f64 {
    8.0
}

fn default_available_preference() -> f64 {
    1.0
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            night_spread: default_night_spread(),
            night_remote_same_day: default_night_remote_same_day(),
            night_balance: default_night_balance(),
            weekday_balance: default_weekday_balance(),
            rest_after_night: default_rest_after_night(),
            desired_preference: default_desired_preference(),
            available_preference: default_available_preference(),
        }
    }
}

impl RuleWeights {
    fn all(&self) -> [(&'static str, f64); 7] {
        [
            ("night_spread", self.night_spread),
            ("night_remote_same_day", self.night_remote_same_day),
            ("night_balance", self.night_balance),
            ("weekday_balance", self.weekday_balance),
            ("rest_after_night", self.rest_after_night),
            ("desired_preference", self.desired_preference),
            ("available_preference", self.available_preference),
        ]
    }
}

/// Engine configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct RosterSettings {
    /// Minimum days between two night duties of the same worker.
    #[serde(default = "default_min_night_gap")]
    pub min_night_gap: u32,

    /// Window within which close night pairs are discouraged.
    #[serde(default = "default_soft_night_window")]
    pub soft_night_window: u32,

    #[serde(default)]
    pub weights: RuleWeights,

    /// Rule names to enable; `None` enables the full registry.
    #[serde(default)]
    pub enabled_rules: Option<BTreeSet<String>>,

    /// Wall-clock bound handed to the solver, when the backend supports one.
    #[serde(default)]
    pub solver_time_limit_seconds: Option<f64>,
}

fn default_min_night_gap() -> u32 {
    2
}

fn default_soft_night_window() -> u32 {
    7
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            min_night_gap: default_min_night_gap(),
            soft_night_window: default_soft_night_window(),
            weights: RuleWeights::default(),
            enabled_rules: None,
            solver_time_limit_seconds: None,
        }
    }
}

impl RosterSettings {
    /// Load settings from layered config files and `APP__`-prefixed
    /// environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Bounds checking; run before any solver work.
    pub fn validate(&self) -> EngineResult<()> {
        if self.min_night_gap < 1 {
            return Err(EngineError::Config(
                "min_night_gap must be at least 1".to_string(),
            ));
        }
        if self.soft_night_window < self.min_night_gap {
            return Err(EngineError::Config(format!(
                "soft_night_window ({}) must not be below min_night_gap ({})",
                self.soft_night_window, self.min_night_gap
            )));
        }
        for (name, weight) in self.weights.all() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::Config(format!(
                    "Weight for rule {} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        if let Some(limit) = self.solver_time_limit_seconds {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(EngineError::Config(format!(
                    "solver_time_limit_seconds must be positive, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }

    pub fn rule_enabled(&self, name: &str) -> bool {
        match &self.enabled_rules {
            Some(enabled) => enabled.contains(name),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = RosterSettings::default();

        assert!(settings.validate().is_ok());
        assert_eq!(settings.min_night_gap, 2);
        assert_eq!(settings.soft_night_window, 7);
        assert_eq!(settings.weights.desired_preference, 8.0);
        assert!(settings.rule_enabled("night_gap"));
    }

    #[test]
    fn test_zero_night_gap_rejected() {
        let settings = RosterSettings {
            min_night_gap: 0,
            ..Default::default()
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_window_below_gap_rejected() {
        let settings = RosterSettings {
            min_night_gap: 4,
            soft_night_window: 3,
            ..Default::default()
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut settings = RosterSettings::default();
        settings.weights.night_spread = -1.0;

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_enabled_rules_subset() {
        let settings = RosterSettings {
            enabled_rules: Some(["one_worker_per_slot".to_string()].into()),
            ..Default::default()
        };

        assert!(settings.rule_enabled("one_worker_per_slot"));
        assert!(!settings.rule_enabled("night_gap"));
    }
}
