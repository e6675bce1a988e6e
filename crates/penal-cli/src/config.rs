use penal_core::{AdditionStacking, CalculationOptions, Limits};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Top-level configuration for the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: CalculationOptions,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `.env` (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    fn from_env() -> Result<Self, ConfigError> {
        let defaults = CalculationOptions::default();

        let limits = Limits {
            max_sentence_days: days_var("MAX_SENTENCE_DAYS", defaults.limits.max_sentence_days)?,
            max_impound_days: days_var("MAX_IMPOUND_DAYS", defaults.limits.max_impound_days)?,
            max_suspension_days: days_var(
                "MAX_SUSPENSION_DAYS",
                defaults.limits.max_suspension_days,
            )?,
        };

        let stacking = match env::var("ADDITION_STACKING") {
            Ok(value) => AdditionStacking::from_str(&value).map_err(ConfigError::InvalidStacking)?,
            Err(_) => defaults.stacking,
        };

        let parole_addition =
            env::var("PAROLE_VIOLATION_ADDITION").unwrap_or(defaults.parole_addition);
        let default_addition = env::var("DEFAULT_ADDITION").unwrap_or(defaults.default_addition);
        let log_level = env::var("PENAL_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            engine: CalculationOptions {
                limits,
                parole_addition,
                default_addition,
                stacking,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative number of days, got '{value}'")]
    InvalidDays { var: &'static str, value: String },

    #[error("ADDITION_STACKING: {0}")]
    InvalidStacking(String),
}

fn days_var(var: &'static str, default: Decimal) -> Result<Decimal, ConfigError> {
    let Ok(value) = env::var(var) else {
        return Ok(default);
    };
    parse_days(&value).map_err(|_| ConfigError::InvalidDays { var, value })
}

/// Parse a non-negative number of days. Also the clap parser for day flags.
pub fn parse_days(value: &str) -> Result<Decimal, String> {
    match Decimal::from_str(value.trim()) {
        Ok(days) if !days.is_sign_negative() || days.is_zero() => Ok(days),
        Ok(_) => Err(format!("'{value}' is negative; days must be zero or more")),
        Err(e) => Err(format!("'{value}' is not a number of days: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in [
            "MAX_SENTENCE_DAYS",
            "MAX_IMPOUND_DAYS",
            "MAX_SUSPENSION_DAYS",
            "ADDITION_STACKING",
            "PAROLE_VIOLATION_ADDITION",
            "DEFAULT_ADDITION",
            "PENAL_LOG_LEVEL",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn from_env_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::from_env().expect("config loads with defaults");
        assert_eq!(config.engine, CalculationOptions::default());
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn from_env_reads_limits_and_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MAX_SENTENCE_DAYS", "0.05");
        env::set_var("ADDITION_STACKING", "replace");
        env::set_var("PAROLE_VIOLATION_ADDITION", "Parole");
        let config = AppConfig::from_env().expect("config loads");
        assert_eq!(config.engine.limits.max_sentence_days, Decimal::new(5, 2));
        assert_eq!(config.engine.stacking, AdditionStacking::Replace);
        assert_eq!(config.engine.parole_addition, "Parole");
        reset_env();
    }

    #[test]
    fn rejects_negative_days() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MAX_IMPOUND_DAYS", "-3");
        let err = AppConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDays { var: "MAX_IMPOUND_DAYS", .. }));
        reset_env();
    }

    #[test]
    fn parse_days_accepts_zero_and_fractions() {
        assert_eq!(parse_days(" 0.5 "), Ok(Decimal::new(5, 1)));
        assert!(parse_days("-1").is_err());
        assert!(parse_days("forever").is_err());
    }

    #[test]
    fn rejects_unknown_stacking() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADDITION_STACKING", "sideways");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::InvalidStacking(_))
        ));
        reset_env();
    }
}
