use crate::engine::ThresholdConfig;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub num_lanes: usize,
    pub base_capacity: f64,
    pub oracle_price: f64,
    pub slot_interval: Duration,
    pub batch_interval: Duration,
    pub history_limit: usize,
    pub thresholds: ThresholdConfig,
    pub failure_rate: f64,
    pub feed_seed: Option<u64>,
    pub feed_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            num_lanes: 10,
            base_capacity: 1000.0,
            oracle_price: 145.20,
            slot_interval: Duration::from_millis(400),
            batch_interval: Duration::from_millis(120_000),
            history_limit: 100,
            thresholds: ThresholdConfig::default(),
            failure_rate: 0.1,
            feed_seed: None,
            feed_enabled: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = parse_or(&env_map, "PORT", defaults.port, "must be a valid u16")?;

        let num_lanes: usize =
            parse_or(&env_map, "NUM_LANES", defaults.num_lanes, "must be a valid usize")?;
        if num_lanes == 0 {
            return Err(ConfigError::InvalidValue(
                "NUM_LANES".to_string(),
                "must be positive".to_string(),
            ));
        }

        let base_capacity = parse_positive_f64(&env_map, "BASE_CAPACITY", defaults.base_capacity)?;
        let oracle_price = parse_positive_f64(&env_map, "ORACLE_PRICE", defaults.oracle_price)?;

        let slot_interval = parse_interval(&env_map, "SLOT_INTERVAL_MS", defaults.slot_interval)?;
        let batch_interval =
            parse_interval(&env_map, "BATCH_INTERVAL_MS", defaults.batch_interval)?;

        let history_limit = parse_or(
            &env_map,
            "HISTORY_LIMIT",
            defaults.history_limit,
            "must be a valid usize",
        )?;

        let thresholds = ThresholdConfig {
            budget_attack_cu: parse_or(
                &env_map,
                "BUDGET_ATTACK_CU",
                defaults.thresholds.budget_attack_cu,
                "must be a valid u64",
            )?,
            failed_toxic_cu: parse_or(
                &env_map,
                "FAILED_TOXIC_CU",
                defaults.thresholds.failed_toxic_cu,
                "must be a valid u64",
            )?,
            success_toxic_cu: parse_or(
                &env_map,
                "SUCCESS_TOXIC_CU",
                defaults.thresholds.success_toxic_cu,
                "must be a valid u64",
            )?,
            depletion_fraction: parse_or(
                &env_map,
                "DEPLETION_FRACTION",
                defaults.thresholds.depletion_fraction,
                "must be a valid f64",
            )?,
        };
        thresholds
            .validate()
            .map_err(|e| ConfigError::InvalidValue("THRESHOLDS".to_string(), e))?;

        let failure_rate: f64 = parse_or(
            &env_map,
            "FAILURE_RATE",
            defaults.failure_rate,
            "must be a valid f64",
        )?;
        if !(0.0..=1.0).contains(&failure_rate) {
            return Err(ConfigError::InvalidValue(
                "FAILURE_RATE".to_string(),
                format!("must be in [0, 1], got {}", failure_rate),
            ));
        }

        let feed_seed = match env_map.get("FEED_SEED").map(|s| s.trim()) {
            None | Some("") => None,
            Some(s) => Some(s.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue("FEED_SEED".to_string(), "must be a valid u64".to_string())
            })?),
        };

        let feed_enabled = match env_map
            .get("FEED_ENABLED")
            .map(|s| s.as_str())
            .unwrap_or("true")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "FEED_ENABLED".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            port,
            num_lanes,
            base_capacity,
            oracle_price,
            slot_interval,
            batch_interval,
            history_limit,
            thresholds,
            failure_rate,
            feed_seed,
            feed_enabled,
        })
    }
}

fn parse_or<T: FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
    why: &str,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), why.to_string())),
    }
}

fn parse_positive_f64(
    env_map: &HashMap<String, String>,
    key: &str,
    default: f64,
) -> Result<f64, ConfigError> {
    let value: f64 = parse_or(env_map, key, default, "must be a valid f64")?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be a positive number".to_string(),
        ));
    }
    Ok(value)
}

fn parse_interval(
    env_map: &HashMap<String, String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let ms: u64 = parse_or(env_map, key, default.as_millis() as u64, "must be a valid u64")?;
    if ms == 0 {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be positive".to_string(),
        ));
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let cfg = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.num_lanes, 10);
        assert_eq!(cfg.base_capacity, 1000.0);
        assert_eq!(cfg.slot_interval, Duration::from_millis(400));
        assert_eq!(cfg.batch_interval, Duration::from_secs(120));
        assert_eq!(cfg.history_limit, 100);
        assert_eq!(cfg.thresholds, ThresholdConfig::default());
        assert!(cfg.feed_seed.is_none());
        assert!(cfg.feed_enabled);
    }

    #[test]
    fn test_overrides() {
        let cfg = Config::from_env_map(env(&[
            ("NUM_LANES", "3"),
            ("SUCCESS_TOXIC_CU", "210000"),
            ("DEPLETION_FRACTION", "0.4"),
            ("FEED_SEED", "42"),
            ("FEED_ENABLED", "false"),
        ]))
        .unwrap();
        assert_eq!(cfg.num_lanes, 3);
        assert_eq!(cfg.thresholds.success_toxic_cu, 210_000);
        assert_eq!(cfg.thresholds.depletion_fraction, 0.4);
        assert_eq!(cfg.feed_seed, Some(42));
        assert!(!cfg.feed_enabled);
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_env_map(env(&[("PORT", "not_a_number")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_zero_lanes_rejected() {
        let result = Config::from_env_map(env(&[("NUM_LANES", "0")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "NUM_LANES"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let result = Config::from_env_map(env(&[("BASE_CAPACITY", "-1")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "BASE_CAPACITY"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_depletion_fraction() {
        let result = Config::from_env_map(env(&[("DEPLETION_FRACTION", "0")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "THRESHOLDS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_feed_enabled() {
        let result = Config::from_env_map(env(&[("FEED_ENABLED", "maybe")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "FEED_ENABLED"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = Config::from_env_map(env(&[("SLOT_INTERVAL_MS", "0")]));
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "SLOT_INTERVAL_MS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
