use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::SparkError;

const DEFAULT_MODEL: &str = "gpt-4o";

/// Application configuration loaded from environment variables.
///
/// Nothing is required: without `OPENAI_API_KEY` the engine runs entirely on
/// its deterministic fallbacks.
#[derive(Debug, Clone)]
pub struct Config {
    // Text generation
    pub openai_api_key: Option<String>,
    pub model: String,
    pub generation_timeout: Duration,

    // Intent classification
    pub max_tools: usize,

    // Behavior capture
    pub hover_tick: Duration,
    pub behavior_weighting: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            generation_timeout: Duration::from_secs(30),
            max_tools: 4,
            hover_tick: Duration::from_millis(100),
            behavior_weighting: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, SparkError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            model: env::var("SPARK_MODEL").unwrap_or(defaults.model),
            generation_timeout: Duration::from_secs(parse_env(
                "SPARK_GENERATION_TIMEOUT_SECS",
                defaults.generation_timeout.as_secs(),
            )?),
            max_tools: parse_env("SPARK_MAX_TOOLS", defaults.max_tools)?,
            hover_tick: Duration::from_millis(parse_env(
                "SPARK_HOVER_TICK_MS",
                defaults.hover_tick.as_millis() as u64,
            )?),
            behavior_weighting: parse_env("SPARK_BEHAVIOR_WEIGHTING", defaults.behavior_weighting)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SparkError> {
        if self.max_tools == 0 {
            return Err(SparkError::Config("SPARK_MAX_TOOLS must be at least 1".into()));
        }
        if self.hover_tick.is_zero() {
            return Err(SparkError::Config("SPARK_HOVER_TICK_MS must be positive".into()));
        }
        if self.generation_timeout.is_zero() {
            return Err(SparkError::Config(
                "SPARK_GENERATION_TIMEOUT_SECS must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Log the effective configuration with secrets reduced to a prefix.
    pub fn log_redacted(&self) {
        let key = match &self.openai_api_key {
            Some(k) => format!("{}...", k.chars().take(5).collect::<String>()),
            None => "(unset, fallbacks only)".to_string(),
        };
        info!(
            openai_api_key = %key,
            model = %self.model,
            generation_timeout_secs = self.generation_timeout.as_secs(),
            max_tools = self.max_tools,
            hover_tick_ms = self.hover_tick.as_millis() as u64,
            behavior_weighting = self.behavior_weighting,
            "Config loaded"
        );
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, SparkError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| SparkError::Config(format!("{key} has an invalid value: {raw:?}"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tools, 4);
        assert_eq!(config.hover_tick, Duration::from_millis(100));
        assert!(!config.behavior_weighting);
    }

    #[test]
    fn zero_max_tools_rejected() {
        let config = Config {
            max_tools: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(SparkError::Config(_))));
    }

    #[test]
    fn parse_env_falls_back_when_unset() {
        let value: u64 = parse_env("SPARK_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
