use crate::config::types::{Config, CrawlerConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.delay_min < 0.0 || config.delay_max < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delays must be non-negative, got {}..{}",
            config.delay_min, config.delay_max
        )));
    }

    if config.delay_min > config.delay_max {
        return Err(ConfigError::Validation(format!(
            "delay_min ({}) must not exceed delay_max ({})",
            config.delay_min, config.delay_max
        )));
    }

    if !config.delay_min.is_finite() || !config.delay_max.is_finite() {
        return Err(ConfigError::Validation(
            "delays must be finite numbers".to_string(),
        ));
    }

    Ok(())
}

/// Validates the user agent string
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    // Header values must stay within visible ASCII
    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user agent cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}
