use crate::config::types::{AuditConfig, Config, CrawlerConfig, HttpConfig};
use crate::ConfigError;

const MAX_TIMEOUT_SECS: u64 = 120;
const MAX_DELAY_MS: u64 = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_audit_config(&config.audit)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    validate_delay("page_delay_ms", config.page_delay_ms)
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if !config.user_agent.chars().all(|c| c.is_ascii() && !c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent must be printable ASCII, got '{}'",
            config.user_agent
        )));
    }

    validate_timeout("page_timeout_secs", config.page_timeout_secs)?;
    validate_timeout("probe_timeout_secs", config.probe_timeout_secs)?;

    Ok(())
}

/// Validates audit configuration
fn validate_audit_config(config: &AuditConfig) -> Result<(), ConfigError> {
    validate_delay("probe_delay_ms", config.probe_delay_ms)
}

fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_TIMEOUT_SECS, secs
        )));
    }
    Ok(())
}

fn validate_delay(name: &str, millis: u64) -> Result<(), ConfigError> {
    if millis > MAX_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "{} must be <= {}ms, got {}ms",
            name, MAX_DELAY_MS, millis
        )));
    }
    Ok(())
}
