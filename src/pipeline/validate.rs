//! Configuration and selector validation.

use crate::error::Result;
use crate::models::{Config, SubjectKind};
use crate::utils::schedule_url;

/// Validate configuration values and page selectors.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    match config.validate() {
        Ok(()) => {
            log::info!("✓ Config OK");
            log::info!("  User agent: {}", config.crawler.user_agent);
            log::info!("  Timeout: {}s", config.crawler.timeout_secs);
            log::info!(
                "  Retry: {} attempts, {}-{}ms backoff",
                config.retry.max_attempts,
                config.retry.base_delay_ms,
                config.retry.max_delay_ms
            );
            log::info!(
                "  Refresh every {} min, {} init attempts",
                config.cache.refresh_interval_mins,
                config.cache.init_attempts
            );
            log::info!(
                "  Sample schedule URL: {}",
                schedule_url(&config.source.base_url, SubjectKind::Group, "1")?
            );
            log::info!("✓ {} selectors compiled", config.selectors.all().len());
            Ok(())
        }
        Err(e) => {
            log::error!("Config validation failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn default_config_is_valid() {
        assert!(run_validate(&Config::default()).is_ok());
    }

    #[test]
    fn broken_selector_is_reported() {
        let mut config = Config::default();
        config.selectors.lesson = "div[".into();
        assert!(matches!(
            run_validate(&config),
            Err(AppError::Selector { .. })
        ));
    }
}
