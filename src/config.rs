// src/config.rs

//! Configuration loading utilities.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load configuration from a TOML file.
///
/// A missing file yields the defaults; a file that exists but cannot be
/// read or parsed is an error. Values are not validated here.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    Config::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.cache.refresh_interval_mins, 30);
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [retry]
            max_attempts = 5

            [selectors]
            lesson = ".lesson"
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 2000);
        assert_eq!(config.selectors.lesson, ".lesson");
        assert_eq!(config.selectors.day_block, ".dateBlock");
    }

    #[test]
    fn malformed_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[retry\nmax_attempts = ").unwrap();

        assert!(matches!(load_config(&path), Err(AppError::Toml(_))));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[cache]\ninit_attempts = 0\n").unwrap();

        let config = load_config(&path).unwrap();
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }
}
