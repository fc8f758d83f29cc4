// SPDX-FileCopyrightText: 2026 Mensajero Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::MensajeroConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &MensajeroConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation("storage.database_path must not be empty"));
    }

    if !LOG_LEVELS.contains(&config.service.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::validation(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    } else {
        let is_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_hostname = host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !is_ip && !is_hostname {
            errors.push(ConfigError::validation(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if config.gateway.port == 0 {
        errors.push(ConfigError::validation("gateway.port must be non-zero"));
    }

    if config.gateway.max_upload_bytes == 0 {
        errors.push(ConfigError::validation("gateway.max_upload_bytes must be positive"));
    }

    if let Some(token) = &config.gateway.bearer_token {
        if token.trim().is_empty() {
            errors.push(ConfigError::validation(
                "gateway.bearer_token must not be blank; omit it to disable auth",
            ));
        }
    }

    if config.export.date_format.trim().is_empty() {
        errors.push(ConfigError::validation("export.date_format must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&MensajeroConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails() {
        let mut config = MensajeroConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn collects_all_failures() {
        let mut config = MensajeroConfig::default();
        config.gateway.port = 0;
        config.gateway.host = "not a host!".to_string();
        config.service.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_message(&errors, "gateway.port"));
        assert!(has_message(&errors, "gateway.host"));
        assert!(has_message(&errors, "log_level"));
    }

    #[test]
    fn blank_bearer_token_fails() {
        let mut config = MensajeroConfig::default();
        config.gateway.bearer_token = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "bearer_token"));
    }
}
