//! Configuration validation with aggregated errors.
//! Every issue is collected so a broken file is reported in one pass.

use tracing::{error, info};

use crate::config::settings::{ApiConfig, LoggingConfig, ServiceConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_api(&cfg.settings.api, &mut errors);
    if let Some(logging) = &cfg.settings.logging {
        validate_logging(logging, &mut errors);
    }
    if let Some(credentials) = &cfg.credentials {
        if credentials.app_id.as_deref() == Some("") {
            errors.push("credentials.app_id is empty".to_string());
        }
        if credentials.app_secret.as_deref() == Some("") {
            errors.push("credentials.app_secret is empty".to_string());
        }
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        for e in &errors {
            error!("config error: {}", e);
        }
        Err(errors)
    }
}

fn validate_api(api: &ApiConfig, errors: &mut Vec<String>) {
    if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
        errors.push(format!(
            "settings.api.base_url '{}' must start with http:// or https://",
            api.base_url
        ));
    }
    if api.timeout_secs == 0 {
        errors.push("settings.api.timeout_secs must be > 0".to_string());
    }
    if api.chunk_size == 0 {
        errors.push("settings.api.chunk_size must be > 0".to_string());
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "settings.logging.level '{}' is not one of {:?}",
            logging.level, LOG_LEVELS
        ));
    }
}
