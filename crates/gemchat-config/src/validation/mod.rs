//! Full configuration validation.
//!
//! Every check pushes into a shared list so one run reports all problems
//! in a single `ConfigError`.

mod helpers;


use crate::schema::GemchatConfig;
use gemchat_common::ConfigError;

use helpers::{validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GemchatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_model(&mut errors, config);
    validate_api(&mut errors, config);
    validate_credentials(&mut errors, config);
    validate_range(
        &mut errors,
        "attachments.max_file_size_mb",
        config.attachments.max_file_size_mb,
        1,
        20,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_model(errors: &mut Vec<String>, config: &GemchatConfig) {
    let name = &config.model.name;
    if name.trim().is_empty() {
        errors.push("model.name must not be empty".into());
    } else if name.chars().any(char::is_whitespace) {
        errors.push(format!("model.name '{name}' must not contain whitespace"));
    }

    if let Some(t) = config.model.temperature {
        validate_range_f64(errors, "model.temperature", t, 0.0, 2.0);
    }
    if let Some(n) = config.model.max_output_tokens {
        validate_range(errors, "model.max_output_tokens", n, 1, 65_536);
    }
}

fn validate_api(errors: &mut Vec<String>, config: &GemchatConfig) {
    let url = &config.api.base_url;
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        errors.push(format!("api.base_url '{url}' must be an http(s) URL"));
    }
    validate_range(
        errors,
        "api.connect_timeout_secs",
        config.api.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        errors,
        "api.request_timeout_secs",
        config.api.request_timeout_secs,
        1,
        600,
    );
}

fn validate_credentials(errors: &mut Vec<String>, config: &GemchatConfig) {
    let name = &config.credentials.key_name;
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        errors.push(format!(
            "credentials.key_name '{name}' may only use letters, digits, '_', '-', '.'"
        ));
    }
}
