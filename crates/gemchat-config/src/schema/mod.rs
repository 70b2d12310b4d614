//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod model;
mod session;
mod system;

pub use model::*;
pub use session::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for gemchat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GemchatConfig {
    pub model: ModelConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub credentials: CredentialConfig,
    pub attachments: AttachmentsConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_settings() {
        let config = GemchatConfig::default();
        assert_eq!(config.model.name, "gemini-2.5-flash");
        assert!(config.model.system_instruction.is_none());
        assert!(config.model.temperature.is_none());
        assert!(config.model.max_output_tokens.is_none());
    }

    #[test]
    fn default_api_settings() {
        let config = GemchatConfig::default();
        assert_eq!(
            config.api.base_url,
            "https://generativelanguage.googleapis.com/v1beta/models"
        );
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert_eq!(config.api.request_timeout_secs, 120);
    }

    #[test]
    fn default_session_settings() {
        let config = GemchatConfig::default();
        assert!(!config.session.greeting.is_empty());
        assert_eq!(config.session.suggestions.len(), 3);
        assert!(config.credentials.remember);
        assert_eq!(config.credentials.key_name, "gemini_api_key");
        assert_eq!(config.attachments.max_file_size_mb, 5);
        assert_eq!(config.attachments.max_file_size_bytes(), 5 * 1024 * 1024);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GemchatConfig = toml::from_str(
            r#"
[model]
temperature = 0.2

[credentials]
remember = false
"#,
        )
        .unwrap();
        assert_eq!(config.model.name, "gemini-2.5-flash");
        assert_eq!(config.model.temperature, Some(0.2));
        assert!(!config.credentials.remember);
        assert_eq!(config.credentials.key_name, "gemini_api_key");
    }

    #[test]
    fn log_level_parses_uppercase() {
        let config: GemchatConfig = toml::from_str("[logging]\nlevel = \"DEBUG\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.level.as_directive(), "debug");
    }
}
