//! gemchat configuration.
//!
//! TOML-based configuration with full validation. All sections use
//! defaults so partial configs work out of the box.
//!
//! ```rust,no_run
//! let config = gemchat_config::load_config().expect("failed to load config");
//! println!("model: {}", config.model.name);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::GemchatConfig;

use std::path::Path;

use gemchat_common::ConfigError;

/// Load `config.toml` from the OS config directory, creating a default
/// one if none exists, and validate the result.
pub fn load_config() -> Result<GemchatConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate a config from an explicit path. A missing file is an
/// error here, unlike [`load_config`].
pub fn load_config_from(path: &Path) -> Result<GemchatConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
