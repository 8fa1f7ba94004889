pub mod assemble;
pub mod chunk;
pub mod classify;
pub mod index;
pub mod status;

use std::path::Path;

use contextor_config::AppConfig;

/// The default config, or `path` when given, with environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        None => AppConfig::load(),
        Some(path) => AppConfig::load_from(path).and_then(|mut config| {
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config.validate()?;
            Ok(config)
        }),
    };
    config.map_err(|e| format!("Failed to load config: {e}").into())
}
