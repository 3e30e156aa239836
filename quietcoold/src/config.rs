//! Loading the daemon's configuration file

use quietcool_core::{QuietcoolError, Result, StaticConfig};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Load static config from TOML file, creating with defaults if missing.
///
/// The loaded config is validated before it is returned.
pub(crate) async fn load_static_config(path: &Path) -> Result<StaticConfig> {
    if !path.exists() {
        info!(
            "Config not found at {}. Creating with defaults.",
            path.display()
        );

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                QuietcoolError::Config(format!(
                    "Failed to create config directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let config = StaticConfig::default();
        let toml_str = config
            .to_toml()
            .map_err(|e| QuietcoolError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, &toml_str)
            .await
            .map_err(|e| QuietcoolError::Config(format!("Failed to write config file: {}", e)))?;

        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| QuietcoolError::Config(format!("Failed to read config file: {}", e)))?;

    let config = StaticConfig::from_toml(&content)
        .map_err(|e| QuietcoolError::Config(format!("Failed to parse config file: {}", e)))?;
    config.validate()?;

    Ok(config)
}
