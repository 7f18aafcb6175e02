use crate::config::Config;
use crate::utils::get_noterelay_home;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_noterelay_home()?.join("config.json"))
}

/// Load configuration from `config_path` (or the default location).
///
/// A missing file yields the defaults. Environment overrides are applied in
/// both cases, then the result is validated.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let default_path = get_config_path().unwrap_or_else(|_| PathBuf::from("config.json"));
    let path = config_path.unwrap_or(default_path.as_path());

    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON from {}", path.display()))?;
        check_file_permissions(path);
        debug!("loaded config from {}", path.display());
        config
    } else {
        debug!(
            "no config file at {}, using defaults + environment",
            path.display()
        );
        Config::default()
    };

    crate::config::credentials::apply_env_overrides(&mut config);

    config
        .validate()
        .with_context(|| "Configuration validation failed")?;
    Ok(config)
}

/// Warn if the config file has overly permissive permissions.
/// Only emits warnings once per process.
#[cfg(unix)]
fn check_file_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Once;

    static WARNED: Once = Once::new();
    WARNED.call_once(|| {
        if let Ok(meta) = std::fs::metadata(path) {
            let mode = meta.permissions().mode();
            if mode & 0o077 != 0 {
                warn!(
                    "config file {} has permissions {:o}; recommend 0600",
                    path.display(),
                    mode & 0o777
                );
            }
        }
    });
}

#[cfg(not(unix))]
fn check_file_permissions(_path: &Path) {
    // Permission checks only apply on unix systems
}
