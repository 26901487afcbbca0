//! Configuration loading and catalog folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no command-line override is given.
pub const FOLDER_ENV_VAR: &str = "MIDICAT_FOLDER";

/// File name of the catalog database inside the catalog folder.
pub const CATALOG_DB_NAME: &str = "midicat.db";

/// Catalog folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. MIDICAT_FOLDER environment variable
/// 3. TOML config file (`catalog_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_catalog_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(FOLDER_ENV_VAR) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(folder) = config.get("catalog_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_catalog_folder()
}

/// Full path of the catalog database file inside `folder`.
pub fn catalog_db_path(folder: &Path) -> PathBuf {
    folder.join(CATALOG_DB_NAME)
}

/// Get default configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/midicat/config.toml first, then /etc/midicat/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("midicat").join("config.toml"));
        let system_config = PathBuf::from("/etc/midicat/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else {
        dirs::config_dir()
            .map(|d| d.join("midicat").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default catalog folder path
fn default_catalog_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/midicat (or /var/lib/midicat for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("midicat"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/midicat"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/midicat
        dirs::data_dir()
            .map(|d| d.join("midicat"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/midicat"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\midicat
        dirs::data_local_dir()
            .map(|d| d.join("midicat"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\midicat"))
    } else {
        PathBuf::from("./midicat_data")
    }
}
