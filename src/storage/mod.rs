pub mod config;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// `~/.taskdeck/`, or the current directory when there is no home directory
pub fn taskdeck_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".taskdeck"))
        .unwrap_or_else(|| PathBuf::from(".taskdeck"))
}

/// Read and deserialize a TOML file
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Serialize to a TOML file, creating parent directories as needed
pub fn save_toml<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(data)?;
    std::fs::write(path, content)?;
    Ok(())
}
