//! TOML persistence for [`TouchSettings`].
//!
//! The settings file lives in the platform config directory:
//! - Linux:    `~/.config/padoverip/settings.toml`
//! - macOS:    `~/Library/Application Support/PadOverIP/settings.toml`
//! - Windows:  `%APPDATA%\PadOverIP\settings.toml`
//!
//! Every field in the schema has a serde default, so a file written by an
//! older version (or no file at all) loads as a complete record.

use std::path::{Path, PathBuf};

use thiserror::Error;

use pad_core::TouchSettings;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Resolves the full path to the settings file.
///
/// # Errors
///
/// Returns [`StorageError::NoPlatformConfigDir`] if the platform base
/// directory cannot be determined from the environment.
pub fn settings_file_path() -> Result<PathBuf, StorageError> {
    let dir = platform_config_dir().ok_or(StorageError::NoPlatformConfigDir)?;
    Ok(dir.join("settings.toml"))
}

/// Loads settings from the default location, falling back to
/// [`TouchSettings::default`] when the file does not exist yet.
///
/// # Errors
///
/// Returns [`StorageError::Io`] for file-system errors other than "not
/// found", and [`StorageError::Parse`] if the TOML is malformed.
pub fn load_settings() -> Result<TouchSettings, StorageError> {
    load_settings_from(&settings_file_path()?)
}

/// Loads settings from an explicit path.  See [`load_settings`].
pub fn load_settings_from(path: &Path) -> Result<TouchSettings, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TouchSettings::default()),
        Err(e) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists settings to the default location, creating the config directory
/// if needed.
///
/// # Errors
///
/// Returns [`StorageError::Io`] for file-system failures or
/// [`StorageError::Serialize`] if serialization fails.
pub fn save_settings(settings: &TouchSettings) -> Result<(), StorageError> {
    save_settings_to(&settings_file_path()?, settings)
}

/// Persists settings to an explicit path.  See [`save_settings`].
pub fn save_settings_to(path: &Path, settings: &TouchSettings) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory for this application.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("PadOverIP"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("padoverip"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("PadOverIP")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
