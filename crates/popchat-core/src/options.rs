//! Where the configuration file lives and how it gets written.
//!
//! Both are chosen at startup from the environment:
//! - `POPCHAT_CONFIG`: `user-data` (default), `portable` (next to the
//!   executable), or a path to the file itself
//! - `POPCHAT_WRITE_MODE`: `background` (default) or `blocking`

use std::{env, path::PathBuf};

use directories::ProjectDirs;

use crate::Error;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const CONFIG_LOCATION_VAR: &str = "POPCHAT_CONFIG";
pub const WRITE_MODE_VAR: &str = "POPCHAT_WRITE_MODE";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StorageLocation {
    /// The per-user application data directory.
    #[default]
    UserData,
    /// The directory holding the running executable.
    BesideExecutable,
    /// An explicit file path.
    Custom(PathBuf),
}

impl StorageLocation {
    /// Resolve to the path of the configuration file.
    pub fn resolve(&self) -> Result<PathBuf, Error> {
        match self {
            StorageLocation::UserData => {
                let dirs = ProjectDirs::from("tv", "popchat", "PopChat").ok_or(Error::NoDataDir)?;
                Ok(dirs.data_dir().join(CONFIG_FILE_NAME))
            }
            StorageLocation::BesideExecutable => {
                let exe = env::current_exe()?;
                let dir = exe.parent().ok_or(Error::NoExecutableDir)?;
                Ok(dir.join(CONFIG_FILE_NAME))
            }
            StorageLocation::Custom(path) => Ok(path.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write on the calling thread before `save` returns.
    Blocking,
    /// Queue the write for a single background writer task.
    #[default]
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageOptions {
    pub location: StorageLocation,
    pub write_mode: WriteMode,
}

impl StorageOptions {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let location = match lookup(CONFIG_LOCATION_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("user-data") => StorageLocation::UserData,
            Some("portable") => StorageLocation::BesideExecutable,
            Some(path) => StorageLocation::Custom(PathBuf::from(path)),
        };

        let write_mode = match lookup(WRITE_MODE_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("background") => WriteMode::Background,
            Some("blocking") => WriteMode::Blocking,
            Some(other) => {
                tracing::warn!(
                    "Unknown {} value {:?}, using background writes",
                    WRITE_MODE_VAR,
                    other
                );
                WriteMode::Background
            }
        };

        Self {
            location,
            write_mode,
        }
    }
}
