//! Configuration loaded from `config.toml`
//!
//! Every field has a default, so a missing file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "gather.db";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatherConfig {
    /// Overrides the platform data directory location of the database
    pub database_path: Option<PathBuf>,
    pub share: ShareConfig,
}

/// Link formats used when sharing an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Scheme for in-app deep links (`<scheme>://social/<id>`)
    pub deep_link_scheme: String,
    /// Public web host serving potluck boards
    pub web_host: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            deep_link_scheme: "app".to_string(),
            web_host: "gather.app".to_string(),
        }
    }
}

impl GatherConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Load `config.toml` from the platform config directory, or defaults
    pub fn load_or_default() -> Result<Self> {
        let path = project_dirs()?.config_dir().join(CONFIG_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Where the database lives
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(DATABASE_FILE)),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("app", "gather", "gather").ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine data directory",
        ))
    })
}
