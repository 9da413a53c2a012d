//! Application state management

use std::path::PathBuf;

use directories::ProjectDirs;
use gather_core::{Database, Error, GatherConfig, Result};
use tracing::info;

use crate::identity::Identity;

const IDENTITY_FILE: &str = "identity.toml";

/// Everything the shell needs for one run
pub struct AppState {
    pub db: Database,
    pub config: GatherConfig,
    pub identity: Identity,
}

impl AppState {
    /// Open the database and resolve the local identity
    ///
    /// `name` comes from `GATHER_NAME` and renames the identity when set.
    pub fn new(config: GatherConfig, name: Option<&str>) -> Result<Self> {
        let db_path = config.database_path()?;

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        info!(path = %db_path.display(), schema = db.schema_version(), "Database opened");

        let identity = Identity::load_or_create(&Self::data_path()?.join(IDENTITY_FILE), name)?;

        Ok(Self {
            db,
            config,
            identity,
        })
    }

    fn data_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("app", "gather", "gather").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

        Ok(dirs.data_dir().to_path_buf())
    }
}
