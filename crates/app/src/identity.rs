//! Local user identity
//!
//! The shell acts as one person. Their id is generated once and kept in
//! `identity.toml` so hosted events stay theirs across runs.

use std::fs;
use std::path::Path;

use gather_core::{Actor, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
}

impl Identity {
    /// Read the identity at `path`, creating it on first use
    ///
    /// `name` renames an existing identity; the id never changes.
    pub fn load_or_create(path: &Path, name: Option<&str>) -> Result<Self> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        let mut identity = if path.exists() {
            let text = fs::read_to_string(path)?;
            toml::from_str(&text).map_err(|e| Error::Config(e.to_string()))?
        } else {
            let identity = Identity {
                id: Uuid::new_v4(),
                name: name.unwrap_or("Host").to_string(),
            };
            info!(user_id = %identity.id, "Created local identity");
            identity.save(path)?;
            identity
        };

        if let Some(name) = name {
            if name != identity.name {
                identity.name = name.to_string();
                identity.save(path)?;
            }
        }
        Ok(identity)
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.name.clone())
    }
}
