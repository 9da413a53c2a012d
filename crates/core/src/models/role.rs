//! Cooking role model for party events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One cooking-task assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingRole {
    pub id: Uuid,
    pub event_id: Uuid,
    pub person_name: String,
    pub role_name: String,
    /// Ordered task descriptions
    pub tasks: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CookingRole {
    pub fn new(event_id: Uuid, person_name: String, role_name: String, tasks: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            person_name,
            role_name,
            tasks,
            created_at: Utc::now(),
        }
    }
}
