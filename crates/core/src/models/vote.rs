//! Vote model - one preference cast during open voting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single (voter, category, value) vote
///
/// Voters may cast several votes in the same category; every one counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub event_id: Uuid,
    pub voter_id: Uuid,
    pub voter_name: String,
    pub category: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        event_id: Uuid,
        voter_id: Uuid,
        voter_name: String,
        category: String,
        value: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            voter_id,
            voter_name,
            category,
            value,
            created_at: Utc::now(),
        }
    }
}
