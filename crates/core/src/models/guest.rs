//! Guest model - a participant of one event

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// RSVP state of a guest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    #[default]
    Invited,
    Confirmed,
    Declined,
    Maybe,
}

impl RsvpStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RsvpStatus::Invited => "invited",
            RsvpStatus::Confirmed => "confirmed",
            RsvpStatus::Declined => "declined",
            RsvpStatus::Maybe => "maybe",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invited" => Ok(RsvpStatus::Invited),
            "confirmed" => Ok(RsvpStatus::Confirmed),
            "declined" => Ok(RsvpStatus::Declined),
            "maybe" => Ok(RsvpStatus::Maybe),
            _ => Err(Error::Validation(format!("unknown rsvp '{s}'"))),
        }
    }
}

/// A guest of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    /// Linked account, if the guest has one
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub rsvp: RsvpStatus,
    pub dietary_requirements: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    pub fn new(event_id: Uuid, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            name,
            user_id: None,
            email: None,
            phone: None,
            rsvp: RsvpStatus::Invited,
            dietary_requirements: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Host-supplied details for a new guest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewGuest {
    pub name: String,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dietary_requirements: Vec<String>,
}

impl NewGuest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
