//! Social event model - one collaborative planning session

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// The kind of session being planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Sunday Roast - the group votes on the menu
    Roast,
    /// Party Mode - menu pick plus assigned cooking roles
    Party,
    /// Dutch Prep - guests claim dishes from a board
    Potluck,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Roast => "roast",
            EventType::Party => "party",
            EventType::Potluck => "potluck",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EventType::Roast => "Sunday Roast",
            EventType::Party => "Party Mode",
            EventType::Potluck => "Dutch Prep",
        }
    }

    /// Whether guests vote on the menu for this type
    pub fn has_voting(self) -> bool {
        matches!(self, EventType::Roast | EventType::Party)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roast" => Ok(EventType::Roast),
            "party" => Ok(EventType::Party),
            "potluck" => Ok(EventType::Potluck),
            _ => Err(Error::Validation(format!("unknown event type '{s}'"))),
        }
    }
}

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Planning,
    Invite,
    Voting,
    MenuPick,
    RoleAssign,
    DishClaiming,
    Locked,
    Shopping,
    Cooking,
    Done,
    Cancelled,
}

impl EventStatus {
    pub fn all() -> &'static [EventStatus] {
        &[
            EventStatus::Planning,
            EventStatus::Invite,
            EventStatus::Voting,
            EventStatus::MenuPick,
            EventStatus::RoleAssign,
            EventStatus::DishClaiming,
            EventStatus::Locked,
            EventStatus::Shopping,
            EventStatus::Cooking,
            EventStatus::Done,
            EventStatus::Cancelled,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Planning => "planning",
            EventStatus::Invite => "invite",
            EventStatus::Voting => "voting",
            EventStatus::MenuPick => "menu_pick",
            EventStatus::RoleAssign => "role_assign",
            EventStatus::DishClaiming => "dish_claiming",
            EventStatus::Locked => "locked",
            EventStatus::Shopping => "shopping",
            EventStatus::Cooking => "cooking",
            EventStatus::Done => "done",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// `done` and `cancelled` accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Done | EventStatus::Cancelled)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("unknown event status '{s}'")))
    }
}

/// A persisted social cooking event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialEvent {
    pub id: Uuid,
    pub host_id: Uuid,
    pub host_name: String,
    pub event_type: EventType,
    pub title: String,
    pub date_time: DateTime<Utc>,
    pub location: Option<String>,
    pub expected_guests: u32,
    pub dietary_requirements: Vec<String>,
    /// Cuisine or vibe free text
    pub vibe: Option<String>,
    /// Delegated decision-maker, if any
    pub decider_id: Option<Uuid>,
    /// Result of tallying or of a decider's pick; shape depends on the path
    pub menu_selected: Option<serde_json::Value>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SocialEvent {
    pub fn is_host(&self, user_id: Uuid) -> bool {
        self.host_id == user_id
    }
}

/// An unsaved event being filled in by the host
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub event_type: EventType,
    pub title: String,
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub expected_guests: u32,
    pub dietary_requirements: Vec<String>,
    pub vibe: Option<String>,
    pub decider_id: Option<Uuid>,
}

impl EventDraft {
    pub fn new(event_type: EventType) -> Self {
        let expected_guests = match event_type {
            EventType::Roast => 4,
            EventType::Party => 8,
            EventType::Potluck => 6,
        };

        Self {
            event_type,
            title: String::new(),
            date_time: None,
            location: None,
            expected_guests,
            dietary_requirements: Vec::new(),
            vibe: None,
            decider_id: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_date_time(mut self, date_time: DateTime<Utc>) -> Self {
        self.date_time = Some(date_time);
        self
    }

    /// Turn the draft into a `planning` event owned by `host_id`
    pub fn into_event(self, host_id: Uuid, host_name: &str) -> crate::Result<SocialEvent> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::Validation("title is required".into()));
        }
        let date_time = self
            .date_time
            .ok_or_else(|| Error::Validation("date and time are required".into()))?;

        let now = Utc::now();
        Ok(SocialEvent {
            id: Uuid::new_v4(),
            host_id,
            host_name: host_name.to_string(),
            event_type: self.event_type,
            title,
            date_time,
            location: self.location,
            expected_guests: self.expected_guests,
            dietary_requirements: self.dietary_requirements,
            vibe: self.vibe,
            decider_id: self.decider_id,
            menu_selected: None,
            status: EventStatus::Planning,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip_names() {
        for status in EventStatus::all() {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), *status);
        }
        assert!("dashboard".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_draft_requires_title() {
        let draft = EventDraft::new(EventType::Roast).with_date_time(Utc::now());
        let err = draft.into_event(Uuid::new_v4(), "Host").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_draft_requires_date() {
        let draft = EventDraft::new(EventType::Roast).with_title("Family Dinner");
        let err = draft.into_event(Uuid::new_v4(), "Host").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_draft_into_event_starts_planning() {
        let host = Uuid::new_v4();
        let event = EventDraft::new(EventType::Potluck)
            .with_title("  Street Potluck ")
            .with_date_time(Utc::now())
            .into_event(host, "Ana")
            .unwrap();

        assert_eq!(event.status, EventStatus::Planning);
        assert_eq!(event.title, "Street Potluck");
        assert!(event.is_host(host));
        assert!(event.menu_selected.is_none());
    }
}
