//! Collaborator ports for best-effort side channels
//!
//! The orchestrator calls the content feed, companion messages and analytics
//! through these traits. Every call goes through [`Collaborators`], which logs
//! and swallows failures so side effects can never block a state change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{EventStatus, EventType, SocialEvent};

/// Card pushed to the front of the content feed after an event is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCard {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: SocialEventCard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialEventCard {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub title: String,
    pub host_name: String,
    pub is_host: bool,
    pub date_time: DateTime<Utc>,
    pub status: EventStatus,
    pub guest_count: u32,
}

impl FeedCard {
    pub fn for_event(event: &SocialEvent, viewer_id: Uuid) -> Self {
        Self {
            id: format!("social-{}", event.id),
            kind: "social_event".to_string(),
            data: SocialEventCard {
                event_id: event.id,
                event_type: event.event_type,
                title: event.title.clone(),
                host_name: event.host_name.clone(),
                is_host: event.is_host(viewer_id),
                date_time: event.date_time,
                status: event.status,
                guest_count: event.expected_guests,
            },
        }
    }
}

/// A named analytics signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSignal {
    pub name: String,
    pub payload: serde_json::Value,
}

impl AnalyticsSignal {
    pub fn event_created(event: &SocialEvent) -> Self {
        Self {
            name: "social_event_created".to_string(),
            payload: serde_json::json!({
                "eventType": event.event_type,
                "guestCount": event.expected_guests,
            }),
        }
    }
}

/// Content feed that accepts new cards at the front
pub trait FeedSink {
    fn prepend(&self, card: FeedCard) -> Result<()>;
}

/// Companion surface that shows short human-readable messages
pub trait CompanionSink {
    fn show_message(&self, message: &str) -> Result<()>;
}

/// Analytics backend
pub trait AnalyticsSink {
    fn track(&self, signal: &AnalyticsSignal) -> Result<()>;
}

/// Feed that discards cards
pub struct NoFeed;

impl FeedSink for NoFeed {
    fn prepend(&self, _card: FeedCard) -> Result<()> {
        Ok(())
    }
}

/// Companion that writes messages to the log
pub struct LogCompanion;

impl CompanionSink for LogCompanion {
    fn show_message(&self, message: &str) -> Result<()> {
        info!(message, "Companion message");
        Ok(())
    }
}

/// Analytics that records signals as log lines
pub struct LogAnalytics;

impl AnalyticsSink for LogAnalytics {
    fn track(&self, signal: &AnalyticsSignal) -> Result<()> {
        info!(name = %signal.name, payload = %signal.payload, "Analytics signal");
        Ok(())
    }
}

/// The injected set of side-channel collaborators
pub struct Collaborators {
    pub feed: Box<dyn FeedSink>,
    pub companion: Box<dyn CompanionSink>,
    pub analytics: Box<dyn AnalyticsSink>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            feed: Box::new(NoFeed),
            companion: Box::new(LogCompanion),
            analytics: Box::new(LogAnalytics),
        }
    }
}

impl Collaborators {
    pub fn publish_card(&self, card: FeedCard) {
        if let Err(e) = self.feed.prepend(card) {
            warn!(error = %e, "Feed card push failed");
        }
    }

    pub fn notify(&self, message: &str) {
        if let Err(e) = self.companion.show_message(message) {
            warn!(error = %e, "Companion message failed");
        }
    }

    pub fn track(&self, signal: AnalyticsSignal) {
        if let Err(e) = self.analytics.track(&signal) {
            warn!(error = %e, signal = %signal.name, "Analytics signal failed");
        }
    }
}
