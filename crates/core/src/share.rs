//! Share message and link formatting

use serde::{Deserialize, Serialize};

use crate::config::ShareConfig;
use crate::models::{EventType, SocialEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    pub message: String,
    pub url: String,
}

/// Invitation text and link for an event
pub fn share_link(event: &SocialEvent, config: &ShareConfig) -> ShareLink {
    let url = match event.event_type {
        EventType::Roast | EventType::Party => {
            format!("{}://social/{}", config.deep_link_scheme, event.id)
        }
        EventType::Potluck => format!("https://{}/potluck/{}", config.web_host, event.id),
    };
    let when = event.date_time.format("%A %-d %B at %H:%M");

    let message = match event.event_type {
        EventType::Roast => format!(
            "{} is hosting a Sunday Roast: \"{}\" on {}. Vote for what's on the table: {}",
            event.host_name, event.title, when, url
        ),
        EventType::Party => format!(
            "You're invited to \"{}\" on {}! Check the menu and your kitchen role: {}",
            event.title, when, url
        ),
        EventType::Potluck => format!(
            "Potluck time! \"{}\" on {}. Pick a dish to bring: {}",
            event.title, when, url
        ),
    };

    ShareLink { message, url }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventDraft;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn event(event_type: EventType) -> SocialEvent {
        EventDraft::new(event_type)
            .with_title("Family Dinner")
            .with_date_time(Utc.with_ymd_and_hms(2026, 10, 25, 13, 0, 0).unwrap())
            .into_event(Uuid::new_v4(), "Ana")
            .unwrap()
    }

    #[test]
    fn test_roast_uses_deep_link() {
        let event = event(EventType::Roast);
        let link = share_link(&event, &ShareConfig::default());
        assert_eq!(link.url, format!("app://social/{}", event.id));
        assert!(link.message.contains("Sunday Roast"));
        assert!(link.message.contains("Sunday 25 October at 13:00"));
        assert!(link.message.ends_with(&link.url));
    }

    #[test]
    fn test_party_uses_configured_scheme() {
        let event = event(EventType::Party);
        let config = ShareConfig {
            deep_link_scheme: "gather".into(),
            ..ShareConfig::default()
        };
        let link = share_link(&event, &config);
        assert_eq!(link.url, format!("gather://social/{}", event.id));
    }

    #[test]
    fn test_potluck_uses_web_url() {
        let event = event(EventType::Potluck);
        let config = ShareConfig {
            web_host: "dinners.example".into(),
            ..ShareConfig::default()
        };
        let link = share_link(&event, &config);
        assert_eq!(
            link.url,
            format!("https://dinners.example/potluck/{}", event.id)
        );
        assert!(link.message.contains("Pick a dish"));
    }
}
