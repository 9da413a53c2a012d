//! In-memory reconstruction of an event and its sub-records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CookingRole, Dish, EventStatus, EventType, Guest, SocialEvent, Vote};

/// An event plus every sub-record scoped to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventProjection {
    pub event: SocialEvent,
    pub guests: Vec<Guest>,
    pub votes: Vec<Vote>,
    pub dishes: Vec<Dish>,
    pub roles: Vec<CookingRole>,
}

impl EventProjection {
    /// Projection of a freshly created event with no sub-records
    pub fn empty(event: SocialEvent) -> Self {
        Self {
            event,
            guests: Vec::new(),
            votes: Vec::new(),
            dishes: Vec::new(),
            roles: Vec::new(),
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event.id
    }

    /// The queryable (type, status) pair
    pub fn key(&self) -> (EventType, EventStatus) {
        (self.event.event_type, self.event.status)
    }

    pub fn dish(&self, dish_id: Uuid) -> Option<&Dish> {
        self.dishes.iter().find(|d| d.id == dish_id)
    }

    pub fn dish_mut(&mut self, dish_id: Uuid) -> Option<&mut Dish> {
        self.dishes.iter_mut().find(|d| d.id == dish_id)
    }
}
