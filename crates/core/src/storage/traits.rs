//! Storage repository traits
//!
//! These traits define the storage interface the orchestrator talks to,
//! allowing for different implementations (SQLite, mock, hosted backend).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    CookingRole, Dish, DishAssignment, DishStatus, EventProjection, EventStatus, Guest,
    RsvpStatus, SocialEvent, Vote,
};

/// Event repository operations
pub trait EventRepository {
    /// Create a new event
    fn create_event(&self, event: &SocialEvent) -> Result<()>;

    /// Find event by ID
    fn find_event_by_id(&self, id: Uuid) -> Result<Option<SocialEvent>>;

    /// Write a new lifecycle status
    fn update_event_status(&self, event_id: Uuid, status: EventStatus, at: DateTime<Utc>)
        -> Result<()>;

    /// Write the selected menu and the status it moves the event to
    fn update_event_menu(
        &self,
        event_id: Uuid,
        menu: &serde_json::Value,
        status: EventStatus,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Set or clear the delegated decider
    fn update_event_decider(
        &self,
        event_id: Uuid,
        decider_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<()>;

    /// Fetch an event and all four sub-collections as one consistent read
    fn load_projection(&self, event_id: Uuid) -> Result<Option<EventProjection>>;
}

/// Host/guest membership lookups
pub trait MembershipRepository {
    /// Events hosted by a user
    fn list_events_for_host(&self, host_id: Uuid) -> Result<Vec<SocialEvent>>;

    /// Events a user is a linked guest of
    fn list_events_for_guest(&self, user_id: Uuid) -> Result<Vec<SocialEvent>>;
}

/// Guest repository operations
pub trait GuestRepository {
    fn create_guest(&self, guest: &Guest) -> Result<()>;

    fn list_guests_for_event(&self, event_id: Uuid) -> Result<Vec<Guest>>;

    fn update_guest_rsvp(&self, guest_id: Uuid, rsvp: RsvpStatus) -> Result<()>;

    fn delete_guest(&self, guest_id: Uuid) -> Result<()>;
}

/// Vote repository operations
pub trait VoteRepository {
    /// Record a vote; no uniqueness is enforced
    fn create_vote(&self, vote: &Vote) -> Result<()>;

    /// Votes for an event in cast order
    fn list_votes_for_event(&self, event_id: Uuid) -> Result<Vec<Vote>>;
}

/// Dish repository operations
pub trait DishRepository {
    fn create_dish(&self, dish: &Dish) -> Result<()>;

    fn find_dish_by_id(&self, dish_id: Uuid) -> Result<Option<Dish>>;

    fn list_dishes_for_event(&self, event_id: Uuid) -> Result<Vec<Dish>>;

    /// Unconditionally overwrite assignee and status
    fn update_dish_assignment(&self, dish_id: Uuid, assignment: &DishAssignment) -> Result<()>;

    fn update_dish_status(&self, dish_id: Uuid, status: DishStatus) -> Result<()>;

    fn delete_dish(&self, dish_id: Uuid) -> Result<()>;
}

/// Cooking role repository operations
pub trait RoleRepository {
    fn create_role(&self, role: &CookingRole) -> Result<()>;

    fn list_roles_for_event(&self, event_id: Uuid) -> Result<Vec<CookingRole>>;

    fn delete_role(&self, role_id: Uuid) -> Result<()>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
/// Implementations may be backed by SQLite, mocks, or a hosted backend.
pub trait Storage:
    EventRepository
    + MembershipRepository
    + GuestRepository
    + VoteRepository
    + DishRepository
    + RoleRepository
{
}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: EventRepository
        + MembershipRepository
        + GuestRepository
        + VoteRepository
        + DishRepository
        + RoleRepository
{
}
