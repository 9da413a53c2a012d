//! SQLite storage layer for Gather

mod dishes;
mod events;
mod guests;
mod migrations;
mod parse;
mod roles;
mod traits;
mod votes;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    CookingRole, Dish, DishAssignment, DishStatus, EventProjection, EventStatus, Guest,
    RsvpStatus, SocialEvent, Vote,
};

pub use dishes::DishStore;
pub use events::EventStore;
pub use guests::GuestStore;
pub use roles::RoleStore;
pub use traits::{
    DishRepository, EventRepository, GuestRepository, MembershipRepository, RoleRepository,
    Storage, VoteRepository,
};
pub use votes::VoteStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    pub fn events(&self) -> EventStore<'_> {
        EventStore::new(&self.conn)
    }

    pub fn guests(&self) -> GuestStore<'_> {
        GuestStore::new(&self.conn)
    }

    pub fn votes(&self) -> VoteStore<'_> {
        VoteStore::new(&self.conn)
    }

    pub fn dishes(&self) -> DishStore<'_> {
        DishStore::new(&self.conn)
    }

    pub fn roles(&self) -> RoleStore<'_> {
        RoleStore::new(&self.conn)
    }

    /// Run raw SQL against the connection; tests use it to break tables
    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl EventRepository for Database {
    fn create_event(&self, event: &SocialEvent) -> Result<()> {
        self.events().create(event)
    }

    fn find_event_by_id(&self, id: Uuid) -> Result<Option<SocialEvent>> {
        self.events().find_by_id(id)
    }

    fn update_event_status(
        &self,
        event_id: Uuid,
        status: EventStatus,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.events().update_status(event_id, status, at)
    }

    fn update_event_menu(
        &self,
        event_id: Uuid,
        menu: &serde_json::Value,
        status: EventStatus,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.events().update_menu(event_id, menu, status, at)
    }

    fn update_event_decider(
        &self,
        event_id: Uuid,
        decider_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.events().update_decider(event_id, decider_id, at)
    }

    #[instrument(skip(self))]
    fn load_projection(&self, event_id: Uuid) -> Result<Option<EventProjection>> {
        let tx = self.conn.unchecked_transaction()?;

        let Some(event) = EventStore::new(&tx).find_by_id(event_id)? else {
            return Ok(None);
        };
        let projection = EventProjection {
            event,
            guests: GuestStore::new(&tx).list_for_event(event_id)?,
            votes: VoteStore::new(&tx).list_for_event(event_id)?,
            dishes: DishStore::new(&tx).list_for_event(event_id)?,
            roles: RoleStore::new(&tx).list_for_event(event_id)?,
        };
        tx.commit()?;

        debug!(
            guests = projection.guests.len(),
            votes = projection.votes.len(),
            dishes = projection.dishes.len(),
            roles = projection.roles.len(),
            "Loaded event projection"
        );
        Ok(Some(projection))
    }
}

impl MembershipRepository for Database {
    fn list_events_for_host(&self, host_id: Uuid) -> Result<Vec<SocialEvent>> {
        self.events().list_for_host(host_id)
    }

    fn list_events_for_guest(&self, user_id: Uuid) -> Result<Vec<SocialEvent>> {
        self.events().list_for_guest(user_id)
    }
}

impl GuestRepository for Database {
    fn create_guest(&self, guest: &Guest) -> Result<()> {
        self.guests().create(guest)
    }

    fn list_guests_for_event(&self, event_id: Uuid) -> Result<Vec<Guest>> {
        self.guests().list_for_event(event_id)
    }

    fn update_guest_rsvp(&self, guest_id: Uuid, rsvp: RsvpStatus) -> Result<()> {
        self.guests().update_rsvp(guest_id, rsvp)
    }

    fn delete_guest(&self, guest_id: Uuid) -> Result<()> {
        self.guests().delete(guest_id)
    }
}

impl VoteRepository for Database {
    fn create_vote(&self, vote: &Vote) -> Result<()> {
        self.votes().create(vote)
    }

    fn list_votes_for_event(&self, event_id: Uuid) -> Result<Vec<Vote>> {
        self.votes().list_for_event(event_id)
    }
}

impl DishRepository for Database {
    fn create_dish(&self, dish: &Dish) -> Result<()> {
        self.dishes().create(dish)
    }

    fn find_dish_by_id(&self, dish_id: Uuid) -> Result<Option<Dish>> {
        self.dishes().find_by_id(dish_id)
    }

    fn list_dishes_for_event(&self, event_id: Uuid) -> Result<Vec<Dish>> {
        self.dishes().list_for_event(event_id)
    }

    fn update_dish_assignment(&self, dish_id: Uuid, assignment: &DishAssignment) -> Result<()> {
        self.dishes().update_assignment(dish_id, assignment)
    }

    fn update_dish_status(&self, dish_id: Uuid, status: DishStatus) -> Result<()> {
        self.dishes().update_status(dish_id, status)
    }

    fn delete_dish(&self, dish_id: Uuid) -> Result<()> {
        self.dishes().delete(dish_id)
    }
}

impl RoleRepository for Database {
    fn create_role(&self, role: &CookingRole) -> Result<()> {
        self.roles().create(role)
    }

    fn list_roles_for_event(&self, event_id: Uuid) -> Result<Vec<CookingRole>> {
        self.roles().list_for_event(event_id)
    }

    fn delete_role(&self, role_id: Uuid) -> Result<()> {
        self.roles().delete(role_id)
    }
}
