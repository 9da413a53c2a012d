//! Guest storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_enum, parse_string_list, parse_uuid, parse_uuid_opt, string_list_to_sql};
use crate::error::{Error, Result};
use crate::models::{Guest, RsvpStatus};

pub struct GuestStore<'a> {
    conn: &'a Connection,
}

impl<'a> GuestStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Add a guest to an event
    #[instrument(skip(self, guest), fields(event_id = %guest.event_id))]
    pub fn create(&self, guest: &Guest) -> Result<()> {
        self.conn.execute(
            "INSERT INTO guests (id, event_id, name, user_id, email, phone, rsvp, dietary_requirements, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                guest.id.to_string(),
                guest.event_id.to_string(),
                guest.name,
                guest.user_id.map(|u| u.to_string()),
                guest.email,
                guest.phone,
                guest.rsvp.as_str(),
                string_list_to_sql(&guest.dietary_requirements)?,
                guest.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List guests of an event in the order they were added
    #[instrument(skip(self))]
    pub fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Guest>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, name, user_id, email, phone, rsvp, dietary_requirements, created_at
             FROM guests WHERE event_id = ?1 ORDER BY rowid",
        )?;

        let guests = stmt
            .query_map(params![event_id.to_string()], |row| {
                Ok(Guest {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    event_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    name: row.get(2)?,
                    user_id: parse_uuid_opt(row.get::<_, Option<String>>(3)?)?,
                    email: row.get(4)?,
                    phone: row.get(5)?,
                    rsvp: parse_enum(&row.get::<_, String>(6)?)?,
                    dietary_requirements: parse_string_list(&row.get::<_, String>(7)?)?,
                    created_at: parse_datetime(&row.get::<_, String>(8)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(guests)
    }

    /// Update a guest's RSVP
    #[instrument(skip(self))]
    pub fn update_rsvp(&self, guest_id: Uuid, rsvp: RsvpStatus) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE guests SET rsvp = ?1 WHERE id = ?2",
            params![rsvp.as_str(), guest_id.to_string()],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("guest {guest_id}")));
        }
        Ok(())
    }

    /// Remove a guest
    #[instrument(skip(self))]
    pub fn delete(&self, guest_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM guests WHERE id = ?1",
            params![guest_id.to_string()],
        )?;
        Ok(())
    }
}
