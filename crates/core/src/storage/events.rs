//! Event storage operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    parse_datetime, parse_enum, parse_json_opt, parse_string_list, parse_uuid, parse_uuid_opt,
    string_list_to_sql, OptionalExt,
};
use crate::error::{Error, Result};
use crate::models::{EventStatus, SocialEvent};

const EVENT_COLUMNS: &str = "e.id, e.host_id, e.host_name, e.event_type, e.title, e.date_time, e.location,
     e.expected_guests, e.dietary_requirements, e.vibe, e.decider_id, e.menu_selected, e.status,
     e.created_at, e.updated_at";

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<SocialEvent> {
    Ok(SocialEvent {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        host_id: parse_uuid(&row.get::<_, String>(1)?)?,
        host_name: row.get(2)?,
        event_type: parse_enum(&row.get::<_, String>(3)?)?,
        title: row.get(4)?,
        date_time: parse_datetime(&row.get::<_, String>(5)?)?,
        location: row.get(6)?,
        expected_guests: row.get(7)?,
        dietary_requirements: parse_string_list(&row.get::<_, String>(8)?)?,
        vibe: row.get(9)?,
        decider_id: parse_uuid_opt(row.get::<_, Option<String>>(10)?)?,
        menu_selected: parse_json_opt(row.get::<_, Option<String>>(11)?)?,
        status: parse_enum(&row.get::<_, String>(12)?)?,
        created_at: parse_datetime(&row.get::<_, String>(13)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(14)?)?,
    })
}

pub struct EventStore<'a> {
    conn: &'a Connection,
}

impl<'a> EventStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new event
    #[instrument(skip(self, event), fields(event_id = %event.id, event_type = %event.event_type))]
    pub fn create(&self, event: &SocialEvent) -> Result<()> {
        let menu = event
            .menu_selected
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn.execute(
            "INSERT INTO events (id, host_id, host_name, event_type, title, date_time, location,
                expected_guests, dietary_requirements, vibe, decider_id, menu_selected, status,
                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                event.id.to_string(),
                event.host_id.to_string(),
                event.host_name,
                event.event_type.as_str(),
                event.title,
                event.date_time.to_rfc3339(),
                event.location,
                event.expected_guests,
                string_list_to_sql(&event.dietary_requirements)?,
                event.vibe,
                event.decider_id.map(|d| d.to_string()),
                menu,
                event.status.as_str(),
                event.created_at.to_rfc3339(),
                event.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find event by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<SocialEvent>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let event = stmt
            .query_row(params![id.to_string()], event_from_row)
            .optional()?;
        Ok(event)
    }

    /// Write a new status
    #[instrument(skip(self))]
    pub fn update_status(
        &self,
        event_id: Uuid,
        status: EventStatus,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE events SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), at.to_rfc3339(), event_id.to_string()],
        )?;
        expect_row(changed, event_id)
    }

    /// Write the selected menu together with the status it locks in
    #[instrument(skip(self, menu))]
    pub fn update_menu(
        &self,
        event_id: Uuid,
        menu: &serde_json::Value,
        status: EventStatus,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE events SET menu_selected = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                serde_json::to_string(menu)?,
                status.as_str(),
                at.to_rfc3339(),
                event_id.to_string()
            ],
        )?;
        expect_row(changed, event_id)
    }

    /// Set or clear the delegated decider
    #[instrument(skip(self))]
    pub fn update_decider(
        &self,
        event_id: Uuid,
        decider_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE events SET decider_id = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                decider_id.map(|d| d.to_string()),
                at.to_rfc3339(),
                event_id.to_string()
            ],
        )?;
        expect_row(changed, event_id)
    }

    /// Events hosted by a user, soonest first
    #[instrument(skip(self))]
    pub fn list_for_host(&self, host_id: Uuid) -> Result<Vec<SocialEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events e WHERE e.host_id = ?1 ORDER BY e.date_time"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![host_id.to_string()], event_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Events a user is a linked guest of, soonest first
    #[instrument(skip(self))]
    pub fn list_for_guest(&self, user_id: Uuid) -> Result<Vec<SocialEvent>> {
        let sql = format!(
            "SELECT DISTINCT {EVENT_COLUMNS} FROM events e
             INNER JOIN guests g ON g.event_id = e.id
             WHERE g.user_id = ?1
             ORDER BY e.date_time"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![user_id.to_string()], event_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }
}

fn expect_row(changed: usize, event_id: Uuid) -> Result<()> {
    if changed == 0 {
        return Err(Error::NotFound(format!("event {event_id}")));
    }
    Ok(())
}
