//! Vote storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid};
use crate::error::Result;
use crate::models::Vote;

pub struct VoteStore<'a> {
    conn: &'a Connection,
}

impl<'a> VoteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Record a vote. Duplicates are allowed.
    #[instrument(skip(self, vote), fields(event_id = %vote.event_id, category = %vote.category))]
    pub fn create(&self, vote: &Vote) -> Result<()> {
        self.conn.execute(
            "INSERT INTO votes (id, event_id, voter_id, voter_name, category, value, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                vote.id.to_string(),
                vote.event_id.to_string(),
                vote.voter_id.to_string(),
                vote.voter_name,
                vote.category,
                vote.value,
                vote.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List votes for an event in insertion order
    ///
    /// `created_at` comes from the voter's clock, so it is not used for ordering.
    #[instrument(skip(self))]
    pub fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Vote>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, voter_id, voter_name, category, value, created_at
             FROM votes WHERE event_id = ?1 ORDER BY rowid",
        )?;

        let votes = stmt
            .query_map(params![event_id.to_string()], |row| {
                Ok(Vote {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    event_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    voter_id: parse_uuid(&row.get::<_, String>(2)?)?,
                    voter_name: row.get(3)?,
                    category: row.get(4)?,
                    value: row.get(5)?,
                    created_at: parse_datetime(&row.get::<_, String>(6)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(votes)
    }
}
