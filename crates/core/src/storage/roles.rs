//! Cooking role storage operations

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse::{parse_datetime, parse_string_list, parse_uuid, string_list_to_sql};
use crate::error::Result;
use crate::models::CookingRole;

pub struct RoleStore<'a> {
    conn: &'a Connection,
}

impl<'a> RoleStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Assign a role
    pub fn create(&self, role: &CookingRole) -> Result<()> {
        self.conn.execute(
            "INSERT INTO roles (id, event_id, person_name, role_name, tasks, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                role.id.to_string(),
                role.event_id.to_string(),
                role.person_name,
                role.role_name,
                string_list_to_sql(&role.tasks)?,
                role.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List roles of an event
    pub fn list_for_event(&self, event_id: Uuid) -> Result<Vec<CookingRole>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, person_name, role_name, tasks, created_at
             FROM roles WHERE event_id = ?1 ORDER BY rowid",
        )?;

        let roles = stmt
            .query_map(params![event_id.to_string()], |row| {
                Ok(CookingRole {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    event_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    person_name: row.get(2)?,
                    role_name: row.get(3)?,
                    tasks: parse_string_list(&row.get::<_, String>(4)?)?,
                    created_at: parse_datetime(&row.get::<_, String>(5)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(roles)
    }

    /// Remove a role
    pub fn delete(&self, role_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM roles WHERE id = ?1",
            params![role_id.to_string()],
        )?;
        Ok(())
    }
}
