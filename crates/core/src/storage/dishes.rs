//! Dish storage operations
//!
//! Claims are plain row updates. There is no compare-and-swap on the
//! current status, so concurrent claims resolve as last write wins.

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_enum, parse_uuid, parse_uuid_opt, OptionalExt};
use crate::error::{Error, Result};
use crate::models::{Dish, DishAssignment, DishStatus};

pub struct DishStore<'a> {
    conn: &'a Connection,
}

impl<'a> DishStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Add a dish to the board
    #[instrument(skip(self, dish), fields(event_id = %dish.event_id, dish = %dish.name))]
    pub fn create(&self, dish: &Dish) -> Result<()> {
        self.conn.execute(
            "INSERT INTO dishes (id, event_id, category, name, recipe_id, assigned_to, assigned_name, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                dish.id.to_string(),
                dish.event_id.to_string(),
                dish.category,
                dish.name,
                dish.recipe_id,
                dish.assigned_to.map(|a| a.to_string()),
                dish.assigned_name,
                dish.status.as_str(),
                dish.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find dish by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, dish_id: Uuid) -> Result<Option<Dish>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, category, name, recipe_id, assigned_to, assigned_name, status, created_at
             FROM dishes WHERE id = ?1",
        )?;
        let dish = stmt
            .query_row(params![dish_id.to_string()], dish_from_row)
            .optional()?;
        Ok(dish)
    }

    /// List dishes of an event in the order they were added
    #[instrument(skip(self))]
    pub fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Dish>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, category, name, recipe_id, assigned_to, assigned_name, status, created_at
             FROM dishes WHERE event_id = ?1 ORDER BY rowid",
        )?;
        let dishes = stmt
            .query_map(params![event_id.to_string()], dish_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(dishes)
    }

    /// Overwrite assignee and status in one statement
    #[instrument(skip(self, assignment))]
    pub fn update_assignment(&self, dish_id: Uuid, assignment: &DishAssignment) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE dishes SET assigned_to = ?1, assigned_name = ?2, status = ?3 WHERE id = ?4",
            params![
                assignment.assigned_to.map(|a| a.to_string()),
                assignment.assigned_name,
                assignment.status.as_str(),
                dish_id.to_string(),
            ],
        )?;
        expect_row(changed, dish_id)
    }

    /// Update the preparation status only
    #[instrument(skip(self))]
    pub fn update_status(&self, dish_id: Uuid, status: DishStatus) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE dishes SET status = ?1 WHERE id = ?2",
            params![status.as_str(), dish_id.to_string()],
        )?;
        expect_row(changed, dish_id)
    }

    /// Remove a dish
    #[instrument(skip(self))]
    pub fn delete(&self, dish_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM dishes WHERE id = ?1",
            params![dish_id.to_string()],
        )?;
        Ok(())
    }
}

fn dish_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Dish> {
    Ok(Dish {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        event_id: parse_uuid(&row.get::<_, String>(1)?)?,
        category: row.get(2)?,
        name: row.get(3)?,
        recipe_id: row.get(4)?,
        assigned_to: parse_uuid_opt(row.get::<_, Option<String>>(5)?)?,
        assigned_name: row.get(6)?,
        status: parse_enum(&row.get::<_, String>(7)?)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?)?,
    })
}

fn expect_row(changed: usize, dish_id: Uuid) -> Result<()> {
    if changed == 0 {
        return Err(Error::NotFound(format!("dish {dish_id}")));
    }
    Ok(())
}
