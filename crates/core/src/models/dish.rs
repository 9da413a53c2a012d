//! Dish model - one claimable item on a potluck board

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DishStatus {
    #[default]
    Open,
    Claimed,
    Prepping,
    Ready,
    Dropped,
}

impl DishStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DishStatus::Open => "open",
            DishStatus::Claimed => "claimed",
            DishStatus::Prepping => "prepping",
            DishStatus::Ready => "ready",
            DishStatus::Dropped => "dropped",
        }
    }
}

impl fmt::Display for DishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DishStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(DishStatus::Open),
            "claimed" => Ok(DishStatus::Claimed),
            "prepping" => Ok(DishStatus::Prepping),
            "ready" => Ok(DishStatus::Ready),
            "dropped" => Ok(DishStatus::Dropped),
            _ => Err(Error::Validation(format!("unknown dish status '{s}'"))),
        }
    }
}

/// A dish on the potluck board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: Uuid,
    pub event_id: Uuid,
    pub category: String,
    pub name: String,
    pub recipe_id: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub assigned_name: Option<String>,
    pub status: DishStatus,
    pub created_at: DateTime<Utc>,
}

impl Dish {
    pub fn new(event_id: Uuid, category: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            category,
            name,
            recipe_id: None,
            assigned_to: None,
            assigned_name: None,
            status: DishStatus::Open,
            created_at: Utc::now(),
        }
    }

    pub fn with_recipe(mut self, recipe_id: String) -> Self {
        self.recipe_id = Some(recipe_id);
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == DishStatus::Open
    }

    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assigned_to == Some(user_id)
    }

    /// Assignee columns and status, written together on claim/unclaim
    pub fn assignment(&self) -> DishAssignment {
        DishAssignment {
            assigned_to: self.assigned_to,
            assigned_name: self.assigned_name.clone(),
            status: self.status,
        }
    }
}

/// The row patch written when a dish changes hands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishAssignment {
    pub assigned_to: Option<Uuid>,
    pub assigned_name: Option<String>,
    pub status: DishStatus,
}

impl DishAssignment {
    pub fn claimed_by(user_id: Uuid, name: String) -> Self {
        Self {
            assigned_to: Some(user_id),
            assigned_name: Some(name),
            status: DishStatus::Claimed,
        }
    }

    pub fn open() -> Self {
        Self {
            assigned_to: None,
            assigned_name: None,
            status: DishStatus::Open,
        }
    }

    pub fn apply_to(&self, dish: &mut Dish) {
        dish.assigned_to = self.assigned_to;
        dish.assigned_name = self.assigned_name.clone();
        dish.status = self.status;
    }
}
