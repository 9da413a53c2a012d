//! Potluck dish board: adding, claiming and progressing dishes
//!
//! Claims are not guarded by the store. Two sessions that both see a dish
//! as open can both claim it; the last write wins and the stored row keeps
//! exactly one assignee.

use tracing::{info, warn};
use uuid::Uuid;

use super::EventSession;
use crate::error::{Error, Result};
use crate::models::{Dish, DishAssignment, DishStatus, EventType};
use crate::storage::Storage;

impl<S: Storage> EventSession<'_, S> {
    /// Put a new open dish on the board
    pub fn add_dish(
        &mut self,
        category: &str,
        name: &str,
        recipe_id: Option<String>,
    ) -> Result<Uuid> {
        self.require_host("add dishes")?;
        self.require_type(EventType::Potluck, "add dishes")?;
        self.require_live("add dishes")?;
        let (category, name) = (category.trim(), name.trim());
        if category.is_empty() || name.is_empty() {
            return Err(Error::Validation("dish needs a category and a name".into()));
        }

        let event_id = self.active_ref()?.event_id();
        let mut dish = Dish::new(event_id, category.to_string(), name.to_string());
        if let Some(recipe_id) = recipe_id {
            dish = dish.with_recipe(recipe_id);
        }
        self.store.create_dish(&dish)?;
        info!(%event_id, dish = %dish.name, "Dish added");

        let dish_id = dish.id;
        self.active_mut()?.dishes.push(dish);
        Ok(dish_id)
    }

    pub fn remove_dish(&mut self, dish_id: Uuid) -> Result<()> {
        self.require_host("remove dishes")?;
        self.require_type(EventType::Potluck, "remove dishes")?;
        self.require_live("remove dishes")?;
        let dishes = &mut self.active_mut()?.dishes;
        let index = dishes
            .iter()
            .position(|d| d.id == dish_id)
            .ok_or_else(|| Error::NotFound(format!("dish {dish_id}")))?;
        let removed = dishes.remove(index);

        if let Err(e) = self.store.delete_dish(dish_id) {
            warn!(error = %e, "Dish delete failed, restoring projection");
            self.active_mut()?.dishes.insert(index, removed);
            return Err(e);
        }
        Ok(())
    }

    /// Claim an open dish for the actor
    ///
    /// A blank `claimant_name` falls back to the actor's own name.
    pub fn claim_dish(&mut self, dish_id: Uuid, claimant_name: &str) -> Result<()> {
        self.require_type(EventType::Potluck, "claim dishes")?;
        self.require_live("claim dishes")?;
        let name = match claimant_name.trim() {
            "" => self.actor.name.clone(),
            name => name.to_string(),
        };
        let assignment = DishAssignment::claimed_by(self.actor.id, name);

        let dish = self.dish_mut(dish_id)?;
        if !dish.is_open() {
            return Err(Error::DishUnavailable(format!(
                "{} is already {}",
                dish.name, dish.status
            )));
        }
        let previous = dish.assignment();
        assignment.apply_to(dish);

        self.write_assignment(dish_id, &assignment, previous)?;
        info!(%dish_id, claimant = ?assignment.assigned_name, "Dish claimed");
        Ok(())
    }

    /// Hand a claimed dish back to the board
    pub fn unclaim_dish(&mut self, dish_id: Uuid) -> Result<()> {
        self.require_type(EventType::Potluck, "unclaim dishes")?;
        self.require_live("unclaim dishes")?;
        let is_host = self.is_host();
        let actor_id = self.actor.id;

        let dish = self.dish_mut(dish_id)?;
        if dish.assigned_to.is_none() {
            return Err(Error::WrongPhase(format!("{} is not claimed", dish.name)));
        }
        if !is_host && !dish.is_assigned_to(actor_id) {
            return Err(Error::PermissionDenied(
                "only the assignee or the host can unclaim a dish".into(),
            ));
        }
        let previous = dish.assignment();
        let assignment = DishAssignment::open();
        assignment.apply_to(dish);

        self.write_assignment(dish_id, &assignment, previous)
    }

    /// Move a claimed dish along `claimed -> prepping -> ready`, or drop it
    ///
    /// Only the assignee progresses a dish. The host or the assignee may drop
    /// a claimed dish; unclaiming reopens it. `open` and `claimed` are reached
    /// through claim and unclaim.
    pub fn set_dish_status(&mut self, dish_id: Uuid, status: DishStatus) -> Result<()> {
        self.require_type(EventType::Potluck, "update dishes")?;
        self.require_live("update dishes")?;
        let is_host = self.is_host();
        let actor_id = self.actor.id;

        let dish = self.dish_mut(dish_id)?;
        let previous = dish.status;
        if previous == status {
            return Ok(());
        }
        let is_assignee = dish.is_assigned_to(actor_id);
        match status {
            DishStatus::Open | DishStatus::Claimed => {
                return Err(Error::WrongPhase(format!(
                    "use claim or unclaim to mark a dish {status}"
                )));
            }
            DishStatus::Prepping | DishStatus::Ready => {
                if !is_assignee {
                    return Err(Error::PermissionDenied(
                        "only the assignee can progress a dish".into(),
                    ));
                }
                let forward = matches!(
                    (progress_rank(previous), progress_rank(status)),
                    (Some(from), Some(to)) if from < to
                );
                if !forward {
                    return Err(Error::WrongPhase(format!(
                        "cannot move a dish from {previous} to {status}"
                    )));
                }
            }
            DishStatus::Dropped => {
                if dish.assigned_to.is_none() {
                    return Err(Error::WrongPhase(format!(
                        "{} is not claimed, remove it instead",
                        dish.name
                    )));
                }
                if !is_assignee && !is_host {
                    return Err(Error::PermissionDenied(
                        "only the assignee or the host can drop a dish".into(),
                    ));
                }
            }
        }
        dish.status = status;

        if let Err(e) = self.store.update_dish_status(dish_id, status) {
            warn!(error = %e, "Dish status write failed, restoring projection");
            if let Some(dish) = self.active_mut()?.dish_mut(dish_id) {
                dish.status = previous;
            }
            return Err(e);
        }
        info!(%dish_id, from = %previous, to = %status, "Dish status changed");
        Ok(())
    }

    fn dish_mut(&mut self, dish_id: Uuid) -> Result<&mut Dish> {
        self.active_mut()?
            .dish_mut(dish_id)
            .ok_or_else(|| Error::NotFound(format!("dish {dish_id}")))
    }

    fn write_assignment(
        &mut self,
        dish_id: Uuid,
        assignment: &DishAssignment,
        previous: DishAssignment,
    ) -> Result<()> {
        if let Err(e) = self.store.update_dish_assignment(dish_id, assignment) {
            warn!(error = %e, "Dish assignment write failed, restoring projection");
            if let Some(dish) = self.active_mut()?.dish_mut(dish_id) {
                previous.apply_to(dish);
            }
            return Err(e);
        }
        Ok(())
    }
}

/// Ordering of the assignee-driven part of a dish's life; `None` off the path
fn progress_rank(status: DishStatus) -> Option<u8> {
    match status {
        DishStatus::Claimed => Some(1),
        DishStatus::Prepping => Some(2),
        DishStatus::Ready => Some(3),
        DishStatus::Open | DishStatus::Dropped => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::error::Error;
    use crate::models::{DishStatus, EventStatus, EventType};
    use crate::storage::{Database, DishRepository};
    use uuid::Uuid;

    #[test]
    fn test_add_dish_persists() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        let event_id = commit(&mut session, EventType::Potluck, "Street Potluck");

        let dish_id = session
            .add_dish(" Dessert ", "Apple Crumble", Some("recipe-42".into()))
            .unwrap();

        let stored = db.find_dish_by_id(dish_id).unwrap().unwrap();
        assert_eq!(stored.event_id, event_id);
        assert_eq!(stored.category, "Dessert");
        assert_eq!(stored.recipe_id.as_deref(), Some("recipe-42"));
        assert_eq!(stored.status, DishStatus::Open);
        assert_eq!(session.active().unwrap().dishes, vec![stored]);
    }

    #[test]
    fn test_add_dish_rules() {
        let db = Database::open_in_memory().unwrap();
        let mut host_session = session(&db, host());
        let event_id = commit(&mut host_session, EventType::Potluck, "Street Potluck");

        assert!(matches!(
            host_session.add_dish("Main", "  ", None),
            Err(Error::Validation(_))
        ));

        let mut guest_session = session(&db, guest("Ben"));
        guest_session.load_event(event_id).unwrap();
        assert!(matches!(
            guest_session.add_dish("Main", "Lasagna", None),
            Err(Error::PermissionDenied(_))
        ));

        let mut roast = session(&db, host());
        commit(&mut roast, EventType::Roast, "Family Dinner");
        assert!(matches!(
            roast.add_dish("Main", "Lasagna", None),
            Err(Error::WrongPhase(_))
        ));
    }

    #[test]
    fn test_add_dish_write_failure_leaves_projection() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        commit(&mut session, EventType::Potluck, "Street Potluck");
        fail_writes(&db, "dishes", "INSERT");

        assert!(session.add_dish("Main", "Lasagna", None).is_err());
        assert!(session.active().unwrap().dishes.is_empty());
    }

    #[test]
    fn test_dish_claim_then_unclaim() {
        let db = Database::open_in_memory().unwrap();
        let mut host_session = session(&db, host());
        let event_id = commit(&mut host_session, EventType::Potluck, "Street Potluck");
        host_session.update_status(EventStatus::DishClaiming).unwrap();
        let dish_id = host_session.add_dish("Main", "Lasagna", None).unwrap();

        let ben = guest("Ben");
        let mut guest_session = session(&db, ben.clone());
        guest_session.load_event(event_id).unwrap();

        guest_session.claim_dish(dish_id, "").unwrap();
        let stored = db.find_dish_by_id(dish_id).unwrap().unwrap();
        assert_eq!(stored.status, DishStatus::Claimed);
        assert_eq!(stored.assigned_to, Some(ben.id));
        assert_eq!(stored.assigned_name.as_deref(), Some("Ben"));

        guest_session.unclaim_dish(dish_id).unwrap();
        let stored = db.find_dish_by_id(dish_id).unwrap().unwrap();
        assert_eq!(stored.status, DishStatus::Open);
        assert_eq!(stored.assigned_to, None);
        assert_eq!(stored.assigned_name, None);

        let local = guest_session.active().unwrap().dish(dish_id).unwrap();
        assert_eq!(local, &stored);
    }

    #[test]
    fn test_claimed_dish_unavailable_locally() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        commit(&mut session, EventType::Potluck, "Street Potluck");
        let dish_id = session.add_dish("Side", "Slaw", None).unwrap();

        session.claim_dish(dish_id, "Ana's kitchen").unwrap();
        assert!(matches!(
            session.claim_dish(dish_id, ""),
            Err(Error::DishUnavailable(_))
        ));
        assert!(matches!(
            session.claim_dish(Uuid::new_v4(), ""),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_racing_claims_last_write_wins() {
        let db = Database::open_in_memory().unwrap();
        let mut host_session = session(&db, host());
        let event_id = commit(&mut host_session, EventType::Potluck, "Street Potluck");
        let dish_id = host_session.add_dish("Main", "Lasagna", None).unwrap();

        let (ben, cleo) = (guest("Ben"), guest("Cleo"));
        let mut ben_session = session(&db, ben);
        let mut cleo_session = session(&db, cleo.clone());
        ben_session.load_event(event_id).unwrap();
        cleo_session.load_event(event_id).unwrap();

        ben_session.claim_dish(dish_id, "").unwrap();
        cleo_session.claim_dish(dish_id, "").unwrap();

        let stored = db.find_dish_by_id(dish_id).unwrap().unwrap();
        assert_eq!(stored.status, DishStatus::Claimed);
        assert_eq!(stored.assigned_to, Some(cleo.id));
        assert_eq!(stored.assigned_name.as_deref(), Some("Cleo"));

        ben_session.load_event(event_id).unwrap();
        let dish = ben_session.active().unwrap().dish(dish_id).unwrap();
        assert!(dish.is_assigned_to(cleo.id));
    }

    #[test]
    fn test_claim_write_failure_restores_dish() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        commit(&mut session, EventType::Potluck, "Street Potluck");
        let dish_id = session.add_dish("Main", "Lasagna", None).unwrap();
        fail_writes(&db, "dishes", "UPDATE");

        assert!(matches!(
            session.claim_dish(dish_id, ""),
            Err(Error::Database(_))
        ));
        let dish = session.active().unwrap().dish(dish_id).unwrap();
        assert!(dish.is_open());
        assert_eq!(dish.assigned_to, None);
    }

    #[test]
    fn test_unclaim_by_someone_else_denied() {
        let db = Database::open_in_memory().unwrap();
        let mut host_session = session(&db, host());
        let event_id = commit(&mut host_session, EventType::Potluck, "Street Potluck");
        let dish_id = host_session.add_dish("Main", "Lasagna", None).unwrap();

        let mut ben_session = session(&db, guest("Ben"));
        ben_session.load_event(event_id).unwrap();
        ben_session.claim_dish(dish_id, "").unwrap();

        let mut cleo_session = session(&db, guest("Cleo"));
        cleo_session.load_event(event_id).unwrap();
        assert!(matches!(
            cleo_session.unclaim_dish(dish_id),
            Err(Error::PermissionDenied(_))
        ));

        host_session.load_event(event_id).unwrap();
        host_session.unclaim_dish(dish_id).unwrap();
        assert!(db.find_dish_by_id(dish_id).unwrap().unwrap().is_open());
    }

    #[test]
    fn test_assignee_progresses_dish() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        commit(&mut session, EventType::Potluck, "Street Potluck");
        let dish_id = session.add_dish("Main", "Lasagna", None).unwrap();

        assert!(matches!(
            session.set_dish_status(dish_id, DishStatus::Prepping),
            Err(Error::PermissionDenied(_))
        ));

        session.claim_dish(dish_id, "").unwrap();
        session.set_dish_status(dish_id, DishStatus::Prepping).unwrap();
        session.set_dish_status(dish_id, DishStatus::Ready).unwrap();
        assert!(matches!(
            session.set_dish_status(dish_id, DishStatus::Prepping),
            Err(Error::WrongPhase(_))
        ));
        assert!(matches!(
            session.set_dish_status(dish_id, DishStatus::Open),
            Err(Error::WrongPhase(_))
        ));

        let stored = db.find_dish_by_id(dish_id).unwrap().unwrap();
        assert_eq!(stored.status, DishStatus::Ready);
    }

    #[test]
    fn test_host_drops_claimed_dish() {
        let db = Database::open_in_memory().unwrap();
        let mut host_session = session(&db, host());
        let event_id = commit(&mut host_session, EventType::Potluck, "Street Potluck");
        let dish_id = host_session.add_dish("Main", "Lasagna", None).unwrap();

        let mut ben_session = session(&db, guest("Ben"));
        ben_session.load_event(event_id).unwrap();
        ben_session.claim_dish(dish_id, "").unwrap();

        let mut cleo_session = session(&db, guest("Cleo"));
        cleo_session.load_event(event_id).unwrap();
        assert!(matches!(
            cleo_session.set_dish_status(dish_id, DishStatus::Dropped),
            Err(Error::PermissionDenied(_))
        ));

        host_session.load_event(event_id).unwrap();
        host_session
            .set_dish_status(dish_id, DishStatus::Dropped)
            .unwrap();
        let stored = db.find_dish_by_id(dish_id).unwrap().unwrap();
        assert_eq!(stored.status, DishStatus::Dropped);
    }

    #[test]
    fn test_remove_dish_write_failure_restores_order() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        commit(&mut session, EventType::Potluck, "Street Potluck");
        let first = session.add_dish("Main", "Lasagna", None).unwrap();
        let second = session.add_dish("Side", "Slaw", None).unwrap();
        fail_writes(&db, "dishes", "DELETE");

        assert!(session.remove_dish(first).is_err());
        let ids: Vec<Uuid> = session.active().unwrap().dishes.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![first, second]);

        db.execute_batch("DROP TRIGGER fail_dishes_DELETE").unwrap();
        session.remove_dish(first).unwrap();
        assert!(db.find_dish_by_id(first).unwrap().is_none());
        assert_eq!(session.active().unwrap().dishes.len(), 1);
    }

    #[test]
    fn test_dish_operations_require_active_event() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        let dish_id = Uuid::new_v4();

        assert!(matches!(
            session.add_dish("Main", "Lasagna", None),
            Err(Error::NoActiveEvent)
        ));
        assert!(matches!(
            session.claim_dish(dish_id, "Ana"),
            Err(Error::NoActiveEvent)
        ));
        assert!(matches!(session.unclaim_dish(dish_id), Err(Error::NoActiveEvent)));
        assert!(matches!(session.remove_dish(dish_id), Err(Error::NoActiveEvent)));
        assert!(session.active().is_none());
    }

    #[test]
    fn test_open_dish_cannot_be_dropped() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        commit(&mut session, EventType::Potluck, "Street Potluck");
        let dish_id = session.add_dish("Main", "Lasagna", None).unwrap();

        assert!(matches!(
            session.set_dish_status(dish_id, DishStatus::Dropped),
            Err(Error::WrongPhase(_))
        ));
        assert!(session.active().unwrap().dish(dish_id).unwrap().is_open());

        session.claim_dish(dish_id, "").unwrap();
        assert!(db.find_dish_by_id(dish_id).unwrap().unwrap().is_assigned_to(session.actor().id));
    }

    #[test]
    fn test_dropped_dish_reopens_on_unclaim() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        commit(&mut session, EventType::Potluck, "Street Potluck");
        let dish_id = session.add_dish("Main", "Lasagna", None).unwrap();
        session.claim_dish(dish_id, "").unwrap();
        session.set_dish_status(dish_id, DishStatus::Dropped).unwrap();

        session.unclaim_dish(dish_id).unwrap();
        let stored = db.find_dish_by_id(dish_id).unwrap().unwrap();
        assert!(stored.is_open());
        assert_eq!(stored.assigned_to, None);
    }

    #[test]
    fn test_board_frozen_after_done() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        commit(&mut session, EventType::Potluck, "Street Potluck");
        let dish_id = session.add_dish("Main", "Lasagna", None).unwrap();
        session.update_status(EventStatus::Locked).unwrap();
        session.update_status(EventStatus::Done).unwrap();

        assert!(matches!(session.remove_dish(dish_id), Err(Error::WrongPhase(_))));
        assert_eq!(session.active().unwrap().dishes.len(), 1);
        assert!(db.find_dish_by_id(dish_id).unwrap().is_some());
    }

    #[test]
    fn test_remove_dish_only_on_potluck() {
        let db = Database::open_in_memory().unwrap();
        let mut session = session(&db, host());
        commit(&mut session, EventType::Roast, "Family Dinner");

        assert!(matches!(
            session.remove_dish(Uuid::new_v4()),
            Err(Error::WrongPhase(_))
        ));
    }
}
