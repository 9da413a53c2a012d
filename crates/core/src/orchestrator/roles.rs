//! Cooking roles for party events

use tracing::{info, warn};
use uuid::Uuid;

use super::EventSession;
use crate::error::{Error, Result};
use crate::lifecycle::has_reached;
use crate::models::{CookingRole, EventStatus, EventType};
use crate::storage::Storage;

impl<S: Storage> EventSession<'_, S> {
    /// Give `person` a role with an ordered task list
    pub fn assign_role(&mut self, person: &str, role: &str, tasks: Vec<String>) -> Result<Uuid> {
        self.require_host("assign roles")?;
        self.require_type(EventType::Party, "assign roles")?;
        self.require_role_phase()?;
        let (person, role) = (person.trim(), role.trim());
        if person.is_empty() || role.is_empty() {
            return Err(Error::Validation("role needs a person and a name".into()));
        }
        let tasks = tasks
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let event_id = self.active_ref()?.event_id();
        let cooking_role = CookingRole::new(event_id, person.to_string(), role.to_string(), tasks);
        self.store.create_role(&cooking_role)?;
        info!(%event_id, person, role, "Role assigned");

        let role_id = cooking_role.id;
        self.active_mut()?.roles.push(cooking_role);
        Ok(role_id)
    }

    pub fn remove_role(&mut self, role_id: Uuid) -> Result<()> {
        self.require_host("remove roles")?;
        self.require_type(EventType::Party, "remove roles")?;
        self.require_role_phase()?;
        let roles = &mut self.active_mut()?.roles;
        let index = roles
            .iter()
            .position(|r| r.id == role_id)
            .ok_or_else(|| Error::NotFound(format!("role {role_id}")))?;
        let removed = roles.remove(index);

        if let Err(e) = self.store.delete_role(role_id) {
            warn!(error = %e, "Role delete failed, restoring projection");
            self.active_mut()?.roles.insert(index, removed);
            return Err(e);
        }
        Ok(())
    }

    /// Roles stay editable up to and including `role_assign`
    fn require_role_phase(&self) -> Result<()> {
        let (event_type, status) = self.active_ref()?.key();
        if has_reached(event_type, status, EventStatus::Locked) {
            return Err(Error::WrongPhase(format!(
                "roles are fixed once the event is {status}"
            )));
        }
        Ok(())
    }
}
