//! Guest list operations

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::EventSession;
use crate::error::{Error, Result};
use crate::models::{Guest, NewGuest, RsvpStatus};
use crate::storage::Storage;

impl<S: Storage> EventSession<'_, S> {
    /// Add a guest; the projection only changes once the row is written
    pub fn add_guest(&mut self, new_guest: NewGuest) -> Result<Uuid> {
        self.require_live("add guests")?;
        let event_id = self.active_ref()?.event_id();
        let name = new_guest.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("guest name is required".into()));
        }

        let guest = Guest {
            id: Uuid::new_v4(),
            event_id,
            name: name.to_string(),
            user_id: new_guest.user_id,
            email: new_guest.email,
            phone: new_guest.phone,
            rsvp: RsvpStatus::Invited,
            dietary_requirements: new_guest.dietary_requirements,
            created_at: Utc::now(),
        };

        self.store.create_guest(&guest)?;
        info!(%event_id, guest = %guest.name, "Guest added");

        let guest_id = guest.id;
        self.active_mut()?.guests.push(guest);
        Ok(guest_id)
    }

    /// Remove a guest; applied to the projection before the delete is written
    pub fn remove_guest(&mut self, guest_id: Uuid) -> Result<()> {
        self.require_host("remove guests")?;
        self.require_live("remove guests")?;
        let guests = &mut self.active_mut()?.guests;
        let index = guests
            .iter()
            .position(|g| g.id == guest_id)
            .ok_or_else(|| Error::NotFound(format!("guest {guest_id}")))?;
        let removed = guests.remove(index);

        if let Err(e) = self.store.delete_guest(guest_id) {
            warn!(error = %e, "Guest delete failed, restoring projection");
            self.active_mut()?.guests.insert(index, removed);
            return Err(e);
        }
        Ok(())
    }

    /// Record a guest's RSVP
    pub fn update_rsvp(&mut self, guest_id: Uuid, rsvp: RsvpStatus) -> Result<()> {
        self.require_live("update RSVPs")?;
        let guest = self
            .active_mut()?
            .guests
            .iter_mut()
            .find(|g| g.id == guest_id)
            .ok_or_else(|| Error::NotFound(format!("guest {guest_id}")))?;
        let previous = std::mem::replace(&mut guest.rsvp, rsvp);

        if let Err(e) = self.store.update_guest_rsvp(guest_id, rsvp) {
            warn!(error = %e, "RSVP write failed, restoring projection");
            if let Some(guest) = self
                .active_mut()?
                .guests
                .iter_mut()
                .find(|g| g.id == guest_id)
            {
                guest.rsvp = previous;
            }
            return Err(e);
        }
        Ok(())
    }
}
