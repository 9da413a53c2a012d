//! Menu voting, tally lock and the decider bypass

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use super::EventSession;
use crate::error::{Error, Result};
use crate::lifecycle::{check_transition, has_reached};
use crate::models::{EventStatus, Vote};
use crate::storage::Storage;
use crate::tally::{override_winners, tally, TallyResult};

const LOCK_MESSAGE: &str = "Voting is closed. The menu is locked in!";

impl<S: Storage> EventSession<'_, S> {
    /// Cast a vote; repeat votes are kept and all count
    pub fn cast_vote(&mut self, category: &str, value: &str) -> Result<Uuid> {
        self.require_open_voting("vote")?;
        let (category, value) = (category.trim(), value.trim());
        if category.is_empty() || value.is_empty() {
            return Err(Error::Validation("vote needs a category and a value".into()));
        }

        let vote = Vote::new(
            self.active_ref()?.event_id(),
            self.actor.id,
            self.actor.name.clone(),
            category.to_string(),
            value.to_string(),
        );
        self.store.create_vote(&vote)?;

        let vote_id = vote.id;
        self.active_mut()?.votes.push(vote);
        Ok(vote_id)
    }

    /// Tally the votes cast so far, store the result and lock the event
    #[instrument(skip(self), fields(actor = %self.actor.name))]
    pub fn lock_voting(&mut self) -> Result<TallyResult> {
        self.require_open_voting("lock voting")?;
        let projection = self.active_ref()?;
        let (event_type, status) = projection.key();
        check_transition(event_type, status, EventStatus::Locked)?;

        let result = tally(&projection.votes);
        let menu = json!({ "votes": result });
        self.write_menu(menu)?;

        info!(categories = result.len(), "Voting locked");
        self.collaborators.notify(LOCK_MESSAGE);
        Ok(result)
    }

    /// Store a decider's payload verbatim and lock, without tallying
    #[instrument(skip(self, payload), fields(actor = %self.actor.name))]
    pub fn decide(&mut self, payload: serde_json::Value) -> Result<()> {
        self.require_decider()?;
        self.write_menu(payload)?;
        info!("Menu decided");
        Ok(())
    }

    /// Lock the menu with the decider's per-category picks
    ///
    /// Unpicked categories keep their tally winner; categories with neither
    /// votes nor a pick take the first entry of `defaults`.
    #[instrument(skip(self, picks, defaults), fields(actor = %self.actor.name))]
    pub fn decide_picks(
        &mut self,
        picks: &BTreeMap<String, String>,
        defaults: &BTreeMap<String, Vec<String>>,
    ) -> Result<TallyResult> {
        self.require_decider()?;
        let result = override_winners(picks, &self.active_ref()?.votes, defaults);
        self.write_menu(json!({ "votes": result }))?;
        info!(picks = picks.len(), "Menu decided from picks");
        Ok(result)
    }

    fn require_decider(&self) -> Result<()> {
        let event = &self.active_ref()?.event;
        let allowed = match event.decider_id {
            Some(decider) => decider == self.actor.id || event.is_host(self.actor.id),
            None => event.is_host(self.actor.id),
        };
        if !allowed {
            return Err(Error::PermissionDenied(
                "only the decider or the host can decide".into(),
            ));
        }
        check_transition(event.event_type, event.status, EventStatus::Locked)?;
        Ok(())
    }

    fn write_menu(&mut self, menu: serde_json::Value) -> Result<()> {
        let event_id = self.active_ref()?.event_id();
        let now = Utc::now();
        self.store
            .update_event_menu(event_id, &menu, EventStatus::Locked, now)?;

        let event = &mut self.active_mut()?.event;
        event.menu_selected = Some(menu);
        event.status = EventStatus::Locked;
        event.updated_at = now;
        Ok(())
    }

    fn require_open_voting(&self, action: &str) -> Result<()> {
        let (event_type, status) = self.active_ref()?.key();
        if !event_type.has_voting() {
            return Err(Error::WrongPhase(format!(
                "cannot {action} in a {event_type} event"
            )));
        }
        if has_reached(event_type, status, EventStatus::Locked) {
            return Err(Error::WrongPhase(format!(
                "cannot {action} once the event is {status}"
            )));
        }
        Ok(())
    }
}
