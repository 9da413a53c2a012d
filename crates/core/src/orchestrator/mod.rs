//! Event orchestrator
//!
//! An [`EventSession`] owns one actor's view of a social cooking event: an
//! optional unsaved draft and at most one active projection. Guest actions
//! are validated against the projection, persisted through [`Storage`], and
//! only then (or optimistically, with rollback on write failure) reflected in
//! the projection.
//!
//! Sessions never coordinate with each other. Two sessions over the same
//! store converge only by calling [`EventSession::load_event`] again.

mod dishes;
mod guests;
mod roles;
mod voting;

#[cfg(test)]
mod testing;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::ShareConfig;
use crate::error::{Error, Result};
use crate::lifecycle::{check_transition, next_status, Transition};
use crate::models::{EventDraft, EventProjection, EventStatus, EventType, SocialEvent};
use crate::ports::{AnalyticsSignal, Collaborators, FeedCard};
use crate::router::{resume_screen, screen_for, ScreenKey};
use crate::share::{share_link, ShareLink};
use crate::storage::Storage;

const DONE_MESSAGE: &str = "That's a wrap! Thanks for cooking together.";

/// The person driving a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
}

impl Actor {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One actor's orchestrator instance
pub struct EventSession<'a, S: Storage> {
    store: &'a S,
    collaborators: Collaborators,
    share: ShareConfig,
    actor: Actor,
    draft: Option<EventDraft>,
    active: Option<EventProjection>,
}

impl<'a, S: Storage> EventSession<'a, S> {
    pub fn new(store: &'a S, actor: Actor) -> Self {
        Self {
            store,
            collaborators: Collaborators::default(),
            share: ShareConfig::default(),
            actor,
            draft: None,
            active: None,
        }
    }

    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    pub fn with_share_config(mut self, share: ShareConfig) -> Self {
        self.share = share;
        self
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn draft(&self) -> Option<&EventDraft> {
        self.draft.as_ref()
    }

    /// Edit the open draft
    pub fn draft_mut(&mut self) -> Result<&mut EventDraft> {
        self.draft.as_mut().ok_or(Error::NoDraft)
    }

    pub fn active(&self) -> Option<&EventProjection> {
        self.active.as_ref()
    }

    /// The (type, status) pair of the active event
    pub fn key(&self) -> Option<(EventType, EventStatus)> {
        self.active.as_ref().map(EventProjection::key)
    }

    /// Screen for the active event's current state
    pub fn screen(&self) -> Option<ScreenKey> {
        self.key()
            .map(|(event_type, status)| screen_for(event_type, status))
    }

    /// Open a new unsaved draft, dropping any active event
    pub fn create_draft(&mut self, event_type: EventType) -> &mut EventDraft {
        self.active = None;
        self.draft.insert(EventDraft::new(event_type))
    }

    /// Persist the draft as a `planning` event and make it active
    #[instrument(skip(self), fields(actor = %self.actor.name))]
    pub fn commit_draft(&mut self) -> Result<Uuid> {
        let draft = self.draft.clone().ok_or(Error::NoDraft)?;
        let event = draft.into_event(self.actor.id, &self.actor.name)?;

        self.store.create_event(&event)?;
        info!(event_id = %event.id, event_type = %event.event_type, "Event created");

        self.draft = None;
        self.collaborators
            .publish_card(FeedCard::for_event(&event, self.actor.id));
        self.collaborators
            .track(AnalyticsSignal::event_created(&event));

        let event_id = event.id;
        self.active = Some(EventProjection::empty(event));
        Ok(event_id)
    }

    /// Replace the active projection with a fresh read of `event_id`
    ///
    /// The slot is emptied first and only filled with a complete projection,
    /// so a failed load never leaves partial data behind.
    #[instrument(skip(self), fields(actor = %self.actor.name))]
    pub fn load_event(&mut self, event_id: Uuid) -> Result<ScreenKey> {
        self.active = None;

        let projection = match self.store.load_projection(event_id) {
            Ok(Some(projection)) => projection,
            Ok(None) => return Err(Error::NotFound(format!("event {event_id}"))),
            Err(e) => {
                warn!(error = %e, "Failed to load event");
                return Err(e);
            }
        };

        if projection.event.status == EventStatus::Cancelled {
            return Err(Error::WrongPhase(format!("event {event_id} was cancelled")));
        }

        let screen = resume_screen(projection.event.status);
        self.active = Some(projection);
        Ok(screen)
    }

    /// Move the active event to `status`
    ///
    /// Backwards moves, statuses foreign to the event type, and anything from
    /// a terminal status are rejected. Requesting `cancelled` cancels.
    #[instrument(skip(self), fields(actor = %self.actor.name))]
    pub fn update_status(&mut self, status: EventStatus) -> Result<()> {
        let projection = self.active_ref()?;
        let (event_type, from) = projection.key();
        let event_id = projection.event_id();
        let previous_update = projection.event.updated_at;

        match check_transition(event_type, from, status)? {
            Transition::Unchanged => return Ok(()),
            Transition::Cancel => return self.cancel_event(),
            Transition::Forward => {}
        }

        let now = Utc::now();
        let event = &mut self.active_mut()?.event;
        event.status = status;
        event.updated_at = now;

        if let Err(e) = self.store.update_event_status(event_id, status, now) {
            warn!(error = %e, "Status write failed, restoring projection");
            let event = &mut self.active_mut()?.event;
            event.status = from;
            event.updated_at = previous_update;
            return Err(e);
        }

        info!(%event_id, %from, to = %status, "Event status changed");
        if status == EventStatus::Done {
            self.collaborators.notify(DONE_MESSAGE);
        }
        Ok(())
    }

    /// Advance to the next status of the event type's progression
    pub fn advance(&mut self) -> Result<EventStatus> {
        let event = &self.active_ref()?.event;
        let next = next_status(event).ok_or_else(|| Error::InvalidTransition {
            from: event.status.to_string(),
            to: "next".to_string(),
        })?;
        self.update_status(next)?;
        Ok(next)
    }

    /// Cancel the active event and clear the projection
    #[instrument(skip(self), fields(actor = %self.actor.name))]
    pub fn cancel_event(&mut self) -> Result<()> {
        self.require_host("cancel the event")?;
        let projection = self.active_ref()?;
        let (event_type, from) = projection.key();
        let event_id = projection.event_id();
        check_transition(event_type, from, EventStatus::Cancelled)?;

        let now = Utc::now();
        self.active_mut()?.event.status = EventStatus::Cancelled;

        if let Err(e) = self
            .store
            .update_event_status(event_id, EventStatus::Cancelled, now)
        {
            warn!(error = %e, "Cancel write failed, restoring projection");
            self.active_mut()?.event.status = from;
            return Err(e);
        }

        info!(%event_id, %from, "Event cancelled");
        self.active = None;
        Ok(())
    }

    /// Delegate (or take back) the final decision
    pub fn set_decider(&mut self, decider_id: Option<Uuid>) -> Result<()> {
        self.require_host("choose a decider")?;
        let event_id = self.active_ref()?.event_id();

        let now = Utc::now();
        self.store.update_event_decider(event_id, decider_id, now)?;

        let event = &mut self.active_mut()?.event;
        event.decider_id = decider_id;
        event.updated_at = now;
        Ok(())
    }

    /// Invitation text and link for the active event
    pub fn share_link(&self) -> Result<ShareLink> {
        Ok(share_link(&self.active_ref()?.event, &self.share))
    }

    /// Events the actor hosts
    pub fn hosted_events(&self) -> Result<Vec<SocialEvent>> {
        self.store.list_events_for_host(self.actor.id)
    }

    /// Events the actor is a linked guest of
    pub fn invited_events(&self) -> Result<Vec<SocialEvent>> {
        self.store.list_events_for_guest(self.actor.id)
    }

    fn active_ref(&self) -> Result<&EventProjection> {
        self.active.as_ref().ok_or(Error::NoActiveEvent)
    }

    fn active_mut(&mut self) -> Result<&mut EventProjection> {
        self.active.as_mut().ok_or(Error::NoActiveEvent)
    }

    fn is_host(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|p| p.event.is_host(self.actor.id))
    }

    /// Fails with `NoActiveEvent` before checking ownership
    fn require_host(&self, action: &str) -> Result<()> {
        self.active_ref()?;
        if !self.is_host() {
            return Err(Error::PermissionDenied(format!(
                "only the host can {action}"
            )));
        }
        Ok(())
    }

    fn require_type(&self, expected: EventType, action: &str) -> Result<()> {
        let event_type = self.active_ref()?.event.event_type;
        if event_type != expected {
            return Err(Error::WrongPhase(format!(
                "cannot {action} in a {event_type} event"
            )));
        }
        Ok(())
    }

    /// Rejects changes to an event that has already finished
    fn require_live(&self, action: &str) -> Result<()> {
        let status = self.active_ref()?.event.status;
        if status.is_terminal() {
            return Err(Error::WrongPhase(format!(
                "cannot {action} once the event is {status}"
            )));
        }
        Ok(())
    }
}
