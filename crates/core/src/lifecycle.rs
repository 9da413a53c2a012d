//! Event lifecycle: forward progressions and the legal-transition table
//!
//! Status never moves backwards. Skipping ahead along the event type's
//! progression is allowed; `done` additionally requires the cooking stage
//! (potluck may also finish from `locked` or `shopping`). `cancelled` is
//! reachable from any non-terminal status.

use crate::error::{Error, Result};
use crate::models::{EventStatus, EventType, SocialEvent};

use EventStatus::*;

const ROAST: &[EventStatus] = &[Planning, Invite, Voting, Locked, Shopping, Cooking, Done];
const POTLUCK: &[EventStatus] = &[Planning, Invite, DishClaiming, Locked, Shopping, Cooking, Done];
const PARTY: &[EventStatus] = &[
    Planning, Invite, MenuPick, RoleAssign, Locked, Shopping, Cooking, Done,
];

/// Forward status progression for an event type
pub fn progression(event_type: EventType) -> &'static [EventStatus] {
    match event_type {
        EventType::Roast => ROAST,
        EventType::Potluck => POTLUCK,
        EventType::Party => PARTY,
    }
}

/// Position of `status` in the type's progression, `None` if it is not part of it
pub fn stage(event_type: EventType, status: EventStatus) -> Option<usize> {
    progression(event_type).iter().position(|s| *s == status)
}

/// Whether `status` sits at or beyond `marker` in the progression
///
/// Statuses outside the progression (`cancelled`, or a foreign status) count
/// as having passed every marker.
pub fn has_reached(event_type: EventType, status: EventStatus, marker: EventStatus) -> bool {
    match (stage(event_type, status), stage(event_type, marker)) {
        (Some(current), Some(target)) => current >= target,
        _ => true,
    }
}

/// The forward-advance target for an event, `None` once terminal
pub fn next_status(event: &SocialEvent) -> Option<EventStatus> {
    if event.status.is_terminal() {
        return None;
    }
    let steps = progression(event.event_type);
    let current = stage(event.event_type, event.status)?;
    steps.get(current + 1).copied()
}

/// How a requested status change will be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Requested status equals the current one
    Unchanged,
    Forward,
    Cancel,
}

/// Validate `from -> to` for an event type
pub fn check_transition(
    event_type: EventType,
    from: EventStatus,
    to: EventStatus,
) -> Result<Transition> {
    let invalid = || Error::InvalidTransition {
        from: from.to_string(),
        to: to.to_string(),
    };

    if from.is_terminal() {
        return Err(invalid());
    }
    if from == to {
        return Ok(Transition::Unchanged);
    }
    if to == Cancelled {
        return Ok(Transition::Cancel);
    }

    let current = stage(event_type, from).ok_or_else(invalid)?;
    let target = stage(event_type, to).ok_or_else(invalid)?;
    if target <= current {
        return Err(invalid());
    }

    if to == Done {
        let finish_from: &[EventStatus] = match event_type {
            EventType::Potluck => &[Locked, Shopping, Cooking],
            EventType::Roast | EventType::Party => &[Cooking],
        };
        if !finish_from.contains(&from) {
            return Err(invalid());
        }
    }

    Ok(Transition::Forward)
}
