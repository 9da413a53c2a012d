//! View routing: which screen shows an event in a given state

use serde::{Deserialize, Serialize};

use crate::models::{EventStatus, EventType};

/// Screens the presentation layer can show for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKey {
    Setup,
    Invite,
    Voting,
    MenuPick,
    RoleAssign,
    DishBoard,
    Dashboard,
    Shopping,
    Cooking,
    Summary,
    Cancelled,
}

/// Table lookup from (type, status) to screen
pub fn screen_for(event_type: EventType, status: EventStatus) -> ScreenKey {
    use EventStatus as S;
    use EventType as T;

    match (event_type, status) {
        (_, S::Planning) => ScreenKey::Setup,
        (_, S::Invite) => ScreenKey::Invite,
        (T::Roast, S::Voting) => ScreenKey::Voting,
        (T::Party, S::MenuPick) => ScreenKey::MenuPick,
        (T::Party, S::RoleAssign) => ScreenKey::RoleAssign,
        (T::Potluck, S::DishClaiming) => ScreenKey::DishBoard,
        (_, S::Shopping) => ScreenKey::Shopping,
        (_, S::Cooking) => ScreenKey::Cooking,
        (_, S::Done) => ScreenKey::Summary,
        (_, S::Cancelled) => ScreenKey::Cancelled,
        _ => ScreenKey::Dashboard,
    }
}

/// Screen to open when an event is loaded from storage
///
/// Coarser than [`screen_for`]: only setup and voting get their own entry
/// point, everything else resumes on the dashboard.
pub fn resume_screen(status: EventStatus) -> ScreenKey {
    match status {
        EventStatus::Planning => ScreenKey::Setup,
        EventStatus::Voting => ScreenKey::Voting,
        _ => ScreenKey::Dashboard,
    }
}
