//! Data models for Gather

mod dish;
mod event;
mod guest;
mod projection;
mod role;
mod vote;

pub use dish::*;
pub use event::*;
pub use guest::*;
pub use projection::*;
pub use role::*;
pub use vote::*;
