//! Gather Core Library
//!
//! Models, storage, lifecycle rules and the event orchestrator for planning
//! social cooking events: roasts, parties and potlucks.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod orchestrator;
pub mod ports;
pub mod router;
pub mod share;
pub mod storage;
pub mod tally;

pub use config::{GatherConfig, ShareConfig};
pub use error::{Error, Result};
pub use models::*;
pub use orchestrator::{Actor, EventSession};
pub use ports::{
    AnalyticsSignal, AnalyticsSink, Collaborators, CompanionSink, FeedCard, FeedSink,
    SocialEventCard,
};
pub use router::{resume_screen, screen_for, ScreenKey};
pub use share::{share_link, ShareLink};
pub use storage::{
    Database, DishRepository, EventRepository, GuestRepository, MembershipRepository,
    RoleRepository, Storage, VoteRepository,
};
pub use tally::{tally, CategoryTally, TallyResult};
