//! Shared fixtures for orchestrator tests

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Datelike, Duration, Utc};
use uuid::Uuid;

use super::{Actor, EventSession};
use crate::error::{Error, Result};
use crate::models::EventType;
use crate::ports::{
    AnalyticsSignal, AnalyticsSink, Collaborators, CompanionSink, FeedCard, FeedSink,
};
use crate::storage::Database;

pub fn host() -> Actor {
    Actor::new(Uuid::new_v4(), "Ana")
}

pub fn guest(name: &str) -> Actor {
    Actor::new(Uuid::new_v4(), name)
}

pub fn session(db: &Database, actor: Actor) -> EventSession<'_, Database> {
    EventSession::new(db, actor)
}

pub fn next_sunday() -> DateTime<Utc> {
    let now = Utc::now();
    let days = 7 - now.weekday().num_days_from_sunday() as i64;
    now + Duration::days(days)
}

/// Draft, name and commit an event, returning its id
pub fn commit(session: &mut EventSession<'_, Database>, event_type: EventType, title: &str) -> Uuid {
    let draft = session.create_draft(event_type);
    draft.title = title.to_string();
    draft.date_time = Some(next_sunday());
    session.commit_draft().unwrap()
}

/// Make every `op` (INSERT, UPDATE, DELETE) on `table` abort
pub fn fail_writes(db: &Database, table: &str, op: &str) {
    db.execute_batch(&format!(
        "CREATE TRIGGER fail_{table}_{op} BEFORE {op} ON {table}
         BEGIN SELECT RAISE(ABORT, 'backend unavailable'); END;"
    ))
    .unwrap();
}

/// Collaborators that remember everything they were given
#[derive(Default, Clone)]
pub struct Recorder {
    pub cards: Rc<RefCell<Vec<FeedCard>>>,
    pub messages: Rc<RefCell<Vec<String>>>,
    pub signals: Rc<RefCell<Vec<AnalyticsSignal>>>,
}

impl Recorder {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            feed: Box::new(self.clone()),
            companion: Box::new(self.clone()),
            analytics: Box::new(self.clone()),
        }
    }
}

impl FeedSink for Recorder {
    fn prepend(&self, card: FeedCard) -> Result<()> {
        self.cards.borrow_mut().insert(0, card);
        Ok(())
    }
}

impl CompanionSink for Recorder {
    fn show_message(&self, message: &str) -> Result<()> {
        self.messages.borrow_mut().push(message.to_string());
        Ok(())
    }
}

impl AnalyticsSink for Recorder {
    fn track(&self, signal: &AnalyticsSignal) -> Result<()> {
        self.signals.borrow_mut().push(signal.clone());
        Ok(())
    }
}

struct Broken;

impl FeedSink for Broken {
    fn prepend(&self, _card: FeedCard) -> Result<()> {
        Err(Error::Collaborator("feed offline".into()))
    }
}

impl CompanionSink for Broken {
    fn show_message(&self, _message: &str) -> Result<()> {
        Err(Error::Collaborator("companion offline".into()))
    }
}

impl AnalyticsSink for Broken {
    fn track(&self, _signal: &AnalyticsSignal) -> Result<()> {
        Err(Error::Collaborator("analytics offline".into()))
    }
}

pub fn broken_collaborators() -> Collaborators {
    Collaborators {
        feed: Box::new(Broken),
        companion: Box::new(Broken),
        analytics: Box::new(Broken),
    }
}
