//! Collaborators that surface feed cards and companion messages in the shell

use std::cell::RefCell;
use std::rc::Rc;

use gather_core::ports::LogAnalytics;
use gather_core::{Collaborators, CompanionSink, FeedCard, FeedSink, Result};

/// Lines queued by collaborators, printed after the command that caused them
#[derive(Debug, Default, Clone)]
pub struct Notices(Rc<RefCell<Vec<String>>>);

impl Notices {
    pub fn push(&self, line: String) {
        self.0.borrow_mut().push(line);
    }

    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

struct ConsoleFeed(Notices);

impl FeedSink for ConsoleFeed {
    fn prepend(&self, card: FeedCard) -> Result<()> {
        let data = card.data;
        self.0.push(format!(
            "feed: {} ({}) on {}",
            data.title,
            data.event_type.display_name(),
            data.date_time.format("%Y-%m-%d %H:%M")
        ));
        Ok(())
    }
}

struct ConsoleCompanion(Notices);

impl CompanionSink for ConsoleCompanion {
    fn show_message(&self, message: &str) -> Result<()> {
        self.0.push(format!("companion: {message}"));
        Ok(())
    }
}

pub fn collaborators(notices: &Notices) -> Collaborators {
    Collaborators {
        feed: Box::new(ConsoleFeed(notices.clone())),
        companion: Box::new(ConsoleCompanion(notices.clone())),
        analytics: Box::new(LogAnalytics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_companion_messages_are_queued_once() {
        let notices = Notices::default();
        let collaborators = collaborators(&notices);

        collaborators.notify("Voting is closed.");
        assert_eq!(notices.drain(), vec!["companion: Voting is closed.".to_string()]);
        assert!(notices.drain().is_empty());
    }
}
