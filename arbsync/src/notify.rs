//! User-facing messages.
//!
//! Components report progress and outcomes through a [`Notifier`] handed to
//! them by the caller instead of printing on their own.

use std::sync::Mutex;

pub trait Notifier {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards messages to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}

/// Keeps messages in memory, for callers that render them later.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Level, String)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.info("one");
        notifier.warn("two");
        notifier.info("three");

        assert_eq!(
            notifier.messages(),
            vec![
                (Level::Info, "one".to_string()),
                (Level::Warn, "two".to_string()),
                (Level::Info, "three".to_string()),
            ]
        );
        assert_eq!(notifier.warnings(), vec!["two".to_string()]);
    }

    #[test]
    fn test_reference_is_a_notifier() {
        fn notify(n: impl Notifier) {
            n.info("hello");
        }
        let notifier = RecordingNotifier::new();
        notify(&notifier);
        assert_eq!(notifier.messages().len(), 1);
    }
}
