//! Driven port for telling presentation layers which views went stale.

use std::fmt;

use async_trait::async_trait;

use crate::domain::EventId;

/// Logical view path affected by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPath {
    /// The owner's event list.
    Dashboard,
    /// The edit view of one event.
    EventEdit(EventId),
}

impl fmt::Display for ViewPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => f.write_str("/dashboard"),
            Self::EventEdit(id) => write!(f, "/events/{id}/edit"),
        }
    }
}

/// Port notified after every successful write.
///
/// Delivery is best effort; implementations never fail the write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewInvalidator: Send + Sync {
    async fn invalidate(&self, views: &[ViewPath]);
}

/// Invalidator that drops every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureViewInvalidator;

#[async_trait]
impl ViewInvalidator for FixtureViewInvalidator {
    async fn invalidate(&self, _views: &[ViewPath]) {}
}
