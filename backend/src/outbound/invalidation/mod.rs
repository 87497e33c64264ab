//! View invalidation fan-out over a tokio broadcast channel.
//!
//! Presentation layers subscribe and refresh the named views. Sending never
//! blocks and never fails the write that triggered it.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::domain::ports::{ViewInvalidator, ViewPath};

const DEFAULT_CAPACITY: usize = 64;

/// Broadcasts each batch of invalidated views to every subscriber.
#[derive(Clone)]
pub struct BroadcastViewInvalidator {
    sender: broadcast::Sender<Vec<ViewPath>>,
}

impl Default for BroadcastViewInvalidator {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastViewInvalidator {
    /// Lagging subscribers lose the oldest batches beyond `capacity`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every batch sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<ViewPath>> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl ViewInvalidator for BroadcastViewInvalidator {
    async fn invalidate(&self, views: &[ViewPath]) {
        let paths: Vec<String> = views.iter().map(ToString::to_string).collect();
        match self.sender.send(views.to_vec()) {
            Ok(receivers) => info!(?paths, receivers, "views invalidated"),
            Err(_) => debug!(?paths, "views invalidated with no subscribers"),
        }
    }
}
