//! Change notifications for front ends.
//!
//! The session emits a [`SessionEvent`] after every state change. Front ends
//! either register a callback or take a bounded channel receiver; no editing
//! logic depends on who is listening.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::Serialize;
use std::fmt;
use tracing::warn;
use vidsplice_core::TimeValue;

use crate::composition::CompositionKind;

/// Something observable happened to a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionEvent {
    AssetLoaded {
        asset: String,
        duration: TimeValue,
        has_video: bool,
        has_audio: bool,
    },
    TimelineChanged {
        segment_count: usize,
    },
    FilterChanged {
        filter: Option<String>,
    },
    CompositionBuilt {
        kind: CompositionKind,
        insertions: usize,
        duration: TimeValue,
    },
}

type Callback = Box<dyn Fn(&SessionEvent) + Send>;

/// Fan-out of session events to callbacks and channels.
pub struct EventBus {
    callbacks: Vec<Callback>,
    channels: Vec<Sender<SessionEvent>>,
    channel_capacity: usize,
}

impl EventBus {
    /// `channel_capacity` bounds each receiver handed out by `subscribe_channel`.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            callbacks: Vec::new(),
            channels: Vec::new(),
            channel_capacity,
        }
    }

    /// Call `callback` synchronously for every event.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&SessionEvent) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Receive events on a bounded channel.
    ///
    /// Events are dropped for a receiver that falls `channel_capacity`
    /// behind; dropping the receiver unsubscribes it.
    pub fn subscribe_channel(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = crossbeam_channel::bounded(self.channel_capacity);
        self.channels.push(tx);
        rx
    }

    /// Deliver `event` to every subscriber. Never blocks.
    pub fn emit(&mut self, event: SessionEvent) {
        for callback in &self.callbacks {
            callback(&event);
        }
        self.channels
            .retain(|tx| match tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(dropped)) => {
                    warn!(event = ?dropped, "Event receiver is full; dropping event");
                    true
                }
                Err(TrySendError::Disconnected(_)) => false,
            });
    }

    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len() + self.channels.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("callbacks", &self.callbacks.len())
            .field("channels", &self.channels.len())
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}
