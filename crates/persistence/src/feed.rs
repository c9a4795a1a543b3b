// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Change notifications pushed after committed writes.
//!
//! Subscribers receive a coarse "collection changed" signal and re-read
//! the full collection; ledger appends additionally carry the new entry
//! so clients can raise a notification without a round trip.

use courtdesk_ledger::ActivityEntry;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// The collections a subscriber can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collection {
    /// Court bookings.
    Bookings,
    /// Court definitions.
    Courts,
    /// The product catalogue.
    Products,
    /// Operating expenses.
    Expenses,
    /// The activity ledger.
    Ledger,
    /// Compacted monthly summaries.
    Summaries,
    /// The opening-hours grid.
    Schedule,
}

/// A change event published after a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    /// A collection changed; subscribers should re-read it.
    CollectionChanged(Collection),
    /// A new ledger entry was appended. Sent in addition to the
    /// `CollectionChanged(Ledger)` signal.
    EntryAppended(ActivityEntry),
}

/// Broadcast fan-out of [`ChangeEvent`]s to any number of subscribers.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    /// Creates a feed with the given per-subscriber buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to future change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event. A send error only means no subscriber is
    /// currently listening, which is not a failure.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(64)
    }
}
