// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live snapshot streaming for operator UIs.
//!
//! This module provides read-only, non-authoritative change notifications
//! via WebSocket connections. When a collection changes, the connected
//! client receives the full fresh snapshot of that collection; appended
//! ledger entries additionally arrive as their own message so the UI can
//! raise a notification without a round trip.
//!
//! # Architecture
//!
//! - Messages are derived from the persistence change feed, after commit
//! - Messages are informational only and never authoritative
//! - No commands are executed over WebSocket connections
//! - Clients must still use the HTTP API for authoritative reads

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use courtdesk_ledger::ActivityEntry;
use courtdesk_persistence::{ChangeEvent, Collection, Persistence, PersistenceError};

use crate::AppState;

/// A message pushed to a live stream client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
    /// A collection changed; the full fresh snapshot is attached.
    Snapshot {
        /// The collection name.
        collection: String,
        /// Every item in the collection, serialized.
        items: serde_json::Value,
    },
    /// A ledger entry was appended.
    EntryLogged {
        /// The appended entry, with its assigned id.
        entry: ActivityEntry,
    },
}

const fn collection_name(collection: Collection) -> &'static str {
    match collection {
        Collection::Bookings => "bookings",
        Collection::Courts => "courts",
        Collection::Products => "products",
        Collection::Expenses => "expenses",
        Collection::Ledger => "ledger",
        Collection::Summaries => "summaries",
        Collection::Schedule => "schedule",
    }
}

fn snapshot_items(
    persistence: &mut Persistence,
    collection: Collection,
) -> Result<serde_json::Value, PersistenceError> {
    let items = match collection {
        Collection::Bookings => serde_json::to_value(persistence.list_bookings()?),
        Collection::Courts => serde_json::to_value(persistence.list_courts()?),
        Collection::Products => serde_json::to_value(persistence.list_products()?),
        Collection::Expenses => serde_json::to_value(persistence.list_expenses()?),
        Collection::Ledger => serde_json::to_value(persistence.list_entries()?),
        Collection::Summaries => serde_json::to_value(persistence.list_summaries()?),
        Collection::Schedule => serde_json::to_value(persistence.load_schedule()?.to_keyed_map()),
    }?;
    Ok(items)
}

/// Builds the outgoing message for one change event, reading the fresh
/// snapshot for collection changes.
async fn message_for_event(app_state: &AppState, event: ChangeEvent) -> Option<LiveMessage> {
    match event {
        ChangeEvent::CollectionChanged(collection) => {
            let mut persistence = app_state.persistence.lock().await;
            match snapshot_items(&mut persistence, collection) {
                Ok(items) => Some(LiveMessage::Snapshot {
                    collection: collection_name(collection).to_string(),
                    items,
                }),
                Err(e) => {
                    error!(error = %e, "Failed to build live snapshot");
                    None
                }
            }
        }
        ChangeEvent::EntryAppended(entry) => Some(LiveMessage::EntryLogged { entry }),
    }
}

/// Handles WebSocket upgrade requests for the live snapshot stream.
///
/// # Arguments
///
/// * `ws` - WebSocket upgrade request
/// * `app_state` - Shared application state
///
/// # Returns
///
/// An HTTP response that upgrades the connection to WebSocket
pub async fn live_stream_handler(
    ws: WebSocketUpgrade,
    AxumState(app_state): AxumState<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handles an individual WebSocket connection.
///
/// Sends a connection confirmation, then streams snapshot and new-entry
/// messages until the client disconnects or an error occurs.
async fn handle_socket(socket: WebSocket, app_state: AppState) {
    info!("Client connected to live snapshot stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx = {
        let persistence = app_state.persistence.lock().await;
        persistence.feed().subscribe()
    };

    // Send connection confirmation
    let connected = LiveMessage::Connected {
        timestamp: courtdesk_ledger::now_timestamp()
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    // Task for sending messages to the client
    let send_state = app_state.clone();
    let mut send_task = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            let Some(message) = message_for_event(&send_state, event).await else {
                continue;
            };
            match serde_json::to_string(&message) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        // Client disconnected
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize live message");
                }
            }
        }
    });

    // Task for receiving messages from the client (though we don't expect any)
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    // We don't process commands over WebSocket
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Ping/pong handled automatically by Axum
                }
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live snapshot stream");
}
