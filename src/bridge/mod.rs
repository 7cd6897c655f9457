//! Host-boundary messaging.
//!
//! Accepted statements leave the core as structured commands: `insert_text`
//! places text in the host's editor, `copy_text` puts it on the clipboard.
//! The transport is an injected [`MessageChannel`]; [`HostChannel`] is a
//! broadcast-backed implementation for in-process hosts.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// How inserted text is placed relative to the target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    /// End of the line preceding the target, re-indented to that line's
    /// leading whitespace, cursor after the indentation on the new line.
    Relative,
    /// Literally at the target (or cursor), cursor after the inserted text.
    Absolute,
}

/// An editor position, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Commands the core sends across the host boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostMessage {
    /// Insert `text` into the focused (or first visible) editable surface.
    InsertText {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        loc: Option<Position>,
        text: String,
        insert_type: InsertMode,
    },
    /// Copy `text` to the system clipboard; the host shows a confirmation.
    CopyText { text: String },
}

impl HostMessage {
    /// Create an insertion command.
    pub fn insert(text: impl Into<String>, mode: InsertMode, loc: Option<Position>) -> Self {
        Self::InsertText {
            loc,
            text: text.into(),
            insert_type: mode,
        }
    }

    /// Create a clipboard command.
    pub fn copy(text: impl Into<String>) -> Self {
        Self::CopyText { text: text.into() }
    }
}

/// Bridge errors.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Host channel closed")]
    Closed,
    #[error("Lagged behind by {0} messages")]
    Lagged(u64),
}

/// Transport for host-bound messages.
pub trait MessageChannel: Send + Sync {
    fn send(&self, message: HostMessage) -> Result<(), BridgeError>;
}

/// Broadcast-backed channel for in-process hosts.
pub struct HostChannel {
    tx: broadcast::Sender<HostMessage>,
}

impl HostChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Subscribe to host-bound messages.
    pub fn subscribe(&self) -> HostReceiver {
        HostReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for HostChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageChannel for HostChannel {
    fn send(&self, message: HostMessage) -> Result<(), BridgeError> {
        self.tx.send(message).map_err(|_| BridgeError::Closed)?;
        Ok(())
    }
}

/// Receiver half of a [`HostChannel`].
pub struct HostReceiver {
    rx: broadcast::Receiver<HostMessage>,
}

impl HostReceiver {
    /// Receive the next message.
    pub async fn recv(&mut self) -> Result<HostMessage, BridgeError> {
        self.rx.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => BridgeError::Closed,
            broadcast::error::RecvError::Lagged(n) => BridgeError::Lagged(n),
        })
    }

    /// Try to receive a message without waiting.
    pub fn try_recv(&mut self) -> Result<Option<HostMessage>, BridgeError> {
        match self.rx.try_recv() {
            Ok(msg) => Ok(Some(msg)),
            Err(broadcast::error::TryRecvError::Empty) => Ok(None),
            Err(broadcast::error::TryRecvError::Closed) => Err(BridgeError::Closed),
            Err(broadcast::error::TryRecvError::Lagged(n)) => Err(BridgeError::Lagged(n)),
        }
    }
}

/// Relays accepted statements to the host for insertion or copying.
///
/// The text is forwarded unaltered; positioning semantics live on the host
/// side of the boundary.
pub struct InsertionBridge {
    channel: Arc<dyn MessageChannel>,
}

impl InsertionBridge {
    pub fn new(channel: Arc<dyn MessageChannel>) -> Self {
        Self { channel }
    }

    /// Ask the host to insert `text` with the given placement.
    pub fn request_insertion(
        &self,
        text: impl Into<String>,
        mode: InsertMode,
        loc: Option<Position>,
    ) -> Result<(), BridgeError> {
        let message = HostMessage::insert(text, mode, loc);
        tracing::debug!(mode = ?mode, "requesting insertion");
        self.channel.send(message)
    }

    /// Ask the host to copy `text` to the clipboard.
    pub fn copy_text(&self, text: impl Into<String>) -> Result<(), BridgeError> {
        self.channel.send(HostMessage::copy(text))
    }
}
