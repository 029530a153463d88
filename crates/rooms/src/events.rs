//! Events fanned out to connected sessions.

use serde::{Deserialize, Serialize};

/// Server events sent over a session's realtime channel. Tagged so each
/// kind carries only the fields relevant to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A chat message, echoed to every session in the room including the
    /// sender. The timestamp is assigned by the broker on arrival.
    UserMessage {
        sender: String,
        text: String,
        timestamp: String,
    },
    /// A session joined the room.
    MemberJoined { member: String },
    /// A session left the room (or was dropped for falling behind).
    MemberLeft { member: String },
    /// The group's settlement ledger committed a new version; consumers
    /// re-read the summary and compare against this causal token.
    LedgerUpdated { group_id: String, version: i64 },
    /// Heartbeat response.
    Pong,
    /// Protocol-level error, scoped to the receiving session.
    Error { code: String, message: String },
}
