//! AutoSplit Rooms Crate
//!
//! Ephemeral per-group realtime channels: chat fan-out, join/leave
//! presence events, and ledger-update notifications. Room membership is
//! connected sessions, not member records, and no state survives the last
//! disconnecting session.

pub mod errors;
pub mod events;
pub mod registry;

pub use errors::{RoomError, RoomResult};
pub use events::ServerEvent;
pub use registry::{RoomRegistry, SessionId};
