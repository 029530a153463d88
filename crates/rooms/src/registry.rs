//! The room registry: group id → connected sessions.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{RoomError, RoomResult};
use crate::events::ServerEvent;

/// Opaque identifier of one connected session. A member may hold any
/// number of concurrent sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

struct SessionHandle {
    member: String,
    tx: mpsc::Sender<ServerEvent>,
}

#[derive(Default)]
struct Room {
    sessions: HashMap<SessionId, SessionHandle>,
}

#[derive(Default)]
struct RegistryInner {
    rooms: HashMap<String, Room>,
    /// session id → group public id of the room it is joined to.
    sessions: HashMap<SessionId, String>,
}

/// Owner of all room state. `join` and `leave` are the only membership
/// mutators; everything else only fans events out.
///
/// Delivery is best-effort, at-most-once: each session has a bounded
/// outbound queue, and a session whose queue is full is dropped rather
/// than backpressuring the room.
#[derive(Default)]
pub struct RoomRegistry {
    inner: Mutex<RegistryInner>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session under a group's room and announce it to the
    /// sessions already there. No chat history is replayed. A session
    /// joined elsewhere implicitly leaves its old room first.
    pub async fn join(
        &self,
        session: SessionId,
        group_id: &str,
        member: &str,
        tx: mpsc::Sender<ServerEvent>,
    ) {
        let mut inner = self.inner.lock().await;

        if let Some((old_group, handle)) = remove_session(&mut inner, session) {
            broadcast_locked(
                &mut inner,
                &old_group,
                ServerEvent::MemberLeft {
                    member: handle.member,
                },
                None,
            );
        }

        inner
            .rooms
            .entry(group_id.to_string())
            .or_default()
            .sessions
            .insert(
                session,
                SessionHandle {
                    member: member.to_string(),
                    tx,
                },
            );
        inner.sessions.insert(session, group_id.to_string());

        broadcast_locked(
            &mut inner,
            group_id,
            ServerEvent::MemberJoined {
                member: member.to_string(),
            },
            Some(session),
        );

        info!(session = %session, group = group_id, member, "session joined room");
    }

    /// Broadcast a chat message to every session in the sender's room,
    /// including the sender. Fails with [`RoomError::NotJoined`] when the
    /// session has not joined a room.
    pub async fn send(&self, session: SessionId, text: &str) -> RoomResult<()> {
        let mut inner = self.inner.lock().await;

        let group_id = inner
            .sessions
            .get(&session)
            .cloned()
            .ok_or(RoomError::NotJoined)?;
        let sender = inner
            .rooms
            .get(&group_id)
            .and_then(|room| room.sessions.get(&session))
            .map(|handle| handle.member.clone())
            .ok_or(RoomError::NotJoined)?;

        broadcast_locked(
            &mut inner,
            &group_id,
            ServerEvent::UserMessage {
                sender,
                text: text.to_string(),
                timestamp: Utc::now().to_rfc3339(),
            },
            None,
        );

        Ok(())
    }

    /// Remove a session from its room, announce the departure, and tear
    /// the room down if it emptied. Safe to call for sessions that never
    /// joined; other sessions never observe a partial leave.
    pub async fn disconnect(&self, session: SessionId) {
        let mut inner = self.inner.lock().await;

        if let Some((group_id, handle)) = remove_session(&mut inner, session) {
            debug!(session = %session, group = %group_id, "session disconnected");
            broadcast_locked(
                &mut inner,
                &group_id,
                ServerEvent::MemberLeft {
                    member: handle.member,
                },
                None,
            );
        }
    }

    /// Fan a committed ledger version into the group's room. No-op when
    /// nobody is connected; delivery is best-effort.
    pub async fn publish_ledger_update(&self, group_id: &str, version: i64) {
        let mut inner = self.inner.lock().await;
        broadcast_locked(
            &mut inner,
            group_id,
            ServerEvent::LedgerUpdated {
                group_id: group_id.to_string(),
                version,
            },
            None,
        );
    }
}

/// Detach a session from the registry. Returns the room it was in and its
/// handle; empty rooms are torn down.
fn remove_session(
    inner: &mut RegistryInner,
    session: SessionId,
) -> Option<(String, SessionHandle)> {
    let group_id = inner.sessions.remove(&session)?;
    let room = inner.rooms.get_mut(&group_id)?;
    let handle = room.sessions.remove(&session)?;

    if room.sessions.is_empty() {
        inner.rooms.remove(&group_id);
    }

    Some((group_id, handle))
}

/// Deliver an event to a room. A recipient whose queue is full or closed
/// is evicted and announced as left; the queue keeps this iterative since
/// an eviction's own announcement may evict further sessions.
fn broadcast_locked(
    inner: &mut RegistryInner,
    group_id: &str,
    event: ServerEvent,
    skip: Option<SessionId>,
) {
    let mut queue: VecDeque<(String, ServerEvent, Option<SessionId>)> = VecDeque::new();
    queue.push_back((group_id.to_string(), event, skip));

    while let Some((group_id, event, skip)) = queue.pop_front() {
        let Some(room) = inner.rooms.get(&group_id) else {
            continue;
        };

        let mut evicted: Vec<SessionId> = Vec::new();
        for (id, handle) in &room.sessions {
            if Some(*id) == skip {
                continue;
            }
            if handle.tx.try_send(event.clone()).is_err() {
                evicted.push(*id);
            }
        }

        for id in evicted {
            if let Some((group_id, handle)) = remove_session(inner, id) {
                warn!(
                    session = %id,
                    group = %group_id,
                    member = %handle.member,
                    "outbound queue overflowed, dropping session"
                );
                queue.push_back((
                    group_id,
                    ServerEvent::MemberLeft {
                        member: handle.member,
                    },
                    None,
                ));
            }
        }
    }
}
