//! Behavioural tests for the room registry.
//!
//! The registry's broadcasts run synchronously inside each awaited call,
//! so `try_recv` observations here are deterministic.

use autosplit_rooms::{RoomError, RoomRegistry, ServerEvent, SessionId};
use tokio::sync::mpsc;

fn channel(capacity: usize) -> (mpsc::Sender<ServerEvent>, mpsc::Receiver<ServerEvent>) {
    mpsc::channel(capacity)
}

#[tokio::test]
async fn join_announces_to_existing_sessions_only() {
    let registry = RoomRegistry::new();

    let alice = SessionId::new();
    let (alice_tx, mut alice_rx) = channel(8);
    registry.join(alice, "g1", "Alice", alice_tx).await;

    let bob = SessionId::new();
    let (bob_tx, mut bob_rx) = channel(8);
    registry.join(bob, "g1", "Bob", bob_tx).await;

    assert_eq!(
        alice_rx.try_recv().ok(),
        Some(ServerEvent::MemberJoined {
            member: "Bob".to_string()
        })
    );
    // The joiner gets no replay and no echo of its own join.
    assert!(bob_rx.try_recv().is_err());
}

#[tokio::test]
async fn user_message_echoes_to_every_session_in_room() {
    let registry = RoomRegistry::new();

    let alice = SessionId::new();
    let (alice_tx, mut alice_rx) = channel(8);
    registry.join(alice, "g1", "Alice", alice_tx).await;

    let bob = SessionId::new();
    let (bob_tx, mut bob_rx) = channel(8);
    registry.join(bob, "g1", "Bob", bob_tx).await;
    let _ = alice_rx.try_recv(); // Bob's join announcement

    registry.send(alice, "hi").await.expect("send");

    for rx in [&mut alice_rx, &mut bob_rx] {
        match rx.try_recv().expect("user message delivered") {
            ServerEvent::UserMessage {
                sender,
                text,
                timestamp,
            } => {
                assert_eq!(sender, "Alice");
                assert_eq!(text, "hi");
                assert!(!timestamp.is_empty());
            }
            other => panic!("expected user message, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn messages_from_one_session_arrive_in_send_order() {
    let registry = RoomRegistry::new();

    let alice = SessionId::new();
    let (alice_tx, _alice_rx) = channel(8);
    registry.join(alice, "g1", "Alice", alice_tx).await;

    let bob = SessionId::new();
    let (bob_tx, mut bob_rx) = channel(8);
    registry.join(bob, "g1", "Bob", bob_tx).await;

    registry.send(alice, "one").await.expect("send one");
    registry.send(alice, "two").await.expect("send two");
    registry.send(alice, "three").await.expect("send three");

    let mut texts = Vec::new();
    while let Ok(event) = bob_rx.try_recv() {
        if let ServerEvent::UserMessage { text, .. } = event {
            texts.push(text);
        }
    }
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn rooms_are_isolated_per_group() {
    let registry = RoomRegistry::new();

    let alice = SessionId::new();
    let (alice_tx, _alice_rx) = channel(8);
    registry.join(alice, "g1", "Alice", alice_tx).await;

    let eve = SessionId::new();
    let (eve_tx, mut eve_rx) = channel(8);
    registry.join(eve, "g2", "Eve", eve_tx).await;

    registry.send(alice, "secret").await.expect("send");

    assert!(eve_rx.try_recv().is_err(), "g2 must not observe g1 traffic");
}

#[tokio::test]
async fn send_before_join_fails() {
    let registry = RoomRegistry::new();
    let stranger = SessionId::new();

    let result = registry.send(stranger, "hello?").await;
    assert_eq!(result, Err(RoomError::NotJoined));
}

#[tokio::test]
async fn disconnect_announces_departure() {
    let registry = RoomRegistry::new();

    let alice = SessionId::new();
    let (alice_tx, mut alice_rx) = channel(8);
    registry.join(alice, "g1", "Alice", alice_tx).await;

    let bob = SessionId::new();
    let (bob_tx, _bob_rx) = channel(8);
    registry.join(bob, "g1", "Bob", bob_tx).await;
    let _ = alice_rx.try_recv();

    registry.disconnect(bob).await;

    assert_eq!(
        alice_rx.try_recv().ok(),
        Some(ServerEvent::MemberLeft {
            member: "Bob".to_string()
        })
    );

    // Disconnecting an unknown session is a no-op.
    registry.disconnect(SessionId::new()).await;

    // The departed session no longer counts as joined.
    assert_eq!(registry.send(bob, "ghost").await, Err(RoomError::NotJoined));
}

#[tokio::test]
async fn rejoining_moves_the_session_between_rooms() {
    let registry = RoomRegistry::new();

    let alice = SessionId::new();
    let (alice_tx, mut alice_rx) = channel(8);
    registry.join(alice, "g1", "Alice", alice_tx).await;

    let bob = SessionId::new();
    let (bob_tx, mut bob_rx) = channel(8);
    registry.join(bob, "g1", "Bob", bob_tx).await;
    let _ = alice_rx.try_recv();

    let (bob_tx2, mut bob_rx2) = channel(8);
    registry.join(bob, "g2", "Bob", bob_tx2).await;

    // g1 sees Bob leave; Bob's old channel receives nothing further.
    assert_eq!(
        alice_rx.try_recv().ok(),
        Some(ServerEvent::MemberLeft {
            member: "Bob".to_string()
        })
    );
    assert!(bob_rx.try_recv().is_err());

    registry.send(bob, "now in g2").await.expect("send in g2");
    assert!(matches!(
        bob_rx2.try_recv(),
        Ok(ServerEvent::UserMessage { .. })
    ));
    assert!(alice_rx.try_recv().is_err());
}

#[tokio::test]
async fn slow_session_is_dropped_not_waited_on() {
    let registry = RoomRegistry::new();

    let alice = SessionId::new();
    let (alice_tx, mut alice_rx) = channel(8);
    registry.join(alice, "g1", "Alice", alice_tx).await;

    // Bob's queue holds a single event and is never drained.
    let bob = SessionId::new();
    let (bob_tx, mut bob_rx) = channel(1);
    registry.join(bob, "g1", "Bob", bob_tx).await;
    let _ = alice_rx.try_recv();

    registry.send(alice, "one").await.expect("first send");
    registry.send(alice, "two").await.expect("second send");

    // Alice saw both messages and then Bob's eviction.
    let mut events = Vec::new();
    while let Ok(event) = alice_rx.try_recv() {
        events.push(event);
    }
    assert!(matches!(events[0], ServerEvent::UserMessage { .. }));
    assert!(matches!(events[1], ServerEvent::UserMessage { .. }));
    assert_eq!(
        events[2],
        ServerEvent::MemberLeft {
            member: "Bob".to_string()
        }
    );

    // Bob got the first message, then his channel was closed.
    assert!(matches!(
        bob_rx.try_recv(),
        Ok(ServerEvent::UserMessage { .. })
    ));
    assert!(bob_rx.try_recv().is_err());
    assert_eq!(registry.send(bob, "still here?").await, Err(RoomError::NotJoined));
}

#[tokio::test]
async fn ledger_updates_reach_every_session_in_the_group() {
    let registry = RoomRegistry::new();

    let alice = SessionId::new();
    let (alice_tx, mut alice_rx) = channel(8);
    registry.join(alice, "g1", "Alice", alice_tx).await;

    let eve = SessionId::new();
    let (eve_tx, mut eve_rx) = channel(8);
    registry.join(eve, "g2", "Eve", eve_tx).await;

    registry.publish_ledger_update("g1", 7).await;

    assert_eq!(
        alice_rx.try_recv().ok(),
        Some(ServerEvent::LedgerUpdated {
            group_id: "g1".to_string(),
            version: 7
        })
    );
    assert!(eve_rx.try_recv().is_err());

    // Publishing into an empty room is a harmless no-op.
    registry.publish_ledger_update("nobody-home", 1).await;
}
