//! Integration tests for room actors and the registry.

use std::time::Duration;

use tokio::sync::mpsc;

use blef_engine::{
    ClientCommand, DeclaredHand, Rank, ServerEvent, TableConfig,
};
use blef_protocol::{PlayerId, RoomId};
use blef_room::{PlayerSender, RoomError, RoomRegistry, ROUND_TRANSITION_DELAY};

type EventRx = mpsc::UnboundedReceiver<ServerEvent>;

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn rid(token: &str) -> RoomId {
    RoomId::parse(token).unwrap()
}

fn channel() -> (PlayerSender, EventRx) {
    mpsc::unbounded_channel()
}

/// Creates a dummy player sender (receiver is dropped immediately).
fn dummy_sender() -> PlayerSender {
    mpsc::unbounded_channel().0
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

fn drain(rx: &mut EventRx) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Registry with a created room and two more players joined, all
/// channels kept.
async fn three_player_room(
    token: &str,
) -> (RoomRegistry, [EventRx; 3]) {
    let mut registry = RoomRegistry::new();
    let (tx1, rx1) = channel();
    let (tx2, rx2) = channel();
    let (tx3, rx3) = channel();

    registry
        .create(rid(token), pid(1), "ada".into(), TableConfig::default(), tx1)
        .unwrap();
    registry
        .join(rid(token), pid(2), "bob".into(), tx2)
        .await
        .unwrap();
    registry
        .join(rid(token), pid(3), "cyd".into(), tx3)
        .await
        .unwrap();
    settle().await;

    (registry, [rx1, rx2, rx3])
}

#[tokio::test]
async fn test_create_sends_room_created_to_host() {
    let mut registry = RoomRegistry::new();
    let (tx, mut rx) = channel();
    registry
        .create(rid("a1b2c3"), pid(1), "ada".into(), TableConfig::default(), tx)
        .unwrap();
    settle().await;

    let events = drain(&mut rx);
    assert!(matches!(
        events.as_slice(),
        [ServerEvent::RoomCreated { hand_size: 5, timer_length: 30, .. }]
    ));
}

#[tokio::test]
async fn test_create_rejects_taken_token() {
    let mut registry = RoomRegistry::new();
    registry
        .create(
            rid("a1b2c3"),
            pid(1),
            "ada".into(),
            TableConfig::default(),
            dummy_sender(),
        )
        .unwrap();

    let err = registry
        .create(
            rid("a1b2c3"),
            pid(2),
            "bob".into(),
            TableConfig::default(),
            dummy_sender(),
        )
        .unwrap_err();
    assert_eq!(err, RoomError::AlreadyExists(rid("a1b2c3")));
    assert_eq!(err.to_string(), "Room already exists");
}

#[tokio::test]
async fn test_join_unknown_room() {
    let mut registry = RoomRegistry::new();
    let err = registry
        .join(rid("n0such"), pid(1), "ada".into(), dummy_sender())
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::NotFound(rid("n0such")));
    assert_eq!(err.to_string(), "Room does not exist");
}

#[tokio::test]
async fn test_join_broadcasts_roster_to_everyone() {
    let (_registry, mut rxs) = three_player_room("a1b2c3").await;

    // The host saw roomCreated plus two playerJoined broadcasts.
    let host_events = drain(&mut rxs[0]);
    let joins = host_events
        .iter()
        .filter(|e| matches!(e, ServerEvent::PlayerJoined { .. }))
        .count();
    assert_eq!(joins, 2);

    // The last joiner sees the roster including themselves.
    let events = drain(&mut rxs[2]);
    match events.last() {
        Some(ServerEvent::PlayerJoined { players, .. }) => {
            assert_eq!(players.len(), 3);
        }
        other => panic!("expected playerJoined, got {other:?}"),
    }
}

#[tokio::test]
async fn test_duplicate_name_gets_join_error_and_stays_out() {
    let mut registry = RoomRegistry::new();
    let (tx1, mut rx1) = channel();
    registry
        .create(rid("a1b2c3"), pid(1), "ada".into(), TableConfig::default(), tx1)
        .unwrap();

    let (tx2, mut rx2) = channel();
    registry
        .join(rid("a1b2c3"), pid(2), "ada".into(), tx2)
        .await
        .unwrap();
    settle().await;

    // The requester alone hears about it.
    let events = drain(&mut rx2);
    assert!(matches!(
        events.as_slice(),
        [ServerEvent::JoinError { message }] if message == "Player name already taken"
    ));
    assert!(registry.room_of(pid(2)).is_none());

    // The host saw no playerJoined.
    let host_events = drain(&mut rx1);
    assert!(!host_events
        .iter()
        .any(|e| matches!(e, ServerEvent::PlayerJoined { .. })));
}

#[tokio::test]
async fn test_start_deals_privately_and_announces_turn() {
    let (registry, mut rxs) = three_player_room("a1b2c3").await;
    for rx in &mut rxs {
        drain(rx);
    }

    registry
        .route(pid(1), ClientCommand::StartGame { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    settle().await;

    for rx in &mut rxs {
        let events = drain(rx);
        let mut saw_start = false;
        let mut own_cards = 0;
        for event in events {
            match event {
                ServerEvent::GameStarted { current_turn, .. } => {
                    saw_start = true;
                    assert_eq!(current_turn, pid(1));
                }
                ServerEvent::DealCards { cards } => {
                    own_cards = cards.len();
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!(saw_start);
        // Exactly one private deal of the configured size each.
        assert_eq!(own_cards, 5);
    }
}

#[tokio::test]
async fn test_rejected_command_answers_requester_only() {
    let (registry, mut rxs) = three_player_room("a1b2c3").await;
    registry
        .route(pid(1), ClientCommand::StartGame { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    settle().await;
    for rx in &mut rxs {
        drain(rx);
    }

    // It is seat 1's turn; seat 2 plays anyway.
    registry
        .route(
            pid(2),
            ClientCommand::PlayHand {
                room_id: rid("a1b2c3"),
                hand: DeclaredHand::Pair { rank: Rank::King },
            },
        )
        .await
        .unwrap();
    settle().await;

    let events = drain(&mut rxs[1]);
    assert!(matches!(
        events.as_slice(),
        [ServerEvent::JoinError { message }] if message == "It is not your turn."
    ));
    assert!(drain(&mut rxs[0]).is_empty());
    assert!(drain(&mut rxs[2]).is_empty());
}

#[tokio::test]
async fn test_command_from_outsider_is_rejected() {
    let (registry, _rxs) = three_player_room("a1b2c3").await;
    let err = registry
        .route(pid(9), ClientCommand::StartGame { room_id: rid("a1b2c3") })
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::NotInRoom(pid(9)));
}

#[tokio::test]
async fn test_bluff_call_reveals_then_reports() {
    let (registry, mut rxs) = three_player_room("a1b2c3").await;
    registry
        .route(pid(1), ClientCommand::StartGame { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    settle().await;
    for rx in &mut rxs {
        drain(rx);
    }

    registry
        .route(
            pid(1),
            ClientCommand::PlayHand {
                room_id: rid("a1b2c3"),
                hand: DeclaredHand::Pair { rank: Rank::King },
            },
        )
        .await
        .unwrap();
    registry
        .route(pid(3), ClientCommand::CallBluff { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    settle().await;

    let events = drain(&mut rxs[1]);
    let kinds: Vec<&ServerEvent> = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                ServerEvent::RevealAllCards { .. }
                    | ServerEvent::BluffResult { .. }
            )
        })
        .collect();
    assert_eq!(kinds.len(), 2, "expected reveal then result: {events:?}");
    assert!(matches!(kinds[0], ServerEvent::RevealAllCards { .. }));
    assert!(matches!(kinds[1], ServerEvent::BluffResult { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_round_advances_on_its_own_after_the_delay() {
    let (registry, mut rxs) = three_player_room("a1b2c3").await;
    registry
        .route(pid(1), ClientCommand::StartGame { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    settle().await;

    registry
        .route(
            pid(1),
            ClientCommand::PlayHand {
                room_id: rid("a1b2c3"),
                hand: DeclaredHand::Pair { rank: Rank::King },
            },
        )
        .await
        .unwrap();
    registry
        .route(pid(2), ClientCommand::CallBluff { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    settle().await;
    for rx in &mut rxs {
        drain(rx);
    }

    // Nobody sends startNewRound; the timer does it.
    tokio::time::sleep(ROUND_TRANSITION_DELAY + Duration::from_millis(50))
        .await;
    settle().await;

    let events = drain(&mut rxs[0]);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, ServerEvent::GameStarted { .. })),
        "expected a redeal: {events:?}"
    );
}

#[tokio::test]
async fn test_client_round_transition_preempts_the_timer() {
    let (registry, mut rxs) = three_player_room("a1b2c3").await;
    registry
        .route(pid(1), ClientCommand::StartGame { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    registry
        .route(
            pid(1),
            ClientCommand::PlayHand {
                room_id: rid("a1b2c3"),
                hand: DeclaredHand::Pair { rank: Rank::King },
            },
        )
        .await
        .unwrap();
    registry
        .route(pid(2), ClientCommand::CallBluff { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    settle().await;
    for rx in &mut rxs {
        drain(rx);
    }

    // Two eager clients ask at once; the round advances exactly once.
    registry
        .route(pid(2), ClientCommand::StartNewRound { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    registry
        .route(pid(3), ClientCommand::StartNewRound { room_id: rid("a1b2c3") })
        .await
        .unwrap();
    settle().await;

    let events = drain(&mut rxs[0]);
    let redeals = events
        .iter()
        .filter(|e| matches!(e, ServerEvent::GameStarted { .. }))
        .count();
    assert_eq!(redeals, 1, "duplicate transitions must be no-ops");
}

#[tokio::test]
async fn test_disconnect_broadcasts_player_left() {
    let (mut registry, mut rxs) = three_player_room("a1b2c3").await;
    for rx in &mut rxs {
        drain(rx);
    }

    registry.disconnect(pid(3)).await;
    settle().await;

    // A lobby leaver is dropped from the roster entirely.
    let events = drain(&mut rxs[0]);
    assert!(matches!(
        events.as_slice(),
        [ServerEvent::PlayerLeft { players }]
            if players.len() == 2 && players.iter().all(|p| p.id != pid(3))
    ));
    assert!(registry.room_of(pid(3)).is_none());
}

#[tokio::test]
async fn test_token_is_reusable_after_the_room_dies() {
    let mut registry = RoomRegistry::new();
    registry
        .create(
            rid("a1b2c3"),
            pid(1),
            "ada".into(),
            TableConfig::default(),
            dummy_sender(),
        )
        .unwrap();
    assert_eq!(registry.room_count(), 1);

    // The only player leaves; the actor stops and frees the token.
    registry.disconnect(pid(1)).await;
    settle().await;
    assert_eq!(registry.room_count(), 0);

    registry
        .create(
            rid("a1b2c3"),
            pid(2),
            "bob".into(),
            TableConfig::default(),
            dummy_sender(),
        )
        .unwrap();
}
