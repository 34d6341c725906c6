use poker_room::{ClientAction, Room, RoomConfig, RoomError};
use texas_engine::{ActionInput, Stage};

fn two_player_room() -> Room {
    let mut r = Room::new("t1", RoomConfig::default());
    r.join("u1", "Alice", 1000).unwrap();
    r.join("u2", "Bob", 1000).unwrap();
    r.set_ready("u1", true).unwrap();
    r.set_ready("u2", true).unwrap();
    r
}

#[test]
fn default_config_matches_documented_defaults() {
    let cfg = RoomConfig::default();
    assert_eq!(cfg.small_blind, 5);
    assert_eq!(cfg.big_blind, 10);
    assert_eq!(cfg.starting_buyin, 1000);
    assert_eq!(cfg.max_seats, 9);
}

#[test]
fn start_hand_and_blinds() {
    let mut r = two_player_room();
    r.start_hand().unwrap();
    assert_eq!(r.table().pot(), 15);
}

#[test]
fn actions_flow_to_next_street() {
    let mut r = two_player_room();
    r.start_hand().unwrap();
    // heads-up: dealer/SB acts first preflop.
    let sb = if r.table().action_seat == Some(1) { "u1" } else { "u2" };
    let bb = if sb == "u1" { "u2" } else { "u1" };
    r.apply_action(sb, ActionInput::Call).unwrap();
    r.apply_action(bb, ActionInput::Check).unwrap();
    assert_eq!(r.table().stage, Stage::Flop);
}

#[test]
fn fold_ends_hand_and_clears_pot() {
    let mut r = two_player_room();
    r.start_hand().unwrap();
    let sb = if r.table().action_seat == Some(1) { "u1" } else { "u2" };
    r.apply_action(sb, ActionInput::Fold).unwrap();
    assert_eq!(r.table().stage, Stage::Waiting);
    assert_eq!(r.table().pot(), 0);
    assert!(r.table().players().all(|(_, p)| !p.ready));
}

#[test]
fn two_rooms_are_fully_independent() {
    let mut a = Room::new("room-a", RoomConfig::default());
    let mut b = Room::new("room-b", RoomConfig::default());
    a.join("x", "X", 1000).unwrap();
    assert!(b.table().player(1).is_none());
}

#[test]
fn room_full_rejects_tenth_player() {
    let mut r = Room::new("t1", RoomConfig::default());
    for i in 1..=9 {
        r.join(&format!("p{i}"), "p", 1000).unwrap();
    }
    assert_eq!(r.join("p10", "p", 1000).unwrap_err(), RoomError::RoomFull);
}

#[test]
fn client_action_round_trips_through_json() {
    let json = r#"{"type":"action","room_id":"t1","sid":"u1","action":"raise","amount":40}"#;
    let parsed: ClientAction = serde_json::from_str(json).unwrap();
    match parsed {
        ClientAction::Action { room_id, sid, action, amount } => {
            assert_eq!(room_id, "t1");
            assert_eq!(sid, "u1");
            assert_eq!(action, "raise");
            assert_eq!(amount, Some(40));
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn public_state_serializes_buyin_and_net() {
    let mut r = two_player_room();
    r.start_hand().unwrap();
    let public = r.public_state();
    let json = serde_json::to_string(&public).unwrap();
    assert!(json.contains("\"buyin_total\""));
    assert!(json.contains("\"net\""));
}
