//! Tests for frame decoding, dispatch and the JSON wire shape.

use serde_json::{Value, json};
use velha_server::handler::handle_frame;
use velha_server::{ClientEvent, ErrorCode, Outbox, Registry, RoomId, ServerEvent};
use velha_tictactoe::{Symbol, Winner};

fn drain_json(outbox: &mut Outbox) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(event) = outbox.try_recv() {
        frames.push(serde_json::to_value(&event).unwrap());
    }
    frames
}

#[test]
fn test_client_frames_decode() {
    let event: ClientEvent = serde_json::from_value(json!({
        "event": "makeMove",
        "data": { "roomId": "room_3", "index": 4, "symbol": "X" }
    }))
    .unwrap();
    assert_eq!(
        event,
        ClientEvent::MakeMove {
            room_id: RoomId::from("room_3"),
            index: 4,
            symbol: Symbol::X
        }
    );

    let event: ClientEvent = serde_json::from_value(json!({
        "event": "checkWinner",
        "data": { "roomId": "room_3", "winner": "draw" }
    }))
    .unwrap();
    assert_eq!(
        event,
        ClientEvent::CheckWinner {
            room_id: RoomId::from("room_3"),
            winner: Winner::Draw
        }
    );

    let event: ClientEvent = serde_json::from_value(json!({ "event": "stats" })).unwrap();
    assert_eq!(event, ClientEvent::Stats);
}

#[test]
fn test_server_events_encode() {
    assert_eq!(
        serde_json::to_value(ServerEvent::Waiting).unwrap(),
        json!({ "event": "waiting" })
    );
    assert_eq!(
        serde_json::to_value(ServerEvent::Error {
            code: ErrorCode::RoomNotFound,
            message: "gone".to_string()
        })
        .unwrap(),
        json!({ "event": "error", "data": { "code": "roomNotFound", "message": "gone" } })
    );
}

#[test]
fn test_malformed_frame_answered_with_invalid_request() {
    let registry = Registry::new();
    let (id, mut outbox) = registry.connect();

    handle_frame(&registry, id, "{not json");
    handle_frame(&registry, id, r#"{"event":"teleport","data":{}}"#);
    handle_frame(&registry, id, r#"{"event":"makeMove","data":{"roomId":"room_1"}}"#);

    let frames = drain_json(&mut outbox);
    assert_eq!(frames.len(), 3);
    for frame in frames {
        assert_eq!(frame["event"], "error");
        assert_eq!(frame["data"]["code"], "invalidRequest");
    }
}

#[test]
fn test_full_exchange_over_frames() {
    let registry = Registry::new();
    let (a, mut a_box) = registry.connect();
    let (b, mut b_box) = registry.connect();

    handle_frame(&registry, a, r#"{"event":"findMatch","data":{"displayName":"Ana"}}"#);
    handle_frame(&registry, b, r#"{"event":"findMatch","data":{"displayName":"Bia"}}"#);

    let a_frames = drain_json(&mut a_box);
    assert_eq!(a_frames[0], json!({ "event": "waiting" }));
    assert_eq!(a_frames[1]["event"], "matchFound");
    assert_eq!(a_frames[1]["data"]["roomId"], "room_1");
    assert_eq!(a_frames[1]["data"]["assignedSymbol"], "X");
    assert_eq!(a_frames[1]["data"]["opponentName"], "Bia");
    assert_eq!(a_frames[1]["data"]["state"]["currentTurn"], "X");
    assert_eq!(a_frames[1]["data"]["state"]["board"], Value::Array(vec![Value::Null; 9]));

    let b_frames = drain_json(&mut b_box);
    assert_eq!(b_frames[0]["data"]["assignedSymbol"], "O");

    handle_frame(
        &registry,
        a,
        r#"{"event":"makeMove","data":{"roomId":"room_1","index":4,"symbol":"X"}}"#,
    );
    let b_frames = drain_json(&mut b_box);
    assert_eq!(b_frames[0]["event"], "moveMade");
    assert_eq!(b_frames[0]["data"]["index"], 4);
    assert_eq!(b_frames[0]["data"]["state"]["board"][4], "X");
    assert_eq!(b_frames[0]["data"]["state"]["currentTurn"], "O");

    // Out of turn: only the sender hears about it.
    handle_frame(
        &registry,
        a,
        r#"{"event":"makeMove","data":{"roomId":"room_1","index":0,"symbol":"X"}}"#,
    );
    let a_frames = drain_json(&mut a_box);
    assert_eq!(a_frames.last().unwrap()["data"]["code"], "illegalMove");
    assert!(drain_json(&mut b_box).is_empty());

    handle_frame(
        &registry,
        b,
        r#"{"event":"chatMessage","data":{"roomId":"room_1","text":"oi","displayName":"Bia"}}"#,
    );
    let a_frames = drain_json(&mut a_box);
    assert_eq!(
        a_frames[0],
        json!({
            "event": "chatMessage",
            "data": { "text": "oi", "displayName": "Bia", "senderId": b.0 }
        })
    );

    handle_frame(&registry, b, r#"{"event":"stats"}"#);
    let b_frames = drain_json(&mut b_box);
    assert_eq!(
        b_frames.last().unwrap(),
        &json!({
            "event": "stats",
            "data": { "activeRooms": 1, "waitingPlayers": 0, "totalPlayers": 2 }
        })
    );
}

#[test]
fn test_game_ended_frame_carries_line() {
    let registry = Registry::new();
    let (a, mut a_box) = registry.connect();
    let (b, _b_box) = registry.connect();
    handle_frame(&registry, a, r#"{"event":"findMatch","data":{"displayName":"A"}}"#);
    handle_frame(&registry, b, r#"{"event":"findMatch","data":{"displayName":"B"}}"#);

    for (sender, index, symbol) in [(a, 0, "X"), (b, 4, "O"), (a, 1, "X"), (b, 8, "O"), (a, 2, "X")] {
        let frame = json!({
            "event": "makeMove",
            "data": { "roomId": "room_1", "index": index, "symbol": symbol }
        });
        handle_frame(&registry, sender, &frame.to_string());
    }

    let frames = drain_json(&mut a_box);
    assert_eq!(
        frames.last().unwrap(),
        &json!({ "event": "gameEnded", "data": { "winner": "X", "line": [0, 1, 2] } })
    );
    assert_eq!(frames[frames.len() - 2]["data"]["state"]["active"], false);
    assert_eq!(
        frames[frames.len() - 2]["data"]["state"]["outcome"]["kind"],
        "win"
    );
}
