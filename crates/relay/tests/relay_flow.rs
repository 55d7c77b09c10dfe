use engine::Color;
use engine::protocol::{ClientMessage, ServerMessage, WireMove};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect to relay");
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send(&mut self, msg: &ClientMessage) {
        let line = msg.to_line().unwrap();
        self.send_raw(&line).await;
    }

    async fn send_raw(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn recv(&mut self) -> ServerMessage {
        let line = timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("relay answered in time")
            .unwrap()
            .expect("connection still open");
        ServerMessage::from_line(&line).unwrap()
    }
}

async fn start_relay() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        relay::serve(listener).await.unwrap();
    });
    addr
}

/// Pairs two fresh clients and returns them as (white, black, room id).
async fn paired(addr: SocketAddr) -> (TestClient, TestClient, String) {
    let mut first = TestClient::connect(addr).await;
    first.send(&ClientMessage::JoinRequest).await;
    assert_eq!(first.recv().await, ServerMessage::Waiting);

    let mut second = TestClient::connect(addr).await;
    second.send(&ClientMessage::JoinRequest).await;

    let ServerMessage::GameStart { color, room_id, .. } = first.recv().await else {
        panic!("first client expected game-start");
    };
    assert_eq!(color, Color::White);

    let ServerMessage::GameStart {
        color,
        room_id: second_room,
        ..
    } = second.recv().await
    else {
        panic!("second client expected game-start");
    };
    assert_eq!(color, Color::Black);
    assert_eq!(second_room, room_id);

    (first, second, room_id)
}

#[tokio::test]
async fn pairs_clients_and_forwards_moves_verbatim() {
    let addr = start_relay().await;
    let (mut white, mut black, room_id) = paired(addr).await;

    // Extra fields survive the trip untouched.
    let payload = json!({"fromRow": 6, "fromCol": 1, "toRow": 5, "toCol": 2, "type": "move"});
    white
        .send(&ClientMessage::MoveMade {
            room_id: room_id.clone(),
            payload: payload.clone(),
        })
        .await;

    let ServerMessage::OpponentMove { payload: received } = black.recv().await else {
        panic!("black expected opponent-move");
    };
    assert_eq!(received, payload);
    let wire = WireMove::from_payload(&received).unwrap();
    assert_eq!((wire.to_row, wire.to_col), (5, 2));

    black
        .send(&ClientMessage::MoveMade {
            room_id,
            payload: json!({"fromRow": 1, "fromCol": 0, "toRow": 2, "toCol": 1}),
        })
        .await;
    assert!(matches!(white.recv().await, ServerMessage::OpponentMove { .. }));
}

#[tokio::test]
async fn malformed_lines_do_not_drop_the_connection() {
    let addr = start_relay().await;
    let mut client = TestClient::connect(addr).await;

    client.send_raw("not json").await;
    client.send_raw(r#"{"event":"dance"}"#).await;
    client.send(&ClientMessage::JoinRequest).await;

    assert_eq!(client.recv().await, ServerMessage::Waiting);
}

#[tokio::test]
async fn remaining_player_is_told_when_the_opponent_leaves() {
    let addr = start_relay().await;
    let (white, mut black, _room_id) = paired(addr).await;

    drop(white);

    assert_eq!(black.recv().await, ServerMessage::OpponentLeft);
}

#[tokio::test]
async fn waiting_player_disconnect_frees_the_slot() {
    let addr = start_relay().await;

    let mut quitter = TestClient::connect(addr).await;
    quitter.send(&ClientMessage::JoinRequest).await;
    assert_eq!(quitter.recv().await, ServerMessage::Waiting);
    drop(quitter);

    // Give the relay a moment to notice the disconnect.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut next = TestClient::connect(addr).await;
    next.send(&ClientMessage::JoinRequest).await;
    assert_eq!(next.recv().await, ServerMessage::Waiting);
}

#[tokio::test]
async fn seated_player_cannot_join_a_second_room() {
    let addr = start_relay().await;
    let (mut white, black, _room_id) = paired(addr).await;

    white.send(&ClientMessage::JoinRequest).await;

    // The newcomer waits instead of being paired with the seated player.
    let mut newcomer = TestClient::connect(addr).await;
    newcomer.send(&ClientMessage::JoinRequest).await;
    assert_eq!(newcomer.recv().await, ServerMessage::Waiting);

    drop(black);
    assert_eq!(white.recv().await, ServerMessage::OpponentLeft);
}
