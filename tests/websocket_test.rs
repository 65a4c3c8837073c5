// Integration tests for the live WebSocket feed over a real TCP listener.
//
// The server is bound to 127.0.0.1:0 and driven by calling tick() directly,
// so no test waits on the broadcast timer.

use futures::{SinkExt, StreamExt};
use riverwatch::{
    api::create_app,
    broadcast::BroadcastService,
    config::{BroadcastConfig, SeedConfig},
    state::{ScriptedJitter, Snapshot, SnapshotStore},
    subscription::LiveDataMessage,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

fn make_service() -> Arc<BroadcastService> {
    let seed = SeedConfig::default();
    let store = SnapshotStore::new(seed.snapshot(), Box::new(ScriptedJitter::new(vec![1.0])));
    Arc::new(BroadcastService::new(store, 16))
}

async fn spawn_server(service: &Arc<BroadcastService>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_app(Arc::clone(service), &BroadcastConfig::default());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{}/api/ws", addr))
        .await
        .unwrap();
    client
}

/// Next text frame as JSON, skipping control frames
async fn next_json(client: &mut Client) -> Value {
    tokio::time::timeout(FRAME_TIMEOUT, async {
        loop {
            match client.next().await.unwrap().unwrap() {
                Message::Text(text) => return serde_json::from_str(&text).unwrap(),
                _ => continue,
            }
        }
    })
    .await
    .unwrap()
}

fn live_data(snapshot: &Snapshot) -> Value {
    serde_json::to_value(LiveDataMessage::from(snapshot)).unwrap()
}

async fn wait_for_subscribers(service: &BroadcastService, expected: usize) {
    tokio::time::timeout(FRAME_TIMEOUT, async {
        while service.subscriber_count() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_connect_then_tick_then_close() {
    let service = make_service();
    let addr = spawn_server(&service).await;
    let mut client = connect(addr).await;

    // First frame is the current snapshot
    let first = next_json(&mut client).await;
    assert_eq!(first["type"], "liveData");
    assert_eq!(first, live_data(&service.current()));
    assert_eq!(service.subscriber_count(), 1);

    // Each tick produces one more frame
    let report = service.tick();
    assert_eq!(report.delivered, 1);
    let second = next_json(&mut client).await;
    assert_eq!(second, live_data(&report.snapshot));
    assert_eq!(second["rivers"][0]["risk"], 66);

    // Closing the client deregisters the subscriber
    client.close(None).await.unwrap();
    wait_for_subscribers(&service, 0).await;
}

#[tokio::test]
async fn test_late_joiner_gets_latest_snapshot() {
    let service = make_service();
    let addr = spawn_server(&service).await;
    service.tick();
    service.tick();

    let mut client = connect(addr).await;

    let first = next_json(&mut client).await;
    assert_eq!(first, live_data(&service.current()));
    assert_eq!(first["zones"][0]["severity"], 80);
}

#[tokio::test]
async fn test_tick_reaches_every_viewer() {
    let service = make_service();
    let addr = spawn_server(&service).await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    next_json(&mut a).await;
    next_json(&mut b).await;
    wait_for_subscribers(&service, 2).await;

    let report = service.tick();

    assert_eq!(report.delivered, 2);
    let expected = live_data(&report.snapshot);
    assert_eq!(next_json(&mut a).await, expected);
    assert_eq!(next_json(&mut b).await, expected);
}

#[tokio::test]
async fn test_dropped_viewer_does_not_affect_others() {
    let service = make_service();
    let addr = spawn_server(&service).await;
    let gone = connect(addr).await;
    let mut stays = connect(addr).await;
    next_json(&mut stays).await;
    wait_for_subscribers(&service, 2).await;

    // Abrupt disconnect without a close frame
    drop(gone);
    wait_for_subscribers(&service, 1).await;

    let report = service.tick();
    assert_eq!(report.delivered, 1);
    assert_eq!(next_json(&mut stays).await, live_data(&report.snapshot));
}

#[tokio::test]
async fn test_ping_answered_and_client_text_ignored() {
    let service = make_service();
    let addr = spawn_server(&service).await;
    let mut client = connect(addr).await;
    next_json(&mut client).await;

    client.send(Message::Text("hello".to_string())).await.unwrap();
    client.send(Message::Ping(b"are-you-there".to_vec())).await.unwrap();

    let pong = tokio::time::timeout(FRAME_TIMEOUT, async {
        loop {
            if let Message::Pong(data) = client.next().await.unwrap().unwrap() {
                return data;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(pong, b"are-you-there".to_vec());

    // Still subscribed after the client chatter
    assert_eq!(service.subscriber_count(), 1);
    let report = service.tick();
    assert_eq!(next_json(&mut client).await, live_data(&report.snapshot));
}
