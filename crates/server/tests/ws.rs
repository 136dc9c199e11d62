use std::{sync::Arc, time::Duration};

use chrono::Utc;
use futures::{SinkExt, StreamExt};
use sea_orm::Database;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message as WsMessage,
};

use engine::{Engine, Identity, MoneyCents, NewExpense};
use migration::MigratorTrait;
use server::{ExpenseHub, JwtAuth, ServerState};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

const SECRET: &str = "test-secret-test-secret-test-secret";

async fn spawn_server() -> (ServerState, std::net::SocketAddr) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let hub = ExpenseHub::default();
    let engine = Engine::builder()
        .database(db)
        .notifier(Arc::new(hub.clone()))
        .build()
        .unwrap();
    let state = ServerState::new(engine, JwtAuth::new(SECRET, 3600).unwrap(), hub);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(state.clone(), Vec::new(), listener).unwrap();
    (state, addr)
}

async fn token_for(state: &ServerState, email: &str) -> String {
    let user = state
        .engine
        .sign_up("user", email, "pw-123456", Utc::now())
        .await
        .unwrap();
    state.auth.issue(&user, Utc::now()).unwrap()
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let WsMessage::Text(text) = frame {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

fn expense(units: i64) -> NewExpense {
    NewExpense {
        amount: MoneyCents::new(units * 100),
        description: Some("coffee".to_string()),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn socket_receives_only_own_updates() {
    let (state, addr) = spawn_server().await;
    let token = token_for(&state, "ann@example.com").await;
    token_for(&state, "bob@example.com").await;

    let (mut socket, _) = connect_async(format!("ws://{addr}/ws?token={token}"))
        .await
        .unwrap();

    // The session subscribes before upgrading, so pushes from here on arrive.
    let ann = Identity::new("ann@example.com");
    let bob = Identity::new("bob@example.com");
    let now = Utc::now();
    state.engine.upsert_budget(&ann, MoneyCents::new(10_000), now).await.unwrap();
    state.engine.upsert_budget(&bob, MoneyCents::new(10_000), now).await.unwrap();

    state.engine.add_expense(&bob, expense(7)).await.unwrap();
    state.engine.add_expense(&ann, expense(3)).await.unwrap();

    let event = next_json(&mut socket).await;
    assert_eq!(event["event"], "expense_update");
    assert_eq!(event["expenses"].as_array().unwrap().len(), 1);
    assert_eq!(event["expenses"][0]["amount"], 3.0);
}

#[tokio::test]
async fn fetch_expenses_returns_a_snapshot() {
    let (state, addr) = spawn_server().await;
    let token = token_for(&state, "ann@example.com").await;

    let ann = Identity::new("ann@example.com");
    state
        .engine
        .upsert_budget(&ann, MoneyCents::new(10_000), Utc::now())
        .await
        .unwrap();
    state.engine.add_expense(&ann, expense(4)).await.unwrap();

    let (mut socket, _) = connect_async(format!("ws://{addr}/ws?token={token}"))
        .await
        .unwrap();
    socket
        .send(WsMessage::Text(r#"{"event":"fetch_expenses"}"#.to_string()))
        .await
        .unwrap();

    let event = next_json(&mut socket).await;
    assert_eq!(event["event"], "expense_update");
    assert_eq!(event["expenses"][0]["amount"], 4.0);
    assert_eq!(event["expenses"][0]["description"], "coffee");

    socket
        .send(WsMessage::Text("hello".to_string()))
        .await
        .unwrap();
    let event = next_json(&mut socket).await;
    assert_eq!(event["event"], "error");
}

#[tokio::test]
async fn upgrade_without_token_is_refused() {
    let (_state, addr) = spawn_server().await;

    assert!(connect_async(format!("ws://{addr}/ws")).await.is_err());
    assert!(
        connect_async(format!("ws://{addr}/ws?token=garbage"))
            .await
            .is_err()
    );
}
