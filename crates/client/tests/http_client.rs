//! HttpLedgerClient against an in-process ledger service.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use fba_client::{HttpLedgerClient, LedgerApi};
use fba_types::{Direction, NodeId, RemoteError, Secret};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Bodies and query strings the fake service saw.
#[derive(Default)]
struct Captured {
    bodies: Vec<Value>,
    limits: Vec<String>,
}

type Shared = Arc<Mutex<Captured>>;

const NODES_BODY: &str = r#"{"success": true, "data": {
    "nodes": {
        "node_3": {"id": "node_3", "name": "FBA Node 3", "stake": 90},
        "node_1": {"id": "node_1", "name": "FBA Node 1", "stake": 100}
    },
    "quorum_slices": {"node_1": ["node_3"], "node_3": ["node_1"]}
}}"#;

async fn nodes() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], NODES_BODY)
}

async fn pending() -> Json<Value> {
    Json(json!({"success": true, "data": {
        "transactions": [{"hash": "h1", "amount": 5.0}, {"hash": "h2", "amount": 1.0}],
        "count": 2
    }}))
}

async fn balance(Path(address): Path<String>) -> (StatusCode, Json<Value>) {
    if address.starts_with("fba") {
        (
            StatusCode::OK,
            Json(json!({"success": true, "data": {"address": address, "balance": 12.5}})),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Invalid address format"})),
        )
    }
}

async fn history(
    State(captured): State<Shared>,
    Path(address): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    captured
        .lock()
        .unwrap()
        .limits
        .push(query.get("limit").cloned().unwrap_or_default());
    Json(json!({"success": true, "data": {"address": address, "transactions": [{
        "hash": "t1", "from_address": "genesis", "to_address": address,
        "amount": 100.0, "timestamp": 1700000000, "signature": "genesis_signature",
        "nonce": 0, "type": "received"
    }]}}))
}

async fn send(State(captured): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    captured.lock().unwrap().bodies.push(body);
    Json(json!({"success": true, "data": {"transaction_hash": "abc123", "status": "pending"}}))
}

async fn generate() -> Json<Value> {
    Json(json!({"success": true, "data": {
        "seed": "00", "private_key": "s1", "public_key": "p1", "address": "fbaGenerated"
    }}))
}

async fn stats() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/html")],
        "<html>Internal Server Error</html>",
    )
}

async fn spawn_ledger() -> (SocketAddr, Shared) {
    let captured = Shared::default();
    let app = Router::new()
        .route("/api/ledger/nodes", get(nodes))
        .route("/api/ledger/pending", get(pending))
        .route("/api/ledger/stats", get(stats))
        .route("/api/wallet/balance/{address}", get(balance))
        .route("/api/wallet/history/{address}", get(history))
        .route("/api/wallet/send", post(send))
        .route("/api/wallet/generate", post(generate))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, captured)
}

fn client_for(addr: SocketAddr) -> HttpLedgerClient {
    HttpLedgerClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_list_nodes_preserves_delivery_order() {
    let (addr, _) = spawn_ledger().await;
    let client = client_for(addr);

    let directory = client.list_nodes().await.unwrap();

    let ids: Vec<_> = directory.node_ids().map(NodeId::as_str).collect();
    assert_eq!(ids, vec!["node_3", "node_1"]);
    assert_eq!(directory.trust_count(&NodeId::from("node_1")), 1);
}

#[tokio::test]
async fn test_pending_collects_hashes() {
    let (addr, _) = spawn_ledger().await;
    let client = client_for(addr);

    let pending = client.get_pending_transactions().await.unwrap();

    assert_eq!(pending.len(), 2);
    assert!(pending.contains("h1"));
}

#[tokio::test]
async fn test_rejected_envelope_on_error_status() {
    let (addr, _) = spawn_ledger().await;
    let client = client_for(addr);

    assert_eq!(client.get_balance("fbaA").await.unwrap(), 12.5);
    assert_eq!(
        client.get_balance("bogus").await.unwrap_err(),
        RemoteError::Rejected("Invalid address format".to_string())
    );
}

#[tokio::test]
async fn test_history_sends_limit_and_decodes_records() {
    let (addr, captured) = spawn_ledger().await;
    let client = client_for(addr);

    let records = client.get_history("fbaA", 10).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].direction, Direction::Received);
    assert_eq!(records[0].from, "genesis");
    assert_eq!(captured.lock().unwrap().limits, vec!["10".to_string()]);
}

#[tokio::test]
async fn test_send_posts_wire_field_names() {
    let (addr, captured) = spawn_ledger().await;
    let client = client_for(addr);

    let receipt = client
        .send_transaction("fbaA", "fbaB", 5.0, &Secret::new("s1"))
        .await
        .unwrap();

    assert_eq!(receipt.transaction_hash, "abc123");
    assert_eq!(receipt.status.as_deref(), Some("pending"));
    assert_eq!(
        captured.lock().unwrap().bodies,
        vec![json!({
            "from_address": "fbaA",
            "to_address": "fbaB",
            "amount": 5.0,
            "private_key": "s1"
        })]
    );
}

#[tokio::test]
async fn test_generate_maps_private_key_to_secret() {
    let (addr, _) = spawn_ledger().await;
    let client = client_for(addr);

    let identity = client.generate_wallet().await.unwrap();

    assert_eq!(identity.address, "fbaGenerated");
    assert_eq!(identity.secret.expose(), "s1");
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let (addr, _) = spawn_ledger().await;
    let client = client_for(addr);

    let err = client.get_network_stats().await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unknown_route_is_decode_error() {
    let (addr, _) = spawn_ledger().await;
    let client = client_for(addr);

    // axum answers unknown routes with an empty 404
    let err = client.request_faucet("fbaA").await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    let err = client.list_nodes().await.unwrap_err();
    assert!(matches!(err, RemoteError::Transport(_)), "got {:?}", err);
}
