//! Explorer HTTP Tests - HttpExplorer against an in-process fake explorer
//!
//! These tests verify:
//! 1. Each endpoint is called with the documented URL shape
//! 2. Feed payloads decode into the wire records
//! 3. HTTP and payload failures map onto FetchError variants
//! 4. A controller wired to HttpExplorer applies the right failure policies

#![cfg(feature = "native")]

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use walletdash::explorer::ChainSource;
use walletdash::{FetchError, HttpExplorer, WalletConfig, WalletController};

const GOOD_KEY: &str = "0000000000000000000000000000000000000000000000000000000000000001";
const GOOD: &str = "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm";
const BROKEN_KEY: &str = "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn";
const BROKEN: &str = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";

#[derive(Deserialize)]
struct UnspentQuery { active: String }

async fn balance(Path(address): Path<String>) -> impl IntoResponse {
    match address.as_str() {
        GOOD => (StatusCode::OK, "250000000\n".to_string()),
        BROKEN => (StatusCode::OK, "Checksum does not validate".to_string()),
        _ => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn unspent(Query(q): Query<UnspentQuery>) -> impl IntoResponse {
    match q.active.as_str() {
        GOOD => (
            StatusCode::OK,
            Json(json!({
                "notice": "",
                "unspent_outputs": [
                    {"tx_hash": "11", "tx_hash_big_endian": "aa", "tx_output_n": 0, "value": 200000000, "confirmations": 12},
                    {"tx_hash": "22", "tx_hash_big_endian": "bb", "tx_output_n": 3, "value": 50000000, "confirmations": 0}
                ]
            })),
        )
            .into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "No free outputs to spend").into_response(),
    }
}

async fn account(Path(address): Path<String>) -> impl IntoResponse {
    match address.as_str() {
        GOOD => Json(json!({
            "address": GOOD,
            "balance": 250000000,
            "txrefs": [
                {"tx_hash": "t-new", "tx_input_n": -1, "tx_output_n": 0, "value": 200000000,
                 "confirmations": 12, "confirmed": "2024-02-01T08:30:00Z"},
                {"tx_hash": "t-old", "tx_input_n": 0, "tx_output_n": -1, "value": 10000000,
                 "confirmations": 40, "confirmed": "2023-12-24T18:00:00Z"}
            ],
            "unconfirmed_txrefs": [
                {"tx_hash": "p-1", "value": 50000000, "fees": 7.5}
            ]
        }))
        .into_response(),
        _ => (StatusCode::OK, "{\"txrefs\": [").into_response(),
    }
}

async fn spawn_fake_explorer() -> anyhow::Result<String> {
    let router = Router::new()
        .route("/q/addressbalance/:address", get(balance))
        .route("/unspent", get(unspent))
        .route("/v1/btc/main/addrs/:address", get(account));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{}", addr))
}

async fn explorer() -> HttpExplorer {
    let base = spawn_fake_explorer().await.expect("fake explorer");
    let config = WalletConfig::new().with_base_url(base).with_timeout(Duration::from_secs(5));
    HttpExplorer::new(config).expect("client")
}

#[test]
fn balance_parses_plain_integer() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    rt.block_on(async {
        let explorer = explorer().await;
        assert_eq!(explorer.balance(GOOD).await, Ok(250_000_000));
        assert!(matches!(explorer.balance(BROKEN).await, Err(FetchError::Decode(_))));
        assert_eq!(explorer.balance("1unknown").await, Err(FetchError::Status(404)));
    });
}

#[test]
fn unspent_uses_active_query() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    rt.block_on(async {
        let explorer = explorer().await;
        let utxos = explorer.unspent(GOOD).await.expect("utxos");
        assert_eq!(utxos.len(), 2);
        assert_eq!(utxos[1].hash, "bb");
        assert_eq!(utxos[1].output_index, 3);
        assert_eq!(explorer.unspent(BROKEN).await, Err(FetchError::Status(500)));
    });
}

#[test]
fn account_decodes_both_reference_lists() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    rt.block_on(async {
        let explorer = explorer().await;
        let account = explorer.account(GOOD).await.expect("account");
        assert_eq!(account.txrefs.len(), 2);
        assert_eq!(account.txrefs[1].tx_input_n, Some(0));
        assert_eq!(account.unconfirmed_txrefs[0].fees, Some(7.5));
        assert!(matches!(explorer.account(BROKEN).await, Err(FetchError::Decode(_))));
    });
}

#[test]
fn unreachable_explorer_is_transport_error() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    rt.block_on(async {
        let config = WalletConfig::new()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let explorer = HttpExplorer::new(config).expect("client");
        assert!(matches!(explorer.balance(GOOD).await, Err(FetchError::Transport(_))));
    });
}

#[test]
fn controller_over_http() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    rt.block_on(async {
        let base = spawn_fake_explorer().await.expect("fake explorer");
        let ctl = WalletController::from_config(WalletConfig::new().with_base_url(base)).expect("controller");

        ctl.recover(GOOD_KEY).await.expect("recover");
        let snap = ctl.snapshot();
        assert_eq!(snap.balance.get("BTC"), Some(&2.5));
        assert_eq!(snap.utxos.len(), 2);
        // feed order is kept, newest first here
        let txids: Vec<_> = snap.history.iter().map(|h| h.txid.as_str()).collect();
        assert_eq!(txids, vec!["t-new", "t-old"]);
        assert_eq!(snap.pending.as_ref().map(|p| p.fee_rate), Some(7.5));

        ctl.recover(BROKEN_KEY).await.expect("recover");
        let snap = ctl.snapshot();
        assert_eq!(snap.identity.map(|i| i.address), Some(BROKEN.to_string()));
        assert!(snap.balance.is_empty());
        assert!(snap.utxos.is_empty());
        assert!(snap.history.is_empty());
        assert!(snap.pending.is_none());
    });
}
