use crate::api::models::ApiError;
use crate::config::Config;
use crate::core::errors::LedgerError;
use crate::core::models::{ExpenseDraft, Registration};
use crate::core::services::LedgerClient;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::store::LedgerStore;
use crate::infrastructure::store::http::HttpLedgerStore;
use crate::infrastructure::store::records::{NewExpenseRecord, NewUserRecord};
use crate::tests::spawn_store;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

fn http_store(base_url: &str) -> HttpLedgerStore {
    HttpLedgerStore::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_register_over_http_is_idempotent() {
    let base_url = spawn_store().await;
    let client = LedgerClient::new(http_store(&base_url), InMemoryLogging::new());

    let first = client.resolve_or_register_user("user_2abc", "Alice").await.unwrap();
    let second = client.resolve_or_register_user("user_2abc", "Alice B.").await.unwrap();
    assert!(matches!(first, Registration::Created(_)));
    assert!(matches!(second, Registration::Found(_)));
    assert_eq!(first.user(), second.user());
    assert_eq!(client.known_users().await.len(), 1);
}

#[tokio::test]
async fn test_store_rejects_duplicate_auth_id() {
    let base_url = spawn_store().await;
    let store = http_store(&base_url);

    let new_user = NewUserRecord {
        auth_id: "user_2abc".to_string(),
        name: "Alice".to_string(),
    };
    store.create_user(new_user.clone()).await.unwrap();
    let err = store.create_user(new_user).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyRegistered(id) if id == "user_2abc"));

    assert!(store.find_user_by_auth_id("user_missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_expenses_and_settlements_over_http() {
    let base_url = spawn_store().await;
    let client = LedgerClient::new(http_store(&base_url), InMemoryLogging::new());
    let a = client.resolve_or_register_user("auth_a", "A").await.unwrap().into_user();
    let b = client.resolve_or_register_user("auth_b", "B").await.unwrap().into_user();
    let c = client.resolve_or_register_user("auth_c", "C").await.unwrap().into_user();

    let expense = client
        .add_expense(
            &a,
            ExpenseDraft {
                title: "Dinner".to_string(),
                amount: "100".to_string(),
                description: Some("Friday".to_string()),
                paid_by: a.id.clone(),
                shared_with: vec![a.id.clone(), b.id.clone(), c.id.clone()],
                share_with_everyone: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(expense.amount, dec!(100));
    assert_eq!(expense.description.as_deref(), Some("Friday"));

    let snapshot = client.refresh().await.unwrap();
    assert_eq!(snapshot.expenses.len(), 1);
    assert_eq!(snapshot.expenses[0].id, expense.id);

    let summary = client.get_summary(&c.id).await.unwrap();
    assert_eq!(summary.current_user_share, dec!(33.33));
    assert_eq!(summary.current_user_balance, dec!(-33.33));

    let local = client.get_settlements().await.unwrap();
    let remote = client.get_store_settlements().await.unwrap();
    assert_eq!(local.len(), 2);
    assert_eq!(local, remote);
    assert!(local.iter().all(|s| s.to == a.id && s.amount == dec!(33.33)));
}

#[tokio::test]
async fn test_store_side_validation_maps_to_validation_error() {
    let base_url = spawn_store().await;
    let store = http_store(&base_url);
    let alice = store
        .create_user(NewUserRecord {
            auth_id: "auth_a".to_string(),
            name: "Alice".to_string(),
        })
        .await
        .unwrap();

    let err = store
        .create_expense(NewExpenseRecord {
            title: "Taxi".to_string(),
            amount: dec!(12),
            description: None,
            paid_by: alice.id.clone(),
            shared_with: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(field, _) if field == "sharedWith"));
    assert!(store.fetch_expenses().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_store_is_unavailable() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = LedgerClient::new(http_store(&format!("http://{}", addr)), InMemoryLogging::new());
    assert!(client.refresh().await.unwrap_err().is_unavailable());
    assert!(client.known_users().await.is_empty());
}

#[tokio::test]
async fn test_slow_store_times_out() {
    // Accepts connections and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let store = HttpLedgerStore::new(format!("http://{}/", addr), Duration::from_millis(200)).unwrap();
    let err = store.fetch_users().await.unwrap_err();
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn test_health_endpoint() {
    let base_url = spawn_store().await;
    let body: serde_json::Value = reqwest::get(format!("{}/health", base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[test]
fn test_store_from_config() {
    let config = Config {
        ledger_store_url: "http://ledger.internal:8080/".to_string(),
        ..Config::default()
    };
    assert_eq!(config.request_timeout(), Duration::from_secs(10));

    let store = HttpLedgerStore::from_config(&config).unwrap();
    assert_eq!(store.base_url(), "http://ledger.internal:8080");
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_inconsistent_store_ledger_is_not_unavailable() {
    let router = Router::new().route(
        "/api/settlements",
        get(|| async { ApiError(LedgerError::InconsistentLedger { residual: dec!(5) }) }),
    );
    let client = LedgerClient::new(http_store(&serve(router).await), InMemoryLogging::new());

    let err = client.get_store_settlements().await.unwrap_err();
    assert!(matches!(err, LedgerError::InconsistentLedger { residual } if residual == dec!(5)));
}

#[tokio::test]
async fn test_inconsistent_ledger_without_residual() {
    let router = Router::new().route(
        "/api/settlements",
        get(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                axum::Json(serde_json::json!({ "error": "Inconsistent ledger" })),
            )
        }),
    );
    let store = http_store(&serve(router).await);

    let err = store.fetch_settlements().await.unwrap_err();
    assert!(matches!(err, LedgerError::InconsistentLedger { residual } if residual == Decimal::ZERO));
    assert!(!err.is_unavailable());
}
