//! Ledger store reached over HTTP.
//!
//! Every request is bounded by the client timeout. Transport failures,
//! timeouts, unexpected statuses and undecodable bodies all surface as
//! `LedgerError::Unavailable`; the only statuses with their own meaning are
//! 404 on a user lookup, 409 on registration, 400 on writes and 422 on
//! settlements.

use crate::config::Config;
use crate::core::errors::LedgerError;
use crate::core::models::Settlement;
use crate::infrastructure::store::LedgerStore;
use crate::infrastructure::store::records::{ErrorBody, ExpenseRecord, NewExpenseRecord, NewUserRecord, UserRecord};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpLedgerStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLedgerStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Unavailable(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LedgerError> {
        Self::new(config.ledger_store_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LedgerError> {
        let response = self.http.get(self.url(path)).send().await.map_err(transport_error)?;
        check_response_json(response).await
    }
}

#[async_trait]
impl LedgerStore for HttpLedgerStore {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, LedgerError> {
        self.get_json("/api/users").await
    }

    async fn find_user_by_auth_id(&self, auth_id: &str) -> Result<Option<UserRecord>, LedgerError> {
        let url = self.url(&format!("/api/users/{}", urlencoding::encode(auth_id)));
        let response = self.http.get(url).send().await.map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_response_json(response).await.map(Some)
    }

    async fn create_user(&self, user: NewUserRecord) -> Result<UserRecord, LedgerError> {
        let response = self
            .http
            .post(self.url("/api/users"))
            .json(&user)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::CONFLICT {
            return Err(LedgerError::AlreadyRegistered(user.auth_id));
        }
        check_response_json(response).await
    }

    async fn fetch_expenses(&self) -> Result<Vec<ExpenseRecord>, LedgerError> {
        self.get_json("/api/expenses").await
    }

    async fn create_expense(&self, expense: NewExpenseRecord) -> Result<ExpenseRecord, LedgerError> {
        let response = self
            .http
            .post(self.url("/api/expenses"))
            .json(&expense)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::BAD_REQUEST {
            let body: ErrorBody = response
                .json()
                .await
                .map_err(|e| LedgerError::Unavailable(format!("JSON parse error: {}", e)))?;
            let field_error = body.into_field_error();
            return Err(LedgerError::Validation(field_error.field.clone(), field_error));
        }
        check_response_json(response).await
    }

    async fn fetch_settlements(&self) -> Result<Vec<Settlement>, LedgerError> {
        let response = self
            .http
            .get(self.url("/api/settlements"))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let body: ErrorBody = response
                .json()
                .await
                .map_err(|e| LedgerError::Unavailable(format!("JSON parse error: {}", e)))?;
            return Err(body.into_inconsistent_ledger());
        }
        check_response_json(response).await
    }
}

fn transport_error(e: reqwest::Error) -> LedgerError {
    if e.is_timeout() {
        tracing::warn!(error = %e, "ledger store request timed out");
        LedgerError::Unavailable(format!("request timed out: {}", e))
    } else {
        LedgerError::Unavailable(e.to_string())
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LedgerError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(LedgerError::Unavailable(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| LedgerError::Unavailable(format!("JSON parse error: {}", e)))
}
