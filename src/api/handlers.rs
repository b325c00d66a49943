use crate::{
    api::{
        StoreState,
        models::{ApiError, HealthResponse},
    },
    core::{
        errors::LedgerError,
        models::{ExpenseDraft, Settlement},
    },
    infrastructure::store::{
        LedgerStore,
        records::{ErrorBody, ExpenseRecord, NewExpenseRecord, NewUserRecord, UserRecord},
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::info;

pub fn api_routes(state: StoreState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{auth_id}", get(get_user_by_auth_id))
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route("/api/settlements", get(list_settlements))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Store is up", body = HealthResponse))
)]
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All registered users", body = Vec<UserRecord>),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    )
)]
pub(crate) async fn list_users(State(repository): State<StoreState>) -> Result<Json<Vec<UserRecord>>, ApiError> {
    Ok(Json(repository.store().fetch_users().await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{auth_id}",
    params(
        ("auth_id" = String, Path, description = "Identity provider id of the user")
    ),
    responses(
        (status = 200, description = "User registered under this auth id", body = UserRecord),
        (status = 404, description = "No user for this auth id", body = ErrorBody)
    )
)]
pub(crate) async fn get_user_by_auth_id(
    State(repository): State<StoreState>,
    Path(auth_id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    let user = repository
        .store()
        .find_user_by_auth_id(&auth_id)
        .await?
        .ok_or(LedgerError::UserNotFound(auth_id))?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUserRecord,
    responses(
        (status = 201, description = "User created", body = UserRecord),
        (status = 400, description = "Bad request", body = ErrorBody),
        (status = 409, description = "Auth id already registered", body = ErrorBody)
    )
)]
pub(crate) async fn create_user(
    State(repository): State<StoreState>,
    Json(req): Json<NewUserRecord>,
) -> Result<(StatusCode, Json<UserRecord>), ApiError> {
    if req.auth_id.trim().is_empty() {
        return Err(LedgerError::validation("authId", "Invalid authId", "authId cannot be empty").into());
    }
    if req.name.trim().is_empty() {
        return Err(LedgerError::validation("name", "Invalid name", "name cannot be empty").into());
    }

    let user = repository
        .store()
        .create_user(NewUserRecord {
            auth_id: req.auth_id.trim().to_string(),
            name: req.name.trim().to_string(),
        })
        .await?;
    info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/expenses",
    responses(
        (status = 200, description = "All expenses, unordered", body = Vec<ExpenseRecord>),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    )
)]
pub(crate) async fn list_expenses(State(repository): State<StoreState>) -> Result<Json<Vec<ExpenseRecord>>, ApiError> {
    Ok(Json(repository.store().fetch_expenses().await?))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = NewExpenseRecord,
    responses(
        (status = 201, description = "Expense created", body = ExpenseRecord),
        (status = 400, description = "Bad request", body = ErrorBody)
    )
)]
pub(crate) async fn create_expense(
    State(repository): State<StoreState>,
    Json(req): Json<NewExpenseRecord>,
) -> Result<(StatusCode, Json<ExpenseRecord>), ApiError> {
    let expense = repository
        .record_expense(ExpenseDraft {
            title: req.title,
            amount: req.amount.to_string(),
            description: req.description,
            paid_by: req.paid_by,
            shared_with: req.shared_with,
            share_with_everyone: false,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseRecord {
            id: expense.id,
            title: expense.title,
            amount: expense.amount,
            description: expense.description,
            paid_by: expense.paid_by,
            shared_with: expense.shared_with,
            created_at: expense.created_at,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/settlements",
    responses(
        (status = 200, description = "Transfers that zero every balance", body = Vec<Settlement>),
        (status = 422, description = "Balances do not sum to zero", body = ErrorBody)
    )
)]
pub(crate) async fn list_settlements(State(repository): State<StoreState>) -> Result<Json<Vec<Settlement>>, ApiError> {
    Ok(Json(repository.store().fetch_settlements().await?))
}
