use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::errors::LedgerError;
use crate::infrastructure::store::records::ErrorBody;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

// Newtype wrapper for LedgerError to implement IntoResponse
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let message = self.0.to_string();
        let (status, field, residual) = match self.0 {
            LedgerError::Validation(field, _) => (StatusCode::BAD_REQUEST, Some(field), None),
            LedgerError::UserNotFound(_) => (StatusCode::NOT_FOUND, None, None),
            LedgerError::AlreadyRegistered(_) => (StatusCode::CONFLICT, None, None),
            LedgerError::InconsistentLedger { residual } => {
                tracing::error!(%residual, "refusing to settle an inconsistent ledger");
                (StatusCode::UNPROCESSABLE_ENTITY, None, Some(residual))
            }
            LedgerError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, None, None),
            LedgerError::LoggingError(_) => (StatusCode::INTERNAL_SERVER_ERROR, None, None),
        };
        (
            status,
            Json(ErrorBody {
                error: message,
                field,
                residual,
            }),
        )
            .into_response()
    }
}
