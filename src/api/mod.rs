pub mod handlers;
pub mod models;
pub mod openapi;

use crate::core::repository::ExpenseRepository;
use crate::infrastructure::store::in_memory::InMemoryLedgerStore;
use axum::Router;
use http::header;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub type StoreState = Arc<ExpenseRepository<InMemoryLedgerStore>>;

/// The full ledger store application: API routes, OpenAPI docs and the HTTP layers.
pub fn app(state: StoreState) -> Router {
    Router::new()
        .merge(handlers::api_routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
}
