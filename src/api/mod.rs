use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, SeaOrmAccountService, SeaOrmTokenService, TokenService,
};

mod admin;
pub mod auth;
mod error;
mod observability;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub account_service: Arc<dyn AccountService>,

    pub token_service: Arc<dyn TokenService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let account_service = Arc::new(SeaOrmAccountService::new(
        store.clone(),
        config.security.clone(),
    )) as Arc<dyn AccountService>;

    let token_service = Arc::new(SeaOrmTokenService::new(store.clone())) as Arc<dyn TokenService>;

    Ok(Arc::new(AppState {
        config,
        store,
        account_service,
        token_service,
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/users/create", post(users::create_account))
        .route("/users/token", post(users::obtain_token))
        // GET and PATCH only: the router answers 405 for anything else on
        // this path before authentication is even consulted.
        .route("/users/me", get(users::get_me).patch(users::update_me))
        .route(
            "/admin/accounts",
            get(admin::list_accounts).post(admin::create_account),
        )
        .route("/admin/accounts/{id}", get(admin::get_account))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}
