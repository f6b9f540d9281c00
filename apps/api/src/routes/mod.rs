pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, set_header::SetResponseHeader};

use crate::ats::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Result<Router> {
    let origin: HeaderValue = state
        .config
        .client_url
        .parse()
        .with_context(|| format!("CLIENT_URL '{}' is not a valid origin", state.config.client_url))?;

    let uploads = SetResponseHeader::overriding(
        ServeDir::new(&state.config.uploads_dir),
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        origin.clone(),
    );

    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/ats/ats-score", post(handlers::handle_ats_score))
        .route("/api/ats/ats-report", post(handlers::handle_ats_report))
        .route(
            "/api/ats/extract",
            post(handlers::handle_extract)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .nest_service("/uploads", uploads)
        .layer(cors_layer(origin))
        .with_state(state);

    Ok(router)
}

/// Single allowed origin; preflights are answered for every route.
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
