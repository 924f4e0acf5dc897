use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{admin, auth, contacts, donations, donors, health, messages, requests};
use crate::services::email::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub email: EmailService,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);
    let email = EmailService::new(config.email.clone());

    let state = AppState {
        pool,
        config: config.clone(),
        email,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/messages", post(messages::submit_message));

    // Authenticated routes. Identity is enforced by the AuthUser extractor in
    // each handler, which also threads the caller into every core call.
    let api_routes = Router::new()
        .route("/api/v1/donors", get(donors::list_donors))
        .route("/api/v1/donors/me/refresh", post(donors::refresh_availability))
        .route(
            "/api/v1/donors/:donor_id/contact-info",
            get(donors::contact_info),
        )
        .route("/api/v1/requests", post(requests::create_request))
        .route("/api/v1/requests/open", get(requests::list_open))
        .route("/api/v1/requests/mine", get(requests::list_mine))
        .route(
            "/api/v1/requests/:request_id/accept",
            post(requests::accept_request),
        )
        .route("/api/v1/donations/mine", get(donations::list_mine))
        .route(
            "/api/v1/donations/:donation_id/complete",
            post(donations::complete_donation),
        )
        .route(
            "/api/v1/contact-requests",
            post(contacts::create_contact_request),
        )
        .route(
            "/api/v1/contact-requests/pending",
            get(contacts::list_pending),
        )
        .route(
            "/api/v1/contact-requests/:request_id/decide",
            post(contacts::decide),
        );

    // Admin routes (role checked per-handler)
    let admin_routes = Router::new()
        .route("/api/v1/admin/stats", get(admin::stats))
        .route("/api/v1/admin/users", get(admin::list_users))
        .route(
            "/api/v1/admin/users/:user_id/toggle-active",
            post(admin::toggle_user_active),
        )
        .route("/api/v1/admin/broadcasts", post(admin::create_broadcast))
        .route("/api/v1/admin/messages", get(admin::list_messages))
        .route(
            "/api/v1/admin/messages/:message_id/read",
            post(admin::mark_message_read),
        );

    // Merge all routes; global middleware (bottom layers run first)
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(admin_routes)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
