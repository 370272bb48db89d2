use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{
        header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
        Method, StatusCode,
    },
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::middleware::jwt::jwt_middleware;
use crate::routes::{
    attendance, auth, dashboard, employees, members, payments, plans, schedule, services,
};
use crate::state::AppState;

/// Build the Axum router: health endpoint, auth, and all resource routes.
pub fn build_router(state: AppState) -> Router {
    // Rate limiting: 10 requests per minute per IP on auth endpoints
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(6) // 1 token every 6 seconds = ~10/min
        .burst_size(10)
        .finish()
        .unwrap();

    let rate_limited_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .layer(GovernorLayer::new(Arc::new(governor_conf)));

    Router::new()
        // Simple liveness check; also proves DB connectivity.
        .route("/health", get(health))
        .merge(rate_limited_routes)
        .route("/auth/profile", get(auth::profile).put(auth::update_profile))
        .route("/auth/change-password", put(auth::change_password))
        .route("/members", get(members::list).post(members::create))
        .route(
            "/members/{id}",
            get(members::get).put(members::update).delete(members::remove),
        )
        .route("/members/{id}/attendance", get(members::attendance))
        .route("/employees", get(employees::list).post(employees::create))
        .route(
            "/employees/{id}",
            get(employees::get)
                .put(employees::update)
                .delete(employees::remove),
        )
        .route("/plans", get(plans::list).post(plans::create))
        .route(
            "/plans/{id}",
            get(plans::get).put(plans::update).delete(plans::remove),
        )
        .route("/services", get(services::list).post(services::create))
        .route(
            "/services/{id}",
            get(services::get)
                .put(services::update)
                .delete(services::remove),
        )
        .route("/payments", get(payments::list).post(payments::create))
        .route("/payments/process", post(payments::process))
        .route("/payments/stats", get(payments::stats))
        .route("/payments/overdue", get(payments::overdue))
        .route("/payments/member/{id}", get(payments::member_history))
        .route(
            "/payments/{id}",
            get(payments::get)
                .put(payments::update)
                .delete(payments::remove),
        )
        .route("/attendance/check-in", post(attendance::check_in))
        .route("/attendance/check-out", post(attendance::check_out))
        .route("/attendance/today", get(attendance::today))
        .route("/attendance/range", get(attendance::by_date_range))
        .route("/attendance/stats", get(attendance::stats))
        .route(
            "/attendance/member/{id}/summary",
            get(attendance::member_summary),
        )
        .route("/schedule", get(schedule::list).post(schedule::create))
        .route("/schedule/book", post(schedule::book))
        .route("/schedule/my-bookings", get(schedule::my_bookings))
        .route("/schedule/bookings/{id}", delete(schedule::cancel))
        .route("/schedule/trainers", get(schedule::trainers))
        .route("/dashboard/admin", get(dashboard::admin_stats))
        .route("/dashboard/member", get(dashboard::member_overview))
        .with_state(state.clone())
        // JWT middleware for authentication
        .layer(middleware::from_fn_with_state(state, jwt_middleware))
        // Useful default middlewares
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer({
            let allowed_origins = std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:3001".to_string());

            let origins: Vec<HeaderValue> = allowed_origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
                .allow_credentials(true)
        })
}

async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(serde_json::json!({ "status": "ok" })))
}
