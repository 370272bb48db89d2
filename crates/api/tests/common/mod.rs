use std::env;

use api::AppState;
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;

/// Fresh in-memory database with migrations applied. A single connection is
/// mandatory: every pooled connection to `sqlite::memory:` would otherwise
/// get its own empty database.
pub async fn setup_test_db() -> AppState {
    env::set_var("JWT_SECRET", "test-secret-for-integration-tests");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    AppState::new(pool).expect("Failed to create AppState")
}

/// File-backed database with a multi-connection pool, for tests that need
/// real connection-level concurrency instead of serializing at pool checkout.
#[allow(dead_code)]
pub async fn setup_pooled_test_db() -> AppState {
    env::set_var("JWT_SECRET", "test-secret-for-integration-tests");

    let unique = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let path = env::temp_dir().join(format!("gym-test-{}-{unique}.db", std::process::id()));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    AppState::new(pool).expect("Failed to create AppState")
}

/// Create test user and return its id plus JWT claims for authentication
#[allow(dead_code)]
pub async fn create_test_user(app_state: &AppState, email: &str, role: &str) -> (i64, api::auth::Claims) {
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash, role)
         VALUES (?, ?, ?, ?)
         RETURNING id",
    )
    .bind(format!("test_{}", email.replace(['@', '.'], "_")))
    .bind(email)
    .bind("$2b$12$dummy.hash.for.testing")
    .bind(role)
    .fetch_one(&app_state.db)
    .await
    .expect("Failed to create test user");

    let claims = api::auth::Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        iat: Utc::now().timestamp(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };

    (user_id, claims)
}

/// Create test member, optionally linked to a user account
#[allow(dead_code)]
pub async fn create_test_member(app_state: &AppState, name: &str, user_id: Option<i64>) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO members (user_id, name, email) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(name)
    .bind(format!("{}@test.com", name.to_lowercase().replace(' ', "_")))
    .fetch_one(&app_state.db)
    .await
    .expect("Failed to create test member")
}

#[allow(dead_code)]
pub async fn create_test_service(app_state: &AppState, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO services (name, price) VALUES (?, 15.0) RETURNING id")
        .bind(name)
        .fetch_one(&app_state.db)
        .await
        .expect("Failed to create test service")
}

#[allow(dead_code)]
pub async fn create_test_trainer(app_state: &AppState, name: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO employees (name, email, position) VALUES (?, ?, 'trainer') RETURNING id",
    )
    .bind(name)
    .bind(format!("{}@gym.test", name.to_lowercase().replace(' ', "_")))
    .fetch_one(&app_state.db)
    .await
    .expect("Failed to create test trainer")
}

/// Create a class slot starting tomorrow with the given capacity
#[allow(dead_code)]
pub async fn create_test_schedule(app_state: &AppState, service_id: i64, capacity: i64) -> i64 {
    let start: DateTime<Utc> = Utc::now() + Duration::days(1);
    let end = start + Duration::hours(1);

    sqlx::query_scalar(
        "INSERT INTO class_schedules (service_id, start_time, end_time, capacity)
         VALUES (?, ?, ?, ?)
         RETURNING id",
    )
    .bind(service_id)
    .bind(start)
    .bind(end)
    .bind(capacity)
    .fetch_one(&app_state.db)
    .await
    .expect("Failed to create test schedule")
}

#[allow(dead_code)]
pub async fn booked_count(app_state: &AppState, schedule_id: i64) -> i64 {
    sqlx::query_scalar("SELECT booked_count FROM class_schedules WHERE id = ?")
        .bind(schedule_id)
        .fetch_one(&app_state.db)
        .await
        .expect("Failed to read booked_count")
}
