mod common;

use api::auth::{require_role, AuthConfig, Claims, JwtService, Role};
use api::error::AppError;
use chrono::Utc;
use common::*;
use infra::repos::UserRepo;

fn test_claims(role: &str) -> Claims {
    Claims {
        sub: "1".to_string(),
        email: "test@test.com".to_string(),
        role: role.to_string(),
        iat: Utc::now().timestamp(),
        exp: Utc::now().timestamp() + 3600,
    }
}

#[test]
fn admin_satisfies_every_role() {
    let claims = test_claims("admin");
    assert!(require_role(&claims, Role::Admin).is_ok());
    assert!(require_role(&claims, Role::Employee).is_ok());
    assert!(require_role(&claims, Role::Member).is_ok());
}

#[test]
fn employee_is_not_admin() {
    let claims = test_claims("employee");
    assert!(matches!(
        require_role(&claims, Role::Admin),
        Err(AppError::Forbidden(_))
    ));
    assert!(require_role(&claims, Role::Employee).is_ok());
}

#[test]
fn member_only_has_member_access() {
    let claims = test_claims("member");
    assert!(matches!(
        require_role(&claims, Role::Admin),
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        require_role(&claims, Role::Employee),
        Err(AppError::Forbidden(_))
    ));
    assert!(require_role(&claims, Role::Member).is_ok());
}

#[test]
fn unknown_role_falls_back_to_member() {
    assert_eq!(Role::from("receptionist"), Role::Member);
}

#[test]
fn jwt_roundtrip_preserves_claims() {
    std::env::set_var("JWT_SECRET", "test-secret-for-integration-tests");
    let config = AuthConfig::from_env().unwrap();
    let service = JwtService::new(&config);

    let token = service
        .create_token(42, "alice@test.com".to_string(), "member".to_string())
        .unwrap();
    let claims = service.verify_token(&token).unwrap();

    assert_eq!(claims.user_id().unwrap(), 42);
    assert_eq!(claims.email, "alice@test.com");
    assert_eq!(claims.role, "member");
}

#[test]
fn garbage_token_is_rejected() {
    std::env::set_var("JWT_SECRET", "test-secret-for-integration-tests");
    let config = AuthConfig::from_env().unwrap();
    let service = JwtService::new(&config);

    assert!(matches!(
        service.verify_token("not.a.token"),
        Err(AppError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn duplicate_email_is_detected() {
    let app_state = setup_test_db().await;
    let repo = UserRepo::new(app_state.db.clone());

    create_test_user(&app_state, "alice@test.com", "member").await;

    assert!(repo
        .email_or_username_exists("alice@test.com", "someone_else")
        .await
        .unwrap());
    assert!(!repo
        .email_or_username_exists("bob@test.com", "bob")
        .await
        .unwrap());
}

#[tokio::test]
async fn inactive_users_cannot_be_looked_up_for_login() {
    let app_state = setup_test_db().await;
    let repo = UserRepo::new(app_state.db.clone());

    let (user_id, _) = create_test_user(&app_state, "alice@test.com", "member").await;

    assert!(repo
        .get_active_by_email("alice@test.com")
        .await
        .unwrap()
        .is_some());

    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user_id)
        .execute(&app_state.db)
        .await
        .unwrap();

    assert!(repo
        .get_active_by_email("alice@test.com")
        .await
        .unwrap()
        .is_none());
}
