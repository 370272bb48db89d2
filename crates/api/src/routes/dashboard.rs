use axum::{extract::State, response::IntoResponse, Json};

use infra::repos::{bookings, AttendanceRepo, MemberRepo, PaymentRepo};

use crate::auth::permissions::member_id_for_user;
use crate::auth::{require_role, AuthUser, Role};
use crate::error::AppError;
use crate::state::AppState;

/// GET /dashboard/admin — headline numbers for the staff landing page.
pub async fn admin_stats(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let total_members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
        .fetch_one(&state.db)
        .await?;

    let active_members: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE is_active = 1")
            .fetch_one(&state.db)
            .await?;

    let pending_payments: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM members WHERE is_active = 1 AND payment_status = 'pending'",
    )
    .fetch_one(&state.db)
    .await?;

    let overdue_payments: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM members \
         WHERE is_active = 1 AND payment_status != 'paid' \
           AND payment_due_date IS NOT NULL AND payment_due_date < DATE('now')",
    )
    .fetch_one(&state.db)
    .await?;

    let total_employees: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE is_active = 1")
            .fetch_one(&state.db)
            .await?;

    let today_checkins: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance WHERE DATE(check_in_time) = DATE('now')",
    )
    .fetch_one(&state.db)
    .await?;

    let monthly_revenue: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0) FROM payments \
         WHERE status = 'success' AND DATE(payment_date) >= DATE('now', '-30 days')",
    )
    .fetch_one(&state.db)
    .await?;

    let recent_signups: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM members WHERE DATE(created_at) >= DATE('now', '-7 days')",
    )
    .fetch_one(&state.db)
    .await?;

    Ok(Json(serde_json::json!({
        "stats": {
            "totalMembers": total_members,
            "activeMembers": active_members,
            "pendingPayments": pending_payments,
            "overduePayments": overdue_payments,
            "totalEmployees": total_employees,
            "todayCheckins": today_checkins,
            "monthlyRevenue": monthly_revenue,
            "recentSignups": recent_signups,
        }
    })))
}

/// GET /dashboard/member — the member's own overview: profile, recent
/// visits and payments, upcoming class bookings.
pub async fn member_overview(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let member_id = member_id_for_user(&state, &claims).await?;

    let profile = MemberRepo::new(state.db.clone())
        .get_by_id(member_id)
        .await?
        .ok_or_else(|| AppError::NotFound("member not found".to_string()))?;

    let recent_attendance = AttendanceRepo::new(state.db.clone())
        .member_history(member_id, Some(infra::pagination::LimitOffset::default()))
        .await?;

    let recent_payments = PaymentRepo::new(state.db.clone())
        .member_history(member_id, Some(infra::pagination::LimitOffset::default()))
        .await?;

    let upcoming_bookings = bookings::list_active_for_member(&state.db, member_id).await?;

    Ok(Json(serde_json::json!({
        "profile": profile,
        "recentAttendance": recent_attendance,
        "recentPayments": recent_payments,
        "upcomingBookings": upcoming_bookings,
    })))
}
