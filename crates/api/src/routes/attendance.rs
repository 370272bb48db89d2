use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use infra::repos::AttendanceRepo;

use crate::auth::permissions::member_id_for_user;
use crate::auth::{require_role, AuthUser, Role};
use crate::error::AppError;
use crate::routes::{PageQuery, Pagination};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub member_id: i64,
}

/// POST /attendance/check-in — front-desk check-in; one open visit per day.
pub async fn check_in(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CheckRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let repo = AttendanceRepo::new(state.db.clone());

    if repo.open_checkin_today(req.member_id).await?.is_some() {
        return Err(AppError::BadRequest(
            "member already checked in today".to_string(),
        ));
    }

    let record = repo.check_in(req.member_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "check-in successful",
            "attendanceId": record.id,
            "checkInTime": record.check_in_time,
        })),
    ))
}

/// POST /attendance/check-out — closes today's open visit.
pub async fn check_out(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CheckRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let repo = AttendanceRepo::new(state.db.clone());

    let open = repo
        .open_checkin_today(req.member_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("no active check-in found for today".to_string())
        })?;

    let record = repo
        .check_out(open.id)
        .await?
        .ok_or_else(|| AppError::NotFound("attendance record not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "check-out successful",
        "checkOutTime": record.check_out_time,
    })))
}

pub async fn today(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let attendance = AttendanceRepo::new(state.db.clone()).today().await?;

    Ok(Json(serde_json::json!({ "attendance": attendance })))
}

#[derive(Deserialize)]
pub struct RangeQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
}

pub async fn by_date_range(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let (start, end) = match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::BadRequest(
                "start date and end date are required".to_string(),
            ))
        }
    };

    let repo = AttendanceRepo::new(state.db.clone());
    let attendance = repo
        .by_date_range(start, end, Some(query.page.limit_offset()))
        .await?;
    let total = repo.count_by_date_range(start, end).await?;

    Ok(Json(serde_json::json!({
        "attendance": attendance,
        "pagination": Pagination::new(&query.page, total),
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn member_summary(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(member_id): Path<i64>,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Staff can read any member's summary; a member only their own.
    if Role::from(claims.role.as_str()) == Role::Member
        && member_id_for_user(&state, &claims).await? != member_id
    {
        return Err(AppError::Forbidden("access denied".to_string()));
    }

    let summary = AttendanceRepo::new(state.db.clone())
        .member_summary(member_id, query.start_date, query.end_date)
        .await?;

    Ok(Json(serde_json::json!({ "summary": summary })))
}

#[derive(Deserialize)]
pub struct StatsQuery {
    pub period: Option<String>,
}

pub async fn stats(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let days = match query.period.as_deref() {
        Some("today") => 0,
        Some("month") => 30,
        Some("year") => 365,
        _ => 7,
    };

    let stats = AttendanceRepo::new(state.db.clone()).daily_stats(days).await?;

    Ok(Json(serde_json::json!({ "stats": stats })))
}
