use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use infra::repos::{bookings, CreateSchedule, EmployeeRepo, ScheduleRepo};

use crate::auth::permissions::member_id_for_user;
use crate::auth::{require_role, AuthUser, Role};
use crate::error::AppError;
use crate::services::booking_service;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// GET /schedule — upcoming class slots with seat availability.
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let schedules = ScheduleRepo::new(state.db.clone())
        .list_upcoming(query.start_date, query.end_date)
        .await?;

    Ok(Json(serde_json::json!({ "schedules": schedules })))
}

#[derive(Deserialize)]
pub struct CreateScheduleRequest {
    pub service_id: i64,
    pub trainer_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: i64,
}

/// POST /schedule — admin creates a new slot with booked_count = 0.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    if req.capacity <= 0 {
        return Err(AppError::BadRequest("capacity must be positive".to_string()));
    }
    if req.end_time <= req.start_time {
        return Err(AppError::BadRequest(
            "end time must be after start time".to_string(),
        ));
    }

    let schedule = ScheduleRepo::new(state.db.clone())
        .create(CreateSchedule {
            service_id: req.service_id,
            trainer_id: req.trainer_id,
            start_time: req.start_time,
            end_time: req.end_time,
            capacity: req.capacity,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "schedule created",
            "scheduleId": schedule.id,
        })),
    ))
}

#[derive(Deserialize)]
pub struct BookRequest {
    pub schedule_id: i64,
}

/// POST /schedule/book — member reserves a seat.
pub async fn book(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<BookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let member_id = member_id_for_user(&state, &claims).await?;

    let booking_id = booking_service::book_slot(&state.db, member_id, req.schedule_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "booking successful",
            "bookingId": booking_id,
        })),
    ))
}

/// GET /schedule/my-bookings — the member's active bookings.
pub async fn my_bookings(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let member_id = member_id_for_user(&state, &claims).await?;

    let bookings = bookings::list_active_for_member(&state.db, member_id).await?;

    Ok(Json(serde_json::json!({ "bookings": bookings })))
}

/// DELETE /schedule/bookings/{booking_id} — member releases a seat.
pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let member_id = member_id_for_user(&state, &claims).await?;

    booking_service::cancel_booking(&state.db, member_id, booking_id).await?;

    Ok(Json(serde_json::json!({ "message": "booking cancelled" })))
}

/// GET /schedule/trainers — active employees who can lead a class.
pub async fn trainers(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let trainers = EmployeeRepo::new(state.db.clone()).list_trainers().await?;

    Ok(Json(serde_json::json!({ "trainers": trainers })))
}
