use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use infra::repos::{CreatePayment, PaymentFilter, PaymentRepo, UpdatePayment};

use crate::auth::permissions::member_id_for_user;
use crate::auth::{require_role, AuthUser, Role};
use crate::error::AppError;
use crate::routes::{PageQuery, Pagination};
use crate::services::payment_service::{self, ProcessPaymentParams};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    #[serde(rename = "memberId")]
    pub member_id: Option<i64>,
    pub status: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let repo = PaymentRepo::new(state.db.clone());
    let filter = PaymentFilter {
        member_id: query.member_id,
        status: query.status.clone().filter(|s| s != "all"),
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let payments = repo.list(filter.clone(), Some(query.page.limit_offset())).await?;
    let total = repo.count(filter).await?;

    Ok(Json(serde_json::json!({
        "payments": payments,
        "pagination": Pagination::new(&query.page, total),
    })))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let payment = PaymentRepo::new(state.db.clone())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("payment not found".to_string()))?;

    Ok(Json(serde_json::json!({ "payment": payment })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub member_id: i64,
    pub amount: f64,
    pub payment_type: String,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    if req.amount <= 0.0 {
        return Err(AppError::BadRequest("amount must be positive".to_string()));
    }

    let payment_id = payment_service::record_payment(
        &state.db,
        CreatePayment {
            member_id: req.member_id,
            amount: req.amount,
            payment_type: req.payment_type,
            payment_method: req.payment_method,
            transaction_id: req.transaction_id,
            status: req.status.unwrap_or_else(|| "success".to_string()),
            description: req.description,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "payment created successfully",
            "paymentId": payment_id,
        })),
    ))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub amount: Option<f64>,
    pub payment_type: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    PaymentRepo::new(state.db.clone())
        .update(
            id,
            UpdatePayment {
                amount: req.amount,
                payment_type: req.payment_type,
                payment_method: req.payment_method,
                transaction_id: req.transaction_id,
                status: req.status,
                description: req.description,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("payment not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "payment updated successfully"
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    let deleted = PaymentRepo::new(state.db.clone()).delete(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("payment not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "message": "payment deleted successfully"
    })))
}

pub async fn member_history(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(member_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Staff can read any member's history; a member only their own.
    if Role::from(claims.role.as_str()) == Role::Member
        && member_id_for_user(&state, &claims).await? != member_id
    {
        return Err(AppError::Forbidden("access denied".to_string()));
    }

    let repo = PaymentRepo::new(state.db.clone());
    let payments = repo.member_history(member_id, Some(page.limit_offset())).await?;
    let total = repo.member_history_count(member_id).await?;

    Ok(Json(serde_json::json!({
        "payments": payments,
        "pagination": Pagination::new(&page, total),
    })))
}

#[derive(Deserialize)]
pub struct StatsQuery {
    pub period: Option<String>,
}

fn period_days(period: Option<&str>) -> i64 {
    match period {
        Some("today") => 0,
        Some("week") => 7,
        Some("year") => 365,
        _ => 30,
    }
}

pub async fn stats(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let stats = PaymentRepo::new(state.db.clone())
        .daily_stats(period_days(query.period.as_deref()))
        .await?;

    Ok(Json(serde_json::json!({ "stats": stats })))
}

pub async fn overdue(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let members = PaymentRepo::new(state.db.clone())
        .overdue_members(Utc::now().date_naive())
        .await?;

    Ok(Json(serde_json::json!({ "overdueMembers": members })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    pub member_id: Option<i64>,
    pub amount: f64,
    pub payment_type: String,
    pub payment_method: Option<String>,
}

/// POST /payments/process — run a charge through the (simulated) gateway.
/// Members can only pay for themselves; staff can charge any member.
pub async fn process(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<ProcessPaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let member_id = if Role::from(claims.role.as_str()) == Role::Member {
        member_id_for_user(&state, &claims).await?
    } else {
        req.member_id
            .ok_or_else(|| AppError::BadRequest("memberId is required".to_string()))?
    };

    if req.amount <= 0.0 {
        return Err(AppError::BadRequest("amount must be positive".to_string()));
    }

    let result = payment_service::process_payment(
        &state.db,
        ProcessPaymentParams {
            member_id,
            amount: req.amount,
            payment_type: req.payment_type,
            payment_method: req.payment_method,
        },
    )
    .await?;

    Ok(Json(serde_json::json!({
        "message": "payment processed successfully",
        "paymentId": result.payment_id,
        "transactionId": result.transaction_id,
        "status": "success",
    })))
}
