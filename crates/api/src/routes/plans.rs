use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use infra::repos::{CreatePlan, PlanRepo, UpdatePlan};

use crate::auth::{require_role, AuthUser, Role};
use crate::error::AppError;
use crate::routes::{PageQuery, Pagination};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub status: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let repo = PlanRepo::new(state.db.clone());
    let is_active = match query.status.as_deref() {
        Some("active") => Some(true),
        Some("inactive") => Some(false),
        _ => None,
    };

    let plans = repo.list(is_active, Some(query.page.limit_offset())).await?;
    let total = repo.count(is_active).await?;

    Ok(Json(serde_json::json!({
        "plans": plans,
        "pagination": Pagination::new(&query.page, total),
    })))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let plan = PlanRepo::new(state.db.clone())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("plan not found".to_string()))?;

    Ok(Json(serde_json::json!({ "plan": plan })))
}

#[derive(Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub duration_months: i64,
    pub price: f64,
    pub description: Option<String>,
    pub services_included: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    if req.duration_months <= 0 || req.price < 0.0 {
        return Err(AppError::BadRequest(
            "duration and price must be positive".to_string(),
        ));
    }

    let plan = PlanRepo::new(state.db.clone())
        .create(CreatePlan {
            name: req.name,
            duration_months: req.duration_months,
            price: req.price,
            description: req.description,
            services_included: req.services_included,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "plan created successfully",
            "planId": plan.id,
        })),
    ))
}

#[derive(Deserialize, Default)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    pub duration_months: Option<i64>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub services_included: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    PlanRepo::new(state.db.clone())
        .update(
            id,
            UpdatePlan {
                name: req.name,
                duration_months: req.duration_months,
                price: req.price,
                description: req.description,
                services_included: req.services_included,
                is_active: req.is_active,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("plan not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "plan updated successfully"
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    PlanRepo::new(state.db.clone())
        .deactivate(id)
        .await?
        .ok_or_else(|| AppError::NotFound("plan not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "plan deleted successfully"
    })))
}
