use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use infra::repos::{CreateService, ServiceRepo, UpdateService};

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
    let repo = ServiceRepo::new(state.db.clone());
    let is_active = match query.status.as_deref() {
        Some("active") => Some(true),
        Some("inactive") => Some(false),
        _ => None,
    };

    let services = repo.list(is_active, Some(query.page.limit_offset())).await?;
    let total = repo.count(is_active).await?;

    Ok(Json(serde_json::json!({
        "services": services,
        "pagination": Pagination::new(&query.page, total),
    })))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let service = ServiceRepo::new(state.db.clone())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    Ok(Json(serde_json::json!({ "service": service })))
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    let service = ServiceRepo::new(state.db.clone())
        .create(CreateService {
            name: req.name,
            description: req.description,
            price: req.price,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "service created successfully",
            "serviceId": service.id,
        })),
    ))
}

#[derive(Deserialize, Default)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    ServiceRepo::new(state.db.clone())
        .update(
            id,
            UpdateService {
                name: req.name,
                description: req.description,
                price: req.price,
                is_active: req.is_active,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "service updated successfully"
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    ServiceRepo::new(state.db.clone())
        .deactivate(id)
        .await?
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "service deleted successfully"
    })))
}
