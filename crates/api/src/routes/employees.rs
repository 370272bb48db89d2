use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use infra::repos::{CreateEmployee, EmployeeFilter, EmployeeRepo, UpdateEmployee};

use crate::auth::{require_role, AuthUser, Role};
use crate::error::AppError;
use crate::routes::{PageQuery, Pagination};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub search: Option<String>,
    pub status: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    let repo = EmployeeRepo::new(state.db.clone());
    let filter = EmployeeFilter {
        search: query.search.clone().filter(|s| !s.is_empty()),
        is_active: match query.status.as_deref() {
            Some("active") => Some(true),
            Some("inactive") => Some(false),
            _ => None,
        },
    };

    let employees = repo.list(filter.clone(), Some(query.page.limit_offset())).await?;
    let total = repo.count(filter).await?;

    Ok(Json(serde_json::json!({
        "employees": employees,
        "pagination": Pagination::new(&query.page, total),
    })))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let employee = EmployeeRepo::new(state.db.clone())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;

    Ok(Json(serde_json::json!({ "employee": employee })))
}

#[derive(Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
    pub user_id: Option<i64>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    let repo = EmployeeRepo::new(state.db.clone());

    if repo.email_exists(&req.email).await? {
        return Err(AppError::BadRequest(
            "employee with this email already exists".to_string(),
        ));
    }

    let employee = repo
        .create(CreateEmployee {
            user_id: req.user_id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            position: req.position,
            salary: req.salary,
            hire_date: req.hire_date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "employee created successfully",
            "employeeId": employee.id,
        })),
    ))
}

#[derive(Deserialize, Default)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    EmployeeRepo::new(state.db.clone())
        .update(
            id,
            UpdateEmployee {
                name: req.name,
                email: req.email,
                phone: req.phone,
                position: req.position,
                salary: req.salary,
                hire_date: req.hire_date,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "employee updated successfully"
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    EmployeeRepo::new(state.db.clone())
        .deactivate(id)
        .await?
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "employee deleted successfully"
    })))
}
