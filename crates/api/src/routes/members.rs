use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use infra::repos::{AttendanceRepo, CreateMember, MemberFilter, MemberRepo, UpdateMember};

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

fn status_filter(status: Option<&str>) -> Option<bool> {
    match status {
        Some("active") => Some(true),
        Some("inactive") => Some(false),
        _ => None,
    }
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let repo = MemberRepo::new(state.db.clone());
    let filter = MemberFilter {
        search: query.search.clone().filter(|s| !s.is_empty()),
        is_active: status_filter(query.status.as_deref()),
    };

    let members = repo.list(filter.clone(), Some(query.page.limit_offset())).await?;
    let total = repo.count(filter).await?;

    Ok(Json(serde_json::json!({
        "members": members,
        "pagination": Pagination::new(&query.page, total),
    })))
}

pub async fn get(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let repo = MemberRepo::new(state.db.clone());

    let member = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("member not found".to_string()))?;

    // Members may only read their own profile; staff can read anyone's.
    if Role::from(claims.role.as_str()) == Role::Member
        && member.member.user_id != Some(claims.user_id()?)
    {
        return Err(AppError::Forbidden("access denied".to_string()));
    }

    Ok(Json(serde_json::json!({ "member": member })))
}

#[derive(Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub plan_id: Option<i64>,
    pub payment_due_date: Option<NaiveDate>,
    pub user_id: Option<i64>,
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let repo = MemberRepo::new(state.db.clone());

    if repo.email_exists(&req.email).await? {
        return Err(AppError::BadRequest(
            "member with this email already exists".to_string(),
        ));
    }

    let member = repo
        .create(CreateMember {
            user_id: req.user_id,
            name: req.name,
            age: req.age,
            gender: req.gender,
            email: req.email,
            phone: req.phone,
            address: req.address,
            emergency_contact_name: req.emergency_contact_name,
            emergency_contact_phone: req.emergency_contact_phone,
            plan_id: req.plan_id,
            payment_due_date: req.payment_due_date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "member created successfully",
            "memberId": member.id,
        })),
    ))
}

#[derive(Deserialize, Default)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub plan_id: Option<i64>,
    pub payment_status: Option<String>,
    pub payment_due_date: Option<NaiveDate>,
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    MemberRepo::new(state.db.clone())
        .update(
            id,
            UpdateMember {
                name: req.name,
                age: req.age,
                gender: req.gender,
                email: req.email,
                phone: req.phone,
                address: req.address,
                emergency_contact_name: req.emergency_contact_name,
                emergency_contact_phone: req.emergency_contact_phone,
                plan_id: req.plan_id,
                payment_status: req.payment_status,
                payment_due_date: req.payment_due_date,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("member not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "member updated successfully"
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Admin)?;

    MemberRepo::new(state.db.clone())
        .deactivate(id)
        .await?
        .ok_or_else(|| AppError::NotFound("member not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "message": "member deleted successfully"
    })))
}

pub async fn attendance(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_role(&claims, Role::Employee)?;

    let repo = AttendanceRepo::new(state.db.clone());
    let attendance = repo.member_history(id, Some(page.limit_offset())).await?;
    let total = repo.member_history_count(id).await?;

    Ok(Json(serde_json::json!({
        "attendance": attendance,
        "pagination": Pagination::new(&page, total),
    })))
}
