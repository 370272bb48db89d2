use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MemberRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub plan_id: Option<i64>,
    pub payment_status: String,
    pub payment_due_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member joined to its plan for list/detail views.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MemberWithPlan {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub member: MemberRow,
    pub plan_name: Option<String>,
    pub plan_price: Option<f64>,
    pub duration_months: Option<i64>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlanRow {
    pub id: i64,
    pub name: String,
    pub duration_months: i64,
    pub price: f64,
    pub description: Option<String>,
    pub services_included: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ServiceRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentRow {
    pub id: i64,
    pub member_id: i64,
    pub amount: f64,
    pub payment_type: String,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub status: String,
    pub description: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentWithMember {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payment: PaymentRow,
    pub member_name: String,
    pub member_email: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub id: i64,
    pub member_id: i64,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AttendanceWithMember {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attendance: AttendanceRow,
    pub member_name: String,
}

/// A bookable class occurrence. `booked_count` is a cached counter kept in
/// sync with the number of confirmed bookings referencing the slot.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClassScheduleRow {
    pub id: i64,
    pub service_id: i64,
    pub trainer_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: i64,
    pub booked_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScheduleWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub schedule: ClassScheduleRow,
    pub service_name: String,
    pub trainer_name: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookingRow {
    pub id: i64,
    pub member_id: i64,
    pub schedule_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A member's booking joined to the slot it reserves, for display.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BookingWithSchedule {
    pub booking_id: i64,
    pub status: String,
    pub schedule_id: i64,
    pub service_id: i64,
    pub trainer_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: i64,
    pub booked_count: i64,
    pub service_name: String,
    pub trainer_name: Option<String>,
}
