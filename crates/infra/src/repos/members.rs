use chrono::NaiveDate;
use sqlx::{Result, SqlitePool};

use crate::{
    models::{MemberRow, MemberWithPlan},
    pagination::LimitOffset,
};

#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateMember {
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
    pub payment_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMember {
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

pub struct MemberRepo {
    db: SqlitePool,
}

impl MemberRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        filter: MemberFilter,
        page: Option<LimitOffset>,
    ) -> Result<Vec<MemberWithPlan>> {
        let page = page.unwrap_or_default();

        let mut query = sqlx::QueryBuilder::new(
            r#"
            SELECT m.*, p.name AS plan_name, p.price AS plan_price, p.duration_months
            FROM members m
            LEFT JOIN plans p ON m.plan_id = p.id
            WHERE 1=1
            "#,
        );
        push_member_filter(&mut query, &filter, "m.");
        query.push(" ORDER BY m.created_at DESC LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        let rows = query
            .build_query_as::<MemberWithPlan>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    pub async fn count(&self, filter: MemberFilter) -> Result<i64> {
        let mut query = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM members WHERE 1=1");
        push_member_filter(&mut query, &filter, "");

        let total: i64 = query.build_query_scalar().fetch_one(&self.db).await?;

        Ok(total)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<MemberWithPlan>> {
        let row = sqlx::query_as::<_, MemberWithPlan>(
            r#"
            SELECT m.*, p.name AS plan_name, p.price AS plan_price, p.duration_months
            FROM members m
            LEFT JOIN plans p ON m.plan_id = p.id
            WHERE m.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    /// Resolve the member profile attached to an authenticated user account.
    pub async fn get_by_user_id(&self, user_id: i64) -> Result<Option<MemberRow>> {
        let row = sqlx::query_as::<_, MemberRow>("SELECT * FROM members WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM members WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(existing.is_some())
    }

    pub async fn create(&self, data: CreateMember) -> Result<MemberRow> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            INSERT INTO members (
                user_id, name, age, gender, email, phone, address,
                emergency_contact_name, emergency_contact_phone,
                plan_id, payment_due_date
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(data.user_id)
        .bind(&data.name)
        .bind(data.age)
        .bind(&data.gender)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.emergency_contact_name)
        .bind(&data.emergency_contact_phone)
        .bind(data.plan_id)
        .bind(data.payment_due_date)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn update(&self, id: i64, data: UpdateMember) -> Result<Option<MemberRow>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            UPDATE members
            SET name = COALESCE(?, name),
                age = COALESCE(?, age),
                gender = COALESCE(?, gender),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                address = COALESCE(?, address),
                emergency_contact_name = COALESCE(?, emergency_contact_name),
                emergency_contact_phone = COALESCE(?, emergency_contact_phone),
                plan_id = COALESCE(?, plan_id),
                payment_status = COALESCE(?, payment_status),
                payment_due_date = COALESCE(?, payment_due_date),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.age)
        .bind(&data.gender)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.emergency_contact_name)
        .bind(&data.emergency_contact_phone)
        .bind(data.plan_id)
        .bind(&data.payment_status)
        .bind(data.payment_due_date)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    /// Soft delete; attendance, payments and bookings stay referenced.
    pub async fn deactivate(&self, id: i64) -> Result<Option<MemberRow>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            UPDATE members
            SET is_active = 0, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}

fn push_member_filter(
    query: &mut sqlx::QueryBuilder<'_, sqlx::Sqlite>,
    filter: &MemberFilter,
    prefix: &str,
) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        query.push(format!(" AND ({prefix}name LIKE "));
        query.push_bind(pattern.clone());
        query.push(format!(" OR {prefix}email LIKE "));
        query.push_bind(pattern.clone());
        query.push(format!(" OR {prefix}phone LIKE "));
        query.push_bind(pattern);
        query.push(")");
    }

    if let Some(is_active) = filter.is_active {
        query.push(format!(" AND {prefix}is_active = "));
        query.push_bind(is_active);
    }
}
