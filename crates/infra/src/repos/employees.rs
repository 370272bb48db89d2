use chrono::NaiveDate;
use sqlx::{Result, SqlitePool};

use crate::{models::EmployeeRow, pagination::LimitOffset};

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateEmployee {
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
}

pub struct EmployeeRepo {
    db: SqlitePool,
}

impl EmployeeRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        filter: EmployeeFilter,
        page: Option<LimitOffset>,
    ) -> Result<Vec<EmployeeRow>> {
        let page = page.unwrap_or_default();

        let mut query = sqlx::QueryBuilder::new("SELECT * FROM employees WHERE 1=1");
        push_employee_filter(&mut query, &filter);
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        let rows = query
            .build_query_as::<EmployeeRow>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    pub async fn count(&self, filter: EmployeeFilter) -> Result<i64> {
        let mut query = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM employees WHERE 1=1");
        push_employee_filter(&mut query, &filter);

        let total: i64 = query.build_query_scalar().fetch_one(&self.db).await?;

        Ok(total)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<EmployeeRow>> {
        let row = sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    pub async fn get_by_user_id(&self, user_id: i64) -> Result<Option<EmployeeRow>> {
        let row = sqlx::query_as::<_, EmployeeRow>("SELECT * FROM employees WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    /// Active employees whose position marks them as a trainer.
    pub async fn list_trainers(&self) -> Result<Vec<EmployeeRow>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT * FROM employees
            WHERE position LIKE '%trainer%' AND is_active = 1
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM employees WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(existing.is_some())
    }

    pub async fn create(&self, data: CreateEmployee) -> Result<EmployeeRow> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employees (user_id, name, email, phone, position, salary, hire_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(data.user_id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.position)
        .bind(data.salary)
        .bind(data.hire_date)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn update(&self, id: i64, data: UpdateEmployee) -> Result<Option<EmployeeRow>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employees
            SET name = COALESCE(?, name),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                position = COALESCE(?, position),
                salary = COALESCE(?, salary),
                hire_date = COALESCE(?, hire_date),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.position)
        .bind(data.salary)
        .bind(data.hire_date)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn deactivate(&self, id: i64) -> Result<Option<EmployeeRow>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employees
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

fn push_employee_filter(query: &mut sqlx::QueryBuilder<'_, sqlx::Sqlite>, filter: &EmployeeFilter) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        query.push(" AND (name LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR email LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR position LIKE ");
        query.push_bind(pattern);
        query.push(")");
    }

    if let Some(is_active) = filter.is_active {
        query.push(" AND is_active = ");
        query.push_bind(is_active);
    }
}
