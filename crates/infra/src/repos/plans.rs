use sqlx::{Result, SqlitePool};

use crate::{models::PlanRow, pagination::LimitOffset};

#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub name: String,
    pub duration_months: i64,
    pub price: f64,
    pub description: Option<String>,
    pub services_included: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePlan {
    pub name: Option<String>,
    pub duration_months: Option<i64>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub services_included: Option<String>,
    pub is_active: Option<bool>,
}

pub struct PlanRepo {
    db: SqlitePool,
}

impl PlanRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        is_active: Option<bool>,
        page: Option<LimitOffset>,
    ) -> Result<Vec<PlanRow>> {
        let page = page.unwrap_or_default();

        let mut query = sqlx::QueryBuilder::new("SELECT * FROM plans WHERE 1=1");
        if let Some(is_active) = is_active {
            query.push(" AND is_active = ");
            query.push_bind(is_active);
        }
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        let rows = query.build_query_as::<PlanRow>().fetch_all(&self.db).await?;

        Ok(rows)
    }

    pub async fn count(&self, is_active: Option<bool>) -> Result<i64> {
        let mut query = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM plans WHERE 1=1");
        if let Some(is_active) = is_active {
            query.push(" AND is_active = ");
            query.push_bind(is_active);
        }

        let total: i64 = query.build_query_scalar().fetch_one(&self.db).await?;

        Ok(total)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<PlanRow>> {
        let row = sqlx::query_as::<_, PlanRow>("SELECT * FROM plans WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    pub async fn create(&self, data: CreatePlan) -> Result<PlanRow> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            INSERT INTO plans (name, duration_months, price, description, services_included)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.duration_months)
        .bind(data.price)
        .bind(&data.description)
        .bind(&data.services_included)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn update(&self, id: i64, data: UpdatePlan) -> Result<Option<PlanRow>> {
        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            UPDATE plans
            SET name = COALESCE(?, name),
                duration_months = COALESCE(?, duration_months),
                price = COALESCE(?, price),
                description = COALESCE(?, description),
                services_included = COALESCE(?, services_included),
                is_active = COALESCE(?, is_active)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(data.duration_months)
        .bind(data.price)
        .bind(&data.description)
        .bind(&data.services_included)
        .bind(data.is_active)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn deactivate(&self, id: i64) -> Result<Option<PlanRow>> {
        let row = sqlx::query_as::<_, PlanRow>(
            "UPDATE plans SET is_active = 0 WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}
