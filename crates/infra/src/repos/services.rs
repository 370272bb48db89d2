use sqlx::{Result, SqlitePool};

use crate::{models::ServiceRow, pagination::LimitOffset};

#[derive(Debug, Clone)]
pub struct CreateService {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateService {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

pub struct ServiceRepo {
    db: SqlitePool,
}

impl ServiceRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        is_active: Option<bool>,
        page: Option<LimitOffset>,
    ) -> Result<Vec<ServiceRow>> {
        let page = page.unwrap_or_default();

        let mut query = sqlx::QueryBuilder::new("SELECT * FROM services WHERE 1=1");
        if let Some(is_active) = is_active {
            query.push(" AND is_active = ");
            query.push_bind(is_active);
        }
        query.push(" ORDER BY name ASC LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        let rows = query
            .build_query_as::<ServiceRow>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    pub async fn count(&self, is_active: Option<bool>) -> Result<i64> {
        let mut query = sqlx::QueryBuilder::new("SELECT COUNT(*) FROM services WHERE 1=1");
        if let Some(is_active) = is_active {
            query.push(" AND is_active = ");
            query.push_bind(is_active);
        }

        let total: i64 = query.build_query_scalar().fetch_one(&self.db).await?;

        Ok(total)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<ServiceRow>> {
        let row = sqlx::query_as::<_, ServiceRow>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row)
    }

    pub async fn create(&self, data: CreateService) -> Result<ServiceRow> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            INSERT INTO services (name, description, price)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn update(&self, id: i64, data: UpdateService) -> Result<Option<ServiceRow>> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            UPDATE services
            SET name = COALESCE(?, name),
                description = COALESCE(?, description),
                price = COALESCE(?, price),
                is_active = COALESCE(?, is_active)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.is_active)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn deactivate(&self, id: i64) -> Result<Option<ServiceRow>> {
        let row = sqlx::query_as::<_, ServiceRow>(
            "UPDATE services SET is_active = 0 WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }
}
