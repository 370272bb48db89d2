use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Result, SqliteExecutor, SqlitePool};

use crate::models::{ClassScheduleRow, ScheduleWithNames};

#[derive(Debug, Clone)]
pub struct CreateSchedule {
    pub service_id: i64,
    pub trainer_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: i64,
}

pub struct ScheduleRepo {
    db: SqlitePool,
}

impl ScheduleRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Slots with a start time in the future, optionally bounded by a date
    /// range, annotated with service and trainer names.
    pub async fn list_upcoming(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<ScheduleWithNames>> {
        let mut query = sqlx::QueryBuilder::new(
            r#"
            SELECT s.*, sv.name AS service_name, e.name AS trainer_name
            FROM class_schedules s
            JOIN services sv ON s.service_id = sv.id
            LEFT JOIN employees e ON s.trainer_id = e.id
            WHERE datetime(s.start_time) > datetime('now')
            "#,
        );

        if let (Some(start), Some(end)) = (start_date, end_date) {
            query.push(" AND DATE(s.start_time) BETWEEN ");
            query.push_bind(start);
            query.push(" AND ");
            query.push_bind(end);
        }

        query.push(" ORDER BY s.start_time ASC");

        let rows = query
            .build_query_as::<ScheduleWithNames>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Insert a new slot with booked_count = 0. No overlap check is made on
    /// the trainer's other slots.
    pub async fn create(&self, data: CreateSchedule) -> Result<ClassScheduleRow> {
        let row = sqlx::query_as::<_, ClassScheduleRow>(
            r#"
            INSERT INTO class_schedules (service_id, trainer_id, start_time, end_time, capacity)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(data.service_id)
        .bind(data.trainer_id)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.capacity)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }
}

pub async fn get_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> Result<Option<ClassScheduleRow>> {
    let row = sqlx::query_as::<_, ClassScheduleRow>("SELECT * FROM class_schedules WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(row)
}

/// Increment booked_count, guarded so the counter can never pass capacity.
/// Returns the number of rows updated; 0 means the slot filled up.
pub async fn increment_booked<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE class_schedules
        SET booked_count = booked_count + 1
        WHERE id = ? AND booked_count < capacity
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Decrement booked_count, floored at zero.
pub async fn decrement_booked<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE class_schedules
        SET booked_count = booked_count - 1
        WHERE id = ? AND booked_count > 0
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
