use chrono::NaiveDate;
use sqlx::{Result, SqlitePool};

use crate::{
    models::{AttendanceRow, AttendanceWithMember},
    pagination::LimitOffset,
};

/// Visit counts and average duration for one member.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct AttendanceSummary {
    pub total_visits: i64,
    pub completed_visits: i64,
    pub current_checkin: i64,
    pub avg_hours_per_visit: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct DailyAttendanceStat {
    pub date: NaiveDate,
    pub checkins: i64,
    pub checkouts: i64,
}

pub struct AttendanceRepo {
    db: SqlitePool,
}

impl AttendanceRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// The member's open check-in for today, if any. At most one exists.
    pub async fn open_checkin_today(&self, member_id: i64) -> Result<Option<AttendanceRow>> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT * FROM attendance
            WHERE member_id = ?
              AND DATE(check_in_time) = DATE('now')
              AND check_out_time IS NULL
            "#,
        )
        .bind(member_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn check_in(&self, member_id: i64) -> Result<AttendanceRow> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            "INSERT INTO attendance (member_id) VALUES (?) RETURNING *",
        )
        .bind(member_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn check_out(&self, attendance_id: i64) -> Result<Option<AttendanceRow>> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            UPDATE attendance
            SET check_out_time = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(attendance_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn today(&self) -> Result<Vec<AttendanceWithMember>> {
        let rows = sqlx::query_as::<_, AttendanceWithMember>(
            r#"
            SELECT a.*, m.name AS member_name
            FROM attendance a
            JOIN members m ON a.member_id = m.id
            WHERE DATE(a.check_in_time) = DATE('now')
            ORDER BY a.check_in_time DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    pub async fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        page: Option<LimitOffset>,
    ) -> Result<Vec<AttendanceWithMember>> {
        let page = page.unwrap_or_default();

        let rows = sqlx::query_as::<_, AttendanceWithMember>(
            r#"
            SELECT a.*, m.name AS member_name
            FROM attendance a
            JOIN members m ON a.member_id = m.id
            WHERE DATE(a.check_in_time) BETWEEN ? AND ?
            ORDER BY a.check_in_time DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    pub async fn count_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance WHERE DATE(check_in_time) BETWEEN ? AND ?",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }

    pub async fn member_history(
        &self,
        member_id: i64,
        page: Option<LimitOffset>,
    ) -> Result<Vec<AttendanceRow>> {
        let page = page.unwrap_or_default();

        let rows = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT * FROM attendance
            WHERE member_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(member_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    pub async fn member_history_count(&self, member_id: i64) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE member_id = ?")
            .bind(member_id)
            .fetch_one(&self.db)
            .await?;

        Ok(total)
    }

    pub async fn member_summary(
        &self,
        member_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<AttendanceSummary> {
        let mut query = sqlx::QueryBuilder::new(
            r#"
            SELECT COUNT(*) AS total_visits,
                   COUNT(CASE WHEN check_out_time IS NOT NULL THEN 1 END) AS completed_visits,
                   COUNT(CASE WHEN check_out_time IS NULL
                              AND DATE(check_in_time) = DATE('now') THEN 1 END) AS current_checkin,
                   AVG(CASE WHEN check_out_time IS NOT NULL THEN
                       (julianday(check_out_time) - julianday(check_in_time)) * 24
                   END) AS avg_hours_per_visit
            FROM attendance
            WHERE member_id =
            "#,
        );
        query.push_bind(member_id);

        if let (Some(start), Some(end)) = (start, end) {
            query.push(" AND DATE(check_in_time) BETWEEN ");
            query.push_bind(start);
            query.push(" AND ");
            query.push_bind(end);
        }

        let summary = query
            .build_query_as::<AttendanceSummary>()
            .fetch_one(&self.db)
            .await?;

        Ok(summary)
    }

    /// Check-in/check-out counts per day over the last `days` days.
    pub async fn daily_stats(&self, days: i64) -> Result<Vec<DailyAttendanceStat>> {
        let rows = sqlx::query_as::<_, DailyAttendanceStat>(
            r#"
            SELECT DATE(check_in_time) AS date,
                   COUNT(*) AS checkins,
                   COUNT(CASE WHEN check_out_time IS NOT NULL THEN 1 END) AS checkouts
            FROM attendance
            WHERE DATE(check_in_time) >= DATE('now', '-' || ? || ' days')
            GROUP BY DATE(check_in_time)
            ORDER BY date DESC
            "#,
        )
        .bind(days)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
