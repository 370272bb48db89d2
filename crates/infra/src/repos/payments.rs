use chrono::NaiveDate;
use sqlx::{Result, SqliteExecutor, SqlitePool};

use crate::{
    models::{MemberWithPlan, PaymentRow, PaymentWithMember},
    pagination::LimitOffset,
};

#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub member_id: Option<i64>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub member_id: i64,
    pub amount: f64,
    pub payment_type: String,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub status: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePayment {
    pub amount: Option<f64>,
    pub payment_type: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
}

/// One row per day of payment activity.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct DailyPaymentStat {
    pub date: NaiveDate,
    pub payment_count: i64,
    pub total_amount: f64,
    pub successful_payments: i64,
    pub successful_amount: f64,
}

pub struct PaymentRepo {
    db: SqlitePool,
}

impl PaymentRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        filter: PaymentFilter,
        page: Option<LimitOffset>,
    ) -> Result<Vec<PaymentWithMember>> {
        let page = page.unwrap_or_default();

        let mut query = sqlx::QueryBuilder::new(
            r#"
            SELECT p.*, m.name AS member_name, m.email AS member_email
            FROM payments p
            JOIN members m ON p.member_id = m.id
            WHERE 1=1
            "#,
        );
        push_payment_filter(&mut query, &filter);
        query.push(" ORDER BY p.payment_date DESC LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        let rows = query
            .build_query_as::<PaymentWithMember>()
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    pub async fn count(&self, filter: PaymentFilter) -> Result<i64> {
        let mut query = sqlx::QueryBuilder::new(
            "SELECT COUNT(*) FROM payments p JOIN members m ON p.member_id = m.id WHERE 1=1",
        );
        push_payment_filter(&mut query, &filter);

        let total: i64 = query.build_query_scalar().fetch_one(&self.db).await?;

        Ok(total)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<PaymentWithMember>> {
        let row = sqlx::query_as::<_, PaymentWithMember>(
            r#"
            SELECT p.*, m.name AS member_name, m.email AS member_email
            FROM payments p
            JOIN members m ON p.member_id = m.id
            WHERE p.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn update(&self, id: i64, data: UpdatePayment) -> Result<Option<PaymentRow>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            UPDATE payments
            SET amount = COALESCE(?, amount),
                payment_type = COALESCE(?, payment_type),
                payment_method = COALESCE(?, payment_method),
                transaction_id = COALESCE(?, transaction_id),
                status = COALESCE(?, status),
                description = COALESCE(?, description)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(data.amount)
        .bind(&data.payment_type)
        .bind(&data.payment_method)
        .bind(&data.transaction_id)
        .bind(&data.status)
        .bind(&data.description)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn member_history(
        &self,
        member_id: i64,
        page: Option<LimitOffset>,
    ) -> Result<Vec<PaymentRow>> {
        let page = page.unwrap_or_default();

        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT * FROM payments
            WHERE member_id = ?
            ORDER BY payment_date DESC
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
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE member_id = ?")
            .bind(member_id)
            .fetch_one(&self.db)
            .await?;

        Ok(total)
    }

    /// Daily payment activity over the last `days` days.
    pub async fn daily_stats(&self, days: i64) -> Result<Vec<DailyPaymentStat>> {
        let rows = sqlx::query_as::<_, DailyPaymentStat>(
            r#"
            SELECT DATE(payment_date) AS date,
                   COUNT(*) AS payment_count,
                   COALESCE(SUM(amount), 0) AS total_amount,
                   COUNT(CASE WHEN status = 'success' THEN 1 END) AS successful_payments,
                   COALESCE(SUM(CASE WHEN status = 'success' THEN amount ELSE 0 END), 0) AS successful_amount
            FROM payments
            WHERE DATE(payment_date) >= DATE('now', '-' || ? || ' days')
            GROUP BY DATE(payment_date)
            ORDER BY date DESC
            "#,
        )
        .bind(days)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Members flagged overdue, or past their due date without having paid.
    pub async fn overdue_members(&self, today: NaiveDate) -> Result<Vec<MemberWithPlan>> {
        let rows = sqlx::query_as::<_, MemberWithPlan>(
            r#"
            SELECT m.*, p.name AS plan_name, p.price AS plan_price, p.duration_months
            FROM members m
            LEFT JOIN plans p ON m.plan_id = p.id
            WHERE m.payment_status = 'overdue'
               OR (m.payment_due_date < ? AND m.payment_status != 'paid')
            ORDER BY m.payment_due_date ASC
            "#,
        )
        .bind(today)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

pub async fn insert<'e>(executor: impl SqliteExecutor<'e>, data: &CreatePayment) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO payments (
            member_id, amount, payment_type, payment_method,
            transaction_id, status, description, due_date
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(data.member_id)
    .bind(data.amount)
    .bind(&data.payment_type)
    .bind(&data.payment_method)
    .bind(&data.transaction_id)
    .bind(&data.status)
    .bind(&data.description)
    .bind(data.due_date)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Mark a member paid up through the given due date.
pub async fn mark_member_paid<'e>(
    executor: impl SqliteExecutor<'e>,
    member_id: i64,
    due_date: Option<NaiveDate>,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE members
        SET payment_status = 'paid',
            payment_due_date = COALESCE(?, payment_due_date),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(due_date)
    .bind(member_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

fn push_payment_filter(query: &mut sqlx::QueryBuilder<'_, sqlx::Sqlite>, filter: &PaymentFilter) {
    if let Some(member_id) = filter.member_id {
        query.push(" AND p.member_id = ");
        query.push_bind(member_id);
    }

    if let Some(status) = &filter.status {
        query.push(" AND p.status = ");
        query.push_bind(status.clone());
    }

    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        query.push(" AND DATE(p.payment_date) BETWEEN ");
        query.push_bind(start);
        query.push(" AND ");
        query.push_bind(end);
    }
}
