use chrono::{Months, NaiveDate, Utc};
use rand::RngExt;
use sqlx::SqlitePool;
use uuid::Uuid;

use infra::repos::{payments, CreatePayment};

use crate::error::AppError;

pub struct ProcessPaymentParams {
    pub member_id: i64,
    pub amount: f64,
    pub payment_type: String,
    pub payment_method: Option<String>,
}

pub struct ProcessPaymentResult {
    pub payment_id: i64,
    pub transaction_id: String,
}

/// Record a manually entered payment. A successful payment also marks the
/// member paid, in the same transaction.
pub async fn record_payment(pool: &SqlitePool, data: CreatePayment) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;

    let payment_id = payments::insert(&mut *tx, &data).await?;

    if data.status == "success" {
        payments::mark_member_paid(&mut *tx, data.member_id, data.due_date).await?;
    }

    tx.commit().await?;

    Ok(payment_id)
}

/// Run a charge through the payment gateway and record the outcome.
///
/// The gateway is simulated: roughly 9 in 10 charges clear. A declined charge
/// leaves no payment row and no member update.
pub async fn process_payment(
    pool: &SqlitePool,
    params: ProcessPaymentParams,
) -> Result<ProcessPaymentResult, AppError> {
    let cleared = rand::rng().random_bool(0.9);
    if !cleared {
        return Err(AppError::BadRequest(
            "payment declined by gateway".to_string(),
        ));
    }

    let transaction_id = format!("TXN-{}", Uuid::new_v4().simple());
    let due_date = next_due_date(Utc::now().date_naive());

    let data = CreatePayment {
        member_id: params.member_id,
        amount: params.amount,
        payment_type: params.payment_type.clone(),
        payment_method: params.payment_method,
        transaction_id: Some(transaction_id.clone()),
        status: "success".to_string(),
        description: Some(format!("{} payment for membership", params.payment_type)),
        due_date: Some(due_date),
    };

    let mut tx = pool.begin().await?;
    let payment_id = payments::insert(&mut *tx, &data).await?;
    payments::mark_member_paid(&mut *tx, params.member_id, Some(due_date)).await?;
    tx.commit().await?;

    tracing::info!(member_id = params.member_id, payment_id, %transaction_id, "payment processed");

    Ok(ProcessPaymentResult {
        payment_id,
        transaction_id,
    })
}

/// One month out, clamped at month ends (Jan 31 -> Feb 28).
fn next_due_date(from: NaiveDate) -> NaiveDate {
    from.checked_add_months(Months::new(1)).unwrap_or(from)
}

#[cfg(test)]
mod tests {
    use super::next_due_date;
    use chrono::NaiveDate;

    #[test]
    fn due_date_advances_one_month() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(next_due_date(d), NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());
    }

    #[test]
    fn due_date_clamps_at_month_end() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(next_due_date(d), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
