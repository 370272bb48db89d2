use sqlx::{Result, SqliteExecutor, SqlitePool};

use crate::models::{BookingRow, BookingWithSchedule};

pub async fn get_by_id<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<Option<BookingRow>> {
    let row = sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(row)
}

/// Insert a confirmed booking. A unique-violation here means the member
/// already holds an active booking for the slot.
pub async fn insert_confirmed<'e>(
    executor: impl SqliteExecutor<'e>,
    member_id: i64,
    schedule_id: i64,
) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO bookings (member_id, schedule_id, status)
        VALUES (?, ?, 'confirmed')
        RETURNING id
        "#,
    )
    .bind(member_id)
    .bind(schedule_id)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Soft-cancel; the row is kept for auditability.
pub async fn mark_cancelled<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> Result<u64> {
    let result = sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// A member's active bookings joined to their slots, newest class first.
pub async fn list_active_for_member(
    pool: &SqlitePool,
    member_id: i64,
) -> Result<Vec<BookingWithSchedule>> {
    let rows = sqlx::query_as::<_, BookingWithSchedule>(
        r#"
        SELECT b.id AS booking_id, b.status,
               sch.id AS schedule_id, sch.service_id, sch.trainer_id,
               sch.start_time, sch.end_time, sch.capacity, sch.booked_count,
               sv.name AS service_name, e.name AS trainer_name
        FROM bookings b
        JOIN class_schedules sch ON b.schedule_id = sch.id
        JOIN services sv ON sch.service_id = sv.id
        LEFT JOIN employees e ON sch.trainer_id = e.id
        WHERE b.member_id = ? AND b.status = 'confirmed'
        ORDER BY sch.start_time DESC
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count of confirmed bookings for a slot; used to cross-check the cached
/// booked_count.
pub async fn count_confirmed_for_schedule<'e>(
    executor: impl SqliteExecutor<'e>,
    schedule_id: i64,
) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bookings WHERE schedule_id = ? AND status = 'confirmed'",
    )
    .bind(schedule_id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}
