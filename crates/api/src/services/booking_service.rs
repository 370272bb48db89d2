use sqlx::SqlitePool;

use infra::repos::{bookings, schedules};

use crate::error::AppError;

/// Reserve a seat in a class for a member.
///
/// The capacity check, the booking insert and the counter increment run in
/// one transaction; on any failure the transaction is rolled back and the
/// specific reason is surfaced, so a failed attempt never moves booked_count.
///
/// The transaction takes the write lock up front (BEGIN IMMEDIATE). With a
/// deferred transaction two concurrent bookers both read the slot and the
/// second fails its lock upgrade with SQLITE_BUSY; immediate mode makes the
/// loser queue on busy_timeout and then see the committed state, so a full
/// class always surfaces as a capacity error.
pub async fn book_slot(
    pool: &SqlitePool,
    member_id: i64,
    schedule_id: i64,
) -> Result<i64, AppError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let slot = schedules::get_by_id(&mut *tx, schedule_id)
        .await?
        .ok_or_else(|| AppError::NotFound("schedule not found".to_string()))?;

    if slot.booked_count >= slot.capacity {
        tx.rollback().await?;
        return Err(AppError::CapacityExceeded);
    }

    let booking_id = match bookings::insert_confirmed(&mut *tx, member_id, schedule_id).await {
        Ok(id) => id,
        Err(e) => {
            tx.rollback().await?;
            if is_unique_violation(&e) {
                return Err(AppError::AlreadyBooked);
            }
            return Err(e.into());
        }
    };

    // Guarded increment: a concurrent booking may have taken the last seat
    // between our read and this write.
    let updated = schedules::increment_booked(&mut *tx, schedule_id).await?;
    if updated == 0 {
        tx.rollback().await?;
        return Err(AppError::CapacityExceeded);
    }

    tx.commit().await?;

    tracing::debug!(member_id, schedule_id, booking_id, "booking confirmed");

    Ok(booking_id)
}

/// Cancel a member's booking and release the seat.
///
/// Soft-cancel: the booking row is kept with status `cancelled`. The status
/// flip and the counter decrement commit together or not at all.
pub async fn cancel_booking(
    pool: &SqlitePool,
    member_id: i64,
    booking_id: i64,
) -> Result<(), AppError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let booking = bookings::get_by_id(&mut *tx, booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("booking not found".to_string()))?;

    if booking.member_id != member_id {
        tx.rollback().await?;
        return Err(AppError::Forbidden(
            "you do not have permission to cancel this booking".to_string(),
        ));
    }

    if booking.status != "confirmed" {
        tx.rollback().await?;
        return Err(AppError::BadRequest(
            "booking is already cancelled".to_string(),
        ));
    }

    bookings::mark_cancelled(&mut *tx, booking_id).await?;

    // Floored at zero; a cancelled booking held a seat, so this normally
    // decrements by exactly one.
    schedules::decrement_booked(&mut *tx, booking.schedule_id).await?;

    tx.commit().await?;

    tracing::debug!(member_id, booking_id, "booking cancelled");

    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
