mod common;

use api::error::AppError;
use api::services::booking_service;
use common::*;
use infra::repos::bookings;

#[tokio::test]
async fn book_slot_reserves_a_seat() {
    let app_state = setup_test_db().await;
    let service_id = create_test_service(&app_state, "Yoga").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 10).await;
    let member_id = create_test_member(&app_state, "Alice", None).await;

    let booking_id = booking_service::book_slot(&app_state.db, member_id, schedule_id)
        .await
        .expect("booking should succeed");

    assert!(booking_id > 0);
    assert_eq!(booked_count(&app_state, schedule_id).await, 1);

    let active = bookings::list_active_for_member(&app_state.db, member_id)
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].booking_id, booking_id);
    assert_eq!(active[0].schedule_id, schedule_id);
}

#[tokio::test]
async fn book_slot_rejects_unknown_schedule() {
    let app_state = setup_test_db().await;
    let member_id = create_test_member(&app_state, "Alice", None).await;

    let err = booking_service::book_slot(&app_state.db, member_id, 9999)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn book_slot_rejects_full_class() {
    let app_state = setup_test_db().await;
    let service_id = create_test_service(&app_state, "Spin").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 1).await;
    let first = create_test_member(&app_state, "Alice", None).await;
    let second = create_test_member(&app_state, "Bob", None).await;

    booking_service::book_slot(&app_state.db, first, schedule_id)
        .await
        .expect("first booking should succeed");

    let err = booking_service::book_slot(&app_state.db, second, schedule_id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CapacityExceeded));
    // The failed attempt must not move the counter.
    assert_eq!(booked_count(&app_state, schedule_id).await, 1);
}

#[tokio::test]
async fn book_slot_rejects_double_booking() {
    let app_state = setup_test_db().await;
    let service_id = create_test_service(&app_state, "Pilates").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 10).await;
    let member_id = create_test_member(&app_state, "Alice", None).await;

    booking_service::book_slot(&app_state.db, member_id, schedule_id)
        .await
        .expect("first booking should succeed");

    let err = booking_service::book_slot(&app_state.db, member_id, schedule_id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AlreadyBooked));
    assert_eq!(booked_count(&app_state, schedule_id).await, 1);
}

#[tokio::test]
async fn cancel_releases_the_seat_and_allows_rebooking() {
    let app_state = setup_test_db().await;
    let service_id = create_test_service(&app_state, "Boxing").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 1).await;
    let alice = create_test_member(&app_state, "Alice", None).await;
    let bob = create_test_member(&app_state, "Bob", None).await;

    let booking_id = booking_service::book_slot(&app_state.db, alice, schedule_id)
        .await
        .unwrap();

    // Class is now full for Bob.
    assert!(matches!(
        booking_service::book_slot(&app_state.db, bob, schedule_id).await,
        Err(AppError::CapacityExceeded)
    ));

    booking_service::cancel_booking(&app_state.db, alice, booking_id)
        .await
        .expect("cancel should succeed");
    assert_eq!(booked_count(&app_state, schedule_id).await, 0);

    // The freed seat is available again, including to the same member.
    booking_service::book_slot(&app_state.db, bob, schedule_id)
        .await
        .expect("rebooking the freed seat should succeed");
    assert_eq!(booked_count(&app_state, schedule_id).await, 1);
}

#[tokio::test]
async fn cancel_keeps_the_row_with_cancelled_status() {
    let app_state = setup_test_db().await;
    let service_id = create_test_service(&app_state, "Zumba").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 5).await;
    let member_id = create_test_member(&app_state, "Alice", None).await;

    let booking_id = booking_service::book_slot(&app_state.db, member_id, schedule_id)
        .await
        .unwrap();
    booking_service::cancel_booking(&app_state.db, member_id, booking_id)
        .await
        .unwrap();

    let booking = bookings::get_by_id(&app_state.db, booking_id)
        .await
        .unwrap()
        .expect("cancelled booking row should still exist");
    assert_eq!(booking.status, "cancelled");

    let active = bookings::list_active_for_member(&app_state.db, member_id)
        .await
        .unwrap();
    assert!(active.is_empty());
}

#[tokio::test]
async fn cancel_rejects_other_members_booking() {
    let app_state = setup_test_db().await;
    let service_id = create_test_service(&app_state, "Crossfit").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 5).await;
    let alice = create_test_member(&app_state, "Alice", None).await;
    let bob = create_test_member(&app_state, "Bob", None).await;

    let booking_id = booking_service::book_slot(&app_state.db, alice, schedule_id)
        .await
        .unwrap();

    let err = booking_service::cancel_booking(&app_state.db, bob, booking_id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(booked_count(&app_state, schedule_id).await, 1);
}

#[tokio::test]
async fn cancel_twice_is_rejected_without_touching_the_counter() {
    let app_state = setup_test_db().await;
    let service_id = create_test_service(&app_state, "Swimming").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 5).await;
    let member_id = create_test_member(&app_state, "Alice", None).await;

    let booking_id = booking_service::book_slot(&app_state.db, member_id, schedule_id)
        .await
        .unwrap();
    booking_service::cancel_booking(&app_state.db, member_id, booking_id)
        .await
        .unwrap();

    let err = booking_service::cancel_booking(&app_state.db, member_id, booking_id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(booked_count(&app_state, schedule_id).await, 0);
}

#[tokio::test]
async fn cancel_rejects_unknown_booking() {
    let app_state = setup_test_db().await;
    let member_id = create_test_member(&app_state, "Alice", None).await;

    let err = booking_service::cancel_booking(&app_state.db, member_id, 9999)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn concurrent_bookings_for_the_last_seat_have_one_winner() {
    let app_state = setup_test_db().await;
    let service_id = create_test_service(&app_state, "HIIT").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 1).await;
    let alice = create_test_member(&app_state, "Alice", None).await;
    let bob = create_test_member(&app_state, "Bob", None).await;

    let (a, b) = tokio::join!(
        booking_service::book_slot(&app_state.db, alice, schedule_id),
        booking_service::book_slot(&app_state.db, bob, schedule_id),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one attempt should win the last seat");

    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser, Err(AppError::CapacityExceeded)));

    assert_eq!(booked_count(&app_state, schedule_id).await, 1);
}

#[tokio::test]
async fn concurrent_bookings_race_across_pooled_connections() {
    // A file-backed database with several connections lets both attempts
    // genuinely run at once; the loser must still see a capacity error,
    // never a locking failure.
    let app_state = setup_pooled_test_db().await;
    let service_id = create_test_service(&app_state, "Bootcamp").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 1).await;
    let alice = create_test_member(&app_state, "Alice", None).await;
    let bob = create_test_member(&app_state, "Bob", None).await;

    let (a, b) = tokio::join!(
        booking_service::book_slot(&app_state.db, alice, schedule_id),
        booking_service::book_slot(&app_state.db, bob, schedule_id),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one attempt should win the last seat");

    let loser = if a.is_ok() { b } else { a };
    assert!(
        matches!(loser, Err(AppError::CapacityExceeded)),
        "loser should see a capacity error, got {loser:?}"
    );

    assert_eq!(booked_count(&app_state, schedule_id).await, 1);
}

#[tokio::test]
async fn booked_count_matches_confirmed_bookings() {
    let app_state = setup_test_db().await;
    let service_id = create_test_service(&app_state, "Stretching").await;
    let schedule_id = create_test_schedule(&app_state, service_id, 10).await;

    let mut booking_ids = Vec::new();
    for name in ["Alice", "Bob", "Carol", "Dave"] {
        let member_id = create_test_member(&app_state, name, None).await;
        let id = booking_service::book_slot(&app_state.db, member_id, schedule_id)
            .await
            .unwrap();
        booking_ids.push((member_id, id));
    }

    let (member_id, booking_id) = booking_ids[1];
    booking_service::cancel_booking(&app_state.db, member_id, booking_id)
        .await
        .unwrap();

    let confirmed = bookings::count_confirmed_for_schedule(&app_state.db, schedule_id)
        .await
        .unwrap();
    assert_eq!(confirmed, 3);
    assert_eq!(booked_count(&app_state, schedule_id).await, confirmed);
}
