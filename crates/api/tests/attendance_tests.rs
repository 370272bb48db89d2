mod common;

use common::*;
use infra::repos::AttendanceRepo;

#[tokio::test]
async fn check_in_opens_a_visit_for_today() {
    let app_state = setup_test_db().await;
    let member_id = create_test_member(&app_state, "Alice", None).await;
    let repo = AttendanceRepo::new(app_state.db.clone());

    assert!(repo.open_checkin_today(member_id).await.unwrap().is_none());

    let record = repo.check_in(member_id).await.unwrap();
    assert_eq!(record.member_id, member_id);
    assert!(record.check_out_time.is_none());

    let open = repo
        .open_checkin_today(member_id)
        .await
        .unwrap()
        .expect("the visit should count as open");
    assert_eq!(open.id, record.id);
}

#[tokio::test]
async fn check_out_closes_the_open_visit() {
    let app_state = setup_test_db().await;
    let member_id = create_test_member(&app_state, "Alice", None).await;
    let repo = AttendanceRepo::new(app_state.db.clone());

    let record = repo.check_in(member_id).await.unwrap();
    let closed = repo
        .check_out(record.id)
        .await
        .unwrap()
        .expect("record should exist");

    assert!(closed.check_out_time.is_some());
    assert!(repo.open_checkin_today(member_id).await.unwrap().is_none());
}

#[tokio::test]
async fn check_out_of_unknown_record_returns_none() {
    let app_state = setup_test_db().await;
    let repo = AttendanceRepo::new(app_state.db.clone());

    assert!(repo.check_out(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn todays_attendance_lists_member_names() {
    let app_state = setup_test_db().await;
    let alice = create_test_member(&app_state, "Alice", None).await;
    let bob = create_test_member(&app_state, "Bob", None).await;
    let repo = AttendanceRepo::new(app_state.db.clone());

    repo.check_in(alice).await.unwrap();
    repo.check_in(bob).await.unwrap();

    let today = repo.today().await.unwrap();
    assert_eq!(today.len(), 2);
    let names: Vec<_> = today.iter().map(|a| a.member_name.as_str()).collect();
    assert!(names.contains(&"Alice"));
    assert!(names.contains(&"Bob"));
}

#[tokio::test]
async fn member_summary_counts_visits() {
    let app_state = setup_test_db().await;
    let member_id = create_test_member(&app_state, "Alice", None).await;
    let repo = AttendanceRepo::new(app_state.db.clone());

    let first = repo.check_in(member_id).await.unwrap();
    repo.check_out(first.id).await.unwrap();
    repo.check_in(member_id).await.unwrap();

    let summary = repo.member_summary(member_id, None, None).await.unwrap();
    assert_eq!(summary.total_visits, 2);
    assert_eq!(summary.completed_visits, 1);
    assert_eq!(summary.current_checkin, 1);
}

#[tokio::test]
async fn daily_stats_include_todays_visits() {
    let app_state = setup_test_db().await;
    let member_id = create_test_member(&app_state, "Alice", None).await;
    let repo = AttendanceRepo::new(app_state.db.clone());

    let record = repo.check_in(member_id).await.unwrap();
    repo.check_out(record.id).await.unwrap();

    let stats = repo.daily_stats(7).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].checkins, 1);
    assert_eq!(stats[0].checkouts, 1);
}
