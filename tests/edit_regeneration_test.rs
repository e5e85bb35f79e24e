//! Edit-session and regeneration flow: a reorder that silently introduces a
//! conflict, the save that catches it, and the regeneration pass that
//! produces a clean schedule while keeping the user's activities and order.

use chrono::{NaiveDate, NaiveTime};
use itinerary_engine::{
    validate_activities, Activity, ActivityLocation, ActivityType, DayEditSession, DaySlot, Pace,
    RegenerationService, SaveError, TripRequest, TripType, ValidationError,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn activity(name: &str, time: NaiveTime, duration: u32) -> Activity {
    Activity::new(
        time,
        name,
        "test",
        ActivityType::Attraction,
        duration,
        15.0,
        ActivityLocation::placeholder("Kyoto"),
    )
}

fn day(activities: Vec<Activity>) -> DaySlot {
    let mut slot = DaySlot::new(1, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(), None);
    slot.set_activities(activities);
    slot
}

fn request() -> TripRequest {
    TripRequest {
        destination_summary: "Kyoto".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 9, 3).unwrap(),
        budget: 50_000.0,
        pace: Pace::Balanced,
        interests: vec![],
        trip_type: TripType::Single,
        destinations: vec![],
    }
}

#[tokio::test]
async fn edit_conflict_blocks_save_and_regeneration_repairs_it() {
    let mut session = DayEditSession::new(day(vec![
        activity("Morning market", t(9, 0), 90),
        activity("Castle tour", t(11, 0), 120),
        activity("Dinner", t(18, 0), 90),
    ]));

    // The user drags dinner to the front and retimes it into the morning.
    // The market (9:00 to 10:30) is still running when the retimed dinner
    // starts, so the working copy now carries a conflict.
    session.begin_edit().unwrap();
    session.reorder_activity(2, 0).unwrap();
    let dinner_id = session.working_activities().unwrap()[0].id.clone();
    session
        .update_activity(
            &dinner_id,
            itinerary_engine::ActivityPatch {
                time: Some(t(9, 30)),
                ..Default::default()
            },
        )
        .unwrap();

    let save_errors = match session.save() {
        Err(SaveError::Invalid(errors)) => errors,
        other => panic!("expected a blocked save, got {:?}", other.map(|_| ())),
    };
    assert!(save_errors
        .iter()
        .any(|e| matches!(e, ValidationError::TimeConflict { .. })));

    // Regeneration takes the working copy and retimes it in user order.
    let working = session.working_activities().unwrap().to_vec();
    let service = RegenerationService::with_client(None);
    let regenerated = service
        .regenerate(&request(), session.day(), working, None)
        .await
        .unwrap();

    assert!(validate_activities(&regenerated.activities).is_empty());
    let names: Vec<&str> = regenerated
        .activities
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["Dinner", "Morning market", "Castle tour"]);

    // First activity keeps its start; the rest follow with 30-minute buffers.
    assert_eq!(regenerated.activities[0].time, t(9, 30));
    assert_eq!(regenerated.activities[1].time, t(11, 30));
    assert_eq!(regenerated.activities[2].time, t(13, 30));

    session.replace_day(regenerated);
    assert!(!session.has_unsaved_changes());
    assert_eq!(session.day().total_duration_minutes, 300);
}

#[tokio::test]
async fn regeneration_returns_structural_errors_instead_of_running() {
    let service = RegenerationService::with_client(None);
    let mut nameless = activity("", t(9, 0), 60);
    nameless.duration_minutes = 600;

    let errors = service
        .regenerate(&request(), &day(vec![]), vec![nameless], None)
        .await
        .unwrap_err();

    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::MissingName { .. })));
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::DurationOutOfBounds { .. })));
}

#[test]
fn one_pass_reports_conflict_and_missing_name_together() {
    let activities = vec![
        activity("Museum", t(9, 0), 120),
        activity("", t(10, 0), 30),
    ];
    let errors = validate_activities(&activities);

    assert_eq!(errors.len(), 2);
    match &errors[0] {
        ValidationError::TimeConflict { first, second } => {
            assert_eq!(first, "Museum");
            assert_eq!(second, "activity 2");
        }
        other => panic!("expected a time conflict first, got {:?}", other),
    }
    assert!(matches!(errors[1], ValidationError::MissingName { .. }));
}
