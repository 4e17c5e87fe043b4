//! Tests for the event service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockEventRepository;
use crate::domain::{ErrorCode, EventDetails, GeoPoint, UserId};

fn event_at(longitude: f64, latitude: f64) -> Event {
    let details = EventDetails::new(
        "Gig",
        "Live music",
        None,
        GeoPoint::new(longitude, latitude).expect("valid point"),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid date"),
    )
    .expect("valid details");
    Event::new(EventId::random(), details, BTreeSet::new())
}

#[fixture]
fn gig_draft() -> EventDraft {
    EventDraft {
        name: Some("Gig".to_owned()),
        description: Some("Live music".to_owned()),
        address: None,
        longitude: Some(2.35),
        latitude: Some(48.85),
        date: Some("2024-01-01".to_owned()),
    }
}

fn service(repo: MockEventRepository) -> EventService<MockEventRepository> {
    EventService::new(Arc::new(repo), ZoomRadii::default())
}

#[rstest]
#[tokio::test]
async fn create_persists_event_without_waiters(gig_draft: EventDraft) {
    let mut repo = MockEventRepository::new();
    repo.expect_create()
        .times(1)
        .withf(|event| event.waiters().is_empty() && event.details().name() == "Gig")
        .return_once(|_| Ok(()));

    let event = service(repo)
        .create_event(gig_draft)
        .await
        .expect("create succeeds");

    assert_eq!(event.details().location().latitude(), 48.85);
    assert!(event.waiters().is_empty());
}

#[rstest]
#[tokio::test]
async fn create_reports_every_cause_and_persists_nothing() {
    let mut repo = MockEventRepository::new();
    repo.expect_create().times(0);

    let error = service(repo)
        .create_event(EventDraft {
            description: Some("Live music".to_owned()),
            date: Some("someday".to_owned()),
            ..EventDraft::default()
        })
        .await
        .expect_err("invalid draft");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Create event failed");
    assert_eq!(
        error.causes(),
        [
            "A name is required",
            "A location is required",
            "A valid date is required"
        ]
    );
}

#[rstest]
#[tokio::test]
async fn create_maps_connection_error_to_service_unavailable(gig_draft: EventDraft) {
    let mut repo = MockEventRepository::new();
    repo.expect_create()
        .times(1)
        .return_once(|_| Err(EventRepositoryError::connection("pool unavailable")));

    let error = service(repo)
        .create_event(gig_draft)
        .await
        .expect_err("service unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(error.message(), "Create event failed");
}

#[rstest]
#[tokio::test]
async fn get_returns_not_found_when_missing() {
    let mut repo = MockEventRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = service(repo)
        .get_event(&EventId::random())
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.causes(), ["Event not found"]);
}

#[rstest]
#[tokio::test]
async fn get_maps_query_error_to_internal() {
    let mut repo = MockEventRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Err(EventRepositoryError::query("syntax error")));

    let error = service(repo)
        .get_event(&EventId::random())
        .await
        .expect_err("internal");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn list_returns_every_event() {
    let stored = vec![event_at(0.0, 0.0), event_at(10.0, 10.0)];
    let expected = stored.clone();
    let mut repo = MockEventRepository::new();
    repo.expect_list_all().times(1).return_once(move || Ok(stored));

    let events = service(repo).list_events().await.expect("list succeeds");

    assert_eq!(events, expected);
}

#[rstest]
#[tokio::test]
async fn near_filters_candidates_by_exact_distance() {
    let origin = GeoPoint::new(0.0, 0.0).expect("valid");
    let inside = event_at(0.0, 0.05);
    let outside = event_at(0.09, 0.09);
    let candidates = vec![inside.clone(), outside];
    let radii = ZoomRadii::new(vec![10_000.0]).expect("valid table");

    let mut repo = MockEventRepository::new();
    repo.expect_list_within()
        .times(1)
        .withf(|bounds| bounds.contains(&GeoPoint::new(0.0, 0.0).expect("valid")))
        .return_once(move |_| Ok(candidates));

    let events = EventService::new(Arc::new(repo), radii)
        .events_near(NearbyEventsRequest {
            center: origin,
            zoom: 1,
        })
        .await
        .expect("near succeeds");

    assert_eq!(events, vec![inside]);
}

#[rstest]
#[tokio::test]
async fn near_includes_event_exactly_on_the_radius() {
    let origin = GeoPoint::new(0.0, 0.0).expect("valid");
    let edge = event_at(0.0, 1.0);
    let radius = origin.distance_to(edge.details().location());
    let candidates = vec![edge.clone()];

    let mut repo = MockEventRepository::new();
    repo.expect_list_within()
        .times(1)
        .return_once(move |_| Ok(candidates));

    let events = EventService::new(
        Arc::new(repo),
        ZoomRadii::new(vec![radius]).expect("valid table"),
    )
    .events_near(NearbyEventsRequest {
        center: origin,
        zoom: 1,
    })
    .await
    .expect("near succeeds");

    assert_eq!(events, vec![edge]);
}

#[rstest]
#[case(0)]
#[case(21)]
#[tokio::test]
async fn near_rejects_zoom_outside_table(#[case] zoom: u32) {
    let mut repo = MockEventRepository::new();
    repo.expect_list_within().times(0);

    let error = service(repo)
        .events_near(NearbyEventsRequest {
            center: GeoPoint::new(0.0, 0.0).expect("valid"),
            zoom,
        })
        .await
        .expect_err("zoom out of range");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Get Event Near Location failed");
    assert_eq!(
        error.causes(),
        [format!("zoom level {zoom} is outside the configured range 1..=20")]
    );
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_event_is_not_found() {
    let mut repo = MockEventRepository::new();
    repo.expect_delete().times(1).return_once(|_| Ok(false));

    let error = service(repo)
        .delete_event(&EventId::random())
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_succeeds_for_existing_event() {
    let target = EventId::random();
    let mut repo = MockEventRepository::new();
    repo.expect_delete()
        .times(1)
        .withf(move |id| *id == target)
        .return_once(|_| Ok(true));

    service(repo)
        .delete_event(&target)
        .await
        .expect("delete succeeds");
}

#[rstest]
fn waiters_are_kept_on_rehydrated_events() {
    let waiter = UserId::random();
    let base = event_at(1.0, 1.0);
    let event = Event::new(
        *base.id(),
        base.details().clone(),
        BTreeSet::from([waiter]),
    );
    assert!(event.has_waiter(&waiter));
}
