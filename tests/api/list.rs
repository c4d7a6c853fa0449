use crate::helpers::{get_json_response_body, TestApp};
use serde_json::json;
use shift_exchange::domain::Capability;
use test_context::test_context;
use uuid::Uuid;

async fn seed_two_requests(app: &TestApp) -> (Uuid, Uuid) {
    let shift_one = app.seed_shift(1).await;
    let shift_two = app.seed_shift(1).await;
    let staff_a = app.staff_with(Capability::CreateTransfer);
    let staff_b = app.staff_with(Capability::CreateTransfer);
    app.seed_assignment(staff_a, shift_one, 1).await;

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_a,
            "shiftId": shift_one,
            "kind": "drop",
            "reason": "holiday"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_b,
            "shiftId": shift_two,
            "kind": "pickup",
            "reason": "extra hours"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    (staff_a, staff_b)
}

#[test_context(TestApp)]
#[tokio::test]
async fn lists_all_requests_for_the_venue(app: &mut TestApp) {
    seed_two_requests(app).await;
    let viewer = app.staff_with(Capability::ViewSchedule);

    let response = app
        .get_requests(&[
            ("venueId", app.venue_id.to_string()),
            ("actorId", viewer.to_string()),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response_body = get_json_response_body(response).await;
    let requests = response_body.get("requests").unwrap().as_array().unwrap();
    assert_eq!(requests.len(), 2);
}

#[test_context(TestApp)]
#[tokio::test]
async fn filters_requests_by_staff_and_kind(app: &mut TestApp) {
    let (staff_a, _staff_b) = seed_two_requests(app).await;
    let viewer = app.staff_with(Capability::ViewSchedule);

    let response = app
        .get_requests(&[
            ("venueId", app.venue_id.to_string()),
            ("actorId", viewer.to_string()),
            ("staffId", staff_a.to_string()),
        ])
        .await;
    let response_body = get_json_response_body(response).await;
    let requests = response_body.get("requests").unwrap().as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].get("kind").unwrap(), "drop");

    let response = app
        .get_requests(&[
            ("venueId", app.venue_id.to_string()),
            ("actorId", viewer.to_string()),
            ("kind", "pickup".to_string()),
        ])
        .await;
    let response_body = get_json_response_body(response).await;
    let requests = response_body.get("requests").unwrap().as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].get("kind").unwrap(), "pickup");
}

#[test_context(TestApp)]
#[tokio::test]
async fn filters_requests_by_status(app: &mut TestApp) {
    seed_two_requests(app).await;
    let viewer = app.staff_with(Capability::ViewSchedule);

    let response = app
        .get_requests(&[
            ("venueId", app.venue_id.to_string()),
            ("actorId", viewer.to_string()),
            ("status", "approved".to_string()),
        ])
        .await;
    let response_body = get_json_response_body(response).await;
    let requests = response_body.get("requests").unwrap().as_array().unwrap();
    assert!(requests.is_empty());

    let response = app
        .get_requests(&[
            ("venueId", app.venue_id.to_string()),
            ("actorId", viewer.to_string()),
            ("status", "pending".to_string()),
        ])
        .await;
    let response_body = get_json_response_body(response).await;
    let requests = response_body.get("requests").unwrap().as_array().unwrap();
    assert_eq!(requests.len(), 2);
}

#[test_context(TestApp)]
#[tokio::test]
async fn lists_swaps_for_the_venue(app: &mut TestApp) {
    let shift_one = app.seed_shift(1).await;
    let shift_two = app.seed_shift(1).await;
    let requester_id = app.staff_with(Capability::CreateTransfer);
    app.seed_assignment(requester_id, shift_one, 1).await;

    let response = app
        .post_create_swap(&json!({
            "venueId": app.venue_id,
            "requesterId": requester_id,
            "offeredShiftId": shift_one,
            "targetShiftId": shift_two,
            "reason": "trade?"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let viewer = app.staff_with(Capability::ViewSchedule);
    let response = app
        .get_swaps(&[
            ("venueId", app.venue_id.to_string()),
            ("actorId", viewer.to_string()),
            ("requesterId", requester_id.to_string()),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response_body = get_json_response_body(response).await;
    let swaps = response_body.get("swaps").unwrap().as_array().unwrap();
    assert_eq!(swaps.len(), 1);
    assert_eq!(
        swaps[0].get("requesterId").unwrap(),
        &json!(requester_id.to_string())
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn another_venue_sees_nothing(app: &mut TestApp) {
    seed_two_requests(app).await;
    let other_venue = Uuid::new_v4();
    let viewer = Uuid::new_v4();
    app.permission_gate.grant(
        &shift_exchange::domain::StaffId::new(viewer),
        &shift_exchange::domain::VenueId::new(other_venue),
        Capability::ViewSchedule,
    );

    let response = app
        .get_requests(&[
            ("venueId", other_venue.to_string()),
            ("actorId", viewer.to_string()),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response_body = get_json_response_body(response).await;
    let requests = response_body.get("requests").unwrap().as_array().unwrap();
    assert!(requests.is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_403_without_view_permission(app: &mut TestApp) {
    let response = app
        .get_requests(&[
            ("venueId", app.venue_id.to_string()),
            ("actorId", Uuid::new_v4().to_string()),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 403);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_status_filter(app: &mut TestApp) {
    let viewer = app.staff_with(Capability::ViewSchedule);

    let response = app
        .get_requests(&[
            ("venueId", app.venue_id.to_string()),
            ("actorId", viewer.to_string()),
            ("status", "resolved".to_string()),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 400);
}
