use crate::helpers::{get_json_response_body, TestApp};
use serde_json::json;
use shift_exchange::domain::Capability;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_for_valid_pickup_request(app: &mut TestApp) {
    let shift_id = app.seed_shift(2).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);

    let schema = json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "description": "",
      "type": "object",
      "properties": {
        "id": {
          "type": "string",
          "minLength": 36,
          "maxLength": 36
        },
        "venueId": {
          "type": "string",
          "minLength": 36,
          "maxLength": 36
        },
        "staffId": {
          "type": "string",
          "minLength": 36,
          "maxLength": 36
        },
        "shiftId": {
          "type": "string",
          "minLength": 36,
          "maxLength": 36
        },
        "kind": {
          "type": "string",
          "enum": ["drop", "pickup"]
        },
        "status": {
          "type": "string",
          "enum": ["pending", "approved", "denied"]
        },
        "reason": {
          "type": "string"
        }
      },
      "required": [
        "id",
        "venueId",
        "staffId",
        "shiftId",
        "kind",
        "status",
        "reason"
      ]
    });

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_id,
            "shiftId": shift_id,
            "kind": "pickup",
            "reason": "free that evening"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let response_body = get_json_response_body(response).await;
    assert!(
        jsonschema::is_valid(&schema, &response_body),
        "response does not match schema"
    );
    assert_eq!(response_body.get("status").unwrap(), "pending");
    assert_eq!(
        response_body.get("staffId").unwrap(),
        &json!(staff_id.to_string())
    );
    assert!(uuid::Uuid::try_parse(
        response_body.get("id").unwrap().as_str().unwrap()
    )
    .is_ok());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_kind(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_id,
            "shiftId": shift_id,
            "kind": "trade",
            "reason": "bad kind"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_for_malformed_body(app: &mut TestApp) {
    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "kind": "pickup"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 422);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_403_without_permission(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": Uuid::new_v4(),
            "shiftId": shift_id,
            "kind": "pickup",
            "reason": "no grant"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 403);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_shift(app: &mut TestApp) {
    let staff_id = app.staff_with(Capability::CreateTransfer);

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_id,
            "shiftId": Uuid::new_v4(),
            "kind": "pickup",
            "reason": "no such shift"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_shift_at_another_venue(app: &mut TestApp) {
    let other_venue = Uuid::new_v4();
    let shift_id = app.seed_shift_at(other_venue, 1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_id,
            "shiftId": shift_id,
            "kind": "pickup",
            "reason": "wrong venue"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_for_drop_without_assignment(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_id,
            "shiftId": shift_id,
            "kind": "drop",
            "reason": "not mine"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 409);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_for_pickup_on_full_shift(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;
    app.seed_assignment(Uuid::new_v4(), shift_id, 1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_id,
            "shiftId": shift_id,
            "kind": "pickup",
            "reason": "too late"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 409);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_for_second_pending_transfer(app: &mut TestApp) {
    let shift_one = app.seed_shift(1).await;
    let shift_two = app.seed_shift(1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);
    app.seed_assignment(staff_id, shift_one, 1).await;

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_id,
            "shiftId": shift_one,
            "kind": "drop",
            "reason": "first"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_id,
            "shiftId": shift_two,
            "kind": "pickup",
            "reason": "second"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 409);
}
