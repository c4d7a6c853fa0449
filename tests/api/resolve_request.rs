use crate::helpers::{get_json_response_body, TestApp};
use serde_json::json;
use shift_exchange::domain::Capability;
use test_context::test_context;
use uuid::Uuid;

async fn create_pickup_request(
    app: &TestApp,
    staff_id: Uuid,
    shift_id: Uuid,
) -> String {
    let response = app
        .post_create_request(&json!({
            "venueId": app.venue_id,
            "staffId": staff_id,
            "shiftId": shift_id,
            "kind": "pickup",
            "reason": "open slot"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    get_json_response_body(response)
        .await
        .get("id")
        .unwrap()
        .as_str()
        .unwrap()
        .to_owned()
}

#[test_context(TestApp)]
#[tokio::test]
async fn approved_pickup_assigns_the_staff_member(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);
    let approver_id = app.staff_with(Capability::ResolveTransfer);
    let request_id = create_pickup_request(app, staff_id, shift_id).await;

    let response = app
        .post_resolve_request(&json!({
            "requestId": request_id,
            "decision": "approved",
            "note": "welcome aboard",
            "approverId": approver_id
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response_body = get_json_response_body(response).await;
    assert_eq!(response_body.get("status").unwrap(), "approved");
    assert_eq!(
        response_body.get("approverId").unwrap(),
        &json!(approver_id.to_string())
    );
    assert_eq!(response_body.get("responseNote").unwrap(), "welcome aboard");
    assert!(response_body.get("resolvedAt").unwrap().is_string());

    assert!(app.is_assigned(staff_id, shift_id).await);
}

#[test_context(TestApp)]
#[tokio::test]
async fn denied_request_leaves_the_ledger_untouched(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);
    let approver_id = app.staff_with(Capability::ResolveTransfer);
    let request_id = create_pickup_request(app, staff_id, shift_id).await;

    let response = app
        .post_resolve_request(&json!({
            "requestId": request_id,
            "decision": "denied",
            "note": "we need you elsewhere",
            "approverId": approver_id
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response_body = get_json_response_body(response).await;
    assert_eq!(response_body.get("status").unwrap(), "denied");
    assert!(!app.is_assigned(staff_id, shift_id).await);
}

#[test_context(TestApp)]
#[tokio::test]
async fn losing_approval_is_denied_with_system_note(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;
    let staff_a = app.staff_with(Capability::CreateTransfer);
    let staff_b = app.staff_with(Capability::CreateTransfer);
    let approver_id = app.staff_with(Capability::ResolveTransfer);
    let request_a = create_pickup_request(app, staff_a, shift_id).await;
    let request_b = create_pickup_request(app, staff_b, shift_id).await;

    let response = app
        .post_resolve_request(&json!({
            "requestId": request_a,
            "decision": "approved",
            "approverId": approver_id
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .post_resolve_request(&json!({
            "requestId": request_b,
            "decision": "approved",
            "approverId": approver_id
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response_body = get_json_response_body(response).await;
    assert_eq!(response_body.get("status").unwrap(), "denied");
    let note = response_body
        .get("responseNote")
        .unwrap()
        .as_str()
        .unwrap();
    assert!(note.contains("shift full"), "note was: {note}");

    assert!(app.is_assigned(staff_a, shift_id).await);
    assert!(!app.is_assigned(staff_b, shift_id).await);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_request(app: &mut TestApp) {
    let approver_id = app.staff_with(Capability::ResolveTransfer);

    let response = app
        .post_resolve_request(&json!({
            "requestId": Uuid::new_v4(),
            "decision": "approved",
            "approverId": approver_id
        }))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_when_resolving_twice(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);
    let approver_id = app.staff_with(Capability::ResolveTransfer);
    let request_id = create_pickup_request(app, staff_id, shift_id).await;

    let body = json!({
        "requestId": request_id,
        "decision": "denied",
        "approverId": approver_id
    });

    let response = app.post_resolve_request(&body).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.post_resolve_request(&body).await;
    assert_eq!(response.status().as_u16(), 409);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_403_without_permission(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);
    let request_id = create_pickup_request(app, staff_id, shift_id).await;

    // CreateTransfer does not imply ResolveTransfer
    let response = app
        .post_resolve_request(&json!({
            "requestId": request_id,
            "decision": "approved",
            "approverId": staff_id
        }))
        .await;
    assert_eq!(response.status().as_u16(), 403);
    assert!(!app.is_assigned(staff_id, shift_id).await);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_decision(app: &mut TestApp) {
    let shift_id = app.seed_shift(1).await;
    let staff_id = app.staff_with(Capability::CreateTransfer);
    let approver_id = app.staff_with(Capability::ResolveTransfer);
    let request_id = create_pickup_request(app, staff_id, shift_id).await;

    let response = app
        .post_resolve_request(&json!({
            "requestId": request_id,
            "decision": "maybe",
            "approverId": approver_id
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}
