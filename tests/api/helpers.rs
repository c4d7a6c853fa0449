use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::Value;
use shift_exchange::{
    app_state::{
        AppState, AssignmentStoreType, ShiftStoreType, TransferStoreType,
    },
    domain::{
        AssignmentStore, Capability, Headcount, Shift, ShiftId, ShiftRole,
        ShiftStore, StaffId, VenueId,
    },
    services::{
        data_stores::{
            HashmapAssignmentStore, HashmapShiftStore, HashmapTransferStore,
        },
        HashsetPermissionGate,
    },
    utils::constants::test,
    Application,
};
use test_context::AsyncTestContext;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Full application over in-memory stores and a local permission gate, so
/// the suite exercises the real HTTP surface without external services.
pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub shift_store: ShiftStoreType,
    pub assignment_store: AssignmentStoreType,
    pub transfer_store: TransferStoreType,
    pub permission_gate: Arc<HashsetPermissionGate>,
    pub venue_id: Uuid,
}

impl TestApp {
    pub async fn new() -> Self {
        let shift_store: ShiftStoreType =
            Arc::new(RwLock::new(HashmapShiftStore::default()));
        let assignment_store: AssignmentStoreType =
            Arc::new(RwLock::new(HashmapAssignmentStore::default()));
        let transfer_store: TransferStoreType =
            Arc::new(RwLock::new(HashmapTransferStore::default()));
        let permission_gate = Arc::new(HashsetPermissionGate::default());

        let app_state = AppState::new(
            shift_store.clone(),
            assignment_store.clone(),
            transfer_store.clone(),
            permission_gate.clone(),
        );

        let app = Application::build(app_state, test::APP_ADDRESS)
            .await
            .expect("Failed to build app");
        let address = format!("http://{}", app.address.clone());

        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run());

        let http_client = reqwest::Client::new();

        Self {
            address,
            http_client,
            shift_store,
            assignment_store,
            transfer_store,
            permission_gate,
            venue_id: Uuid::new_v4(),
        }
    }

    pub async fn post_create_request<Body>(
        &self,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/schedule/create-request", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_resolve_request<Body>(
        &self,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/schedule/resolve-request", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_create_swap<Body>(
        &self,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/schedule/create-swap", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_resolve_swap<Body>(
        &self,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/schedule/resolve-swap", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_requests(
        &self,
        query: &[(&str, String)],
    ) -> reqwest::Response {
        self.http_client
            .get(format!("{}/schedule/requests", &self.address))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_swaps(
        &self,
        query: &[(&str, String)],
    ) -> reqwest::Response {
        self.http_client
            .get(format!("{}/schedule/swaps", &self.address))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn seed_shift(&self, required_headcount: i16) -> Uuid {
        self.seed_shift_at(self.venue_id, required_headcount).await
    }

    pub async fn seed_shift_at(
        &self,
        venue_id: Uuid,
        required_headcount: i16,
    ) -> Uuid {
        let shift = Shift::new(
            VenueId::new(venue_id),
            ShiftRole::parse("bar").unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 10, 19, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 11, 1, 0, 0).unwrap(),
            Headcount::parse(required_headcount).unwrap(),
        )
        .unwrap();
        let shift_id = *shift.id.as_ref();
        self.shift_store
            .write()
            .await
            .add_shift(shift)
            .await
            .expect("Failed to seed shift");
        shift_id
    }

    pub async fn seed_assignment(
        &self,
        staff_id: Uuid,
        shift_id: Uuid,
        required_headcount: i16,
    ) {
        self.assignment_store
            .write()
            .await
            .assign(
                &StaffId::new(staff_id),
                &ShiftId::new(shift_id),
                Headcount::parse(required_headcount).unwrap(),
            )
            .await
            .expect("Failed to seed assignment");
    }

    pub fn staff_with(&self, capability: Capability) -> Uuid {
        let staff_id = Uuid::new_v4();
        self.grant(staff_id, capability);
        staff_id
    }

    pub fn grant(&self, staff_id: Uuid, capability: Capability) {
        self.permission_gate.grant(
            &StaffId::new(staff_id),
            &VenueId::new(self.venue_id),
            capability,
        );
    }

    pub async fn is_assigned(&self, staff_id: Uuid, shift_id: Uuid) -> bool {
        self.assignment_store
            .read()
            .await
            .is_assigned(&StaffId::new(staff_id), &ShiftId::new(shift_id))
            .await
            .expect("Failed to query assignment")
    }
}

impl AsyncTestContext for TestApp {
    async fn setup() -> TestApp {
        TestApp::new().await
    }
}

pub async fn get_json_response_body(response: reqwest::Response) -> Value {
    response
        .json()
        .await
        .expect("Failed to parse response body as JSON")
}
