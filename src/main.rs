use std::sync::Arc;

use reqwest::Client;
use sqlx::PgPool;
use tokio::sync::RwLock;

use shift_exchange::app_state::AppState;
use shift_exchange::services::data_stores::{
    PostgresAssignmentStore, PostgresShiftStore, PostgresTransferStore,
};
use shift_exchange::services::HttpPermissionGate;
use shift_exchange::utils::constants::{
    prod, DATABASE_URL, PERMISSION_SERVICE_TOKEN, PERMISSION_SERVICE_URL,
};
use shift_exchange::utils::tracing::init_tracing;
use shift_exchange::{get_postgres_pool, Application};

#[tokio::main]
async fn main() {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialize tracing");

    let pg_pool = configure_postgres().await;

    let shift_store =
        Arc::new(RwLock::new(PostgresShiftStore::new(pg_pool.clone())));
    let assignment_store =
        Arc::new(RwLock::new(PostgresAssignmentStore::new(pg_pool.clone())));
    let transfer_store =
        Arc::new(RwLock::new(PostgresTransferStore::new(pg_pool)));

    let http_client = Client::builder()
        .timeout(prod::permission_client::TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");
    let permission_gate = Arc::new(HttpPermissionGate::new(
        PERMISSION_SERVICE_URL.to_owned(),
        PERMISSION_SERVICE_TOKEN.clone(),
        http_client,
    ));

    let app_state = AppState::new(
        shift_store,
        assignment_store,
        transfer_store,
        permission_gate,
    );

    let app = Application::build(app_state, prod::APP_ADDRESS)
        .await
        .expect("Failed to build app");

    app.run().await.expect("Failed to run app");
}

async fn configure_postgres() -> PgPool {
    let pg_pool = get_postgres_pool(&DATABASE_URL)
        .await
        .expect("Failed to create Postgres connection pool!");

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .expect("Failed to run migrations");

    pg_pool
}
