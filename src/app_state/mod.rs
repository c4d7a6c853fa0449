use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{
    AssignmentStore, PermissionGate, ShiftStore, TransferStore,
};

pub type ShiftStoreType = Arc<RwLock<dyn ShiftStore + Send + Sync>>;
pub type AssignmentStoreType = Arc<RwLock<dyn AssignmentStore + Send + Sync>>;
pub type TransferStoreType = Arc<RwLock<dyn TransferStore + Send + Sync>>;
pub type PermissionGateType = Arc<dyn PermissionGate + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub shift_store: ShiftStoreType,
    pub assignment_store: AssignmentStoreType,
    pub transfer_store: TransferStoreType,
    pub permission_gate: PermissionGateType,
}

impl AppState {
    pub fn new(
        shift_store: ShiftStoreType,
        assignment_store: AssignmentStoreType,
        transfer_store: TransferStoreType,
        permission_gate: PermissionGateType,
    ) -> Self {
        Self {
            shift_store,
            assignment_store,
            transfer_store,
            permission_gate,
        }
    }
}
