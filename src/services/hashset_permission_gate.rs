use color_eyre::eyre::Result;
use std::collections::HashSet;
use std::sync::RwLock;

use crate::domain::{Capability, PermissionGate, StaffId, VenueId};

/// In-memory permission gate for tests and local runs. Grants are keyed by
/// (actor, venue, capability); anything not granted is denied.
#[derive(Default)]
pub struct HashsetPermissionGate {
    grants: RwLock<HashSet<(StaffId, VenueId, Capability)>>,
}

impl HashsetPermissionGate {
    pub fn grant(
        &self,
        actor_id: &StaffId,
        venue_id: &VenueId,
        capability: Capability,
    ) {
        self.grants
            .write()
            .expect("permission grants lock poisoned")
            .insert((actor_id.clone(), venue_id.clone(), capability));
    }

    pub fn revoke(
        &self,
        actor_id: &StaffId,
        venue_id: &VenueId,
        capability: Capability,
    ) {
        self.grants
            .write()
            .expect("permission grants lock poisoned")
            .remove(&(actor_id.clone(), venue_id.clone(), capability));
    }
}

#[async_trait::async_trait]
impl PermissionGate for HashsetPermissionGate {
    async fn check(
        &self,
        actor_id: &StaffId,
        venue_id: &VenueId,
        capability: Capability,
    ) -> Result<bool> {
        Ok(self
            .grants
            .read()
            .expect("permission grants lock poisoned")
            .contains(&(actor_id.clone(), venue_id.clone(), capability)))
    }
}
