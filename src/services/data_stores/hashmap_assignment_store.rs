use crate::domain::{
    AssignmentStore, AssignmentStoreError, Headcount, ShiftId, StaffId,
};
use std::collections::{BTreeSet, HashMap};

/// In-memory assignment ledger. Each trait call runs under the store's
/// exclusive lock, so precondition checks and writes within one call are
/// indivisible with respect to concurrent callers.
#[derive(Default)]
pub struct HashmapAssignmentStore {
    assignments: HashMap<ShiftId, BTreeSet<StaffId>>,
}

impl HashmapAssignmentStore {
    fn holders_of(&self, shift_id: &ShiftId) -> Option<&BTreeSet<StaffId>> {
        self.assignments.get(shift_id)
    }

    fn insert_assignment(
        &mut self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
        required_headcount: Headcount,
    ) -> Result<(), AssignmentStoreError> {
        let holders = self.assignments.entry(shift_id.clone()).or_default();
        if holders.contains(staff_id) {
            return Err(AssignmentStoreError::AlreadyAssigned);
        }
        if holders.len() >= required_headcount.as_capacity() {
            return Err(AssignmentStoreError::ShiftFull);
        }
        holders.insert(staff_id.clone());
        Ok(())
    }

    fn remove_assignment(
        &mut self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
    ) -> Result<(), AssignmentStoreError> {
        let removed = self
            .assignments
            .get_mut(shift_id)
            .map(|holders| holders.remove(staff_id))
            .unwrap_or(false);
        if !removed {
            return Err(AssignmentStoreError::AssignmentNotFound);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AssignmentStore for HashmapAssignmentStore {
    async fn is_assigned(
        &self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
    ) -> Result<bool, AssignmentStoreError> {
        Ok(self
            .holders_of(shift_id)
            .map(|holders| holders.contains(staff_id))
            .unwrap_or(false))
    }

    async fn assignment_count(
        &self,
        shift_id: &ShiftId,
    ) -> Result<usize, AssignmentStoreError> {
        Ok(self
            .holders_of(shift_id)
            .map(|holders| holders.len())
            .unwrap_or(0))
    }

    async fn holders(
        &self,
        shift_id: &ShiftId,
    ) -> Result<Vec<StaffId>, AssignmentStoreError> {
        Ok(self
            .holders_of(shift_id)
            .map(|holders| holders.iter().cloned().collect())
            .unwrap_or_default())
    }

    #[tracing::instrument(name = "Assigning staff to shift", skip_all)]
    async fn assign(
        &mut self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
        required_headcount: Headcount,
    ) -> Result<(), AssignmentStoreError> {
        self.insert_assignment(staff_id, shift_id, required_headcount)
    }

    #[tracing::instrument(name = "Unassigning staff from shift", skip_all)]
    async fn unassign(
        &mut self,
        staff_id: &StaffId,
        shift_id: &ShiftId,
    ) -> Result<(), AssignmentStoreError> {
        self.remove_assignment(staff_id, shift_id)
    }

    #[tracing::instrument(name = "Swapping assignments", skip_all)]
    async fn swap_assignments(
        &mut self,
        requester_id: &StaffId,
        offered_shift_id: &ShiftId,
        counterparty_id: &StaffId,
        target_shift_id: &ShiftId,
        offered_headcount: Headcount,
        target_headcount: Headcount,
    ) -> Result<(), AssignmentStoreError> {
        let offered_snapshot =
            self.assignments.get(offered_shift_id).cloned();
        let target_snapshot = self.assignments.get(target_shift_id).cloned();

        // Both parties vacate before either takes their new slot, so two
        // full shifts can still be exchanged without tripping the capacity
        // check mid-swap.
        let result = self
            .remove_assignment(requester_id, offered_shift_id)
            .and_then(|_| {
                self.remove_assignment(counterparty_id, target_shift_id)
            })
            .and_then(|_| {
                self.insert_assignment(
                    requester_id,
                    target_shift_id,
                    target_headcount,
                )
            })
            .and_then(|_| {
                self.insert_assignment(
                    counterparty_id,
                    offered_shift_id,
                    offered_headcount,
                )
            });

        if result.is_err() {
            restore(
                &mut self.assignments,
                offered_shift_id,
                offered_snapshot,
            );
            restore(&mut self.assignments, target_shift_id, target_snapshot);
        }

        result
    }
}

fn restore(
    assignments: &mut HashMap<ShiftId, BTreeSet<StaffId>>,
    shift_id: &ShiftId,
    snapshot: Option<BTreeSet<StaffId>>,
) {
    match snapshot {
        Some(holders) => {
            assignments.insert(shift_id.clone(), holders);
        }
        None => {
            assignments.remove(shift_id);
        }
    }
}
