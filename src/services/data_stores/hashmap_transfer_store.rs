use crate::domain::{
    Decision, RequestFilter, RequestId, Resolution, ShiftRequest, ShiftSwap,
    StaffId, SwapFilter, SwapId, TransferStatus, TransferStore,
    TransferStoreError, VenueId,
};
use std::collections::HashMap;

/// In-memory transfer store. Requests and swaps share the store so the
/// duplicate-pending check in `add_request`/`add_swap` sees both kinds.
#[derive(Default)]
pub struct HashmapTransferStore {
    requests: HashMap<RequestId, ShiftRequest>,
    swaps: HashMap<SwapId, ShiftSwap>,
}

impl HashmapTransferStore {
    fn pending_exists(&self, staff_id: &StaffId, venue_id: &VenueId) -> bool {
        let pending_request = self.requests.values().any(|request| {
            request.status.is_pending()
                && &request.staff_id == staff_id
                && &request.venue_id == venue_id
        });
        let pending_swap = self.swaps.values().any(|swap| {
            swap.status.is_pending()
                && &swap.requester_id == staff_id
                && &swap.venue_id == venue_id
        });
        pending_request || pending_swap
    }
}

#[async_trait::async_trait]
impl TransferStore for HashmapTransferStore {
    async fn has_pending(
        &self,
        staff_id: &StaffId,
        venue_id: &VenueId,
    ) -> Result<bool, TransferStoreError> {
        Ok(self.pending_exists(staff_id, venue_id))
    }

    #[tracing::instrument(name = "Adding shift request", skip_all)]
    async fn add_request(
        &mut self,
        request: ShiftRequest,
    ) -> Result<(), TransferStoreError> {
        if self.pending_exists(&request.staff_id, &request.venue_id) {
            return Err(TransferStoreError::DuplicatePendingTransfer);
        }
        self.requests.insert(request.id.clone(), request);
        Ok(())
    }

    #[tracing::instrument(name = "Adding shift swap", skip_all)]
    async fn add_swap(
        &mut self,
        swap: ShiftSwap,
    ) -> Result<(), TransferStoreError> {
        if self.pending_exists(&swap.requester_id, &swap.venue_id) {
            return Err(TransferStoreError::DuplicatePendingTransfer);
        }
        self.swaps.insert(swap.id.clone(), swap);
        Ok(())
    }

    async fn get_request(
        &self,
        request_id: &RequestId,
    ) -> Result<ShiftRequest, TransferStoreError> {
        match self.requests.get(request_id) {
            Some(request) => Ok(request.clone()),
            None => Err(TransferStoreError::RequestNotFound),
        }
    }

    async fn get_swap(
        &self,
        swap_id: &SwapId,
    ) -> Result<ShiftSwap, TransferStoreError> {
        match self.swaps.get(swap_id) {
            Some(swap) => Ok(swap.clone()),
            None => Err(TransferStoreError::SwapNotFound),
        }
    }

    #[tracing::instrument(name = "Resolving shift request", skip_all)]
    async fn resolve_request(
        &mut self,
        request_id: &RequestId,
        decision: Decision,
        resolution: Resolution,
    ) -> Result<ShiftRequest, TransferStoreError> {
        let request = self
            .requests
            .get_mut(request_id)
            .ok_or(TransferStoreError::RequestNotFound)?;
        if !request.status.is_pending() {
            return Err(TransferStoreError::AlreadyResolved);
        }
        request.status = TransferStatus::resolved(decision, resolution);
        Ok(request.clone())
    }

    #[tracing::instrument(name = "Resolving shift swap", skip_all)]
    async fn resolve_swap(
        &mut self,
        swap_id: &SwapId,
        decision: Decision,
        resolution: Resolution,
    ) -> Result<ShiftSwap, TransferStoreError> {
        let swap = self
            .swaps
            .get_mut(swap_id)
            .ok_or(TransferStoreError::SwapNotFound)?;
        if !swap.status.is_pending() {
            return Err(TransferStoreError::AlreadyResolved);
        }
        swap.status = TransferStatus::resolved(decision, resolution);
        Ok(swap.clone())
    }

    async fn list_requests(
        &self,
        venue_id: &VenueId,
        filter: &RequestFilter,
    ) -> Result<Vec<ShiftRequest>, TransferStoreError> {
        let mut requests: Vec<ShiftRequest> = self
            .requests
            .values()
            .filter(|request| &request.venue_id == venue_id)
            .filter(|request| {
                filter
                    .status
                    .map(|status| request.status.kind() == status)
                    .unwrap_or(true)
            })
            .filter(|request| {
                filter
                    .staff_id
                    .as_ref()
                    .map(|staff_id| &request.staff_id == staff_id)
                    .unwrap_or(true)
            })
            .filter(|request| {
                filter
                    .kind
                    .map(|kind| request.kind == kind)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        requests.sort_by_key(|request| request.created_at);
        Ok(requests)
    }

    async fn list_swaps(
        &self,
        venue_id: &VenueId,
        filter: &SwapFilter,
    ) -> Result<Vec<ShiftSwap>, TransferStoreError> {
        let mut swaps: Vec<ShiftSwap> = self
            .swaps
            .values()
            .filter(|swap| &swap.venue_id == venue_id)
            .filter(|swap| {
                filter
                    .status
                    .map(|status| swap.status.kind() == status)
                    .unwrap_or(true)
            })
            .filter(|swap| {
                filter
                    .requester_id
                    .as_ref()
                    .map(|requester_id| &swap.requester_id == requester_id)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        swaps.sort_by_key(|swap| swap.created_at);
        Ok(swaps)
    }
}
