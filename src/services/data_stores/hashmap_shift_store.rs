use crate::domain::{
    Headcount, Shift, ShiftId, ShiftStore, ShiftStoreError,
};
use std::collections::HashMap;

#[derive(Default)]
pub struct HashmapShiftStore {
    shifts: HashMap<ShiftId, Shift>,
}

#[async_trait::async_trait]
impl ShiftStore for HashmapShiftStore {
    async fn add_shift(
        &mut self,
        shift: Shift,
    ) -> Result<(), ShiftStoreError> {
        if self.shifts.contains_key(&shift.id) {
            return Err(ShiftStoreError::ShiftIdExists);
        }

        self.shifts.insert(shift.id.clone(), shift);
        Ok(())
    }

    async fn get_shift(
        &self,
        shift_id: &ShiftId,
    ) -> Result<Shift, ShiftStoreError> {
        match self.shifts.get(shift_id) {
            Some(shift) => Ok(shift.clone()),
            None => Err(ShiftStoreError::ShiftNotFound),
        }
    }

    async fn required_headcount(
        &self,
        shift_id: &ShiftId,
    ) -> Result<Headcount, ShiftStoreError> {
        self.get_shift(shift_id)
            .await
            .map(|shift| shift.required_headcount)
    }
}
