mod hashmap_assignment_store;
mod hashmap_shift_store;
mod hashmap_transfer_store;
mod postgres_assignment_store;
mod postgres_shift_store;
mod postgres_transfer_store;

pub use hashmap_assignment_store::*;
pub use hashmap_shift_store::*;
pub use hashmap_transfer_store::*;
pub use postgres_assignment_store::*;
pub use postgres_shift_store::*;
pub use postgres_transfer_store::*;
