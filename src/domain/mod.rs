mod data_stores;
mod error;
mod permission_gate;
mod request;
mod shift;
mod staff_id;
mod swap;
mod transfer;
mod venue_id;

pub use data_stores::*;
pub use error::*;
pub use permission_gate::*;
pub use request::*;
pub use shift::*;
pub use staff_id::*;
pub use swap::*;
pub use transfer::*;
pub use venue_id::*;
