pub mod data_stores;
pub mod hashset_permission_gate;
pub mod http_permission_gate;
pub mod workflows;

pub use hashset_permission_gate::HashsetPermissionGate;
pub use http_permission_gate::HttpPermissionGate;
