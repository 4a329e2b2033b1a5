//! Per-entity status containers.
pub mod store;

pub use store::StatusChangeStore;
