pub mod hospital;
pub mod loader;
pub mod registry;

pub use crate::domain::ports::SnapshotStore;
pub use crate::utils::error::Result;
