pub mod detector;
pub mod filter;
pub mod orchestrator;
pub mod render;

#[cfg(test)]
pub(crate) mod fixtures;

pub use crate::domain::model::{Dose, Location, Notification, Preferences, Snapshot, StreamId};
pub use crate::domain::ports::{ConfigProvider, LocationResolver, Notifier, SnapshotSource};
pub use crate::utils::error::Result;
