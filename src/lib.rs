pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::WatchConfig;

pub use adapters::cowin::CowinClient;
pub use adapters::notify::{LogNotifier, SmtpNotifier, WebhookNotifier};
pub use core::orchestrator::{CycleReport, Orchestrator, StreamOutcome};
pub use utils::error::{Result, SlotError};
