// Adapters layer: concrete implementations for external systems (directory http api, notification channels).

pub mod cowin;
pub mod notify;
