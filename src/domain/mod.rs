// Domain layer: core models and ports (interfaces) for the directory, resolver and notifier.

pub mod model;
pub mod ports;
