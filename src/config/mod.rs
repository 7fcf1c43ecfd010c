#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::WatchConfig;

use crate::core::{ConfigProvider, Dose, Location, Preferences};
use crate::utils::error::{Result, SlotError};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_pincode, validate_positive_number,
    validate_range, validate_url,
};

/// CLI 與 TOML 共用的檢查
pub(crate) fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_non_empty_string("state", config.state())?;
    validate_non_empty_string("district", config.district())?;
    if let Some(pincode) = config.pincode() {
        validate_pincode("pincode", pincode)?;
    }
    validate_range("age", config.age(), 1, 150)?;
    validate_range("dose", config.dose(), 1, 2)?;
    validate_positive_number("interval", config.interval_secs(), 1)?;
    validate_positive_number("request_timeout", config.request_timeout_secs(), 1)?;
    validate_url("base_url", config.base_url())?;
    if let Some(webhook) = config.webhook_url() {
        validate_url("webhook_url", webhook)?;
    }
    if let Some(email) = config.email() {
        validate_email("email", email)?;
        if !matches!(config.smtp_password(), Some(p) if !p.is_empty()) {
            return Err(SlotError::MissingConfigError {
                field: "smtp_password".to_string(),
            });
        }
        validate_non_empty_string("smtp_host", config.smtp_host())?;
        validate_range("smtp_port", config.smtp_port(), 1, u16::MAX)?;
    }
    Ok(())
}

pub fn preferences_from<C: ConfigProvider + ?Sized>(config: &C) -> Result<Preferences> {
    let dose = Dose::try_from(config.dose())?;
    Ok(Preferences::new(config.age(), dose)
        .with_vaccine(config.vaccine())
        .with_fee_type(config.fee_type()))
}

pub fn location_from<C: ConfigProvider + ?Sized>(config: &C) -> Location {
    let location = Location::district(config.state().trim(), config.district().trim());
    match config.pincode() {
        Some(pincode) => location.with_pincode(pincode.trim()),
        None => location,
    }
}
