use crate::adapters::cowin::DEFAULT_BASE_URL;
use crate::adapters::notify::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "slot-notifier")]
#[command(about = "Watch the vaccination appointment directory and notify when slots change")]
pub struct CliConfig {
    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, default_value = "")]
    pub state: String,

    #[arg(long, default_value = "")]
    pub district: String,

    #[arg(long, help = "Query today's slots by pincode instead of district")]
    pub pincode: Option<String>,

    #[arg(long, default_value = "18")]
    pub age: u32,

    #[arg(long, default_value = "1")]
    pub dose: u8,

    #[arg(long, default_value = "", help = "Vaccine name filter, empty for any")]
    pub vaccine: String,

    #[arg(long, default_value = "", help = "Fee type filter (free/paid), empty for any")]
    pub fee: String,

    #[arg(long, default_value = "60", help = "Seconds between checks")]
    pub interval: u64,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = "30")]
    pub request_timeout: u64,

    #[arg(long, help = "POST notifications to this URL instead of logging them")]
    pub webhook_url: Option<String>,

    #[arg(long, help = "Email notifications to this address (sender and recipient)")]
    pub email: Option<String>,

    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub smtp_password: Option<String>,

    #[arg(long, default_value = DEFAULT_SMTP_HOST)]
    pub smtp_host: String,

    #[arg(long, default_value_t = DEFAULT_SMTP_PORT)]
    pub smtp_port: u16,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn state(&self) -> &str {
        &self.state
    }

    fn district(&self) -> &str {
        &self.district
    }

    fn pincode(&self) -> Option<&str> {
        self.pincode.as_deref()
    }

    fn age(&self) -> u32 {
        self.age
    }

    fn dose(&self) -> u8 {
        self.dose
    }

    fn vaccine(&self) -> &str {
        &self.vaccine
    }

    fn fee_type(&self) -> &str {
        &self.fee
    }

    fn interval_secs(&self) -> u64 {
        self.interval
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout
    }

    fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    fn smtp_password(&self) -> Option<&str> {
        self.smtp_password.as_deref()
    }

    fn smtp_host(&self) -> &str {
        &self.smtp_host
    }

    fn smtp_port(&self) -> u16 {
        self.smtp_port
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        super::validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_flags() {
        let config = CliConfig::parse_from([
            "slot-notifier",
            "--state",
            "Delhi",
            "--district",
            "New Delhi",
            "--pincode",
            "110001",
            "--age",
            "45",
            "--dose",
            "2",
            "--vaccine",
            "COVAXIN",
        ]);

        assert_eq!(config.state(), "Delhi");
        assert_eq!(config.pincode(), Some("110001"));
        assert_eq!(config.dose(), 2);
        assert_eq!(config.interval_secs(), 60);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_location_fails_validation() {
        let config = CliConfig::parse_from(["slot-notifier", "--age", "30"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_dose_fails_validation() {
        let config = CliConfig::parse_from([
            "slot-notifier",
            "--state",
            "Delhi",
            "--district",
            "New Delhi",
            "--dose",
            "3",
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_email_flags() {
        let config = CliConfig::parse_from([
            "slot-notifier",
            "--state",
            "Delhi",
            "--district",
            "New Delhi",
            "--email",
            "slots@example.com",
            "--smtp-password",
            "app-password",
        ]);

        assert_eq!(config.email(), Some("slots@example.com"));
        assert_eq!(config.smtp_password(), Some("app-password"));
        assert_eq!(config.smtp_host(), DEFAULT_SMTP_HOST);
        assert_eq!(config.smtp_port(), 587);
        assert!(config.validate().is_ok());
    }
}
