use crate::adapters::cowin::DEFAULT_BASE_URL;
use crate::adapters::notify::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SlotError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub subscriber: SubscriberConfig,
    pub location: LocationConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberConfig {
    pub age: u32,
    pub dose: u8,
    #[serde(default)]
    pub vaccine: String,
    #[serde(default)]
    pub fee_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub state: String,
    pub district: String,
    pub pincode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub smtp_password: Option<String>,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_smtp_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_timeout() -> u64 {
    30
}

fn default_interval() -> u64 {
    60
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            email: None,
            smtp_password: None,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
        }
    }
}

impl WatchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SlotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SlotError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WEBHOOK_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SlotError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for WatchConfig {
    fn base_url(&self) -> &str {
        &self.directory.base_url
    }

    fn state(&self) -> &str {
        &self.location.state
    }

    fn district(&self) -> &str {
        &self.location.district
    }

    fn pincode(&self) -> Option<&str> {
        self.location.pincode.as_deref()
    }

    fn age(&self) -> u32 {
        self.subscriber.age
    }

    fn dose(&self) -> u8 {
        self.subscriber.dose
    }

    fn vaccine(&self) -> &str {
        &self.subscriber.vaccine
    }

    fn fee_type(&self) -> &str {
        &self.subscriber.fee_type
    }

    fn interval_secs(&self) -> u64 {
        self.schedule.interval_seconds
    }

    fn request_timeout_secs(&self) -> u64 {
        self.directory.timeout_seconds
    }

    fn webhook_url(&self) -> Option<&str> {
        self.notify.webhook_url.as_deref()
    }

    fn email(&self) -> Option<&str> {
        self.notify.email.as_deref()
    }

    fn smtp_password(&self) -> Option<&str> {
        self.notify.smtp_password.as_deref()
    }

    fn smtp_host(&self) -> &str {
        &self.notify.smtp_host
    }

    fn smtp_port(&self) -> u16 {
        self.notify.smtp_port
    }
}

impl Validate for WatchConfig {
    fn validate(&self) -> Result<()> {
        super::validate_provider(self)
    }
}
