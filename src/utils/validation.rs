use crate::utils::error::{Result, SlotError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SlotError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(SlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 印度郵遞區號為六位數字，且不以 0 開頭
pub fn validate_pincode(field_name: &str, pincode: &str) -> Result<()> {
    let valid = pincode.len() == 6
        && pincode.chars().all(|c| c.is_ascii_digit())
        && !pincode.starts_with('0');
    if !valid {
        return Err(SlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: pincode.to_string(),
            reason: "Pincode must be six digits and cannot start with 0".to_string(),
        });
    }
    Ok(())
}

pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    email
        .trim()
        .parse::<lettre::Address>()
        .map(|_| ())
        .map_err(|e| SlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: email.to_string(),
            reason: format!("Invalid email address: {}", e),
        })
}
