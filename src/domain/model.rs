use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::{Result, SlotError};

/// 預約目錄中的一個接種中心
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Center {
    #[serde(default)]
    pub center_id: u64,
    pub name: String,
    #[serde(rename = "state_name")]
    pub state: String,
    #[serde(rename = "district_name")]
    pub district: String,
    #[serde(rename = "block_name", default)]
    pub block: String,
    pub pincode: u32,
    pub fee_type: String,
    #[serde(default)]
    pub vaccine_fees: Vec<VaccineFee>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineFee {
    pub vaccine: String,
    pub fee: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub session_id: String,
    pub date: String,
    #[serde(default)]
    pub available_capacity: f64,
    #[serde(rename = "available_capacity_dose1", default)]
    pub capacity_dose1: f64,
    #[serde(rename = "available_capacity_dose2", default)]
    pub capacity_dose2: f64,
    #[serde(rename = "min_age_limit")]
    pub min_age: u32,
    pub vaccine: String,
    #[serde(default)]
    pub slots: Vec<String>,
}

impl Session {
    /// 指定劑次的剩餘名額
    pub fn capacity_for(&self, dose: Dose) -> f64 {
        match dose {
            Dose::First => self.capacity_dose1,
            Dose::Second => self.capacity_dose2,
        }
    }
}

/// 一次目錄查詢的結果。
///
/// `NoData` 代表「目前這個端點拿不到資料」，和空的 `Centers` 不同，
/// 不能被當成「沒有名額」以外的錯誤處理。
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Centers(Vec<Center>),
    NoData,
}

impl Snapshot {
    pub fn centers(&self) -> &[Center] {
        match self {
            Snapshot::Centers(centers) => centers,
            Snapshot::NoData => &[],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Snapshot::NoData)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dose {
    First,
    Second,
}

impl Dose {
    pub fn number(self) -> u8 {
        match self {
            Dose::First => 1,
            Dose::Second => 2,
        }
    }
}

impl TryFrom<u8> for Dose {
    type Error = SlotError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Dose::First),
            2 => Ok(Dose::Second),
            other => Err(SlotError::InvalidConfigValueError {
                field: "dose".to_string(),
                value: other.to_string(),
                reason: "Dose must be 1 or 2".to_string(),
            }),
        }
    }
}

impl From<Dose> for u8 {
    fn from(dose: Dose) -> Self {
        dose.number()
    }
}

impl fmt::Display for Dose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// 訂閱者的篩選條件。空字串代表「不限」。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub age: u32,
    pub dose: Dose,
    pub vaccine: String,
    pub fee_type: String,
}

impl Preferences {
    pub fn new(age: u32, dose: Dose) -> Self {
        Self {
            age,
            dose,
            vaccine: String::new(),
            fee_type: String::new(),
        }
    }

    pub fn with_vaccine(mut self, vaccine: impl Into<String>) -> Self {
        self.vaccine = vaccine.into().trim().to_string();
        self
    }

    pub fn with_fee_type(mut self, fee_type: impl Into<String>) -> Self {
        self.fee_type = fee_type.into().trim().to_string();
        self
    }
}

/// 訂閱者關注的地點，名稱需在目錄中解析成 ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub state: String,
    pub district: String,
    pub pincode: Option<String>,
}

impl Location {
    pub fn district(state: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
            pincode: None,
        }
    }

    pub fn with_pincode(mut self, pincode: impl Into<String>) -> Self {
        self.pincode = Some(pincode.into());
        self
    }
}

/// 目錄內部的地點 ID（每個程序只解析一次）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub state_id: u32,
    pub district_id: u32,
}

/// 單次查詢的範圍
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    Pincode(String),
    District(u32),
}

/// 獨立追蹤變化的查詢串流
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StreamId {
    /// 近處範圍、今天
    Today,
    /// 較大範圍、七天後
    WeekAhead,
}

impl StreamId {
    pub fn days_ahead(self) -> i64 {
        match self {
            StreamId::Today => 0,
            StreamId::WeekAhead => 7,
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamId::Today => write!(f, "today"),
            StreamId::WeekAhead => write!(f, "week-ahead"),
        }
    }
}

/// 要送給訂閱者的通知內容
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub age: u32,
    pub dose: Option<Dose>,
    pub location: String,
    pub report: String,
}

impl Notification {
    pub fn subject(&self) -> String {
        match self.dose {
            Some(dose) => format!(
                "{} : DOSE{} Vaccination slots are available for age: {}",
                self.location.to_uppercase(),
                dose,
                self.age
            ),
            None => format!(
                "{} : Vaccination slots are available for age: {}",
                self.location.to_uppercase(),
                self.age
            ),
        }
    }

    pub fn body(&self) -> String {
        format!(
            "Vaccination slots are available at the following centers:\n\n{}",
            self.report
        )
    }
}
