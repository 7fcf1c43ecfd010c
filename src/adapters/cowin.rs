use crate::domain::model::{Center, QueryScope, Snapshot};
use crate::domain::ports::{LocationResolver, SnapshotSource};
use crate::utils::error::{Result, SlotError};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

// https://apisetu.gov.in/public/api/cowin
pub const DEFAULT_BASE_URL: &str = "https://cdn-api.co-vin.in/api";

const CALENDAR_BY_PIN_PATH: &str = "/v2/appointment/sessions/public/calendarByPin";
const CALENDAR_BY_DISTRICT_PATH: &str = "/v2/appointment/sessions/public/calendarByDistrict";
const LIST_STATES_PATH: &str = "/v2/admin/location/states";
const LIST_DISTRICTS_PATH: &str = "/v2/admin/location/districts";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.93 Safari/537.36 Edg/90.0.818.51";

/// 目錄 API 使用的日期格式
pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    #[serde(default)]
    centers: Vec<Center>,
}

#[derive(Debug, Deserialize)]
struct StateList {
    states: Vec<StateEntry>,
}

#[derive(Debug, Deserialize)]
struct StateEntry {
    state_id: u32,
    state_name: String,
}

#[derive(Debug, Deserialize)]
struct DistrictList {
    districts: Vec<DistrictEntry>,
}

#[derive(Debug, Deserialize)]
struct DistrictEntry {
    district_id: u32,
    district_name: String,
}

/// CoWIN 公開預約 API 的客戶端
#[derive(Debug, Clone)]
pub struct CowinClient {
    client: Client,
    base_url: String,
}

impl CowinClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// 回傳 `None` 表示 API 回了未授權（偶爾會發生），呼叫端不應視為失敗
    async fn query(&self, path: &str, params: &[(&str, String)]) -> Result<Option<String>> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Querying endpoint: {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::ACCEPT_LANGUAGE, "hi_IN")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if status != StatusCode::OK {
            return Err(SlotError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        Ok(Some(response.text().await?))
    }

    /// 地點清單沒有「暫時沒資料」的語意，未授權也當成失敗
    async fn query_required(&self, path: &str) -> Result<String> {
        self.query(path, &[]).await?.ok_or_else(|| SlotError::UnexpectedStatus {
            url: format!("{}{}", self.base_url, path),
            status: StatusCode::UNAUTHORIZED.as_u16(),
        })
    }
}

#[async_trait]
impl SnapshotSource for CowinClient {
    async fn fetch(&self, scope: &QueryScope, date: NaiveDate) -> Result<Snapshot> {
        let date = date.format(DATE_FORMAT).to_string();
        let body = match scope {
            QueryScope::Pincode(pincode) => {
                self.query(
                    CALENDAR_BY_PIN_PATH,
                    &[("pincode", pincode.clone()), ("date", date)],
                )
                .await?
            }
            QueryScope::District(district_id) => {
                self.query(
                    CALENDAR_BY_DISTRICT_PATH,
                    &[("district_id", district_id.to_string()), ("date", date)],
                )
                .await?
            }
        };

        match body {
            Some(body) => {
                let calendar: CalendarResponse = serde_json::from_str(&body)?;
                Ok(Snapshot::Centers(calendar.centers))
            }
            None => Ok(Snapshot::NoData),
        }
    }
}

#[async_trait]
impl LocationResolver for CowinClient {
    async fn resolve_state(&self, name: &str) -> Result<u32> {
        let body = self.query_required(LIST_STATES_PATH).await?;
        let list: StateList = serde_json::from_str(&body)?;

        list.states
            .into_iter()
            .find(|s| s.state_name.to_lowercase() == name.to_lowercase())
            .map(|s| {
                tracing::info!("State Details - ID: {}, Name: {}", s.state_id, s.state_name);
                s.state_id
            })
            .ok_or_else(|| SlotError::NotFound {
                kind: "state",
                name: name.to_string(),
            })
    }

    async fn resolve_district(&self, state_id: u32, name: &str) -> Result<u32> {
        let path = format!("{}/{}", LIST_DISTRICTS_PATH, state_id);
        let body = self.query_required(&path).await?;
        let list: DistrictList = serde_json::from_str(&body)?;

        list.districts
            .into_iter()
            .find(|d| d.district_name.to_lowercase() == name.to_lowercase())
            .map(|d| {
                tracing::info!(
                    "District Details - ID: {}, Name: {}",
                    d.district_id,
                    d.district_name
                );
                d.district_id
            })
            .ok_or_else(|| SlotError::NotFound {
                kind: "district",
                name: name.to_string(),
            })
    }
}
