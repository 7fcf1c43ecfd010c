use crate::domain::model::{Notification, QueryScope, Snapshot};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// 查詢某個範圍、某一天的預約目錄。
///
/// 端點暫時拿不到資料時回傳 `Ok(Snapshot::NoData)`；
/// 無法完成請求時回傳錯誤。
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, scope: &QueryScope, date: NaiveDate) -> Result<Snapshot>;
}

/// 把地名解析成目錄內部 ID，名稱比對不分大小寫。
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve_state(&self, name: &str) -> Result<u32>;
    async fn resolve_district(&self, state_id: u32, name: &str) -> Result<u32>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn state(&self) -> &str;
    fn district(&self) -> &str;
    fn pincode(&self) -> Option<&str>;
    fn age(&self) -> u32;
    fn dose(&self) -> u8;
    fn vaccine(&self) -> &str;
    fn fee_type(&self) -> &str;
    fn interval_secs(&self) -> u64;
    fn request_timeout_secs(&self) -> u64;
    fn webhook_url(&self) -> Option<&str>;
    fn email(&self) -> Option<&str>;
    fn smtp_password(&self) -> Option<&str>;
    fn smtp_host(&self) -> &str;
    fn smtp_port(&self) -> u16;
}
