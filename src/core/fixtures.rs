//! 測試用的目錄資料

use crate::domain::model::{Center, Session, Snapshot, VaccineFee};

pub fn session(date: &str, dose1: f64, dose2: f64, min_age: u32, vaccine: &str) -> Session {
    Session {
        session_id: format!("{}-{}", date, vaccine),
        date: date.to_string(),
        available_capacity: dose1 + dose2,
        capacity_dose1: dose1,
        capacity_dose2: dose2,
        min_age,
        vaccine: vaccine.to_string(),
        slots: vec!["09:00AM-11:00AM".to_string()],
    }
}

pub fn center(name: &str, fee_type: &str, sessions: Vec<Session>) -> Center {
    Center {
        center_id: 1,
        name: name.to_string(),
        state: "Delhi".to_string(),
        district: "New Delhi".to_string(),
        block: "Not Applicable".to_string(),
        pincode: 110001,
        fee_type: fee_type.to_string(),
        vaccine_fees: Vec::new(),
        sessions,
    }
}

pub fn paid_center(name: &str, fees: &[(&str, &str)], sessions: Vec<Session>) -> Center {
    let mut c = center(name, "Paid", sessions);
    c.vaccine_fees = fees
        .iter()
        .map(|(vaccine, fee)| VaccineFee {
            vaccine: vaccine.to_string(),
            fee: fee.to_string(),
        })
        .collect();
    c
}

/// 單一中心、單一場次：110001、免費、10-05-2024、第一劑 5 個名額、18 歲以上、COVISHIELD
pub fn single_center_snapshot() -> Snapshot {
    Snapshot::Centers(vec![center(
        "Apollo Clinic",
        "Free",
        vec![session("10-05-2024", 5.0, 0.0, 18, "COVISHIELD")],
    )])
}
