use crate::domain::model::{Center, Dose, Preferences, Session, Snapshot};

/// 符合條件的 (中心, 場次)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotMatch<'a> {
    pub center: &'a Center,
    pub session: &'a Session,
}

/// 偏好為空字串時接受任何值，否則不分大小寫比對
pub fn is_preferred_available(current: &str, preference: &str) -> bool {
    if preference.is_empty() {
        return true;
    }
    current.to_lowercase() == preference.to_lowercase()
}

/// 依訂閱者條件篩出可預約的場次，保留目錄回傳的順序。
pub fn filter_sessions<'a>(
    snapshot: &'a Snapshot,
    prefs: &Preferences,
    dose: Dose,
) -> Vec<SlotMatch<'a>> {
    snapshot
        .centers()
        .iter()
        .filter(|center| is_preferred_available(&center.fee_type, &prefs.fee_type))
        .flat_map(|center| {
            center
                .sessions
                .iter()
                .filter(move |session| is_session_eligible(session, prefs, dose))
                .map(move |session| SlotMatch { center, session })
        })
        .collect()
}

fn is_session_eligible(session: &Session, prefs: &Preferences, dose: Dose) -> bool {
    session.capacity_for(dose) != 0.0
        && session.min_age <= prefs.age
        && is_preferred_available(&session.vaccine, &prefs.vaccine)
}
