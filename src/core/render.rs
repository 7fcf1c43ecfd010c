use crate::core::filter::SlotMatch;
use crate::domain::model::Dose;
use crate::utils::columns::ColumnWriter;
use std::fmt;

pub const SESSION_SEPARATOR: &str = "-----------------------------";

/// 把符合的場次輸出成對齊的文字報告。
///
/// 輸出只取決於輸入的順序與內容，相同輸入一定得到相同文字；
/// 沒有任何場次時回傳空字串。
pub fn render_report(matches: &[SlotMatch<'_>], dose: Dose) -> String {
    if matches.is_empty() {
        return String::new();
    }

    let raw = SessionBlocks { matches, dose }.to_string();
    ColumnWriter::default().align(&raw)
}

/// 對齊前的原始報告：每格以 `\t` 分隔
struct SessionBlocks<'m, 'a> {
    matches: &'m [SlotMatch<'a>],
    dose: Dose,
}

impl fmt::Display for SessionBlocks<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in self.matches {
            write_session(f, m, self.dose)?;
        }
        Ok(())
    }
}

fn write_session(f: &mut fmt::Formatter<'_>, m: &SlotMatch<'_>, dose: Dose) -> fmt::Result {
    let center = m.center;
    let session = m.session;

    writeln!(f, "Center\t{}", center.name)?;
    writeln!(f, "State\t{}", center.state)?;
    writeln!(f, "District\t{}", center.district)?;
    writeln!(f, "PinCode\t{}", center.pincode)?;
    writeln!(f, "Fee\t{}", center.fee_type)?;
    if !center.vaccine_fees.is_empty() {
        writeln!(f, "Vaccine\t")?;
        for fee in &center.vaccine_fees {
            writeln!(f, "\tName\t{}", fee.vaccine)?;
            writeln!(f, "\tFees\t{}", fee.fee)?;
        }
    }
    writeln!(f, "Sessions\t")?;
    writeln!(f, "\tDate\t{}", session.date)?;
    writeln!(
        f,
        "\tAvailableCapacityDose{}\t{:.6}",
        dose,
        session.capacity_for(dose)
    )?;
    writeln!(f, "\tMinAgeLimit\t{}", session.min_age)?;
    writeln!(f, "\tVaccine\t{}", session.vaccine)?;
    writeln!(f, "\tSlots")?;
    for slot in &session.slots {
        writeln!(f, "\t\t{}", slot)?;
    }
    writeln!(f, "{}", SESSION_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::filter_sessions;
    use crate::core::fixtures::{paid_center, session, single_center_snapshot};
    use crate::domain::model::{Preferences, Snapshot};

    #[test]
    fn test_render_single_session_layout() {
        let snapshot = single_center_snapshot();
        let prefs = Preferences::new(25, Dose::First);
        let matches = filter_sessions(&snapshot, &prefs, Dose::First);

        let report = render_report(&matches, Dose::First);

        let expected = [
            "Center\t\tApollo Clinic",
            "State\t\tDelhi",
            "District\tNew Delhi",
            "PinCode\t\t110001",
            "Fee\t\tFree",
            "Sessions\t",
            "\t\tDate\t\t\t10-05-2024",
            "\t\tAvailableCapacityDose1\t5.000000",
            "\t\tMinAgeLimit\t\t18",
            "\t\tVaccine\t\t\tCOVISHIELD",
            "\t\tSlots",
            "\t\t\t09:00AM-11:00AM",
            SESSION_SEPARATOR,
        ]
        .join("\n")
            + "\n";

        assert_eq!(report, expected);
    }

    #[test]
    fn test_render_shows_only_active_dose_and_vaccine_fees() {
        let snapshot = Snapshot::Centers(vec![paid_center(
            "Max Hospital",
            &[("COVAXIN", "1410"), ("COVISHIELD", "780")],
            vec![session("12-05-2024", 0.0, 8.0, 45, "COVAXIN")],
        )]);
        let prefs = Preferences::new(50, Dose::Second);
        let matches = filter_sessions(&snapshot, &prefs, Dose::Second);

        let report = render_report(&matches, Dose::Second);

        assert!(report.contains("\t\tAvailableCapacityDose2\t8.000000\n"));
        assert!(!report.contains("AvailableCapacityDose1"));
        assert!(report.contains("Vaccine\t\t\n\t\tName\tCOVAXIN\n\t\tFees\t1410\n"));
        assert!(report.contains("\t\tFees\t780\nSessions\t\n"));
    }

    #[test]
    fn test_session_blocks_are_tab_separated_before_alignment() {
        let snapshot = single_center_snapshot();
        let prefs = Preferences::new(25, Dose::First);
        let matches = filter_sessions(&snapshot, &prefs, Dose::First);

        let raw = SessionBlocks {
            matches: &matches,
            dose: Dose::First,
        }
        .to_string();

        assert!(raw.starts_with("Center\tApollo Clinic\nState\tDelhi\n"));
        assert!(raw.contains("\tAvailableCapacityDose1\t5.000000\n"));
        assert!(raw.ends_with(&format!("\t\t09:00AM-11:00AM\n{}\n", SESSION_SEPARATOR)));
    }

    #[test]
    fn test_render_empty_matches_is_empty() {
        assert_eq!(render_report(&[], Dose::First), "");

        let prefs = Preferences::new(25, Dose::First);
        let matches = filter_sessions(&Snapshot::NoData, &prefs, Dose::First);
        assert!(render_report(&matches, Dose::First).is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let snapshot = Snapshot::Centers(vec![
            paid_center("One", &[("COVAXIN", "1410")], vec![session("10-05-2024", 2.0, 0.0, 18, "COVAXIN")]),
            paid_center("Two", &[], vec![
                session("10-05-2024", 4.0, 1.0, 18, "COVISHIELD"),
                session("11-05-2024", 9.0, 1.0, 45, "COVISHIELD"),
            ]),
        ]);
        let prefs = Preferences::new(60, Dose::First);
        let matches = filter_sessions(&snapshot, &prefs, Dose::First);

        let first = render_report(&matches, Dose::First);
        let second = render_report(&matches, Dose::First);

        assert_eq!(first, second);
        assert_eq!(first.matches(SESSION_SEPARATOR).count(), 3);
    }
}
