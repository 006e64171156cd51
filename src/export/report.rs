//! Plain-text expense report

use std::collections::BTreeMap;

use crate::models::Money;

/// Render monthly totals as a plain-text report, newest month first
pub fn render_monthly_report(totals: &BTreeMap<String, Money>) -> String {
    let mut lines = vec!["Expense Report".to_string(), "==============".to_string()];
    for (month, total) in totals.iter().rev() {
        lines.push(format!("{} : {}", month, total));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_newest_first() {
        let mut totals = BTreeMap::new();
        totals.insert("2024-03".to_string(), Money::parse("19.50").unwrap());
        totals.insert("2024-04".to_string(), Money::parse("1250").unwrap());

        let report = render_monthly_report(&totals);
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines[0], "Expense Report");
        assert_eq!(lines[2], "2024-04 : 1,250.00");
        assert_eq!(lines[3], "2024-03 : 19.50");
    }

    #[test]
    fn test_render_empty() {
        let report = render_monthly_report(&BTreeMap::new());
        assert_eq!(report.lines().count(), 2);
    }
}
