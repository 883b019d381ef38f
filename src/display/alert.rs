//! Alert display formatting

use crate::models::Alert;

/// Format alerts one per line, unread ones marked with `*`
pub fn format_alert_list(alerts: &[Alert]) -> String {
    if alerts.is_empty() {
        return "No alerts.\n".to_string();
    }

    let mut output = String::new();
    for alert in alerts {
        let marker = if alert.is_read() { " " } else { "*" };
        output.push_str(&format!(
            "{} {}  {:<8}  {}  ({})\n",
            marker,
            alert.created_at.format("%Y-%m-%d %H:%M"),
            alert.kind,
            alert.message,
            alert.id
        ));
    }

    let unread = alerts.iter().filter(|a| !a.is_read()).count();
    output.push_str(&format!("\n{} unread of {}\n", unread, alerts.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertKind, UserId};

    #[test]
    fn test_alert_list() {
        let mut read = Alert::new(UserId::new(), None, None, AlertKind::Global, "Global: 80% of budget used.");
        read.mark_as_read();
        let unread = Alert::new(UserId::new(), None, None, AlertKind::Category, "Food: budget exceeded!");

        let output = format_alert_list(&[unread, read]);
        assert!(output.contains("* "));
        assert!(output.contains("Food: budget exceeded!"));
        assert!(output.contains("1 unread of 2"));
    }
}
