use crate::domain::AlertRecord;
use crate::utils::squash_whitespace;
use tracing::info;

const SEPARATOR_WIDTH: usize = 40;
const MISSING: &str = "N/A";

#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn show_alerts(&self, alerts: &[AlertRecord]) {
        print!("{}", render_alerts(alerts));
        info!("Displayed {} alert(s) on console", alerts.len());
    }

    pub fn say(&self, message: &str) {
        println!("{message}");
    }
}

/// Formats the alert listing exactly as it is printed, including the trailing newline.
pub fn render_alerts(alerts: &[AlertRecord]) -> String {
    if alerts.is_empty() {
        return "No current Amber Alerts found.\n".to_string();
    }

    let mut out = String::from("=== Current Amber Alerts ===\n\n");
    for (idx, alert) in alerts.iter().enumerate() {
        out.push_str(&format!("Alert #{}: {}\n", idx + 1, field(&alert.title)));
        out.push_str(&format!("Date: {}\n", field(&alert.pub_date)));
        out.push_str(&format!(
            "Details: {}\n",
            alert
                .description
                .as_deref()
                .map(squash_whitespace)
                .unwrap_or_else(|| MISSING.to_string())
        ));
        out.push_str(&format!("More info: {}\n", field(&alert.link)));
        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push('\n');
    }
    out
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}
