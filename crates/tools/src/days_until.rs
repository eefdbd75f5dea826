//! Days-until tool: counts whole days from today to a future date.
//!
//! Input problems are reported as observation text rather than errors so
//! the model can fix its `Action Input` and try again.

use async_trait::async_trait;
use chrono::NaiveDate;
use ragent_core::clock::Clock;
use ragent_core::error::ToolError;
use ragent_core::tool::Tool;
use std::sync::Arc;
use tracing::debug;

pub const INVALID_FORMAT_MESSAGE: &str = "Error: Invalid date format. Please use 'YYYY-MM-DD'.";

pub struct DaysUntilTool {
    clock: Arc<dyn Clock>,
}

impl DaysUntilTool {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Compute the observation for `raw` against the clock's today.
    pub fn days_until(&self, raw: &str) -> String {
        let cleaned = clean_input(raw);
        debug!(raw, cleaned, "calculate_days_until input");

        let Some(target) = parse_date(cleaned) else {
            return INVALID_FORMAT_MESSAGE.to_string();
        };

        let today = self.clock.today();
        if target <= today {
            return format!("Error: The date {cleaned} is not in the future.");
        }

        let days = (target - today).num_days();
        format!("There are {days} days remaining until {cleaned}.")
    }
}

#[async_trait]
impl Tool for DaysUntilTool {
    fn name(&self) -> &str {
        "calculate_days_until"
    }

    fn description(&self) -> &str {
        "Calculates the number of days from today until a specified future date. \
         Expects the future date as a string in 'YYYY-MM-DD' format. Returns a string \
         describing the number of days remaining or an error message."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        Ok(self.days_until(input))
    }
}

/// Trim whitespace, then any wrapping single or double quotes.
fn clean_input(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '\'' || c == '"')
}

/// Strict `YYYY-MM-DD`: four-digit year, two-digit month and day.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragent_core::clock::FixedClock;

    fn tool_on(y: i32, m: u32, d: u32) -> DaysUntilTool {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        DaysUntilTool::new(Arc::new(FixedClock::at_date(date)))
    }

    #[test]
    fn future_date_reports_day_count() {
        let tool = tool_on(2025, 1, 1);
        assert_eq!(
            tool.days_until("2025-01-31"),
            "There are 30 days remaining until 2025-01-31."
        );
    }

    #[test]
    fn far_future_date_contains_count_and_date() {
        let tool = tool_on(2025, 1, 1);
        let out = tool.days_until("2999-01-01");
        assert!(out.starts_with("There are "));
        assert!(out.contains("2999-01-01"));
        let count: i64 = out
            .split_whitespace()
            .nth(2)
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(count > 0);
    }

    #[test]
    fn quoted_and_padded_input_is_equivalent() {
        let tool = tool_on(2025, 1, 1);
        let plain = tool.days_until("2999-01-01");
        assert_eq!(tool.days_until(" '2999-01-01' "), plain);
        assert_eq!(tool.days_until("\"2999-01-01\"\n"), plain);
    }

    #[test]
    fn today_is_not_in_the_future() {
        let tool = tool_on(2025, 6, 15);
        assert_eq!(
            tool.days_until("2025-06-15"),
            "Error: The date 2025-06-15 is not in the future."
        );
    }

    #[test]
    fn past_date_is_not_in_the_future() {
        let tool = tool_on(2025, 6, 15);
        assert!(tool.days_until("1999-12-31").contains("not in the future"));
    }

    #[test]
    fn malformed_input_reports_format_error() {
        let tool = tool_on(2025, 6, 15);
        for input in ["not-a-date", "", "2025/07/01", "2025-13-01", "2025-02-30", "25-07-01"] {
            assert_eq!(tool.days_until(input), INVALID_FORMAT_MESSAGE, "input: {input:?}");
        }
    }

    #[test]
    fn leap_day_counts() {
        let tool = tool_on(2024, 2, 28);
        assert_eq!(
            tool.days_until("2024-03-01"),
            "There are 2 days remaining until 2024-03-01."
        );
    }

    #[tokio::test]
    async fn invoke_never_fails_on_bad_input() {
        let tool = tool_on(2025, 6, 15);
        assert_eq!(tool.invoke("tomorrow").await.unwrap(), INVALID_FORMAT_MESSAGE);
    }
}
