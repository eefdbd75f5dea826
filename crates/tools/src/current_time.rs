//! Current time tool.

use async_trait::async_trait;
use ragent_core::clock::Clock;
use ragent_core::error::ToolError;
use ragent_core::tool::Tool;
use std::sync::Arc;

pub struct CurrentTimeTool {
    clock: Arc<dyn Clock>,
}

impl CurrentTimeTool {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Returns the current time in HH:MM:SS format. Ignores any input argument."
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        Ok(self.clock.now().format("%H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ragent_core::clock::FixedClock;

    #[tokio::test]
    async fn returns_24h_time() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(21, 5, 9)
            .unwrap();
        let tool = CurrentTimeTool::new(Arc::new(FixedClock(now)));
        assert_eq!(tool.invoke("ignored").await.unwrap(), "21:05:09");
    }
}
