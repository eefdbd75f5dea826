//! Current date tool.

use async_trait::async_trait;
use ragent_core::clock::Clock;
use ragent_core::error::ToolError;
use ragent_core::tool::Tool;
use std::sync::Arc;

pub struct CurrentDateTool {
    clock: Arc<dyn Clock>,
}

impl CurrentDateTool {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl Tool for CurrentDateTool {
    fn name(&self) -> &str {
        "get_current_date"
    }

    fn description(&self) -> &str {
        "Returns the current date in YYYY-MM-DD format. Use this tool specifically for \
         getting the date. It does not provide the time. Ignores any input argument."
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        Ok(self.clock.today().format("%Y-%m-%d").to_string())
    }
}
