//! Built-in tool implementations for ragent.
//!
//! The agent can read the current date and time and count the days until a
//! future date. Every tool reads "now" through a [`Clock`], so callers can
//! pin time in tests.

pub mod current_date;
pub mod current_time;
pub mod days_until;

use std::sync::Arc;

use ragent_core::clock::{Clock, SystemClock};
use ragent_core::tool::ToolRegistry;

pub use current_date::CurrentDateTool;
pub use current_time::CurrentTimeTool;
pub use days_until::DaysUntilTool;

/// Create a registry with all built-in tools reading the system clock.
pub fn default_registry() -> ToolRegistry {
    registry_with_clock(Arc::new(SystemClock))
}

/// Create a registry with all built-in tools reading `clock`.
pub fn registry_with_clock(clock: Arc<dyn Clock>) -> ToolRegistry {
    ToolRegistry::new()
        .with(Arc::new(CurrentDateTool::new(clock.clone())))
        .with(Arc::new(CurrentTimeTool::new(clock.clone())))
        .with(Arc::new(DaysUntilTool::new(clock)))
}
