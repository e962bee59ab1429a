pub mod terminal;

use crate::core::Result;
use crate::facade::SessionContext;
use crate::result::LeakReport;

pub use terminal::TerminalReport;

/// Receives the findings of an inspection that found leaks.
pub trait LeakReporter: Send + Sync {
    /// `session` is `None` when no test was recorded before the inspection.
    fn render(&self, session: Option<&SessionContext>, leaks: &LeakReport) -> Result<()>;
}
