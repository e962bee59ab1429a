// ============================================================================
// DbPlumber Library
// ============================================================================

pub mod core;
pub mod config;
pub mod facade;
pub mod interface;
pub mod report;
pub mod result;
pub mod scanner;
pub mod storage;

// Re-export main types for convenience
pub use config::InspectOptions;
pub use core::{ModelError, PlumberError, Result};
pub use facade::{Inspection, Plumber, SessionContext, SessionSlot};
pub use interface::{InspectableModel, ModelRegistry};
pub use report::{LeakReporter, TerminalReport};
pub use result::LeakReport;
pub use scanner::{LeakFinder, scan};
pub use storage::{MemoryModel, MemoryRegistry};

// ============================================================================
// Process-wide entry points
// ============================================================================

/// Record the test about to run in the process-wide session slot.
///
/// # Examples
///
/// ```
/// use dbplumber::{SessionContext, SessionSlot};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// dbplumber::log(SessionContext::new("creates a user").file_path("tests/users.rs"))?;
/// let current = SessionSlot::global().current()?;
/// assert_eq!(current.map(|c| c.description), Some("creates a user".to_string()));
/// # Ok(())
/// # }
/// ```
pub fn log(context: SessionContext) -> Result<()> {
    SessionSlot::global().record(context)
}

/// Inspect `registry` against the process-wide session, reporting to stdout.
pub fn inspect<R: ModelRegistry + 'static>(registry: R, options: &InspectOptions) -> Result<Inspection> {
    Plumber::new(registry).inspect(options)
}
