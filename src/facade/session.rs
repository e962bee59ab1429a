use crate::core::Result;
use lazy_static::lazy_static;
use std::fmt;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_SESSION: Arc<SessionSlot> = Arc::new(SessionSlot::new());
}

/// Identifies the test a leak is attributed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub description: String,
    pub file_path: Option<String>,
    pub line: Option<u32>,
}

impl SessionContext {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            file_path: None,
            line: None,
        }
    }

    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// `file:line`, `file`, or the description when no file is known
    pub fn location(&self) -> String {
        match (&self.file_path, self.line) {
            (Some(path), Some(line)) => format!("{}:{}", path, line),
            (Some(path), None) => path.clone(),
            (None, _) => self.description.clone(),
        }
    }
}

impl fmt::Display for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.location())
    }
}

/// Holds the currently running test.
///
/// Overwritten before each test, read once by the inspection that follows.
/// The previous value stays in place until the next `record`.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: RwLock<Option<SessionContext>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide slot used by `Plumber::new` and `dbplumber::log`
    pub fn global() -> Arc<SessionSlot> {
        Arc::clone(&GLOBAL_SESSION)
    }

    pub fn record(&self, context: SessionContext) -> Result<()> {
        *self.current.write()? = Some(context);
        Ok(())
    }

    pub fn current(&self) -> Result<Option<SessionContext>> {
        Ok(self.current.read()?.clone())
    }

    pub fn clear(&self) -> Result<()> {
        *self.current.write()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_overwrites() {
        let slot = SessionSlot::new();
        assert_eq!(slot.current().unwrap(), None);

        slot.record(SessionContext::new("first")).unwrap();
        slot.record(SessionContext::new("second")).unwrap();

        assert_eq!(slot.current().unwrap().unwrap().description, "second");

        slot.clear().unwrap();
        assert_eq!(slot.current().unwrap(), None);
    }

    #[test]
    fn test_location() {
        let ctx = SessionContext::new("creates a user");
        assert_eq!(ctx.location(), "creates a user");

        let ctx = ctx.file_path("tests/user_tests.rs");
        assert_eq!(ctx.location(), "tests/user_tests.rs");

        let ctx = ctx.line(42);
        assert_eq!(ctx.location(), "tests/user_tests.rs:42");
        assert_eq!(ctx.to_string(), "creates a user (tests/user_tests.rs:42)");
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&SessionSlot::global(), &SessionSlot::global()));
    }
}
