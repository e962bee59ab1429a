use super::session::{SessionContext, SessionSlot};
use crate::config::InspectOptions;
use crate::core::Result;
use crate::interface::ModelRegistry;
use crate::report::{LeakReporter, TerminalReport};
use crate::result::LeakReport;
use crate::scanner;
use std::sync::Arc;
use tracing::{Level, event};

/// Exit status used by brutal mode.
pub const BRUTAL_EXIT_CODE: i32 = 1;

type Terminator = Arc<dyn Fn(i32) + Send + Sync>;

fn exit_process(code: i32) {
    std::process::exit(code)
}

/// Outcome of one inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    Clean,
    Leaked(LeakReport),
}

impl Inspection {
    pub fn is_clean(&self) -> bool {
        matches!(self, Inspection::Clean)
    }

    pub fn leaks(&self) -> Option<&LeakReport> {
        match self {
            Inspection::Clean => None,
            Inspection::Leaked(report) => Some(report),
        }
    }
}

/// Binds leak inspections to the test that is currently running.
///
/// Call [`Plumber::record_session`] before each test and
/// [`Plumber::inspect`] after it.
///
/// # Examples
///
/// ```
/// use dbplumber::{InspectOptions, MemoryModel, MemoryRegistry, Plumber, SessionContext, SessionSlot};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = MemoryRegistry::new().with_model(MemoryModel::new("User"))?;
/// let plumber = Plumber::new(registry.clone()).with_session_slot(SessionSlot::new().into());
///
/// plumber.record_session(SessionContext::new("creates nothing"))?;
/// let outcome = plumber.inspect(&InspectOptions::default())?;
/// assert!(outcome.is_clean());
/// # Ok(())
/// # }
/// ```
pub struct Plumber {
    registry: Arc<dyn ModelRegistry>,
    reporter: Arc<dyn LeakReporter>,
    session: Arc<SessionSlot>,
    terminate: Terminator,
}

impl Plumber {
    /// Report to stdout, use the process-wide session slot and exit the
    /// process in brutal mode.
    pub fn new<R: ModelRegistry + 'static>(registry: R) -> Self {
        Self {
            registry: Arc::new(registry),
            reporter: Arc::new(TerminalReport::stdout()),
            session: SessionSlot::global(),
            terminate: Arc::new(exit_process),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn LeakReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_session_slot(mut self, session: Arc<SessionSlot>) -> Self {
        self.session = session;
        self
    }

    /// Replace the brutal mode exit, mainly for tests of the facade itself.
    pub fn on_brutal_exit<F>(mut self, terminate: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.terminate = Arc::new(terminate);
        self
    }

    pub fn session_slot(&self) -> &Arc<SessionSlot> {
        &self.session
    }

    /// Remember `context` as the running test, replacing the previous one.
    pub fn record_session(&self, context: SessionContext) -> Result<()> {
        self.session.record(context)
    }

    /// Scan for leaks and report them against the recorded test.
    ///
    /// In brutal mode a leak terminates the process right after the report.
    /// When cleanup fails, the leaks found up to that point are still
    /// reported before the error is returned.
    pub fn inspect(&self, options: &InspectOptions) -> Result<Inspection> {
        let leaks = match scanner::scan(self.registry.as_ref(), options) {
            Ok(leaks) => leaks,
            Err(err) => {
                if let Some(partial) = err.partial_leaks() {
                    self.report(partial, options)?;
                }
                return Err(err);
            }
        };
        if leaks.is_empty() {
            return Ok(Inspection::Clean);
        }

        self.report(&leaks, options)?;
        Ok(Inspection::Leaked(leaks))
    }

    fn report(&self, leaks: &LeakReport, options: &InspectOptions) -> Result<()> {
        let session = self.session.current()?;
        self.reporter.render(session.as_ref(), leaks)?;

        if options.brutal {
            event!(
                Level::ERROR,
                leaking = leaks.len(),
                "brutal mode: terminating after leak report"
            );
            (self.terminate)(BRUTAL_EXIT_CODE);
        }
        Ok(())
    }

    /// Record `context`, run `body`, then inspect.
    pub fn around<T, F>(&self, context: SessionContext, options: &InspectOptions, body: F) -> Result<(T, Inspection)>
    where
        F: FnOnce() -> T,
    {
        self.record_session(context)?;
        let value = body();
        let inspection = self.inspect(options)?;
        Ok((value, inspection))
    }
}
