use super::LeakReporter;
use crate::core::Result;
use crate::facade::SessionContext;
use crate::result::LeakReport;
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::sync::Mutex;

const UNKNOWN_TEST: &str = "<unknown test>";

/// Prints a coloured leak report, one line per leaking model.
pub struct TerminalReport {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl TerminalReport {
    pub fn stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    pub fn to_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
            color: true,
        }
    }

    /// Disable ANSI styling
    pub fn plain(mut self) -> Self {
        self.color = false;
        self
    }
}

impl Default for TerminalReport {
    fn default() -> Self {
        Self::stdout()
    }
}

impl LeakReporter for TerminalReport {
    fn render(&self, session: Option<&SessionContext>, leaks: &LeakReport) -> Result<()> {
        let mut out = self.out.lock()?;
        write_report(&mut *out, session, leaks, self.color)?;
        out.flush()?;
        Ok(())
    }
}

/// Render the report text for `leaks` into `out`.
pub fn write_report<W: Write + ?Sized>(
    out: &mut W,
    session: Option<&SessionContext>,
    leaks: &LeakReport,
    color: bool,
) -> io::Result<()> {
    let location = session
        .map(SessionContext::location)
        .unwrap_or_else(|| UNKNOWN_TEST.to_string());

    let heading = "#### Leaking Test";
    let heading = if color { heading.red().to_string() } else { heading.to_string() };
    let location = if color { location.red().underlined().to_string() } else { location };

    writeln!(out)?;
    writeln!(out, "{}", heading)?;
    writeln!(out)?;
    writeln!(out, "  The test '{}' leaves", location)?;
    writeln!(out, "  the following rows in the database:")?;
    writeln!(out)?;

    for (model, rows) in leaks.iter() {
        let rows = if color { rows.to_string().blue().to_string() } else { rows.to_string() };
        writeln!(out, "     - {} row(s) for the {} model", rows, model)?;
    }

    let heading = "#### What now?";
    let heading = if color { heading.yellow().to_string() } else { heading.to_string() };
    let hook = |text: &str| if color { text.yellow().to_string() } else { text.to_string() };

    writeln!(out)?;
    writeln!(out, "{}", heading)?;
    writeln!(out)?;
    writeln!(
        out,
        "  If rows are created in shared setup such as a {} or {} hook, add a",
        hook("fixture"),
        hook("before_all")
    )?;
    writeln!(
        out,
        "  matching {} hook that removes them, or run the test inside a transaction.",
        hook("after_all")
    )?;
    writeln!(out)?;
    Ok(())
}
