use std::io::{self, Write};

use archive_core::{AppViewModel, DocumentRow};
use archive_engine::BatchOutcome;
use chrono::Local;

/// Writes listings and batch progress for one session. Progress lines are
/// only written when the text changes.
pub struct Renderer<W: Write> {
    out: W,
    last_progress: Option<String>,
}

impl Renderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_progress: None,
        }
    }

    pub fn list(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    pub fn not_found(&mut self) -> io::Result<()> {
        writeln!(self.out, "Not found")
    }

    pub fn rows(&mut self, view: &AppViewModel) -> io::Result<()> {
        if let Some(first) = view.rows.first() {
            writeln!(self.out, "{}", first.label)?;
        }
        for row in &view.rows {
            writeln!(self.out, "{}", format_row(row))?;
        }
        Ok(())
    }

    pub fn progress(&mut self, view: &AppViewModel) -> io::Result<()> {
        let Some(text) = view.progress.as_ref().filter(|text| !text.is_empty()) else {
            return Ok(());
        };
        if self.last_progress.as_ref() == Some(text) {
            return Ok(());
        }
        writeln!(self.out, "[{}] {}", Local::now().format("%H:%M:%S"), text)?;
        self.last_progress = Some(text.clone());
        Ok(())
    }

    pub fn outcome(&mut self, outcome: &BatchOutcome) -> io::Result<()> {
        for path in outcome.saved() {
            writeln!(self.out, "saved {}", path.display())?;
        }
        match outcome {
            BatchOutcome::Completed { saved } => {
                writeln!(self.out, "{} file(s) downloaded", saved.len())
            }
            BatchOutcome::Offline => writeln!(self.out, "backend is offline, nothing downloaded"),
            BatchOutcome::TransferFailed { failure, .. } => writeln!(
                self.out,
                "stopped at {}: {}",
                failure.filename, failure.reason
            ),
            BatchOutcome::Aborted { reason } => writeln!(self.out, "batch aborted: {reason}"),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn format_row(row: &DocumentRow) -> String {
    let mark = if row.checked { 'x' } else { ' ' };
    format!("  [{}] {:>2}. {}", mark, row.index + 1, row.title)
}
