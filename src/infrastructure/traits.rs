//! I/O boundary traits for testability
//!
//! The game only ever talks to the player through [`Console`], allowing
//! services to be tested with scripted implementations.

use std::io::{self, BufRead, Write};

/// Line-oriented terminal abstraction.
pub trait Console: Send + Sync {
    /// Write text without a trailing newline and flush it.
    fn write(&self, text: &str) -> io::Result<()>;

    /// Write text followed by a newline.
    fn write_line(&self, text: &str) -> io::Result<()>;

    /// Read one line without its line terminator.
    /// Returns None once input is exhausted.
    fn read_line(&self) -> io::Result<Option<String>>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Console backed by the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }

    fn write_line(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()
    }

    fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
