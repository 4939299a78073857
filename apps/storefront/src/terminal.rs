//! # Terminal
//!
//! Line-oriented input and output. Generic over the reader and writer so
//! scripted sessions can drive the app without a real tty.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::view::ConfirmationSurface;

pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Terminal { input, output }
    }

    /// Reads one line without its terminator. `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.output, "> ")?;
        self.output.flush()
    }

    /// The underlying writer, for views that render themselves.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }
}

impl<R: BufRead, W: Write> ConfirmationSurface for Terminal<R, W> {
    fn present(&mut self, message: &str) {
        let shown = writeln!(self.output, "{message}")
            .and_then(|_| write!(self.output, "[press Enter to continue]"))
            .and_then(|_| self.output.flush());
        if let Err(e) = shown {
            warn!(error = %e, "Failed to show confirmation");
            return;
        }

        // Acknowledgement only; the content of the line is ignored.
        if let Err(e) = self.read_line() {
            warn!(error = %e, "Failed to read confirmation acknowledgement");
        }

        if let Err(e) = writeln!(self.output) {
            warn!(error = %e, "Failed to finish confirmation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_strips_terminators() {
        let mut terminal = Terminal::new(Cursor::new("add 1\r\nquit\n"), Vec::new());

        assert_eq!(terminal.read_line().unwrap(), Some("add 1".to_string()));
        assert_eq!(terminal.read_line().unwrap(), Some("quit".to_string()));
        assert_eq!(terminal.read_line().unwrap(), None);
    }

    #[test]
    fn test_present_waits_for_enter() {
        let mut terminal = Terminal::new(Cursor::new("\nnext\n"), Vec::new());

        terminal.present("Thank you!");

        assert_eq!(terminal.read_line().unwrap(), Some("next".to_string()));
        let written = String::from_utf8(terminal.output_mut().clone()).unwrap();
        assert!(written.starts_with("Thank you!\n[press Enter to continue]"));
    }
}
