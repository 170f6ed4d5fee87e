//! Terminal output for CLI commands.
//!
//! Progress and results go to stdout; errors and external tool diagnostics
//! go to stderr. Colour is applied only when the stream supports
//! it and never in quiet mode.

use std::fmt::Display;
use std::io::{self, Write};

use owo_colors::{OwoColorize, Stream, Style};

mod symbols {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const ARROW: &str = "→";
}

/// Writes user-facing messages
#[derive(Debug, Clone)]
pub struct OutputManager {
    quiet: bool,
}

impl OutputManager {
    /// Create an output manager; `quiet` keeps only errors and tool output
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// `text` styled for `stream`, or plain when colour is off.
    fn paint<'a>(&self, text: &'a str, stream: Stream, style: Style) -> Box<dyn Display + 'a> {
        if self.quiet {
            Box::new(text)
        } else {
            Box::new(text.if_supports_color(stream, move |t| t.style(style)).to_string())
        }
    }

    /// Print a success line
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let symbol = self.paint(symbols::SUCCESS, Stream::Stdout, Style::new().green());
        writeln!(io::stdout().lock(), "{symbol} {message}")
    }

    /// Print an error line; never suppressed
    pub fn error(&self, message: &str) -> io::Result<()> {
        let style = Style::new().red();
        writeln!(
            io::stderr().lock(),
            "{} {}",
            self.paint(symbols::ERROR, Stream::Stderr, style),
            self.paint(message, Stream::Stderr, style)
        )
    }

    /// Print a progress line
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let arrow = self.paint(symbols::ARROW, Stream::Stdout, Style::new().blue());
        writeln!(io::stdout().lock(), "{arrow} {message}")
    }

    /// Print an indented line
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(
            io::stdout().lock(),
            "  {}",
            self.paint(message, Stream::Stdout, Style::new().dimmed())
        )
    }

    /// Write external tool output to stderr unchanged
    pub fn tool_output(&self, output: &str) -> io::Result<()> {
        let mut stderr = io::stderr().lock();
        stderr.write_all(output.as_bytes())?;
        if !output.is_empty() && !output.ends_with('\n') {
            stderr.write_all(b"\n")?;
        }
        stderr.flush()
    }

    /// Write a pre-rendered block to stdout
    pub fn raw(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_output_is_never_coloured() {
        let output = OutputManager::new(true);
        let painted = output
            .paint("failed", Stream::Stderr, Style::new().red())
            .to_string();
        assert_eq!(painted, "failed");
    }

    #[test]
    fn coloured_output_keeps_the_text() {
        let output = OutputManager::new(false);
        let painted = output
            .paint("done", Stream::Stdout, Style::new().green())
            .to_string();
        assert!(painted.contains("done"));
    }
}
