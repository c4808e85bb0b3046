//! Line-oriented terminal wrapper.
//!
//! Generic over the reader and writer so sessions can run against stdin and
//! stdout or against in-memory buffers in tests.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use log::warn;

/// One answer read from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A line of text, trimmed.
    Line(String),
    /// Bytes that were not UTF-8, decoded lossily and trimmed.
    Undecodable(String),
    /// Input is exhausted.
    Closed,
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes `text` without a newline and reads one line back.
    pub fn ask(&mut self, text: &str) -> io::Result<Reply> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(Reply::Closed);
        }
        Ok(match String::from_utf8(bytes) {
            Ok(line) => Reply::Line(line.trim().to_string()),
            Err(e) => {
                warn!("Operator input was not valid UTF-8: {}", e);
                Reply::Undecodable(String::from_utf8_lossy(e.as_bytes()).trim().to_string())
            }
        })
    }

    /// Like [`Console::ask`], but undecodable input is passed on as its lossy
    /// text. Returns `None` once the input is exhausted.
    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        Ok(match self.ask(text)? {
            Reply::Line(line) | Reply::Undecodable(line) => Some(line),
            Reply::Closed => None,
        })
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Raw writer for the renderers.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
