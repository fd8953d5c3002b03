//! Capabilities the VM calls out to
//!
//! A [`Host`] receives every byte written by `.` and is told when the VM starts
//! and stops waiting for a byte from `,`. The VM owns its host; the host never
//! holds a reference back to the VM, so delivering input is always an explicit
//! `resume` call made by whoever drives the VM.
//!
//! Two hosts are provided:
//! - [`CapturedOutput`]: records output in memory (tests, terminal UI)
//! - [`StreamHost`]: writes output to any [`std::io::Write`] (plain mode)

use std::io::Write;

/// Output sink and input-request notifier for a VM
pub trait Host {
    /// Called once per `.` instruction, in execution order
    fn output(&mut self, byte: u8);

    /// Called when the VM suspends on `,`
    fn input_requested(&mut self) {}

    /// Called when a suspended VM is resumed with a byte
    fn input_satisfied(&mut self) {}
}

impl<H: Host + ?Sized> Host for &mut H {
    fn output(&mut self, byte: u8) {
        (**self).output(byte)
    }

    fn input_requested(&mut self) {
        (**self).input_requested()
    }

    fn input_satisfied(&mut self) {
        (**self).input_satisfied()
    }
}

/// In-memory host that records everything the program prints
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    bytes: Vec<u8>,
    waiting: bool,
    requests: usize,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw output bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Output decoded one byte per character
    pub fn text(&self) -> String {
        self.bytes.iter().map(|&b| char::from(b)).collect()
    }

    /// Output split into lines for display.
    ///
    /// A trailing newline does not produce an empty final line.
    pub fn lines(&self) -> Vec<String> {
        let text = self.text();
        let mut lines: Vec<String> = text.split('\n').map(|s| s.to_string()).collect();
        if lines.last().is_some_and(|s| s.is_empty()) {
            lines.pop();
        }
        lines
    }

    /// Whether the VM is currently suspended on `,`
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// How many times the VM asked for input
    pub fn input_requests(&self) -> usize {
        self.requests
    }
}

impl Host for CapturedOutput {
    fn output(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    fn input_requested(&mut self) {
        self.waiting = true;
        self.requests += 1;
    }

    fn input_satisfied(&mut self) {
        self.waiting = false;
    }
}

/// Host that streams output bytes to a writer
///
/// The [`Host`] callbacks cannot fail, so the first write error is kept and
/// later output is dropped; check [`StreamHost::take_error`] once the VM stops.
#[derive(Debug)]
pub struct StreamHost<W: Write> {
    writer: W,
    error: Option<std::io::Error>,
}

impl<W: Write> StreamHost<W> {
    pub fn new(writer: W) -> Self {
        StreamHost {
            writer,
            error: None,
        }
    }

    /// First write error seen, if any
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn record<T>(&mut self, result: std::io::Result<T>) {
        if let Err(e) = result {
            if self.error.is_none() {
                tracing::warn!("output stream failed: {}", e);
                self.error = Some(e);
            }
        }
    }
}

impl<W: Write> Host for StreamHost<W> {
    fn output(&mut self, byte: u8) {
        if self.error.is_some() {
            return;
        }
        let result = self.writer.write_all(&[byte]);
        self.record(result);
        if byte == b'\n' {
            let result = self.writer.flush();
            self.record(result);
        }
    }

    fn input_requested(&mut self) {
        // Make sure any prompt the program printed is visible before blocking.
        let result = self.writer.flush();
        self.record(result);
    }
}
