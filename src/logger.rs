//! ## Logging
//!
//! Events are recorded with [`tracing`] and formatted by
//! [`tracing_subscriber`]'s `fmt` layer. Each formatted line is forwarded to
//! the browser console method matching its level, so the browser's own
//! level filter keeps working.
//!
//! Timestamps are disabled: `wasm32-unknown-unknown` has no system clock,
//! and the console stamps messages itself.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use web_sys::{console, wasm_bindgen::JsValue};

use crate::error::Error;

/// Installs the console logger as the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init(level: Level) -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .try_init()
        .map_err(|error| Error::Logger(error.to_string()))
}

/// Creates a [`ConsoleWriter`] per event.
#[derive(Debug, Clone, Copy, Default)]
struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and hands it to the console when flushed.
#[derive(Debug)]
struct ConsoleWriter {
    /// The event level.
    level: Level,
    /// The formatted line.
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buffer);
        let message = JsValue::from_str(line.trim_end());
        if self.level == Level::ERROR {
            console::error_1(&message);
        } else if self.level == Level::WARN {
            console::warn_1(&message);
        } else if self.level == Level::INFO {
            console::info_1(&message);
        } else {
            console::debug_1(&message);
        }
        self.buffer.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
