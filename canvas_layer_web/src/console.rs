// Copyright 2026 the Canvas Layer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace output to the browser console.

use std::io::{self, Write};

use canvas_layer_debug::pretty::PrettyPrintSink;
use wasm_bindgen::JsValue;

/// A [`TraceSink`](canvas_layer_core::trace::TraceSink) that logs one
/// console line per layer event.
pub type ConsoleSink = PrettyPrintSink<ConsoleWriter>;

/// Creates a [`ConsoleSink`] writing through `console.log`.
#[must_use]
pub fn console_sink() -> ConsoleSink {
    PrettyPrintSink::with_writer(ConsoleWriter::default())
}

fn console_log(line: &str) {
    web_sys::console::log_1(&JsValue::from_str(line));
}

/// Line-buffered [`Write`] adapter that emits each completed line.
pub struct ConsoleWriter {
    line: Vec<u8>,
    emit: fn(&str),
}

impl core::fmt::Debug for ConsoleWriter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConsoleWriter")
            .field("buffered", &self.line.len())
            .finish_non_exhaustive()
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::with_emitter(console_log)
    }
}

impl ConsoleWriter {
    /// Creates a writer that hands completed lines to `emit`.
    #[must_use]
    pub fn with_emitter(emit: fn(&str)) -> Self {
        Self {
            line: Vec::new(),
            emit,
        }
    }

    fn emit_line(&mut self) {
        (self.emit)(&String::from_utf8_lossy(&self.line));
        self.line.clear();
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            if byte == b'\n' {
                self.emit_line();
            } else {
                self.line.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.line.is_empty() {
            self.emit_line();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
