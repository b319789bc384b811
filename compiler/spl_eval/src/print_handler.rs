//! Output streams for the interpreter.
//!
//! Program output and error reports are separate streams. The stdout
//! handler maps them to stdout and stderr; the buffer handler captures both
//! for tests.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Writes results to stdout and errors to stderr.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    pub fn print(&self, msg: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(msg.as_bytes());
        let _ = out.flush();
    }

    pub fn print_error(&self, msg: &str) {
        eprintln!("{msg}");
    }
}

/// Captures both streams in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    output: Mutex<String>,
    errors: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print(&self, msg: &str) {
        self.output.lock().push_str(msg);
    }

    pub fn print_error(&self, msg: &str) {
        let mut buf = self.errors.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    pub fn get_output(&self) -> String {
        self.output.lock().clone()
    }

    pub fn get_errors(&self) -> String {
        self.errors.lock().clone()
    }
}

/// Print handler implementation using enum dispatch.
pub enum PrintHandlerImpl {
    Stdout(StdoutPrintHandler),
    Buffer(BufferPrintHandler),
}

impl PrintHandlerImpl {
    /// Write program output without a trailing newline.
    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.print(msg),
            Self::Buffer(h) => h.print(msg),
        }
    }

    /// Write one line to the error stream.
    pub fn print_error(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.print_error(msg),
            Self::Buffer(h) => h.print_error(msg),
        }
    }

    /// Captured program output; empty for stdout.
    pub fn get_output(&self) -> String {
        match self {
            Self::Stdout(_) => String::new(),
            Self::Buffer(h) => h.get_output(),
        }
    }

    /// Captured error output; empty for stdout.
    pub fn get_errors(&self) -> String {
        match self {
            Self::Stdout(_) => String::new(),
            Self::Buffer(h) => h.get_errors(),
        }
    }
}

/// Shared print handler that can be passed around.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout(StdoutPrintHandler))
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}
