//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.

use std::io::{self, Write};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label};

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const HELP: &str = "\x1b[1;32m"; // Bold green
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Parse the value of a `--color=` flag.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// Source file the spans refer to.
struct SourceContext {
    path: String,
    text: String,
    lines: LineOffsetTable,
}

/// Terminal emitter with optional color support.
///
/// Without a source attached, labels print raw byte spans. With one, they
/// print `path:line:col` followed by the offending source line.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
    source: Option<SourceContext>,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a new terminal emitter with explicit color mode.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source: None,
        }
    }

    /// Attach the source text so labels can be shown as line and column.
    #[must_use]
    pub fn with_source(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        self.source = Some(SourceContext {
            path: path.into(),
            lines: LineOffsetTable::build(&text),
            text,
        });
        self
    }

    /// Consume the emitter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_code(&mut self, code: &str) {
        if self.colors {
            let _ = write!(self.writer, "{}[{code}]{}", colors::BOLD, colors::RESET);
        } else {
            let _ = write!(self.writer, "[{code}]");
        }
    }

    fn write_label(&mut self, label: &Label) {
        let marker = if label.is_primary { "-->" } else { "   " };
        let _ = write!(self.writer, "  {marker} ");

        let snippet = match &self.source {
            Some(src) => {
                let (line, col) = src.lines.span_start(&src.text, label.span);
                let _ = write!(self.writer, "{}:{line}:{col}: ", src.path);
                let text = src.text.lines().nth((line - 1) as usize).unwrap_or("");
                Some((text.to_string(), col))
            }
            None => {
                let _ = write!(self.writer, "{:?}: ", label.span);
                None
            }
        };

        let color = if label.is_primary {
            colors::ERROR
        } else {
            colors::SECONDARY
        };
        self.write_colored(&label.message, color);
        let _ = writeln!(self.writer);

        if let Some((text, col)) = snippet {
            let width = label.span.len().max(1) as usize;
            let pad = " ".repeat((col - 1) as usize);
            let _ = writeln!(self.writer, "   | {text}");
            let _ = write!(self.writer, "   | {pad}");
            self.write_colored(&"^".repeat(width), color);
            let _ = writeln!(self.writer);
        }
    }
}

impl TerminalEmitter<io::Stderr> {
    /// Create a terminal emitter for stderr with explicit color mode.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        // Header: error[CODE]: message
        self.write_colored("error", colors::ERROR);
        self.write_code(diagnostic.code.as_str());
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            self.write_label(label);
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::BOLD);
            let _ = writeln!(self.writer, ": {note}");
        }

        for suggestion in &diagnostic.suggestions {
            let _ = write!(self.writer, "  = ");
            self.write_colored("help", colors::HELP);
            let _ = writeln!(self.writer, ": {suggestion}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize) {
        if error_count == 0 {
            return;
        }
        self.write_colored("error", colors::ERROR);
        let _ = if error_count == 1 {
            writeln!(self.writer, ": aborting due to previous error")
        } else {
            writeln!(self.writer, ": aborting due to {error_count} previous errors")
        };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;
    use spl_ir::Span;

    use super::*;
    use crate::ErrorCode;

    fn sample_diagnostic() -> Diagnostic {
        Diagnostic::new(ErrorCode::E2002, "`x` is already bound")
            .with_label(Span::new(17, 18), "bound again here")
            .with_secondary_label(Span::new(4, 5), "first bound here")
            .with_suggestion("assign with `x = ...` instead")
    }

    fn render(emitter: TerminalEmitter<Vec<u8>>, diag: &Diagnostic) -> String {
        let mut emitter = emitter;
        emitter.emit(diag);
        emitter.flush();
        String::from_utf8(emitter.into_inner()).unwrap()
    }

    #[test]
    fn test_no_color_without_source() {
        let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, true);
        let text = render(emitter, &sample_diagnostic());
        assert_eq!(
            text,
            "error[E2002]: `x` is already bound\n  --> 17..18: bound again here\n      4..5: first bound here\n  = help: assign with `x = ...` instead\n\n"
        );
    }

    #[test]
    fn test_with_source_shows_line_and_caret() {
        let source = "new x = 1;\nnew x = 2;\n";
        let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false)
            .with_source("prog.spl", source);
        let diag = Diagnostic::new(ErrorCode::E2002, "`x` is already bound")
            .with_label(Span::new(15, 16), "bound again here");
        let text = render(emitter, &diag);
        assert_eq!(
            text,
            "error[E2002]: `x` is already bound\n  --> prog.spl:2:5: bound again here\n   | new x = 2;\n   |     ^\n\n"
        );
    }

    #[test]
    fn test_color_mode() {
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
        assert!(ColorMode::Always.should_use_colors(false));
        assert!(!ColorMode::Never.should_use_colors(true));
        assert_eq!(ColorMode::parse("always"), Some(ColorMode::Always));
        assert_eq!(ColorMode::parse("sometimes"), None);
    }

    #[test]
    fn test_auto_on_tty_uses_ansi() {
        let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Auto, true);
        let text = render(emitter, &sample_diagnostic());
        assert!(text.contains("\x1b["));
        assert!(text.contains("E2002"));
    }

    #[test]
    fn test_summary() {
        let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
        emitter.emit_summary(2);
        emitter.emit_summary(1);
        emitter.emit_summary(0);
        let text = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(
            text,
            "error: aborting due to 2 previous errors\nerror: aborting due to previous error\n"
        );
    }
}
