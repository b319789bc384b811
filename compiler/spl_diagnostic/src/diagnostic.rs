use spl_ir::Span;

use crate::ErrorCode;

/// A span annotated with a short message.
///
/// Primary labels mark the offending source; secondary labels point at
/// related places, such as the opening brace of an unclosed block.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

/// An error found in SPL source, ready for an emitter.
///
/// SPL has no warnings: every diagnostic stops the phase that raised it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub labels: Vec<Label>,
    /// Printed as `= note: ...` below the labels.
    pub notes: Vec<String>,
    /// Printed as `= help: ...`.
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labelled(span, message.into(), true)
    }

    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labelled(span, message.into(), false)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Span of the first primary label.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    fn labelled(mut self, span: Span, message: String, is_primary: bool) -> Self {
        self.labels.push(Label {
            span,
            message,
            is_primary,
        });
        self
    }
}

// Parser diagnostics (E1xxx).

pub fn unexpected_token(span: Span, expected: &str, found: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::E1001,
        format!("unexpected token: expected {expected}, found `{found}`"),
    )
    .with_label(span, format!("expected {expected}"))
}

pub fn expected_expression(span: Span, found: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::E1002,
        format!("expected expression, found `{found}`"),
    )
    .with_label(span, "expected expression here")
}

/// A block opened at `open_span` reached `close_span` without its `}`.
pub fn unclosed_delimiter(open_span: Span, close_span: Span, delimiter: char) -> Diagnostic {
    let closing = match delimiter {
        '(' => ')',
        '{' => '}',
        other => other,
    };
    Diagnostic::new(
        ErrorCode::E1003,
        format!("unclosed delimiter `{delimiter}`"),
    )
    .with_label(close_span, format!("expected `{closing}`"))
    .with_secondary_label(open_span, "unclosed delimiter opened here")
}

pub fn expected_identifier(span: Span, found: &str) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::E1004,
        format!("expected identifier, found `{found}`"),
    )
    .with_label(span, "expected identifier here")
}

#[cfg(test)]
mod tests;
