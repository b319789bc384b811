use pretty_assertions::assert_eq;
use spl_ir::Span;

use crate::{
    expected_expression, expected_identifier, unclosed_delimiter, unexpected_token, Diagnostic,
    ErrorCode,
};

#[test]
fn test_builder_collects_parts() {
    let diag = Diagnostic::new(ErrorCode::E2002, "variable `x` is already bound")
        .with_label(Span::new(4, 5), "rebound here")
        .with_secondary_label(Span::new(0, 1), "first bound here")
        .with_note("bindings are not shadowed within one scope")
        .with_suggestion("use `x = ...` to assign instead");

    assert_eq!(diag.message, "variable `x` is already bound");
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_span(), Some(Span::new(4, 5)));
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn test_primary_span_skips_secondary_labels() {
    let diag = Diagnostic::new(ErrorCode::E1003, "unclosed")
        .with_secondary_label(Span::new(0, 1), "opened here");
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn test_parser_helpers() {
    let diag = unexpected_token(Span::new(3, 4), "`;`", "}");
    assert_eq!(diag.code, ErrorCode::E1001);
    assert_eq!(diag.message, "unexpected token: expected `;`, found `}`");

    assert_eq!(expected_expression(Span::DUMMY, ";").code, ErrorCode::E1002);
    assert_eq!(expected_identifier(Span::DUMMY, "1").code, ErrorCode::E1004);

    let unclosed = unclosed_delimiter(Span::new(0, 1), Span::new(9, 9), '{');
    assert_eq!(unclosed.code, ErrorCode::E1003);
    assert_eq!(unclosed.primary_span(), Some(Span::new(9, 9)));
    assert_eq!(unclosed.labels[0].message, "expected `}`");
    assert!(!unclosed.labels[1].is_primary);
}
