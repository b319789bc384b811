//! Command handlers called through the library.

use pretty_assertions::assert_eq;
use spl_diagnostic::emitter::ColorMode;
use splc::commands::{build_file, check_file, dot_file, dot_path};
use splc::{BuildOptions, DriverError};

use crate::common::{read, Workspace};

const DOUBLE: &str = "fun f(n) { return n * 2; } write f(21);";

#[test]
fn build_writes_asm_next_to_source() {
    let ws = Workspace::with_source("double.spl", DOUBLE);
    let written = build_file(&ws.source, &BuildOptions::default()).unwrap();
    assert_eq!(written, ws.path("double.asm"));
    let asm = read(&written);
    assert!(asm.starts_with("[BITS 32]\n"));
    assert!(asm.contains("\nglobal $f\n$f:\n"));
    assert!(asm.contains("\tcall $f\n"));
}

#[test]
fn build_honours_output_path() {
    let ws = Workspace::with_source("double.spl", DOUBLE);
    let options = BuildOptions {
        output: Some(ws.path("custom.s")),
        ..BuildOptions::default()
    };
    let written = build_file(&ws.source, &options).unwrap();
    assert_eq!(written, ws.path("custom.s"));
    assert!(!ws.path("double.asm").exists());
}

#[test]
fn build_appends_extension_for_other_names() {
    let ws = Workspace::with_source("double.txt", DOUBLE);
    let written = build_file(&ws.source, &BuildOptions::default()).unwrap();
    assert_eq!(written, ws.path("double.txt.asm"));
}

#[test]
fn build_writes_nothing_on_static_error() {
    let ws = Workspace::with_source("bad.spl", "new x = 1; new x = 2;");
    let err = build_file(&ws.source, &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, DriverError::Reported { count: 1 }));
    assert!(!ws.path("bad.asm").exists());
}

#[test]
fn build_reports_syntax_errors() {
    let ws = Workspace::with_source("bad.spl", "write (1 + ;");
    let err = build_file(&ws.source, &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, DriverError::Reported { .. }));
}

#[test]
fn missing_source_is_a_read_error() {
    let ws = Workspace::with_source("a.spl", "");
    let err = check_file(&ws.path("missing.spl"), ColorMode::Never).unwrap_err();
    assert!(matches!(err, DriverError::Read { .. }));
    assert_eq!(err.exit_code(), splc::EXIT_FAILURE);
}

#[test]
fn check_accepts_valid_program() {
    let ws = Workspace::with_source("ok.spl", DOUBLE);
    check_file(&ws.source, ColorMode::Never).unwrap();
    assert!(!ws.path("ok.asm").exists());
}

#[test]
fn check_rejects_return_at_top_level() {
    let ws = Workspace::with_source("bad.spl", "return 1;");
    assert!(check_file(&ws.source, ColorMode::Never).is_err());
}

#[test]
fn dot_writes_graph() {
    let ws = Workspace::with_source("tree.spl", "write 1 + 2;");
    let written = dot_file(&ws.source, &BuildOptions::default()).unwrap();
    assert_eq!(written, dot_path(&ws.source));
    assert_eq!(written, ws.path("tree.dot"));
    let dot = read(&written);
    assert!(dot.starts_with("digraph AST {\n"));
    assert!(dot.contains("[label=\"arop:+\"]"));
    assert!(dot.ends_with("}\n"));
}
