//! The `splc` binary end to end.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

use crate::common::{read, Workspace};

fn splc(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_splc"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn splc");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for splc")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn run_prints_program_output() {
    let ws = Workspace::with_source(
        "loop.spl",
        "new i = 0; while (i < 3) { write i; i = i + 1; }",
    );
    let out = splc(&["run", ws.source.to_str().unwrap()], "");
    assert_eq!(stdout(&out), "0\n1\n2\n");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn run_reads_stdin_without_prompt() {
    let ws = Workspace::with_source("sum.spl", "new a = read; new b = read; write a + b;");
    let out = splc(&["run", ws.source.to_str().unwrap()], "40\n2\n");
    assert_eq!(stdout(&out), "42\n");
}

#[test]
fn run_reports_first_runtime_error_and_fails() {
    let ws = Workspace::with_source("div.spl", "write 1 / 0; write y; write 5;");
    let out = splc(&["run", ws.source.to_str().unwrap()], "");
    assert_eq!(stdout(&out), "5\n");
    assert_eq!(stderr(&out), "ERROR: divide by zero\n");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn build_then_inspect_output() {
    let ws = Workspace::with_source("seven.spl", "new x = 3; new y = 4; write x + y;");
    let out = splc(&["build", ws.source.to_str().unwrap()], "");
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let asm = read(&ws.path("seven.asm"));
    assert!(asm.contains("section .bss\nSPL_x: resb 4\nSPL_y: resb 4\n"));
}

#[test]
fn static_error_shows_diagnostic() {
    let ws = Workspace::with_source("bad.spl", "new x = 1;\nnew x = 2;\n");
    let out = splc(&["build", ws.source.to_str().unwrap(), "--color=never"], "");
    let err = stderr(&out);
    assert!(err.starts_with("error[E2002]: variable `x` is already bound\n"), "{err}");
    assert!(err.contains("bad.spl:2:5"), "{err}");
    assert!(err.contains("aborting due to previous error"), "{err}");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn usage_errors_exit_with_two() {
    let out = splc(&["frobnicate"], "");
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("unknown command `frobnicate`"));

    let out = splc(&["run"], "");
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn help_and_version() {
    let out = splc(&[], "");
    assert!(stdout(&out).starts_with("SPL Compiler\n"));
    assert_eq!(out.status.code(), Some(0));

    let out = splc(&["version"], "");
    assert_eq!(
        stdout(&out),
        format!("splc {}\n", env!("CARGO_PKG_VERSION"))
    );
}
