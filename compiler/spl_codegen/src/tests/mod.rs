//! End-to-end tests: compile SPL source, then execute the listing.

#![allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]


use std::path::Path;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use machine::Fault;

fn assemble(source: &str) -> String {
    compile(&spl_parse::parse(source).unwrap()).unwrap()
}

fn run_with_input(source: &str, input: &[i32]) -> Result<String, Fault> {
    machine::run(&assemble(source), input)
}

fn run(source: &str) -> String {
    run_with_input(source, &[]).unwrap()
}

fn interpret(source: &str) -> String {
    let program = spl_parse::parse(source).unwrap();
    let print = spl_eval::buffer_handler();
    let errors = spl_eval::run_program(&program, print.clone(), spl_eval::InputHandler::from_text(""));
    assert_eq!(errors, 0, "interpreter errors for {source:?}: {}", print.get_errors());
    print.get_output()
}

#[test]
fn test_globals_listing() {
    let expected = "\
[BITS 32]
extern exit
extern write
extern writestr
extern writebool
extern writelf
extern read
global _start

section .rodata

section .bss
SPL_x: resb 4
SPL_y: resb 4

section .text

_start:
\tmov eax, 3
\tmov [SPL_x], eax
\tmov eax, 4
\tmov [SPL_y], eax
\tmov eax, [SPL_x]
\tpush eax
\tmov eax, [SPL_y]
\tmov ebx, eax
\tpop eax
\tadd eax, ebx
\tcall write
\tcall writelf
\txor eax, eax
\tcall exit
";
    assert_eq!(assemble("new x = 3; new y = 4; write x + y;"), expected);
}

#[test]
fn test_function_listing() {
    let asm = assemble("fun f(n) { return n * 2; } write f(21);");
    let expected = "\
section .text

global $f
$f:
\tpush ebp
\tmov ebp, esp
\tpush eax
\tsub esp, 0
\tmov eax, [ebp - 4]
\tpush eax
\tmov eax, 2
\tmov ebx, eax
\tpop eax
\timul ebx
\tjmp .RET
.RET:
\tmov esp, ebp
\tpop ebp
\tret

_start:
\tmov eax, 21
\tcall $f
\tcall write
\tcall writelf
\txor eax, eax
\tcall exit
";
    assert!(asm.ends_with(expected), "{asm}");
}

#[test]
fn test_function_named_like_an_instruction() {
    let source = "fun add(n) { return n + 1; } fun push(n) { return n; } fun eax(n) { return n; } \
                  write add(push(eax(1)));";
    let asm = assemble(source);
    for line in ["global $add", "$add:", "$push:", "$eax:", "\tcall $eax", "\tcall $push", "\tcall $add"] {
        assert!(asm.lines().any(|l| l == line), "missing `{line}` in\n{asm}");
    }
    assert!(!asm.lines().any(|l| l == "add:" || l == "\tcall add"), "{asm}");
    assert_eq!(machine::run(&asm, &[]).unwrap(), "2\n");
}

#[test]
fn test_literal_section() {
    let asm = assemble("print \"a\\tb\"; write \"x`y\\\\z\";");
    assert!(asm.contains("section .rodata\nSPLLIT_0: db `a\\tb\\0`\nSPLLIT_1: db `x\\`y\\\\z\\0`\n"));
}

#[test]
fn test_sum_of_globals() {
    assert_eq!(run("new x = 3; new y = 4; write x + y;"), "7\n");
}

#[test]
fn test_doubling_function() {
    assert_eq!(run("fun f(n) { return n * 2; } write f(21);"), "42\n");
}

#[test]
fn test_counting_loop() {
    assert_eq!(
        run("new i = 0; while (i < 3) { write i; i = i + 1; }"),
        "0\n1\n2\n"
    );
}

#[test]
fn test_loop_body_runs_zero_times() {
    assert_eq!(run("new i = 5; while i < 3 { write i; } write 9;"), "9\n");
}

#[test]
fn test_if_else_on_false() {
    assert_eq!(
        run("if false { write 1; } else { write 2; } if 0 { write 3; }"),
        "2\n"
    );
}

#[test]
fn test_else_if_chain() {
    let source = "fun sign(n) { if n < 0 { return -1; } else if n = 0 { return 0; } else { return 1; } }
                  write sign(-4); write sign(0); write sign(9);";
    assert_eq!(run(source), "-1\n0\n1\n");
}

#[test]
fn test_short_circuit_skips_call() {
    let source = "fun boom(n) { write 99; return n; }
                  write false and boom(1) = 1;
                  write true or boom(1) = 1;
                  write true and boom(1) = 1;";
    assert_eq!(run(source), "false\ntrue\n99\ntrue\n");
}

#[test]
fn test_logic_normalises_truthy_numbers() {
    assert_eq!(run("new b = 2 and 3; write b; new c = 0 or 7; write c;"), "1\n1\n");
}

#[test]
fn test_not_and_comparisons() {
    assert_eq!(
        run("write not (1 < 2); write 3 >= 3; write 2 != 2; write not 0;"),
        "false\ntrue\nfalse\ntrue\n"
    );
}

#[test]
fn test_recursive_factorial() {
    let source = "fun fact(n) { if n <= 1 { return 1; } return n * fact(n - 1); }
                  write fact(10);";
    assert_eq!(run(source), "3628800\n");
}

#[test]
fn test_locals_get_their_own_slots() {
    let source = "fun f(n) { new a = n + 1; new b = a * 2; return a + b; } write f(1);";
    assert_eq!(run(source), "6\n");
}

#[test]
fn test_function_updates_global() {
    let source = "new g = 0; fun bump(n) { g = g + n; return g; } bump(2); bump(3); write g;";
    assert_eq!(run(source), "5\n");
}

#[test]
fn test_labels_repeat_across_functions() {
    let source = "fun lo(n) { if n < 0 { return 0; } return n; }
                  fun hi(n) { if n < 0 { return 0; } return n + 1; }
                  write lo(-3) + hi(5);";
    let asm = assemble(source);
    assert_eq!(asm.matches("\n.L17:\n").count(), 2);
    assert_eq!(machine::run(&asm, &[]).unwrap(), "6\n");
}

#[test]
fn test_negative_division_truncates() {
    assert_eq!(run("write -7 / 2; write -7 % 2; write 7 % -2;"), "-3\n-1\n1\n");
}

#[test]
fn test_read_uses_input() {
    let out = run_with_input("new a = read; new b = read; write a * b;", &[6, 7]).unwrap();
    assert_eq!(out, "42\n");
}

#[test]
fn test_read_past_end_of_input() {
    assert_eq!(
        run_with_input("write read;", &[]),
        Err(Fault::InputExhausted)
    );
}

#[test]
fn test_division_by_zero_faults_at_runtime() {
    assert_eq!(run_with_input("write 1 / 0;", &[]), Err(Fault::DivideError));
}

#[test]
fn test_strings_round_trip() {
    assert_eq!(run("print \"a\\tb\"; write \"x`y\\\\z\";"), "a\tbx`y\\z\n");
}

#[test]
fn test_compile_reports_static_errors() {
    let program = spl_parse::parse("write missing;").unwrap();
    let err = compile(&program).unwrap_err();
    assert_eq!(err.code(), spl_diagnostic::ErrorCode::E2001);
}

#[test]
fn test_function_and_variable_names_clash_in_both_modes() {
    for source in ["fun f(n) { return n; } new f = 1;", "new g = 1; fun g(n) { return n; }"] {
        let program = spl_parse::parse(source).unwrap();
        let err = compile(&program).unwrap_err();
        assert_eq!(err.code(), spl_diagnostic::ErrorCode::E2002, "{source}");

        let print = spl_eval::buffer_handler();
        let errors =
            spl_eval::run_program(&program, print.clone(), spl_eval::InputHandler::from_text(""));
        assert_eq!(errors, 1, "{source}");
        assert!(print.get_errors().contains("already bound"), "{source}");
    }
}

#[test]
fn test_asm_path() {
    assert_eq!(asm_path(Path::new("prog.spl")), Path::new("prog.asm"));
    assert_eq!(asm_path(Path::new("dir/prog.spl")), Path::new("dir/prog.asm"));
    assert_eq!(asm_path(Path::new("prog.txt")), Path::new("prog.txt.asm"));
    assert_eq!(asm_path(Path::new("prog")), Path::new("prog.asm"));
}

#[test]
fn test_interpreter_and_compiler_agree_on_programs() {
    let programs = [
        "new i = 0; new s = 0; while i < 10 { s = s + i * i; i = i + 1; } write s;",
        "fun fib(n) { if n < 2 { return n; } return fib(n - 1) + fib(n - 2); } write fib(15);",
        "fun even(n) { return n % 2 = 0; } new k = 0; while k < 4 { if even(k) { print \"e\"; } else { print \"o\"; } k = k + 1; } write \"\";",
    ];
    for source in programs {
        assert_eq!(run(source), interpret(source), "{source}");
    }
}

fn arb_expr(vars: &'static [&'static str]) -> BoxedStrategy<String> {
    let number = (-50i32..50).prop_map(|n| {
        if n < 0 {
            format!("(-{})", -n)
        } else {
            n.to_string()
        }
    });
    let leaf = if vars.is_empty() {
        number.boxed()
    } else {
        prop_oneof![number, prop::sample::select(vars).prop_map(String::from)].boxed()
    };
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(&["+", "-", "*"][..]), inner.clone())
                .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            (inner.clone(), prop::sample::select(&["/", "%"][..]), 1i32..10)
                .prop_map(|(l, op, k)| format!("({l} {op} {k})")),
            inner.prop_map(|e| format!("(-{e})")),
        ]
    })
    .boxed()
}

proptest! {
    #[test]
    fn compiled_output_matches_interpreter(
        a in arb_expr(&[]),
        b in arb_expr(&["a"]),
        c in arb_expr(&["a", "b"]),
        d in arb_expr(&["a", "b"]),
        cmp in prop::sample::select(&["<", ">", "<=", ">=", "=", "!="][..]),
    ) {
        let source = format!("new a = {a}; new b = {b}; write {c}; write {c} {cmp} {d}; write {d} > 0 and {c} < 0;");
        prop_assert_eq!(run(&source), interpret(&source));
    }
}
