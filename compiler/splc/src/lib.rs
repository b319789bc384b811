//! The SPL compiler driver.
//!
//! `splc` interprets SPL programs, compiles them to 32-bit NASM assembly,
//! checks them without producing output, and exports their syntax tree as
//! Graphviz DOT.
//!
//! Logging is off unless `RUST_LOG` is set. `SPL_LOG_TREE=1` switches to an
//! indented span tree.

pub mod commands;
mod error;
mod options;

use std::sync::Once;

pub use error::{DriverError, DriverResult, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
pub use options::{parse_args, BuildOptions, Command, RunOptions};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let tree = std::env::var("SPL_LOG_TREE").is_ok_and(|v| v == "1");
        let filter = EnvFilter::from_default_env();
        tracing_subscriber::registry()
            .with(filter)
            .with(tree.then(|| {
                tracing_tree::HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_writer(std::io::stderr)
            }))
            .with((!tree).then(|| {
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr)
            }))
            .init();
    });
}

/// Run one parsed command line.
pub fn execute(command: &Command) -> DriverResult<()> {
    match command {
        Command::Run { path, options } => commands::run_file(path, options),
        Command::Build { path, options } => commands::build_file(path, options).map(|_| ()),
        Command::Check { path, color } => commands::check_file(path, *color),
        Command::Dot { path, options } => commands::dot_file(path, options).map(|_| ()),
        Command::Help => {
            print!("{}", usage());
            Ok(())
        }
        Command::Version => {
            println!("splc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

pub fn usage() -> &'static str {
    "\
SPL Compiler

Usage: splc <command> [options]

Commands:
  run <file.spl>              Interpret a program (stdin is program input)
  build <file.spl> [-o out]   Compile to NASM assembly (default: <file>.asm)
  check <file.spl>            Run all static checks without writing output
  dot <file.spl> [-o out]     Write the syntax tree as DOT (default: <file>.dot)
  help                        Show this help message
  version                     Show version information

Options:
  --color=<mode>              Diagnostic colors: auto, always, never

Environment:
  RUST_LOG                    Enable logging (e.g. RUST_LOG=spl_codegen=debug)
  SPL_LOG_TREE=1              Print logs as an indented span tree

Examples:
  splc run fib.spl
  splc build fib.spl -o fib.asm
  splc dot fib.spl && dot -Tpng fib.dot -o fib.png
"
}
