//! SPL Compiler CLI

use splc::{execute, init_tracing, parse_args, DriverError, EXIT_SUCCESS};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let status = match parse_args(&args).and_then(|command| execute(&command)) {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            if err.needs_report() {
                eprintln!("error: {err}");
            }
            if matches!(err, DriverError::Usage(_)) {
                eprintln!("Run `splc help` for usage.");
            }
            err.exit_code()
        }
    };
    std::process::exit(status);
}
