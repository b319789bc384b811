//! Command-line parsing.
//!
//! Arguments are matched by hand: a command word, the source path, then
//! flags in any order. `--color=<mode>` is accepted by every command.

use std::path::PathBuf;

use spl_diagnostic::emitter::ColorMode;

use crate::error::{DriverError, DriverResult};

/// Options for `splc run`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub color: ColorMode,
    /// Show the `read>` prompt. `None` decides from whether stdin is a
    /// terminal.
    pub prompt: Option<bool>,
}

/// Options for the commands that write a file (`build`, `dot`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub color: ColorMode,
    /// Output path (`-o`); derived from the source path when absent.
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run { path: PathBuf, options: RunOptions },
    Build { path: PathBuf, options: BuildOptions },
    Check { path: PathBuf, color: ColorMode },
    Dot { path: PathBuf, options: BuildOptions },
    Help,
    Version,
}

/// Parse `args` (without the program name).
pub fn parse_args(args: &[String]) -> DriverResult<Command> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };
    match command.as_str() {
        "help" | "--help" | "-h" => Ok(Command::Help),
        "version" | "--version" | "-V" => Ok(Command::Version),
        "run" => {
            let parsed = Flags::parse(command, rest, false)?;
            Ok(Command::Run {
                path: parsed.path,
                options: RunOptions {
                    color: parsed.color,
                    prompt: None,
                },
            })
        }
        "build" | "dot" => {
            let parsed = Flags::parse(command, rest, true)?;
            let options = BuildOptions {
                color: parsed.color,
                output: parsed.output,
            };
            Ok(if command == "build" {
                Command::Build {
                    path: parsed.path,
                    options,
                }
            } else {
                Command::Dot {
                    path: parsed.path,
                    options,
                }
            })
        }
        "check" => {
            let parsed = Flags::parse(command, rest, false)?;
            Ok(Command::Check {
                path: parsed.path,
                color: parsed.color,
            })
        }
        other => Err(DriverError::usage(format!("unknown command `{other}`"))),
    }
}

struct Flags {
    path: PathBuf,
    color: ColorMode,
    output: Option<PathBuf>,
}

impl Flags {
    fn parse(command: &str, args: &[String], allow_output: bool) -> DriverResult<Self> {
        let mut path = None;
        let mut color = ColorMode::Auto;
        let mut output = None;
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if let Some(mode) = arg.strip_prefix("--color=") {
                color = ColorMode::parse(mode).ok_or_else(|| {
                    DriverError::usage(format!(
                        "invalid color mode `{mode}` (expected auto, always or never)"
                    ))
                })?;
            } else if allow_output && arg == "-o" {
                let Some(out) = args.get(i + 1) else {
                    return Err(DriverError::usage("`-o` needs a path"));
                };
                output = Some(PathBuf::from(out));
                i += 1;
            } else if arg.starts_with('-') {
                return Err(DriverError::usage(format!(
                    "unknown option `{arg}` for `{command}`"
                )));
            } else if path.is_none() {
                path = Some(PathBuf::from(arg));
            } else {
                return Err(DriverError::usage(format!("unexpected argument `{arg}`")));
            }
            i += 1;
        }
        let path = path.ok_or_else(|| {
            DriverError::usage(format!("missing file path\nUsage: splc {command} <file.spl>"))
        })?;
        Ok(Flags {
            path,
            color,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]

    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(line: &str) -> DriverResult<Command> {
        let args: Vec<String> = line.split_whitespace().map(String::from).collect();
        parse_args(&args)
    }

    #[test]
    fn test_no_arguments_shows_help() {
        assert_eq!(parse("").unwrap(), Command::Help);
        assert_eq!(parse("--help").unwrap(), Command::Help);
        assert_eq!(parse("version").unwrap(), Command::Version);
    }

    #[test]
    fn test_run() {
        assert_eq!(
            parse("run prog.spl --color=never").unwrap(),
            Command::Run {
                path: PathBuf::from("prog.spl"),
                options: RunOptions {
                    color: ColorMode::Never,
                    prompt: None,
                },
            }
        );
    }

    #[test]
    fn test_build_with_output() {
        assert_eq!(
            parse("build prog.spl -o out.asm").unwrap(),
            Command::Build {
                path: PathBuf::from("prog.spl"),
                options: BuildOptions {
                    color: ColorMode::Auto,
                    output: Some(PathBuf::from("out.asm")),
                },
            }
        );
    }

    #[test]
    fn test_dot_defaults() {
        assert_eq!(
            parse("dot prog.spl").unwrap(),
            Command::Dot {
                path: PathBuf::from("prog.spl"),
                options: BuildOptions::default(),
            }
        );
    }

    #[test]
    fn test_usage_errors() {
        for line in [
            "frobnicate x.spl",
            "run",
            "run a.spl b.spl",
            "run a.spl -o x",
            "build a.spl -o",
            "check a.spl --color=sometimes",
        ] {
            assert!(
                matches!(parse(line), Err(DriverError::Usage(_))),
                "{line}"
            );
        }
    }
}
