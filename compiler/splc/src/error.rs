//! Driver errors and their exit codes.

use std::io;
use std::path::PathBuf;

/// Exit status for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status when the program or its files had a problem.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for malformed command lines.
pub const EXIT_USAGE: i32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Diagnostics or runtime errors were already shown to the user.
    #[error("{count} error{} reported", plural_s(.count))]
    Reported { count: usize },
}

#[allow(clippy::trivially_copy_pass_by_ref, reason = "error format arguments are borrowed")]
fn plural_s(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

impl DriverError {
    pub fn usage(message: impl Into<String>) -> Self {
        DriverError::Usage(message.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::Usage(_) => EXIT_USAGE,
            DriverError::Read { .. } | DriverError::Write { .. } | DriverError::Reported { .. } => {
                EXIT_FAILURE
            }
        }
    }

    /// Whether `main` still has to print this error.
    pub fn needs_report(&self) -> bool {
        !matches!(self, DriverError::Reported { .. })
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
