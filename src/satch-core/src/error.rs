//! Error taxonomy shared by the parser and the checker.
//!
//! Parse errors are recoverable `Result`s: the front-end reports them with a
//! line number and path and exits non-zero. Checker soundness failures and
//! API misuse are not represented as `Result` at all — [`crate::checker`]
//! calls [`fatal`] directly, matching the original's "every hard check is
//! fatal and process-terminating" discipline.

use std::fmt;

use crate::lit::LitError;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{path}:{line}: invalid header, expected 'p cnf V C' or 'p xnf V C'")]
    InvalidHeader { path: String, line: u64 },
    #[error("{path}:{line}: unexpected end of file")]
    UnexpectedEof { path: String, line: u64 },
    #[error("{path}:{line}: numeric overflow while parsing literal")]
    Overflow { path: String, line: u64 },
    #[error("{path}:{line}: literal '{lit}' exceeds declared maximum variable '{max}'")]
    LiteralExceedsHeader {
        path: String,
        line: u64,
        lit: i64,
        max: i64,
    },
    #[error("{path}:{line}: clause not terminated by '0'")]
    MissingTerminator { path: String, line: u64 },
    #[error("{path}:{line}: trailing garbage after last clause")]
    TrailingGarbage { path: String, line: u64 },
    #[error("{path}:{line}: 'x' XOR clause requires a 'p xnf' header or '--force'")]
    UnsupportedXorLine { path: String, line: u64 },
    #[error("{path}:{line}: parsed {parsed} clauses but header declared {declared}")]
    ClauseCountMismatch {
        path: String,
        line: u64,
        parsed: u64,
        declared: u64,
    },
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Lit(#[from] LitError),
}

impl ParseError {
    pub fn path(&self) -> Option<&str> {
        match self {
            ParseError::InvalidHeader { path, .. }
            | ParseError::UnexpectedEof { path, .. }
            | ParseError::Overflow { path, .. }
            | ParseError::LiteralExceedsHeader { path, .. }
            | ParseError::MissingTerminator { path, .. }
            | ParseError::TrailingGarbage { path, .. }
            | ParseError::UnsupportedXorLine { path, .. }
            | ParseError::ClauseCountMismatch { path, .. }
            | ParseError::Io { path, .. } => Some(path),
            ParseError::Lit(_) => None,
        }
    }
}

/// Prints a `checker: fatal error: ...` message and panics, the way every
/// hard check in the original checker does (`checker_fatal_error` in
/// `catch.c`, which prints and calls `abort`). There is deliberately no
/// `Result` return: the checker is meant for testing and is not expected to
/// recover. A panic rather than `std::process::abort` is used so an
/// unhandled fatal error still brings the process down with no recovery
/// path, while remaining catchable by `#[should_panic]` in this crate's own
/// tests, the way `catch.c`'s `abort` is caught by `testapi.c`'s harness.
pub fn fatal(args: fmt::Arguments<'_>) -> ! {
    eprint!("checker: fatal error: ");
    eprintln!("{}", args);
    panic!("checker: fatal error: {}", args);
}

macro_rules! checker_fatal {
    ($($arg:tt)*) => {
        $crate::error::fatal(format_args!($($arg)*))
    };
}
pub(crate) use checker_fatal;

/// Prints a `checker: invalid API usage in 'FN': MSG` message and panics.
pub fn invalid_usage(function: &str, message: &str) -> ! {
    eprintln!("checker: invalid API usage in '{}': {}", function, message);
    panic!("checker: invalid API usage in '{}': {}", function, message);
}
