//! Verbose messages and pedantic warnings, ported from `generate.c`'s
//! `message`/`warning`/`parse_warning`.
//!
//! `message` only ever logs at `log::info!` (gated by the `verbose` flag);
//! a `warning` always prints to `stderr` and, under `--pedantic`, is
//! escalated to a hard error by the caller instead of merely being printed.

use crate::error::GenerateError;

pub struct Diagnostics {
    pub verbose: bool,
    pub pedantic: bool,
}

impl Diagnostics {
    pub fn new(verbose: bool, pedantic: bool) -> Self {
        Diagnostics { verbose, pedantic }
    }

    pub fn message(&self, args: std::fmt::Arguments<'_>) {
        if !self.verbose {
            return;
        }
        #[cfg(feature = "logging")]
        log::info!("{}", args);
        #[cfg(not(feature = "logging"))]
        println!("{}", args);
    }

    /// Prints a warning to `stderr`. Under `--pedantic` this is upgraded to
    /// a fatal [`GenerateError::Pedantic`] instead of being swallowed.
    pub fn warn(&self, message: String) -> Result<(), GenerateError> {
        eprintln!(
            "generate: warning{}: {}",
            if self.pedantic { " treated as error" } else { "" },
            message
        );
        if self.pedantic {
            return Err(GenerateError::Pedantic(message));
        }
        Ok(())
    }
}
