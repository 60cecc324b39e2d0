//! Error taxonomy for the feature-metadata generator.
//!
//! Every failure here is a user configuration error: a malformed CSV, an
//! unresolvable feature reference, or a cyclic/clashing dependency. Unlike
//! the checker (`satch_core::checker`), these are ordinary `Result`s that
//! the binary reports to `stderr` with a line number and path, then exits
//! non-zero with — ported from `generate.c`'s `parse_error`/`die`.

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("could not read '{path}'")]
    Unreadable { path: String },

    #[error("could not write '{path}'")]
    Unwritable { path: String },

    #[error("{path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("line {line} in '{path}': feature '{feature}' not listed in 'features.csv'")]
    UnknownFeature {
        path: String,
        line: u64,
        feature: String,
    },

    #[error("line {line} in '{path}': duplicated feature '{feature}'")]
    DuplicateFeature {
        path: String,
        line: u64,
        feature: String,
    },

    #[error("unsupported option '{feature}' ('--no-...' prefix expected)")]
    BadFeaturePrefix { feature: String },

    #[error("line {line} in '{path}': pair '{a},{b}' already occurs at line {prev_line}")]
    DuplicatePair {
        path: String,
        line: u64,
        prev_line: u64,
        a: String,
        b: String,
    },

    #[error(
        "line {line} in '{path}': pair '{a},{b}' occurs already as '{b},{a}' at line {prev_line}"
    )]
    SwappedDuplicatePair {
        path: String,
        line: u64,
        prev_line: u64,
        a: String,
        b: String,
    },

    #[error("line {line} in 'clashing.csv': pair '{a},{b}' already in 'implied.csv' at line {prev_line}")]
    ClashingAlreadyImplied {
        line: u64,
        prev_line: u64,
        a: String,
        b: String,
    },

    #[error("pair '{a},{b}' transitively implied")]
    ClashingTransitivelyImplied { a: String, b: String },

    #[error("pair '{a},{b}' reverse transitively implied")]
    ClashingReverseTransitivelyImplied { a: String, b: String },

    #[error("can not generate '{name}' (try '-l')")]
    UnknownGenerator { name: String },

    /// A warning [`crate::diagnostics::Diagnostics::warn`] escalated to an
    /// error because `--pedantic` is set (`generate.c`'s `warning`/
    /// `parse_warning`, which `exit(1)` after printing when `pedantic`).
    #[error("{0}")]
    Pedantic(String),
}
