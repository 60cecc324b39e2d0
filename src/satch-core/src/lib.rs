//! `satch-core`: literal encoding, the dynamic array/queue primitives,
//! radix sort, the online DRUP proof checker, and DIMACS/XNF parsing with
//! XOR-to-CNF Tseitin encoding.
//!
//! This is the library every other crate in the workspace builds on top of:
//! `satch-solver`'s CDCL search, `satch-bin`'s front-end, and
//! `satch-gencombi`'s embedded-solver encoding all sit on top of the literal
//! encoding, checker, and parser defined here.

pub mod checker;
pub mod dimacs;
pub mod error;
pub mod lit;
pub mod rsort;
pub mod stack;

pub use checker::Checker;
pub use lit::{Lit, Var};
