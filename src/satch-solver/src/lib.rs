//! `satch-solver`: a small embeddable CDCL solver exposing exactly the
//! external "Solver API" (`init`/`release`/`reserve`/`add`/`solve`/`val`/
//! `trace_proof`) that [`satch_core::checker::Checker`] is meant to validate
//! against over the wire.
//!
//! Structure and naming (`Var`/`Lit` reused from `satch_core`, watcher
//! lists, trail, activity-ordered decisions) are grounded on `ratsat`'s
//! `Solver`/`SolverV` split, generalized down to the modest scope this
//! workspace needs: two-watched-literal propagation, first-UIP conflict
//! analysis, activity-based decisions, Luby restarts and a simple
//! size/activity clause database reduction. Assumptions, simplification
//! between incremental calls and clause minimization are out of scope.

pub mod proof;
pub mod solver;

pub use proof::ProofFormat;
pub use solver::{SolveResult, Solver, Stats};
