//! Minimum-`k` search: geometrically grow `k` with a per-frame conflict
//! budget that accrues across attempts, then binary-search down to the
//! smallest satisfiable `k`, reusing each solver frame's accumulated
//! learned clauses rather than rebuilding it.
//!
//! `gencombi.c`'s own `main` just calls `encode(i++)` linearly with no
//! conflict limit at all (`satch_solve` there runs to completion); this
//! bounded, budget-doubling search is a richer strategy built on top of it.

use std::collections::HashMap;

use satch_solver::{SolveResult, Solver};

use crate::encode::{self, Encoding};

pub struct Frame {
    pub k: usize,
    pub solver: Solver,
    pub encoding: Encoding,
}

fn new_frame(k: usize, valid: &[Vec<bool>], symmetry: bool, weak: bool) -> Frame {
    let (solver, encoding) = encode::build_solver(k, valid, symmetry, weak);
    Frame {
        k,
        solver,
        encoding,
    }
}

/// Finds the smallest `k` for which the encoding is satisfiable and
/// returns its (already-solved) frame.
pub fn search_minimum(valid: &[Vec<bool>], symmetry: bool, weak: bool, verbose: bool) -> Frame {
    let mut budget: i64 = 100;
    let mut frames: Vec<Frame> = Vec::new();
    let mut k = 2usize;

    let mut best = loop {
        let mut frame = new_frame(k, valid, symmetry, weak);
        let result = frame.solver.solve(budget);
        if verbose {
            eprintln!(
                "c solver returns {:?} for k = {} with budget {}",
                result, k, budget
            );
        }
        match result {
            SolveResult::Satisfiable => break frame,
            SolveResult::Unsatisfiable => {
                // This k can never work; grow k without keeping the frame.
            }
            SolveResult::Unknown => frames.push(frame),
        }

        // Budget-replenishment: before growing k further, give every
        // previously-inconclusive frame another chance with the doubled
        // budget. A smaller frame turning SAT here beats the larger one we
        // are about to try.
        budget *= 2;
        let mut resolved = None;
        for (idx, f) in frames.iter_mut().enumerate() {
            let result = f.solver.solve(budget);
            if verbose {
                eprintln!(
                    "c solver returns {:?} for k = {} with budget {} (replenished)",
                    result, f.k, budget
                );
            }
            if result == SolveResult::Satisfiable {
                resolved = Some(idx);
                break;
            }
        }
        if let Some(idx) = resolved {
            break frames.remove(idx);
        }

        k *= 2;
    };

    // Binary search between lb = 2 and the upper bound we just found.
    let mut lb = 2usize;
    let mut ub = best.k;
    let mut cache: HashMap<usize, Frame> = frames.into_iter().map(|f| (f.k, f)).collect();

    while lb + 1 < ub {
        let mid = lb + (ub - lb) / 2;
        let mut frame = cache
            .remove(&mid)
            .unwrap_or_else(|| new_frame(mid, valid, symmetry, weak));
        let result = frame.solver.solve(budget);
        if verbose {
            eprintln!(
                "c solver returns {:?} for k = {} with budget {} (binary search)",
                result, mid, budget
            );
        }
        match result {
            SolveResult::Satisfiable => {
                ub = mid;
                lb = 2;
                best = frame;
            }
            SolveResult::Unsatisfiable | SolveResult::Unknown => {
                lb = mid;
                budget *= 2;
                cache.insert(mid, frame);
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options;

    #[test]
    fn finds_a_satisfiable_frame() {
        let valid = options::valid_matrix();
        let frame = search_minimum(&valid, true, false, false);
        assert!(frame.k >= 2);
        assert_eq!(frame.solver.solve(-1), SolveResult::Satisfiable);
    }
}
