//! CNF encoding of "`k` configurations cover every valid option pair",
//! grounded on `gencombi.c`'s `encode`: the same variable tables
//! (`option[i][p]`, `pair[i][p][q]`) and clause groups (pair
//! definition/clashing, coverage, absence), reusing
//! [`satch_core::dimacs::ClauseSink`] so the same clause-emission code
//! feeds either the embedded solver or a printed DIMACS file — the role
//! `gencombi.c`'s `literal` function plays by branching on `dimacs`.

use satch_core::dimacs::ClauseSink;

use crate::options;

/// The DIMACS variable tables for a fixed `k`, plus the symmetry-breaking
/// auxiliaries (`sorted[i][p]`) when enabled.
pub struct Encoding {
    pub k: usize,
    pub noptions: usize,
    /// `option_var[i][p]`.
    pub option_var: Vec<Vec<i32>>,
    /// `pair_var[i][p][q]`, only present (`Some`) for `p < q` with `valid[p][q]`.
    pub pair_var: Vec<Vec<Vec<Option<i32>>>>,
    /// `sorted_var[i][p]` is the "configurations `i-1` and `i` agree on
    /// options `0..=p`" auxiliary, for `i` in `1..k` and `p` in `0..noptions-1`.
    pub sorted_var: Vec<Vec<i32>>,
    pub nvars: i32,
}

impl Encoding {
    pub fn allocate(k: usize, valid: &[Vec<bool>], symmetry: bool) -> Encoding {
        let noptions = valid.len();
        let mut nvars = 0i32;

        let mut option_var = vec![vec![0i32; noptions]; k];
        for i in 0..k {
            for p in 0..noptions {
                nvars += 1;
                option_var[i][p] = nvars;
            }
        }

        let mut pair_var = vec![vec![vec![None; noptions]; noptions]; k];
        for i in 0..k {
            for p in 0..noptions.saturating_sub(1) {
                for q in (p + 1)..noptions {
                    if valid[p][q] {
                        nvars += 1;
                        pair_var[i][p][q] = Some(nvars);
                    }
                }
            }
        }

        let mut sorted_var = vec![Vec::new(); k];
        if symmetry {
            for row in sorted_var.iter_mut().skip(1).take(k.saturating_sub(1)) {
                *row = (0..noptions.saturating_sub(1))
                    .map(|_| {
                        nvars += 1;
                        nvars
                    })
                    .collect();
            }
        }

        Encoding {
            k,
            noptions,
            option_var,
            pair_var,
            sorted_var,
            nvars,
        }
    }
}

fn add_clause(sink: &mut impl ClauseSink, lits: &[i32]) {
    for &lit in lits {
        sink.add_literal(lit);
    }
    sink.add_original();
}

/// Pair definition, clashing, requirements, and coverage clauses — the part
/// of the encoding present regardless of "weak" mode or symmetry breaking.
pub fn emit_clauses(enc: &Encoding, valid: &[Vec<bool>], sink: &mut impl ClauseSink) {
    let n = enc.noptions;

    // 'pair[i][p][q] = option[i][p] & option[i][q]' for valid pairs,
    // otherwise the clashing pair is simply forbidden.
    for i in 0..enc.k {
        for p in 0..n.saturating_sub(1) {
            for q in (p + 1)..n {
                if valid[p][q] {
                    let pv = enc.pair_var[i][p][q].expect("valid pair has a variable");
                    add_clause(sink, &[-pv, enc.option_var[i][p]]);
                    add_clause(sink, &[-pv, enc.option_var[i][q]]);
                    add_clause(sink, &[-enc.option_var[i][p], -enc.option_var[i][q], pv]);
                } else {
                    add_clause(sink, &[-enc.option_var[i][p], -enc.option_var[i][q]]);
                }
            }
        }
    }

    // Requirements: option[i][p] -> OR_q option[i][q].
    for i in 0..enc.k {
        for p in 0..n {
            let reqs = options::requires(p);
            if reqs.is_empty() {
                continue;
            }
            let mut clause = vec![-enc.option_var[i][p]];
            clause.extend(reqs.iter().map(|&q| enc.option_var[i][q]));
            add_clause(sink, &clause);
        }
    }

    // Coverage: every valid pair occurs in at least one configuration.
    for p in 0..n.saturating_sub(1) {
        for q in (p + 1)..n {
            if valid[p][q] {
                let lits: Vec<i32> = (0..enc.k).map(|i| enc.pair_var[i][p][q].unwrap()).collect();
                add_clause(sink, &lits);
            }
        }
    }
}

/// Absence clauses: every valid pair is also missing from at least one
/// configuration. Dropped entirely in "weak" mode.
pub fn emit_absence(enc: &Encoding, valid: &[Vec<bool>], sink: &mut impl ClauseSink) {
    let n = enc.noptions;
    for p in 0..n.saturating_sub(1) {
        for q in (p + 1)..n {
            if valid[p][q] {
                let lits: Vec<i32> = (0..enc.k).map(|i| -enc.pair_var[i][p][q].unwrap()).collect();
                add_clause(sink, &lits);
            }
        }
    }
}

/// Lexicographic symmetry breaking between adjacent configurations
/// (`c_{i-1} <= c_i`), via a chain of "prefix equal" auxiliaries. Position
/// 0's prefix is vacuously equal (no variable needed); position `p+1`'s
/// auxiliary is Tseitin-defined as `prefix_equal[p] & (option[i-1][p] <->
/// option[i][p])`.
pub fn emit_symmetry_breaking(enc: &Encoding, sink: &mut impl ClauseSink) {
    let n = enc.noptions;
    for i in 1..enc.k {
        let prev = &enc.option_var[i - 1];
        let cur = &enc.option_var[i];
        let mut pe: Option<i32> = None;

        for p in 0..n {
            match pe {
                None => add_clause(sink, &[-prev[p], cur[p]]),
                Some(v) => add_clause(sink, &[-v, -prev[p], cur[p]]),
            }

            if p + 1 < n {
                let d = enc.sorted_var[i][p];
                match pe {
                    None => {
                        add_clause(sink, &[-d, -prev[p], cur[p]]);
                        add_clause(sink, &[-d, -cur[p], prev[p]]);
                        add_clause(sink, &[-prev[p], -cur[p], d]);
                        add_clause(sink, &[prev[p], cur[p], d]);
                    }
                    Some(v) => {
                        add_clause(sink, &[-d, v]);
                        add_clause(sink, &[-d, -prev[p], cur[p]]);
                        add_clause(sink, &[-d, -cur[p], prev[p]]);
                        add_clause(sink, &[-v, -prev[p], -cur[p], d]);
                        add_clause(sink, &[-v, prev[p], cur[p], d]);
                    }
                }
                pe = Some(d);
            }
        }
    }
}

/// Collects clauses in memory instead of printing or solving them, so the
/// DIMACS header's clause count can be known before anything is written.
pub struct CollectSink {
    pub clauses: Vec<Vec<i32>>,
    current: Vec<i32>,
}

impl CollectSink {
    pub fn new() -> Self {
        CollectSink {
            clauses: Vec::new(),
            current: Vec::new(),
        }
    }
}

impl ClauseSink for CollectSink {
    fn add_literal(&mut self, lit: i32) {
        self.current.push(lit);
    }

    fn add_original(&mut self) {
        self.clauses.push(std::mem::take(&mut self.current));
    }
}

/// Feeds clauses straight into the embedded solver (`gencombi.c`'s
/// `literal` branching to `satch_add` rather than `printf`).
pub struct SolverSink<'a>(pub &'a mut satch_solver::Solver);

impl ClauseSink for SolverSink<'_> {
    fn add_literal(&mut self, lit: i32) {
        self.0.add(lit);
    }

    fn add_original(&mut self) {
        self.0.add(0);
    }
}

/// Builds a fresh solver and feeds it the encoding for a given `k`.
pub fn build_solver(
    k: usize,
    valid: &[Vec<bool>],
    symmetry: bool,
    weak: bool,
) -> (satch_solver::Solver, Encoding) {
    let enc = Encoding::allocate(k, valid, symmetry);
    let mut solver = satch_solver::Solver::new();
    solver.reserve(enc.nvars);
    {
        let mut sink = SolverSink(&mut solver);
        emit_clauses(&enc, valid, &mut sink);
        if !weak {
            emit_absence(&enc, valid, &mut sink);
        }
        if symmetry {
            emit_symmetry_breaking(&enc, &mut sink);
        }
    }
    (solver, enc)
}

/// Prints the CNF for a given `k` instead of solving it (`--dimacs`).
pub fn print_dimacs(
    k: usize,
    valid: &[Vec<bool>],
    symmetry: bool,
    weak: bool,
    out: &mut impl std::io::Write,
) -> std::io::Result<()> {
    let enc = Encoding::allocate(k, valid, symmetry);
    let mut sink = CollectSink::new();
    emit_clauses(&enc, valid, &mut sink);
    if !weak {
        emit_absence(&enc, valid, &mut sink);
    }
    if symmetry {
        emit_symmetry_breaking(&enc, &mut sink);
    }

    writeln!(out, "c gencombi --dimacs {}", k)?;
    for i in 0..k {
        for p in 0..enc.noptions {
            writeln!(out, "c option[{},{}] = {}", i, p, enc.option_var[i][p])?;
        }
    }
    writeln!(out, "p cnf {} {}", enc.nvars, sink.clauses.len())?;
    for clause in &sink.clauses {
        for lit in clause {
            write!(out, "{} ", lit)?;
        }
        writeln!(out, "0")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_option_vars_before_pair_vars() {
        let valid = options::valid_matrix();
        let enc = Encoding::allocate(2, &valid, false);
        assert_eq!(enc.option_var[0][0], 1);
        let last_option_var = enc.option_var[1][enc.noptions - 1];
        let pair_vars: Vec<i32> = enc
            .pair_var
            .iter()
            .flat_map(|rows| rows.iter().flat_map(|row| row.iter().filter_map(|v| *v)))
            .collect();
        assert!(pair_vars.iter().all(|&v| v > last_option_var));
    }

    #[test]
    fn collect_sink_groups_clauses_by_terminator() {
        let mut sink = CollectSink::new();
        add_clause(&mut sink, &[1, -2]);
        add_clause(&mut sink, &[3]);
        assert_eq!(sink.clauses, vec![vec![1, -2], vec![3]]);
    }

    #[test]
    fn dimacs_output_declares_matching_clause_count() {
        let valid = options::valid_matrix();
        let mut out = Vec::new();
        print_dimacs(2, &valid, true, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header = text.lines().find(|l| l.starts_with("p cnf")).unwrap();
        let declared: usize = header.split_whitespace().nth(3).unwrap().parse().unwrap();
        let actual = text.lines().filter(|l| !l.starts_with('c') && !l.starts_with('p') && !l.trim().is_empty()).count();
        assert_eq!(declared, actual);
    }
}
