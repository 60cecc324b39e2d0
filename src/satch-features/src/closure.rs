//! Transitive closure and dependency checks.
//!
//! Ported from `features/generate.c`'s `transitive_hull`/
//! `check_transitive_impliedness`/`check_cyclic_dependencies`/
//! `check_clashing_not_transitively_implied`/`sort_invalid_feature_pairs`,
//! with the `n*n` matrices as `Vec<bool>` rather than fixed-size
//! `MAX_FEATURES` C arrays (there is no hard cap on feature count here).

use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;
use crate::model::{Feature, Pair};

/// A dense `n x n` boolean adjacency matrix over feature indices.
pub struct Matrix {
    n: usize,
    cells: Vec<bool>,
}

impl Matrix {
    fn new(n: usize) -> Self {
        Matrix {
            n,
            cells: vec![false; n * n],
        }
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.n + j]
    }

    fn set(&mut self, i: usize, j: usize, v: bool) {
        self.cells[i * self.n + j] = v;
    }
}

/// Builds the direct-implication matrix from `implied.csv` rows.
pub fn direct_implied(n: usize, implied: &[Pair]) -> Matrix {
    let mut m = Matrix::new(n);
    for p in implied {
        m.set(p.a, p.b, true);
    }
    m
}

/// DFS search for an indirect (length >= 2) path from `src` to `dst` in
/// `direct`, used by [`check_transitive_impliedness`] to flag a listed
/// `implied.csv` pair as redundant. `except` excludes following the literal
/// `src -> dst` edge on the very first hop, the way `check_transitively_implied`'s
/// `(src != except || i != dst)` guard does.
fn reachable_excluding_direct_edge(
    direct: &Matrix,
    src: usize,
    dst: usize,
    except: usize,
    reached: &mut [bool],
) -> bool {
    if src == dst {
        return true;
    }
    for i in 0..direct.n {
        if (src != except || i != dst) && !reached[i] && direct.get(src, i) {
            reached[i] = true;
            if reachable_excluding_direct_edge(direct, i, dst, except, reached) {
                return true;
            }
        }
    }
    false
}

/// Warns (non-fatally, escalated under `--pedantic`) about every
/// `implied.csv` pair that is already transitively reachable through other
/// direct edges, i.e. redundant.
pub fn check_transitive_impliedness(
    features: &[Feature],
    direct: &Matrix,
    implied: &[Pair],
    diag: &Diagnostics,
) -> Result<usize, GenerateError> {
    let mut redundant = 0;
    for p in implied {
        let mut reached = vec![false; direct.n];
        if reachable_excluding_direct_edge(direct, p.a, p.b, p.a, &mut reached) {
            diag.warn(format!(
                "implied pair '{},{}' transitively implied",
                features[p.a].option, features[p.b].option
            ))?;
            redundant += 1;
        }
    }
    if redundant > 0 {
        diag.message(format_args!("found {} transitively implied pairs", redundant));
    } else {
        diag.message(format_args!("no pair is transitively implied"));
    }
    Ok(redundant)
}

/// Computes the transitive hull of `implied` by fixed-point iteration over
/// the n×n reachability matrix.
pub fn transitive_hull(n: usize, implied: &[Pair], diag: &Diagnostics) -> Matrix {
    let mut m = direct_implied(n, implied);
    let mut iterations = 0usize;
    let mut added = 0usize;
    loop {
        let mut changed = false;
        for i in 0..n {
            for j in 0..n {
                if !m.get(i, j) {
                    continue;
                }
                for k in 0..n {
                    if m.get(j, k) && !m.get(i, k) {
                        m.set(i, k, true);
                        changed = true;
                        added += 1;
                    }
                }
            }
        }
        iterations += 1;
        if !changed {
            break;
        }
    }
    diag.message(format_args!("computed transitive hull of 'implied'"));
    diag.message(format_args!(
        "added {} implications in {} iterations",
        added, iterations
    ));
    m
}

/// Warns about any option that (transitively) implies itself.
pub fn check_cyclic_dependencies(
    features: &[Feature],
    hull: &Matrix,
    diag: &Diagnostics,
) -> Result<(), GenerateError> {
    for i in 0..features.len() {
        if hull.get(i, i) {
            diag.warn(format!(
                "option '{}' implies itself recursively",
                features[i].option
            ))?;
        }
    }
    diag.message(format_args!("no options depends on itself recursively"));
    Ok(())
}

/// A `clashing.csv` pair that is already (transitively) implied is a hard
/// error, unlike the redundancy warning above (`generate.c`'s
/// `check_clashing_not_transitively_implied` calls `parse_error`, not
/// `warning`).
pub fn check_clashing_not_transitively_implied(
    features: &[Feature],
    hull: &Matrix,
    clashing: &[Pair],
) -> Result<(), GenerateError> {
    for p in clashing {
        if hull.get(p.a, p.b) {
            return Err(GenerateError::ClashingTransitivelyImplied {
                a: features[p.a].option.clone(),
                b: features[p.b].option.clone(),
            });
        }
        if hull.get(p.b, p.a) {
            return Err(GenerateError::ClashingReverseTransitivelyImplied {
                a: features[p.a].option.clone(),
                b: features[p.b].option.clone(),
            });
        }
    }
    Ok(())
}

/// The set of invalid option pairs: every transitively-implied pair union
/// every clashing pair, each pair canonically ordered by option name and
/// the whole list emitted in canonical sorted order.
pub fn invalid_pairs(features: &[Feature], hull: &Matrix, clashing: &[Pair]) -> Vec<(usize, usize)> {
    let mut set = std::collections::BTreeSet::new();
    let canon = |i: usize, j: usize| -> (usize, usize) {
        if features[i].name <= features[j].name {
            (i, j)
        } else {
            (j, i)
        }
    };
    for i in 0..features.len() {
        for j in 0..features.len() {
            if hull.get(i, j) {
                set.insert(canon(i, j));
            }
        }
    }
    for p in clashing {
        set.insert(canon(p.a, p.b));
    }
    let mut pairs: Vec<(usize, usize)> = set.into_iter().collect();
    pairs.sort_by(|&(i1, j1), &(i2, j2)| {
        (features[i1].name.as_str(), features[j1].name.as_str())
            .cmp(&(features[i2].name.as_str(), features[j2].name.as_str()))
    });
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(names: &[&str]) -> Vec<Feature> {
        names
            .iter()
            .map(|n| Feature {
                option: format!("--no-{}", n),
                usage: String::new(),
                name: n.to_string(),
                define: format!("N{}", n.to_uppercase()),
            })
            .collect()
    }

    #[test]
    fn hull_is_transitive() {
        let feats = features(&["a", "b", "c"]);
        let implied = vec![
            Pair { a: 0, b: 1, line: 1 },
            Pair { a: 1, b: 2, line: 2 },
        ];
        let diag = Diagnostics::new(false, false);
        let hull = transitive_hull(feats.len(), &implied, &diag);
        assert!(hull.get(0, 2), "a implies c transitively");
        assert!(!hull.get(2, 0));
    }

    #[test]
    fn redundant_implied_pair_is_detected() {
        let feats = features(&["a", "b", "c"]);
        // a->b, b->c, and a->c directly too: a->c is redundant.
        let implied = vec![
            Pair { a: 0, b: 1, line: 1 },
            Pair { a: 1, b: 2, line: 2 },
            Pair { a: 0, b: 2, line: 3 },
        ];
        let direct = direct_implied(feats.len(), &implied);
        let diag = Diagnostics::new(false, false);
        let redundant = check_transitive_impliedness(&feats, &direct, &implied, &diag).unwrap();
        assert_eq!(redundant, 1);
    }

    #[test]
    fn clashing_pair_transitively_implied_is_fatal() {
        let feats = features(&["a", "b"]);
        let implied = vec![Pair { a: 0, b: 1, line: 1 }];
        let diag = Diagnostics::new(false, false);
        let hull = transitive_hull(feats.len(), &implied, &diag);
        let clashing = vec![Pair { a: 0, b: 1, line: 1 }];
        let err = check_clashing_not_transitively_implied(&feats, &hull, &clashing).unwrap_err();
        assert!(matches!(err, GenerateError::ClashingTransitivelyImplied { .. }));
    }

    #[test]
    fn invalid_pairs_union_implied_and_clashing() {
        let feats = features(&["a", "b", "c", "d"]);
        let implied = vec![Pair { a: 0, b: 1, line: 1 }];
        let diag = Diagnostics::new(false, false);
        let hull = transitive_hull(feats.len(), &implied, &diag);
        let clashing = vec![Pair { a: 2, b: 3, line: 1 }];
        let pairs = invalid_pairs(&feats, &hull, &clashing);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], (0, 1));
        assert_eq!(pairs[1], (2, 3));
    }
}
