//! `--all k` / `--invalid` enumeration mode: depth-first subset expansion
//! over the option list pruned by pairwise validity, ported line-for-line
//! from `gencombi.c`'s `generate`.

use crate::options::{self, OPTIONS};

#[allow(clippy::too_many_arguments)]
fn generate(
    current: usize,
    select: usize,
    selected: &mut Vec<usize>,
    valid: &[Vec<bool>],
    invalid_only: bool,
    out: &mut impl std::io::Write,
) -> std::io::Result<()> {
    let noptions = OPTIONS.len();

    if select == 0 {
        if !invalid_only {
            writeln!(out, "./configure")?;
        }
        return Ok(());
    }

    if selected.len() == select {
        let mut config_valid = true;
        'outer: for i in 0..selected.len() {
            for j in (i + 1)..selected.len() {
                if !valid[selected[i]][selected[j]] {
                    config_valid = false;
                    break 'outer;
                }
            }
        }

        if invalid_only && config_valid {
            return Ok(());
        }
        if !invalid_only && !config_valid {
            return Ok(());
        }

        write!(out, "./configure")?;
        for &idx in selected.iter() {
            write!(out, " {}", options::shorten(OPTIONS[idx]))?;
        }
        writeln!(out)?;
        return Ok(());
    }

    if current < noptions {
        selected.push(current);
        generate(current + 1, select, selected, valid, invalid_only, out)?;
        selected.pop();

        generate(current + 1, select, selected, valid, invalid_only, out)?;
    }

    Ok(())
}

/// Enumerates every valid (or, with `invalid_only`, every invalid)
/// combination of at most `k` options, in increasing size.
pub fn enumerate_all(
    k: usize,
    valid: &[Vec<bool>],
    invalid_only: bool,
    out: &mut impl std::io::Write,
) -> std::io::Result<()> {
    let mut selected = Vec::with_capacity(k);
    for select in 0..=k {
        generate(0, select, &mut selected, valid, invalid_only, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_prints_bare_configure() {
        let valid = options::valid_matrix();
        let mut out = Vec::new();
        enumerate_all(0, &valid, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "./configure\n");
    }

    #[test]
    fn clashing_pair_is_excluded_from_valid_enumeration() {
        let valid = options::valid_matrix();
        let mut out = Vec::new();
        enumerate_all(2, &valid, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("-g -c"), "debug+check should never co-occur");
    }

    #[test]
    fn invalid_only_reports_the_clashing_pair() {
        let valid = options::valid_matrix();
        let mut out = Vec::new();
        enumerate_all(2, &valid, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().any(|l| l.contains("-g") && l.contains("-c")));
    }
}
