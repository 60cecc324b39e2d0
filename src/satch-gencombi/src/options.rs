//! Hard-coded option table for the configuration-pair generator, ported
//! from `gencombi.c`'s `options`/`incompatible`/`abbrevs` tables: the
//! option list, the clashing pairs that make a combination invalid, and
//! the abbreviations used to shorten printed `./configure` lines.

/// The flags `gencombi` combines into `./configure` invocations.
pub const OPTIONS: &[&str] = &[
    "--pedantic",
    "--debug",
    "--check",
    "--symbols",
    "--no-sort",
    "--no-block",
    "--no-flex",
    "--no-learn",
    "--no-reduce",
    "--no-restart",
    "--no-stable",
];

const INCOMPATIBLE: &[(&str, &str)] = &[
    ("--check", "--debug"),
    ("--debug", "--symbols"),
    ("--no-learn", "--no-reduce"),
    ("--no-restart", "--no-stable"),
];

const ABBREVS: &[(&str, &str)] = &[
    ("--debug", "-g"),
    ("--check", "-c"),
    ("--symbols", "-s"),
    ("--pedantic", "-p"),
];

/// Options a given option requires at least one of, for the "Requirements"
/// clause. The original `gencombi.c` has no such relation —
/// this table is empty, but [`requires`] and the clause it drives in
/// `encode` are fully general should a requirement ever be added here.
const REQUIRES: &[(&str, &[&str])] = &[];

pub fn shorten(option: &str) -> &str {
    ABBREVS
        .iter()
        .find(|(full, _)| *full == option)
        .map(|(_, short)| *short)
        .unwrap_or(option)
}

fn clashes(a: &str, b: &str) -> bool {
    INCOMPATIBLE
        .iter()
        .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
}

/// `valid[p][q]` is false exactly when options `p` and `q` clash
/// (`filter`/`init_valid` in the original).
pub fn valid_matrix() -> Vec<Vec<bool>> {
    let n = OPTIONS.len();
    (0..n)
        .map(|p| (0..n).map(|q| !clashes(OPTIONS[p], OPTIONS[q])).collect())
        .collect()
}

/// Indices into [`OPTIONS`] that option `p` requires at least one of.
pub fn requires(p: usize) -> Vec<usize> {
    REQUIRES
        .iter()
        .find(|(name, _)| *name == OPTIONS[p])
        .map(|(_, reqs)| {
            reqs.iter()
                .filter_map(|r| OPTIONS.iter().position(|o| o == r))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clashing_pair_is_not_valid() {
        let valid = valid_matrix();
        let debug = OPTIONS.iter().position(|o| *o == "--debug").unwrap();
        let check = OPTIONS.iter().position(|o| *o == "--check").unwrap();
        assert!(!valid[debug][check]);
        assert!(!valid[check][debug]);
    }

    #[test]
    fn non_clashing_pair_is_valid() {
        let valid = valid_matrix();
        let pedantic = OPTIONS.iter().position(|o| *o == "--pedantic").unwrap();
        let sort = OPTIONS.iter().position(|o| *o == "--no-sort").unwrap();
        assert!(valid[pedantic][sort]);
    }

    #[test]
    fn abbreviations_shorten_known_options() {
        assert_eq!(shorten("--debug"), "-g");
        assert_eq!(shorten("--no-sort"), "--no-sort");
    }
}
