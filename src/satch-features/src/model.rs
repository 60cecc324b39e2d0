//! CSV-backed feature model: `features.csv`, `implied.csv`, `clashing.csv`.
//! Grounded on `features/generate.c`'s `read_features`/`read_pairs`,
//! replacing its hand-rolled character-at-a-time reader with `csv` +
//! `serde` while keeping the same diagnostics: line number, duplicate
//! detection (including the swapped form), and the "unsorted" warnings.

use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;

/// A parsed row of `features.csv`: the `--no-XXX` flag, its usage text, and
/// the two derived spellings (`option_to_name`/`option_to_define` in the
/// original) used by the shell- and header-fragment generators.
#[derive(Debug, Clone)]
pub struct Feature {
    pub option: String,
    pub usage: String,
    /// `block` for `--no-block` — used as a shell variable name.
    pub name: String,
    /// `NBLOCK` for `--no-block` — used as a C preprocessor define.
    pub define: String,
}

/// An `(a, b)` pair by feature index, with the source line it was read
/// from (for diagnostics on later transitive-closure errors).
#[derive(Debug, Clone, Copy)]
pub struct Pair {
    pub a: usize,
    pub b: usize,
    pub line: u64,
}

const OPTION_PREFIX: &str = "--no-";

fn option_to_name(option: &str) -> String {
    option[OPTION_PREFIX.len()..].replace('-', "")
}

fn option_to_define(option: &str) -> String {
    let mut s = String::from("N");
    s.push_str(&option[OPTION_PREFIX.len()..].replace('-', "").to_uppercase());
    s
}

fn csv_reader(path: &str) -> Result<csv::Reader<std::fs::File>, GenerateError> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_path(path)
        .map_err(|source| GenerateError::Csv {
            path: path.to_string(),
            source,
        })
}

/// Reads `features.csv`: rows of `--no-XXX,usage text`, sorted by option
/// name (a warning, not an error, if unsorted — matching `parse_warning`
/// rather than `parse_error` in the original).
pub fn load_features(path: &str, diag: &Diagnostics) -> Result<Vec<Feature>, GenerateError> {
    let mut reader = csv_reader(path)?;
    let mut features = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| GenerateError::Csv {
            path: path.to_string(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let option = record.get(0).unwrap_or("").to_string();
        let usage = record.get(1).unwrap_or("").to_string();
        if !option.starts_with(OPTION_PREFIX) {
            return Err(GenerateError::BadFeaturePrefix { feature: option });
        }
        if features.iter().any(|f: &Feature| f.option == option) {
            return Err(GenerateError::DuplicateFeature {
                path: path.to_string(),
                line,
                feature: option,
            });
        }
        if let Some(prev) = features.last() {
            let prev: &Feature = prev;
            if prev.option > option {
                diag.warn(format!("feature '{}' unsorted", option))?;
            }
        }
        let name = option_to_name(&option);
        let define = option_to_define(&option);
        features.push(Feature {
            option,
            usage,
            name,
            define,
        });
    }
    diag.message(format_args!(
        "read {} features from '{}'",
        features.len(),
        path
    ));
    Ok(features)
}

fn find_feature(features: &[Feature], name: &str) -> Option<usize> {
    features.iter().position(|f| f.option == name)
}

/// Reads a two-column CSV of feature-name pairs (`implied.csv` or
/// `clashing.csv`), resolving each name against `features` and rejecting
/// duplicates (in either order). `is_clashing` additionally requires pairs
/// to be sorted by name and checks they do not also occur in `implied`
/// (both checks the original only applies to `clashing.csv`).
#[allow(clippy::too_many_arguments)]
pub fn load_pairs(
    path: &str,
    features: &[Feature],
    diag: &Diagnostics,
    is_clashing: bool,
    implied_so_far: &[Pair],
) -> Result<Vec<Pair>, GenerateError> {
    let mut reader = csv_reader(path)?;
    let mut pairs: Vec<Pair> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| GenerateError::Csv {
            path: path.to_string(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let a_name = record.get(0).unwrap_or("").to_string();
        let b_name = record.get(1).unwrap_or("").to_string();
        let a = find_feature(features, &a_name).ok_or_else(|| GenerateError::UnknownFeature {
            path: path.to_string(),
            line,
            feature: a_name.clone(),
        })?;
        let b = find_feature(features, &b_name).ok_or_else(|| GenerateError::UnknownFeature {
            path: path.to_string(),
            line,
            feature: b_name.clone(),
        })?;

        if let Some(prev) = pairs.iter().find(|p| p.a == a && p.b == b) {
            return Err(GenerateError::DuplicatePair {
                path: path.to_string(),
                line,
                prev_line: prev.line,
                a: a_name,
                b: b_name,
            });
        }
        if let Some(prev) = pairs.iter().find(|p| p.a == b && p.b == a) {
            return Err(GenerateError::SwappedDuplicatePair {
                path: path.to_string(),
                line,
                prev_line: prev.line,
                a: a_name,
                b: b_name,
            });
        }

        if is_clashing {
            if features[a].option >= features[b].option {
                diag.warn(format!("features in pair '{},{}' unsorted", a_name, b_name))?;
            }
            if let Some(prev) = implied_so_far.iter().find(|p| p.a == a && p.b == b) {
                return Err(GenerateError::ClashingAlreadyImplied {
                    line,
                    prev_line: prev.line,
                    a: a_name,
                    b: b_name,
                });
            }
            if let Some(prev) = implied_so_far.iter().find(|p| p.a == b && p.b == a) {
                return Err(GenerateError::ClashingAlreadyImplied {
                    line,
                    prev_line: prev.line,
                    a: b_name,
                    b: a_name,
                });
            }
        }

        if let Some(prev) = pairs.last() {
            let prev_key = (&features[prev.a].option, &features[prev.b].option);
            let this_key = (&features[a].option, &features[b].option);
            if prev_key > this_key {
                diag.warn(format!("pair '{},{}' unsorted", a_name, b_name))?;
            }
        }

        pairs.push(Pair { a, b, line });
    }
    diag.message(format_args!(
        "read {} feature pairs from '{}'",
        pairs.len(),
        path
    ));
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &std::path::Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn option_spellings_strip_no_prefix() {
        assert_eq!(option_to_name("--no-block"), "block");
        assert_eq!(option_to_define("--no-block"), "NBLOCK");
        assert_eq!(option_to_name("--no-no-restart"), "norestart");
    }

    #[test]
    fn loads_features_in_order() {
        let dir = tempfile_dir();
        let path = write_csv(&dir, "features.csv", "--no-block,disable blocking\n--no-sort,disable sorting\n");
        let diag = Diagnostics::new(false, false);
        let features = load_features(&path, &diag).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "block");
        assert_eq!(features[1].define, "NSORT");
    }

    #[test]
    fn rejects_duplicate_pair() {
        let dir = tempfile_dir();
        let fpath = write_csv(&dir, "features.csv", "--no-a,a\n--no-b,b\n");
        let diag = Diagnostics::new(false, false);
        let features = load_features(&fpath, &diag).unwrap();
        let ipath = write_csv(&dir, "implied.csv", "--no-a,--no-b\n--no-a,--no-b\n");
        let err = load_pairs(&ipath, &features, &diag, false, &[]).unwrap_err();
        assert!(matches!(err, GenerateError::DuplicatePair { .. }));
    }

    #[test]
    fn rejects_swapped_duplicate_pair() {
        let dir = tempfile_dir();
        let fpath = write_csv(&dir, "features.csv", "--no-a,a\n--no-b,b\n");
        let diag = Diagnostics::new(false, false);
        let features = load_features(&fpath, &diag).unwrap();
        let ipath = write_csv(&dir, "implied.csv", "--no-a,--no-b\n--no-b,--no-a\n");
        let err = load_pairs(&ipath, &features, &diag, false, &[]).unwrap_err();
        assert!(matches!(err, GenerateError::SwappedDuplicatePair { .. }));
    }

    fn tempfile_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "satch-features-test-{}-{}",
            std::process::id(),
            PAIR_TEST_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    static PAIR_TEST_COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);
}
