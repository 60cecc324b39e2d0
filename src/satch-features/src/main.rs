//! Feature-metadata generator: reads `features.csv`, `implied.csv` and
//! `clashing.csv`, computes the transitive closure of `implied`, checks for
//! cyclic and clashing-vs-implied conflicts, and emits the shell and header
//! fragments the build consumes.
//!
//! Grounded on `features/generate.c`'s `main`, replacing its hand-rolled
//! `argv` loop with `clap` but keeping every flag: `-h`, `-p`/`--pedantic`,
//! `-l`/`--list`, `-v`/`--verbose`, an optional `all` and a list of
//! generator names to run.

mod closure;
mod diagnostics;
mod emit;
mod error;
mod model;

use clap::{App, Arg};

use diagnostics::Diagnostics;
use error::GenerateError;

fn run() -> Result<(), GenerateError> {
    let matches = App::new("satch-generate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("generates build-time feature metadata from CSV tables")
        .arg(Arg::with_name("pedantic").short("p").long("pedantic").help("treat warnings as errors"))
        .arg(Arg::with_name("list").short("l").long("list").help("list the generators that can be named"))
        .arg(Arg::with_name("verbose").short("v").long("verbose").help("increase verbosity"))
        .arg(
            Arg::with_name("features-csv")
                .long("features-csv")
                .takes_value(true)
                .default_value("features.csv"),
        )
        .arg(
            Arg::with_name("implied-csv")
                .long("implied-csv")
                .takes_value(true)
                .default_value("implied.csv"),
        )
        .arg(
            Arg::with_name("clashing-csv")
                .long("clashing-csv")
                .takes_value(true)
                .default_value("clashing.csv"),
        )
        .arg(
            Arg::with_name("out-dir")
                .long("out-dir")
                .takes_value(true)
                .default_value("."),
        )
        .arg(
            Arg::with_name("names")
                .index(1)
                .multiple(true)
                .help("'all', or specific generator names (default: all)"),
        )
        .get_matches();

    if matches.is_present("list") {
        for (name, _) in emit::GENERATORS {
            println!("{}", name);
        }
        return Ok(());
    }

    let verbose = matches.is_present("verbose");
    let pedantic = matches.is_present("pedantic");
    let diag = Diagnostics::new(verbose, pedantic);

    #[cfg(feature = "logging")]
    if verbose {
        let _ = env_logger::try_init();
    }

    let names: Vec<&str> = matches
        .values_of("names")
        .map(|v| v.collect())
        .unwrap_or_default();
    let all = names.is_empty() || names.iter().any(|n| *n == "all");
    let requested: Vec<&str> = names.into_iter().filter(|n| *n != "all").collect();
    for name in &requested {
        if emit::find_generator(name).is_none() {
            return Err(GenerateError::UnknownGenerator {
                name: name.to_string(),
            });
        }
    }

    let features = model::load_features(matches.value_of("features-csv").unwrap(), &diag)?;
    let implied = model::load_pairs(
        matches.value_of("implied-csv").unwrap(),
        &features,
        &diag,
        false,
        &[],
    )?;
    let clashing = model::load_pairs(
        matches.value_of("clashing-csv").unwrap(),
        &features,
        &diag,
        true,
        &implied,
    )?;

    report_roots_leafs_singletons(&features, &implied, &diag);

    let direct = closure::direct_implied(features.len(), &implied);
    closure::check_transitive_impliedness(&features, &direct, &implied, &diag)?;
    let hull = closure::transitive_hull(features.len(), &implied, &diag);
    closure::check_cyclic_dependencies(&features, &hull, &diag)?;
    closure::check_clashing_not_transitively_implied(&features, &hull, &clashing)?;
    let invalid = closure::invalid_pairs(&features, &hull, &clashing);
    diag.message(format_args!("sorted {} invalid pairs", invalid.len()));

    let out_dir = std::path::PathBuf::from(matches.value_of("out-dir").unwrap());
    let ctx = emit::Context {
        features: &features,
        hull: &hull,
        clashing: &clashing,
        invalid: &invalid,
    };

    if all {
        diag.message(format_args!("generating all files"));
        for (_, generator) in emit::GENERATORS {
            generator(&ctx, &out_dir)?;
        }
    } else {
        for name in &requested {
            let generator = emit::find_generator(name).unwrap();
            generator(&ctx, &out_dir)?;
        }
    }

    Ok(())
}

/// Pure diagnostics, not contractual in any way — ported from
/// `init_roots`/`init_leafs`/`init_singletons` purely for the `--verbose`
/// messages the original prints.
fn report_roots_leafs_singletons(
    features: &[model::Feature],
    implied: &[model::Pair],
    diag: &Diagnostics,
) {
    let n = features.len();
    let mut has_outgoing = vec![false; n];
    let mut has_incoming = vec![false; n];
    for p in implied {
        has_outgoing[p.a] = true;
        has_incoming[p.b] = true;
    }
    let mut roots = 0;
    let mut leafs = 0;
    let mut singletons = 0;
    for i in 0..n {
        if has_outgoing[i] && !has_incoming[i] {
            diag.message(format_args!("root '{}'", features[i].option));
            roots += 1;
        }
        if has_incoming[i] && !has_outgoing[i] {
            diag.message(format_args!("leaf '{}'", features[i].option));
            leafs += 1;
        }
        if !has_outgoing[i] && !has_incoming[i] {
            diag.message(format_args!("singleton '{}'", features[i].option));
            singletons += 1;
        }
    }
    diag.message(format_args!("found {} roots", roots));
    diag.message(format_args!("found {} leafs", leafs));
    diag.message(format_args!("found {} singletons", singletons));
}

fn main() {
    if let Err(e) = run() {
        eprintln!("generate: error: {}", e);
        std::process::exit(1);
    }
}
