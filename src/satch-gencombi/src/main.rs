//! Configuration-pair generator: searches for the smallest set of
//! `./configure` invocations that covers every valid pair of options, using
//! an embedded SAT solver (`satch-solver`).
//!
//! Grounded on `gencombi.c`'s `main`: the same three modes (default
//! minimum-cover search, `--all`, `--dimacs`) and the same flags, with
//! `clap` replacing the hand-rolled `argv` loop. `--weak` and
//! `--no-symmetry` are additions: the original hard-codes both the absence
//! constraint and (not having one at all) symmetry breaking, but both are
//! made independently toggleable here.

mod encode;
mod generate;
mod options;
mod search;

use std::io::Write;

use clap::{App, Arg};
use cpu_time::ProcessTime;

fn run() -> i32 {
    let matches = App::new("gencombi")
        .version(env!("CARGO_PKG_VERSION"))
        .about("generates minimal or exhaustive ./configure option combinations")
        .arg(
            Arg::with_name("all")
                .short("a")
                .long("all")
                .help("print all possible combinations of options up to '<k>'"),
        )
        .arg(
            Arg::with_name("dimacs")
                .short("d")
                .long("dimacs")
                .help("print the CNF encoding for '<k>' instead of solving"),
        )
        .arg(
            Arg::with_name("invalid")
                .short("i")
                .long("invalid")
                .help("only print invalid combinations (requires '-a')"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("set verbose mode"),
        )
        .arg(
            Arg::with_name("weak")
                .long("weak")
                .help("drop the 'pair also missing somewhere' constraint"),
        )
        .arg(
            Arg::with_name("no-symmetry")
                .long("no-symmetry")
                .help("disable lexicographic symmetry breaking between configurations"),
        )
        .arg(Arg::with_name("k").index(1).help("maximum number of options to combine"))
        .get_matches();

    let all = matches.is_present("all");
    let dimacs = matches.is_present("dimacs");
    let invalid = matches.is_present("invalid");
    let verbose = matches.is_present("verbose");
    let weak = matches.is_present("weak");
    let symmetry = !matches.is_present("no-symmetry");

    #[cfg(feature = "logging")]
    if verbose {
        let _ = env_logger::try_init();
    }

    if invalid && !all {
        eprintln!("gencombi: error: can only use '--invalid' with '-a' or '--all'");
        return 1;
    }

    let k: Option<usize> = match matches.value_of("k") {
        Some(s) => match s.parse::<i64>() {
            Ok(n) if n > 0 => Some(n as usize),
            _ => {
                eprintln!("gencombi: error: invalid number '{}' (try '-h')", s);
                return 1;
            }
        },
        None => None,
    };

    if let Some(k) = k {
        if !dimacs && !all {
            eprintln!("gencombi: error: can not use '<k> = {}' in default mode", k);
            return 1;
        }
    }

    let valid = options::valid_matrix();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if all {
        let k = k.unwrap_or(0);
        if let Err(e) = generate::enumerate_all(k, &valid, invalid, &mut out) {
            eprintln!("gencombi: error: {}", e);
            return 1;
        }
    } else if dimacs {
        let k = match k {
            Some(k) => k,
            None => {
                eprintln!("gencombi: error: '--dimacs' requires '<k>'");
                return 1;
            }
        };
        if let Err(e) = encode::print_dimacs(k, &valid, symmetry, weak, &mut out) {
            eprintln!("gencombi: error: {}", e);
            return 1;
        }
    } else {
        let start = ProcessTime::now();
        let frame = search::search_minimum(&valid, symmetry, weak, verbose);
        for i in 0..frame.k {
            write!(out, "./configure").ok();
            for (p, &option) in options::OPTIONS.iter().enumerate() {
                let lit = frame.encoding.option_var[i][p];
                if frame.solver.val(lit) == lit {
                    write!(out, " {}", options::shorten(option)).ok();
                }
            }
            writeln!(out).ok();
        }
        if verbose {
            eprintln!("c used {:.2?} in total", start.elapsed());
        }
    }

    0
}

fn main() {
    std::process::exit(run());
}
