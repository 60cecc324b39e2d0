//! Stand-alone DIMACS/XNF solver front-end: parses an input formula, drives
//! `satch_solver::Solver`, prints a SAT-competition-style witness and,
//! optionally, traces a DRUP proof to a file or to `stdout`.
//!
//! Grounded on `main.c`: the verbosity/quiet flags, compressed-input
//! handling through external decompressors, the 78-column `v ...` witness
//! wrapping, and the proof-file overwrite protection are all ported from
//! there, expressed with `clap` for argument parsing and `flate2`/
//! `std::process::Command` in place of hand-rolled `popen` plumbing.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use clap::{App, Arg};
use cpu_time::ProcessTime;

use satch_core::dimacs::{self, ClauseSink, ParseMode};
use satch_solver::{ProofFormat, SolveResult, Solver};

const VERSION: &str = env!("CARGO_PKG_VERSION");

struct SolverSink<'a> {
    solver: &'a mut Solver,
    parsed_originals: u64,
}

impl<'a> ClauseSink for SolverSink<'a> {
    fn add_literal(&mut self, lit: i32) {
        self.solver.add(lit);
    }

    fn add_original(&mut self) {
        self.solver.add(0);
        self.parsed_originals += 1;
    }
}

/// Buffers `v`-prefixed witness literals into 78-column lines, matching
/// `flush_printed_values`/`print_value` in `main.c`.
struct WitnessPrinter {
    line: String,
}

impl WitnessPrinter {
    fn new() -> Self {
        WitnessPrinter { line: String::new() }
    }

    fn push(&mut self, out: &mut impl Write, lit: i32) -> io::Result<()> {
        let piece = format!(" {}", lit);
        if self.line.len() + piece.len() > 77 {
            self.flush(out)?;
        }
        self.line.push_str(&piece);
        Ok(())
    }

    fn flush(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.line.is_empty() {
            return Ok(());
        }
        write!(out, "v{}\n", self.line)?;
        self.line.clear();
        Ok(())
    }
}

fn message(quiet: bool, verbose: i32, level: i32, args: std::fmt::Arguments<'_>) {
    if quiet || verbose < level {
        return;
    }
    println!("c {}", args);
}

fn has_suffix(path: &str, suffix: &str) -> bool {
    path.len() >= suffix.len() && path.ends_with(suffix)
}

fn file_readable(path: &str) -> bool {
    Path::new(path).metadata().is_ok()
}

/// Opens `path`, transparently decompressing `.gz`/`.bz2`/`.xz` suffixes:
/// `.gz` through `flate2`, the other two by shelling out to their usual
/// command-line decompressors the way `open_pipe` in `main.c` does via
/// `popen`.
fn open_input(path: &str) -> io::Result<Box<dyn Read>> {
    if path == "-" {
        return Ok(Box::new(io::stdin()));
    }
    if !file_readable(path) {
        return Err(io::Error::new(io::ErrorKind::NotFound, format!("'{}' not readable", path)));
    }
    if has_suffix(path, ".gz") {
        let file = File::open(path)?;
        Ok(Box::new(flate2::read::GzDecoder::new(file)))
    } else if has_suffix(path, ".bz2") {
        open_pipe("bunzip2", path)
    } else if has_suffix(path, ".xz") {
        open_pipe("xz", path)
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

fn open_pipe(tool: &str, path: &str) -> io::Result<Box<dyn Read>> {
    let mut child = Command::new(tool)
        .arg("-c")
        .arg("-d")
        .arg(path)
        .stdout(Stdio::piped())
        .spawn()?;
    let stdout = child.stdout.take().expect("piped stdout");
    Ok(Box::new(stdout))
}

fn open_proof_writer(path: &str, force: bool) -> io::Result<Box<dyn Write>> {
    if path == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if !force && Path::new(path).exists() && path != "/dev/null" {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("'{}' exists (use --force to overwrite)", path),
        ));
    }
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

fn run() -> i32 {
    let matches = App::new("satch")
        .version(VERSION)
        .about("a small CDCL SAT solver with DRUP proof tracing")
        .arg(Arg::with_name("dimacs").index(1).help("input DIMACS/XNF file ('-' for stdin)"))
        .arg(Arg::with_name("proof").index(2).help("DRUP proof output path ('-' for stdout)"))
        .arg(Arg::with_name("id").long("id").alias("identifier").help("print build identifier and exit"))
        .arg(Arg::with_name("ascii").short("a").long("ascii").help("write the proof in ASCII format"))
        .arg(Arg::with_name("binary").short("b").long("binary").conflicts_with("ascii").help("write the proof in binary format"))
        .arg(Arg::with_name("force").short("f").long("force").help("overwrite proof files and relax parsing"))
        .arg(Arg::with_name("no-witness").short("n").long("no-witness").help("disable printing of the satisfying assignment"))
        .arg(Arg::with_name("log").short("l").long("log").help("enable logging messages"))
        .arg(Arg::with_name("quiet").short("q").long("quiet").help("disable verbose messages"))
        .arg(Arg::with_name("verbose").short("v").long("verbose").multiple(true).help("increment verbose level"))
        .arg(Arg::with_name("conflicts").long("conflicts").takes_value(true).help("conflict budget for solve (-1 = unlimited)"))
        .get_matches();

    if matches.is_present("id") {
        println!("{}", VERSION);
        return 0;
    }

    let quiet = matches.is_present("quiet");
    let verbose = matches.occurrences_of("verbose") as i32;
    let force = matches.is_present("force");
    let no_witness = matches.is_present("no-witness");
    let logging = matches.is_present("log");
    let conflict_limit: i64 = matches
        .value_of("conflicts")
        .map(|s| s.parse().unwrap_or(-1))
        .unwrap_or(-1);

    let input_path = matches.value_of("dimacs").unwrap_or("-").to_string();
    let proof_path = matches.value_of("proof").map(|s| s.to_string());

    let proof_format = if matches.is_present("binary") {
        ProofFormat::Binary
    } else if matches.is_present("ascii") {
        ProofFormat::Ascii
    } else if proof_path.as_deref() == Some("-") {
        ProofFormat::Ascii
    } else {
        ProofFormat::Binary
    };

    message(
        quiet,
        verbose,
        0,
        format_args!("satch SAT solver version {}", VERSION),
    );

    let input = match open_input(&input_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("satch: error: {}", e);
            return 1;
        }
    };

    if let Some(proof) = &proof_path {
        if !force && proof != "-" && proof != "/dev/null" && Path::new(proof).exists() {
            eprintln!("satch: error: '{}' exists (use --force to overwrite)", proof);
            return 1;
        }
    }

    let mode = if force { ParseMode::Force } else { ParseMode::Strict };

    let mut solver = Solver::new();
    solver.set_verbose_level(verbose);
    solver.enable_logging_messages(logging);

    #[cfg(feature = "logging")]
    if logging {
        let _ = env_logger::try_init();
    }

    let start = ProcessTime::now();
    let outcome = {
        let mut sink = SolverSink {
            solver: &mut solver,
            parsed_originals: 0,
        };
        dimacs::parse(BufReader::new(input), &input_path, mode, &mut sink)
    };
    let outcome = match outcome {
        Ok(o) => o,
        Err(e) => {
            eprintln!("satch: parse error: {}", e);
            return 1;
        }
    };
    message(
        quiet,
        verbose,
        1,
        format_args!(
            "parsed 'p {} {} {}' header",
            if outcome.is_xnf { "xnf" } else { "cnf" },
            outcome.declared_max_var,
            outcome.declared_clauses
        ),
    );
    message(
        quiet,
        verbose,
        1,
        format_args!("parsed {} clauses in {:.2?}", outcome.parsed_clauses, start.elapsed()),
    );

    if let Some(proof) = &proof_path {
        match open_proof_writer(proof, force) {
            Ok(w) => solver.trace_proof(w, proof_format),
            Err(e) => {
                eprintln!("satch: error: {}", e);
                return 1;
            }
        }
    }

    let solve_start = ProcessTime::now();
    let result = solver.solve(conflict_limit);
    message(
        quiet,
        verbose,
        0,
        format_args!("solved in {:.2?}", solve_start.elapsed()),
    );

    match result {
        SolveResult::Satisfiable => {
            println!("s SATISFIABLE");
            if !no_witness {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                let mut printer = WitnessPrinter::new();
                for v in 1..=outcome.observed_max_var as i32 {
                    let _ = printer.push(&mut out, solver.val(v));
                }
                let _ = printer.flush(&mut out);
                let _ = writeln!(out, "v 0");
            }
            10
        }
        SolveResult::Unsatisfiable => {
            println!("s UNSATISFIABLE");
            20
        }
        SolveResult::Unknown => {
            println!("s UNKNOWN");
            0
        }
    }
}

fn main() {
    std::process::exit(run());
}
