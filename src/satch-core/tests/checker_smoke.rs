//! End-to-end smoke test for the checker API, exercised through the
//! DIMACS parser rather than by hand-feeding literals: this is the
//! counterpart of `testapi.c`, adapted from driving a solver to driving
//! [`satch_core::checker::Checker`] directly, since `Checker` implements
//! [`satch_core::dimacs::ClauseSink`] and the parser can feed either.

use satch_core::checker::Checker;
use satch_core::dimacs::{self, ParseMode};

#[test]
fn parses_and_checks_a_satisfiable_formula_as_original_clauses() {
    let input = b"c three clauses, all original\np cnf 3 3\n1 2 0\n-1 3 0\n2 -3 0\n";
    let mut checker = Checker::new();
    let outcome = dimacs::parse(&input[..], "<test>", ParseMode::Strict, &mut checker).unwrap();
    assert_eq!(outcome.parsed_clauses, 3);
    assert!(!checker.is_inconsistent());
    assert_eq!(checker.stats().clauses, 3);
    assert_eq!(checker.stats().original, 3);
    checker.release();
}

#[test]
fn parses_an_unsatisfiable_unit_conflict() {
    let input = b"p cnf 1 2\n1 0\n-1 0\n";
    let mut checker = Checker::new();
    dimacs::parse(&input[..], "<test>", ParseMode::Strict, &mut checker).unwrap();
    assert!(checker.is_inconsistent());
    checker.release();
}

#[test]
fn xor_clause_expands_before_reaching_the_checker() {
    // `x1 2 3 0` forbids every even-parity assignment of {1,2,3}: four
    // ternary clauses, none of which the checker sees as an XOR.
    let input = b"p xnf 3 1\nx1 2 3 0\n";
    let mut checker = Checker::new();
    let outcome = dimacs::parse(&input[..], "<test>", ParseMode::Strict, &mut checker).unwrap();
    assert!(outcome.is_xnf);
    assert_eq!(checker.stats().clauses, 4);
    checker.release();
}

#[test]
fn learned_clauses_and_deletes_compose_end_to_end() {
    let mut checker = Checker::new();
    for &lits in &[[1, 2].as_slice(), &[1, -2], &[-1, 2]] {
        for &l in lits {
            checker.add_literal(l);
        }
        checker.add_original();
    }

    checker.add_literal(1);
    checker.add_learned();
    checker.add_literal(2);
    checker.add_learned();

    checker.add_literal(1);
    checker.add_literal(2);
    checker.delete();

    assert!(!checker.is_inconsistent());
    checker.release();
}

#[test]
#[should_panic]
fn leak_checking_end_to_end_catches_an_undeleted_clause() {
    let mut checker = Checker::new();
    checker.enable_leak_checking(true);
    let input = b"p cnf 2 1\n1 2 0\n";
    dimacs::parse(&input[..], "<test>", ParseMode::Strict, &mut checker).unwrap();
    checker.release();
}
