//! DRUP proof tracing: ASCII and binary clause/deletion records.
//!
//! Grounded on `satch.h`'s `satch_trace_proof`/`satch_ascii_proof` pair and
//! on `satch_core::checker`, which is the consumer of whatever this module
//! writes: every clause this solver learns (and every clause it later drops
//! from its database) is offered to the checker in the same order, so a
//! checker replaying the trace can always find the asymmetric-tautology
//! witness this solver actually used.

use std::io::{self, Write};

use satch_core::lit::Lit;

/// Wire format for a traced proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofFormat {
    Ascii,
    Binary,
}

/// Writes clause additions and deletions to an underlying sink as they
/// happen. Unlike the checker, this side never reads its own trace back.
pub struct ProofWriter<W: Write> {
    out: W,
    format: ProofFormat,
}

impl<W: Write> ProofWriter<W> {
    pub fn new(out: W, format: ProofFormat) -> Self {
        ProofWriter { out, format }
    }

    pub fn add_clause(&mut self, lits: &[Lit]) -> io::Result<()> {
        self.write_clause(lits, false)
    }

    pub fn delete_clause(&mut self, lits: &[Lit]) -> io::Result<()> {
        self.write_clause(lits, true)
    }

    fn write_clause(&mut self, lits: &[Lit], deleted: bool) -> io::Result<()> {
        match self.format {
            ProofFormat::Ascii => {
                if deleted {
                    write!(self.out, "d ")?;
                }
                for lit in lits {
                    write!(self.out, "{} ", lit.to_external())?;
                }
                writeln!(self.out, "0")
            }
            ProofFormat::Binary => {
                if deleted {
                    self.out.write_all(&[b'd'])?;
                }
                for lit in lits {
                    // `lit.0` is already the internal `2*var+sign` encoding;
                    // offsetting by 2 keeps every encoded literal away from
                    // the 0 byte reserved as the clause terminator.
                    write_varint(&mut self.out, u64::from(lit.0) + 2)?;
                }
                self.out.write_all(&[0])
            }
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn write_varint(out: &mut impl Write, mut x: u64) -> io::Result<()> {
    loop {
        let mut byte = (x & 0x7f) as u8;
        x >>= 7;
        if x != 0 {
            byte |= 0x80;
        }
        out.write_all(&[byte])?;
        if x == 0 {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(elits: &[i32]) -> Vec<Lit> {
        elits.iter().map(|&e| Lit::from_external(e).unwrap()).collect()
    }

    #[test]
    fn ascii_add_and_delete() {
        let mut buf = Vec::new();
        {
            let mut w = ProofWriter::new(&mut buf, ProofFormat::Ascii);
            w.add_clause(&lits(&[1, -2])).unwrap();
            w.delete_clause(&lits(&[1, -2])).unwrap();
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "1 -2 0\nd 1 -2 0\n");
    }

    #[test]
    fn binary_marks_deletions_with_a_leading_byte() {
        let mut buf = Vec::new();
        {
            let mut w = ProofWriter::new(&mut buf, ProofFormat::Binary);
            w.add_clause(&lits(&[1])).unwrap();
            w.delete_clause(&lits(&[1])).unwrap();
        }
        // add: varint(2) then terminator 0; delete: 'd', varint(2), 0.
        assert_eq!(buf, vec![2, 0, b'd', 2, 0]);
    }

    #[test]
    fn empty_clause_is_just_a_terminator() {
        let mut buf = Vec::new();
        {
            let mut w = ProofWriter::new(&mut buf, ProofFormat::Ascii);
            w.add_clause(&[]).unwrap();
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "0\n");
    }
}
