//! Literal and variable encoding.
//!
//! An *external* literal is the signed, nonzero integer a caller passes
//! across the API boundary (DIMACS convention: sign is polarity, magnitude
//! is a 1-based variable index). Internally every component of this crate
//! works with an *internal* literal: an unsigned integer where bit 0 is the
//! sign and `lit ^ 1` is the negation. This file is the single place that
//! performs the conversion so the encoding stays a contract every other
//! module can rely on rather than something each reimplements.

use std::fmt;

/// `INT_MIN` and zero are forbidden external literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LitError {
    #[error("zero literal argument")]
    Zero,
    #[error("'INT_MIN' literal argument")]
    IntMin,
}

/// A 0-based variable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(pub u32);

impl Var {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The positive literal of this variable.
    pub fn pos_lit(self) -> Lit {
        Lit(self.0 << 1)
    }
}

/// An internal literal: `2*var_index + (negative ? 1 : 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(pub u32);

impl Lit {
    /// Convert a signed external literal, growing nothing itself: callers
    /// that need arrays sized to fit the literal (the checker, the solver)
    /// do that resizing themselves once they have the internal value.
    pub fn from_external(elit: i32) -> Result<Lit, LitError> {
        if elit == 0 {
            return Err(LitError::Zero);
        }
        if elit == i32::MIN {
            return Err(LitError::IntMin);
        }
        let eidx = elit.unsigned_abs();
        let iidx = eidx - 1;
        let ilit = (iidx << 1) | (elit < 0) as u32;
        Ok(Lit(ilit))
    }

    pub fn to_external(self) -> i32 {
        let iidx = self.0 >> 1;
        let eidx = iidx as i32 + 1;
        if self.is_negative() {
            -eidx
        } else {
            eidx
        }
    }

    pub fn not(self) -> Lit {
        Lit(self.0 ^ 1)
    }

    pub fn is_negative(self) -> bool {
        self.0 & 1 != 0
    }

    pub fn is_positive(self) -> bool {
        !self.is_negative()
    }

    pub fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_external())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        for elit in [1, -1, 2, -2, 42, -42, 1_000_000, -1_000_000] {
            let lit = Lit::from_external(elit).unwrap();
            assert_eq!(lit.to_external(), elit);
        }
    }

    #[test]
    fn not_is_involution() {
        let lit = Lit::from_external(7).unwrap();
        assert_eq!(lit.not().not(), lit);
        assert_ne!(lit.not(), lit);
    }

    #[test]
    fn forbidden_literals() {
        assert_eq!(Lit::from_external(0), Err(LitError::Zero));
        assert_eq!(Lit::from_external(i32::MIN), Err(LitError::IntMin));
    }

    #[test]
    fn polarity_bit_is_sign() {
        let pos = Lit::from_external(5).unwrap();
        let neg = Lit::from_external(-5).unwrap();
        assert!(pos.is_positive());
        assert!(neg.is_negative());
        assert_eq!(pos.var(), neg.var());
        assert_eq!(pos.not(), neg);
    }
}
