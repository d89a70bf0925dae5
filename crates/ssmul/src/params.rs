//! Split-parameter derivation and dispatch thresholds for the transform
//! engine.
//!
//! The thresholds are explicit engine-owned configuration rather than
//! ambient constants, so they stay tunable and independently testable.

use thiserror::Error;

/// Fatal configuration failures, surfaced to the caller instead of being
/// clamped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    /// The requested transform order is below the smallest size whose
    /// pieces stay word-aligned.
    #[error("transform order m={0} is below the minimum of {MIN_M}")]
    OrderTooSmall(usize),
    /// A dispatch threshold outside the supported range.
    #[error("invalid threshold configuration: {0}")]
    InvalidThreshold(String),
}

/// Smallest supported transform order: `m = 10` gives `n = 6` and 32-bit
/// (word-aligned) pieces.
pub const MIN_M: usize = 10;

/// Smallest combined bit length the transform path accepts; `ssa_bits` may
/// not go below this (it guarantees a derivable transform order).
pub const MIN_SSA_THRESHOLD_BITS: usize = 4096;

/// Dispatch thresholds owned by the multiplication engine.
///
/// Both are combined significant bit lengths of the two operands: below
/// `karatsuba_bits` the schoolbook product runs, below `ssa_bits` Karatsuba,
/// above it the transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    karatsuba_bits: usize,
    ssa_bits: usize,
}

impl Thresholds {
    /// Default crossover from the schoolbook product to Karatsuba.
    pub const DEFAULT_KARATSUBA_BITS: usize = 2048;
    /// Default crossover from Karatsuba to the transform.
    pub const DEFAULT_SSA_BITS: usize = 1 << 17;

    /// Build a validated threshold configuration.
    pub fn new(karatsuba_bits: usize, ssa_bits: usize) -> Result<Self, ParamError> {
        if ssa_bits < MIN_SSA_THRESHOLD_BITS {
            return Err(ParamError::InvalidThreshold(format!(
                "ssa_bits {ssa_bits} is below the minimum of {MIN_SSA_THRESHOLD_BITS}"
            )));
        }
        if karatsuba_bits == 0 || karatsuba_bits >= ssa_bits {
            return Err(ParamError::InvalidThreshold(format!(
                "karatsuba_bits {karatsuba_bits} must be positive and below ssa_bits {ssa_bits}"
            )));
        }
        Ok(Self {
            karatsuba_bits,
            ssa_bits,
        })
    }

    /// Combined bits below which the schoolbook product runs.
    #[must_use]
    pub fn karatsuba_bits(&self) -> usize {
        self.karatsuba_bits
    }

    /// Combined bits below which Karatsuba runs.
    #[must_use]
    pub fn ssa_bits(&self) -> usize {
        self.ssa_bits
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            karatsuba_bits: Self::DEFAULT_KARATSUBA_BITS,
            ssa_bits: Self::DEFAULT_SSA_BITS,
        }
    }
}

/// Derived split/transform geometry for one multiplication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SsaParams {
    /// Transform order: `2^m` bits of piece capacity cover both operands.
    pub m: usize,
    /// Shape parameter, `n = m/2 + 1`.
    pub n: usize,
    /// Bit width of each piece carved from an operand (`2^(n-1)`).
    pub piece_bits: usize,
    /// Transform length, a power of two; each operand occupies at most half
    /// of it, so the negacyclic convolution has no wrap-around terms.
    pub num_elements: usize,
    /// Ring modulus exponent `L`: elements live modulo `2^L + 1`.
    pub mod_bits: usize,
    /// Words of storage per ring element (`2L / 32`).
    pub element_words: usize,
}

impl SsaParams {
    /// Derive parameters from the operands' significant bit lengths.
    pub fn derive(a_bits: usize, b_bits: usize) -> Result<Self, ParamError> {
        let max_bits = a_bits.max(b_bits).max(1);
        // smallest m with 2^m >= 2 * max_bits
        let m = (usize::BITS - (2 * max_bits - 1).leading_zeros()) as usize;
        Self::from_m(m)
    }

    /// Build parameters for an explicit transform order.
    ///
    /// `L` is the smallest multiple of both 32 and `num_elements` that
    /// leaves headroom above `2 · piece_bits + log2(num_elements)`, so a
    /// convolution coefficient can never overflow the modulus, and the
    /// twist stride `L / num_elements` stays integral.
    pub fn from_m(m: usize) -> Result<Self, ParamError> {
        if m < MIN_M {
            return Err(ParamError::OrderTooSmall(m));
        }
        let n = m / 2 + 1;
        let piece_bits = 1usize << (n - 1);
        let (num_elements, mod_bits) = if m % 2 == 0 {
            (1usize << (n - 1), 3usize << (n - 1))
        } else {
            (1usize << n, 1usize << (n + 1))
        };
        Ok(Self {
            m,
            n,
            piece_bits,
            num_elements,
            mod_bits,
            element_words: mod_bits / 16,
        })
    }

    /// Words per piece (pieces are word-aligned).
    #[must_use]
    pub fn piece_words(&self) -> usize {
        self.piece_bits / 32
    }

    /// Bit stride of the negacyclic twist: element `i` is pre-rotated by
    /// `i · twist_bits()` before the forward transform.
    #[must_use]
    pub fn twist_bits(&self) -> usize {
        self.mod_bits / self.num_elements
    }

    /// Capacity of one transform vector in operand bits.
    #[must_use]
    pub fn capacity_bits(&self) -> usize {
        self.num_elements * self.piece_bits
    }
}
