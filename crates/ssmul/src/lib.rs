//! # ssmul
//!
//! Exact multiplication of arbitrary-precision integers via the
//! Schönhage-Strassen algorithm over Fermat rings, with Karatsuba and
//! schoolbook fallbacks below the transform's profitable range.
//!
//! The public entry is [`multiply`]; the word-array layers underneath
//! ([`mult_simple`], [`mult_karatsuba`], the [`fermat`] primitives and
//! [`dft`]/[`idft`]) are exported for callers that already hold operands in
//! little-endian 32-bit digit form.
//!
//! # Example
//! ```
//! use num_bigint::BigInt;
//!
//! let a = BigInt::from(100);
//! let b = BigInt::from(100);
//! assert_eq!(ssmul::multiply(&a, &b), BigInt::from(10_000));
//! ```

pub mod arith;
pub mod fermat;
pub mod karatsuba;
pub mod params;
pub mod schoolbook;
pub mod ssa;
pub mod words;

// Re-exports
pub use arith::add_shifted;
pub use karatsuba::mult_karatsuba;
pub use params::{ParamError, SsaParams, Thresholds};
pub use schoolbook::mult_simple;
pub use ssa::{dft, idft, mult_mod_fn, mult_words, multiply, multiply_with};
pub use words::{to_bigint, to_word_array};
