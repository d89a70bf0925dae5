//! Bridge between signed arbitrary-precision integers and little-endian
//! 32-bit word arrays.
//!
//! Words carry a two's-complement reading: the sign of the whole value is
//! the sign bit of the most significant word. A non-negative magnitude that
//! would set that bit gets an extra zero guard word, so the round trip is
//! exact for every signed integer.

use num_bigint::{BigInt, Sign};

/// Convert a signed integer to its minimal little-endian word sequence.
#[must_use]
pub fn to_word_array(x: &BigInt) -> Vec<u32> {
    let mut bytes = x.to_signed_bytes_le();
    let fill = if x.sign() == Sign::Minus { 0xFF } else { 0x00 };
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Convert a little-endian word sequence back to a signed integer.
#[must_use]
pub fn to_bigint(words: &[u32]) -> BigInt {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    BigInt::from_signed_bytes_le(&bytes)
}
