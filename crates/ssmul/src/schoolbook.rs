//! Classical O(n²) multiplication of word arrays.
//!
//! The recursion base for Karatsuba and the ground truth every higher layer
//! is tested against.

/// Schoolbook product of two little-endian digit arrays.
///
/// Row-wise 64-bit accumulation with immediate carry propagation; the
/// output length is exactly `a.len() + b.len()`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn mult_simple(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut c = vec![0u32; a.len() + b.len()];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        let ai = u64::from(ai);
        let mut carry = 0u64;
        for (j, &bj) in b.iter().enumerate() {
            let t = u64::from(c[i + j]) + ai * u64::from(bj) + carry;
            c[i + j] = t as u32;
            carry = t >> 32;
        }
        let mut k = i + b.len();
        while carry > 0 {
            let t = u64::from(c[k]) + carry;
            c[k] = t as u32;
            carry = t >> 32;
            k += 1;
        }
    }
    c
}
