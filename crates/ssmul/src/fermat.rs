//! Fermat-ring primitives: arithmetic on residues modulo `Fn = 2^L + 1`.
//!
//! A residue is a little-endian word array of even length holding `2L` bits
//! of storage for `L = 16·len` modulus bits. The upper half is headroom:
//! intermediate values are left redundant and folded by [`mod_fn`] only at
//! defined boundaries, because later steps rely on that headroom to avoid
//! extra overflow checks.
//!
//! Since `2^2L ≡ 1` both mod `Fn` and mod `2^2L − 1`, rotating the stored
//! bit pattern multiplies the residue by a power of two. That is the whole
//! root-of-unity ladder of the transform: twiddle factors are cyclic shifts.
//!
//! Length mismatches and out-of-range shift amounts are programming errors
//! and panic; silently producing a wrong digit would be far worse here.

use crate::arith::{add_with_carry, sub_with_borrow};

/// Modulus exponent `L` for a residue array: half the stored bits.
#[inline]
#[must_use]
pub fn mod_bits(words: usize) -> usize {
    16 * words
}

/// Fold a residue into canonical form in `[0, 2^L]`.
///
/// Uses `2^L ≡ -1 (mod Fn)`: the upper half is subtracted from the lower
/// half and cleared. A final borrow means the true value is negative;
/// adding 1 turns the wrapped low half into the `Fn - x` representative
/// (the carry may ripple up to bit `L`). Idempotent.
pub fn mod_fn(a: &mut [u32]) {
    let len = a.len();
    assert!(len >= 2 && len % 2 == 0, "residue length must be even");
    let half = len / 2;
    let mut borrow = 0u32;
    for i in 0..half {
        let (d, br) = sub_with_borrow(a[i], a[half + i], borrow);
        a[i] = d;
        borrow = br;
    }
    for w in &mut a[half..] {
        *w = 0;
    }
    if borrow > 0 {
        let mut i = 0;
        loop {
            let (d, overflow) = a[i].overflowing_add(1);
            a[i] = d;
            if !overflow {
                break;
            }
            i += 1;
        }
    }
}

/// In-place modular addition over the full redundant width.
///
/// A carry out of bit `2L` wraps around to +1 since `2^2L ≡ 1 (mod Fn)`.
pub fn add_mod_fn(a: &mut [u32], b: &[u32]) {
    assert_eq!(a.len(), b.len(), "residue length mismatch");
    let mut carry = 0u32;
    for i in 0..a.len() {
        let (d, c) = add_with_carry(a[i], b[i], carry);
        a[i] = d;
        carry = c;
    }
    if carry > 0 {
        let mut i = 0;
        loop {
            let (d, overflow) = a[i].overflowing_add(1);
            a[i] = d;
            if !overflow {
                break;
            }
            i += 1;
        }
    }
}

/// In-place modular subtraction: `a - b ≡ a + b·2^L (mod Fn)`.
pub fn sub_mod_fn(a: &mut [u32], b: &[u32]) {
    assert_eq!(a.len(), b.len(), "residue length mismatch");
    let negated = cyclic_shift_left_bits(b, mod_bits(b.len()));
    add_mod_fn(a, &negated);
}

/// Rotate the stored bit pattern left by `bits` positions.
///
/// The array is a ring of `32·len` bits; the shift amount reduces modulo
/// that total and must lie in `[0, 2·total)`. A shift by 0 or a multiple of
/// the total is the identity, and shifts compose additively.
#[must_use]
pub fn cyclic_shift_left_bits(a: &[u32], bits: usize) -> Vec<u32> {
    let len = a.len();
    let total = 32 * len;
    assert!(bits < 2 * total, "shift amount out of range");
    let s = bits % total;
    let word_shift = s / 32;
    let bit_shift = s % 32;
    let mut out = vec![0u32; len];
    if bit_shift == 0 {
        for (i, w) in out.iter_mut().enumerate() {
            *w = a[(len + i - word_shift) % len];
        }
    } else {
        for (i, w) in out.iter_mut().enumerate() {
            let hi = a[(len + i - word_shift) % len] << bit_shift;
            let lo = a[(2 * len + i - word_shift - 1) % len] >> (32 - bit_shift);
            *w = hi | lo;
        }
    }
    out
}

/// Rotate the stored bit pattern right by `bits` positions.
#[must_use]
pub fn cyclic_shift_right(a: &[u32], bits: usize) -> Vec<u32> {
    let total = 32 * a.len();
    assert!(bits < 2 * total, "shift amount out of range");
    let s = bits % total;
    if s == 0 {
        a.to_vec()
    } else {
        cyclic_shift_left_bits(a, total - s)
    }
}

/// Copy `bit_len` bits of `b`, starting at word index `b_start`, into `a`
/// starting at absolute bit offset `bit_pos`.
///
/// Whole source words are shifted across the destination word boundary and
/// OR-merged; the final partial word is masked first. Destination bits from
/// `bit_pos` upward must still be zero.
pub fn append_bits(a: &mut [u32], bit_pos: usize, b: &[u32], b_start: usize, bit_len: usize) {
    if bit_len == 0 {
        return;
    }
    let mut a_idx = bit_pos / 32;
    let offset = bit_pos % 32;
    let full_words = bit_len / 32;

    for i in b_start..b_start + full_words {
        if offset > 0 {
            a[a_idx] |= b[i] << offset;
            a_idx += 1;
            a[a_idx] = b[i] >> (32 - offset);
        } else {
            a[a_idx] = b[i];
            a_idx += 1;
        }
    }

    let rem = bit_len % 32;
    if rem > 0 {
        let masked = b[b_start + full_words] & ((1u32 << rem) - 1);
        a[a_idx] |= masked << offset;
        if offset + rem > 32 {
            a[a_idx + 1] = masked >> (32 - offset);
        }
    }
}

/// Subtract `b` from `a` modulo `2^bit_len`, touching only the low
/// `bit_len` bits. Higher words of both inputs are ignored and higher
/// words of `a` are left untouched.
pub fn sub_mod_pow2(a: &mut [u32], b: &[u32], bit_len: usize) {
    if bit_len == 0 {
        return;
    }
    let words = bit_len.div_ceil(32);
    assert!(
        words <= a.len() && words <= b.len(),
        "operands shorter than the modulus width"
    );
    let mut borrow = 0u32;
    for i in 0..words {
        let (d, br) = sub_with_borrow(a[i], b[i], borrow);
        a[i] = d;
        borrow = br;
    }
    let rem = bit_len % 32;
    if rem > 0 {
        a[words - 1] &= (1u32 << rem) - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::One;

    fn signed(v: &[i32]) -> Vec<u32> {
        v.iter().map(|&x| x as u32).collect()
    }

    fn to_uint(w: &[u32]) -> BigUint {
        let bytes: Vec<u8> = w.iter().flat_map(|x| x.to_le_bytes()).collect();
        BigUint::from_bytes_le(&bytes)
    }

    fn fermat_modulus(len: usize) -> BigUint {
        (BigUint::one() << mod_bits(len)) + BigUint::one()
    }

    #[test]
    fn mod_fn_folds_upper_half() {
        let mut a = signed(&[50_593_286, 151_520_511]);
        mod_fn(&mut a);
        assert_eq!(a, signed(&[-100_927_224, 0]));

        let mut a = signed(&[1_157_041_776, -1_895_306_073, -1_094_584_616, -218_513_495]);
        mod_fn(&mut a);
        assert_eq!(a, signed(&[-2_043_340_903, -1_676_792_579, 0, 0]));
    }

    #[test]
    fn mod_fn_is_idempotent_and_congruent() {
        let mut a = signed(&[1_157_041_776, -1_895_306_073, -1_094_584_616, -218_513_495]);
        let before = to_uint(&a);
        let fn_mod = fermat_modulus(a.len());
        mod_fn(&mut a);
        let folded = a.clone();
        assert_eq!(to_uint(&a) % &fn_mod, before % &fn_mod);
        mod_fn(&mut a);
        assert_eq!(a, folded);
    }

    #[test]
    fn mod_fn_of_minus_one_sets_bit_l() {
        // Stored 2^L: low half zero, bit L set. Folding 0 - 1 must give the
        // Fn - 1 = 2^L representative back, carrying all the way up.
        let mut a = vec![0u32, 0, 1, 0];
        mod_fn(&mut a);
        assert_eq!(a, vec![0, 0, 1, 0]);
    }

    #[test]
    fn add_mod_fn_matches_reference() {
        let a0 = signed(&[-1, 123_456, 789, -42]);
        let b0 = signed(&[987, -654_321, -1, 7]);
        let fn_mod = fermat_modulus(a0.len());
        let mut a = a0.clone();
        add_mod_fn(&mut a, &b0);
        mod_fn(&mut a);
        assert_eq!(
            to_uint(&a) % &fn_mod,
            (to_uint(&a0) + to_uint(&b0)) % &fn_mod
        );
    }

    #[test]
    fn add_mod_fn_wraps_carry() {
        // All-ones plus one: the carry out of 2L wraps to +1.
        let mut a = vec![u32::MAX, u32::MAX];
        let b = vec![1, 0];
        let fn_mod = fermat_modulus(2);
        let expected = (to_uint(&a) + BigUint::one()) % &fn_mod;
        add_mod_fn(&mut a, &b);
        mod_fn(&mut a);
        assert_eq!(to_uint(&a) % &fn_mod, expected);
    }

    #[test]
    fn sub_mod_fn_matches_reference() {
        let a0 = signed(&[42, 0, 0, 0]);
        let b0 = signed(&[-1, 99, 3, 0]);
        let fn_mod = fermat_modulus(a0.len());
        let mut a = a0.clone();
        sub_mod_fn(&mut a, &b0);
        mod_fn(&mut a);
        let expected = ((to_uint(&a0) + &fn_mod) - (to_uint(&b0) % &fn_mod)) % &fn_mod;
        assert_eq!(to_uint(&a) % &fn_mod, expected);
    }

    #[test]
    fn cyclic_shift_left_vectors() {
        let arr = signed(&[16_712_450, -2_139_160_576]);
        assert_eq!(cyclic_shift_left_bits(&arr, 1), signed(&[33_424_901, 16_646_144]));
        assert_eq!(
            cyclic_shift_left_bits(&arr, 8),
            signed(&[-16_579_968, 2_130_706_432])
        );
        assert_eq!(cyclic_shift_left_bits(&arr, 16), signed(&[50_495_615, 255]));
        assert_eq!(cyclic_shift_left_bits(&arr, 24), signed(&[41_975_552, 65_283]));
        assert_eq!(
            cyclic_shift_left_bits(&arr, 32),
            signed(&[-2_139_160_576, 16_712_450])
        );
        assert_eq!(cyclic_shift_left_bits(&arr, 64), arr);
    }

    #[test]
    fn cyclic_shift_right_vectors() {
        let arr = signed(&[16_712_450, -2_139_160_576]);
        assert_eq!(
            cyclic_shift_right(&arr, 1),
            signed(&[8_356_225, 1_077_903_360])
        );
        assert_eq!(cyclic_shift_right(&arr, 8), signed(&[65_283, 41_975_552]));
        assert_eq!(cyclic_shift_right(&arr, 16), signed(&[255, 50_495_615]));
        assert_eq!(
            cyclic_shift_right(&arr, 24),
            signed(&[2_130_706_432, -16_579_968])
        );
        assert_eq!(
            cyclic_shift_right(&arr, 32),
            signed(&[-2_139_160_576, 16_712_450])
        );
        assert_eq!(cyclic_shift_right(&arr, 40), signed(&[41_975_552, 65_283]));
        assert_eq!(cyclic_shift_right(&arr, 64), arr);
    }

    #[test]
    fn shifts_compose_and_invert() {
        let arr = signed(&[16_712_450, -2_139_160_576]);
        let mut x = cyclic_shift_left_bits(&arr, 17);
        for s in [12, 1, 1, 24, 9] {
            x = cyclic_shift_left_bits(&x, s);
        }
        assert_eq!(x, arr); // 17+12+1+1+24+9 = 64 ≡ 0

        let x = cyclic_shift_left_bits(&arr, 22);
        assert_eq!(cyclic_shift_right(&x, 22), arr);
        // left by s equals right by total - s
        assert_eq!(cyclic_shift_left_bits(&arr, 9), cyclic_shift_right(&arr, 55));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn shift_amount_out_of_range_panics() {
        let _ = cyclic_shift_left_bits(&[0, 0], 128);
    }

    #[test]
    fn append_bits_vector() {
        let mut a = signed(&[3_615_777, 0]);
        append_bits(&mut a, 22, &signed(&[-77, 61_797]), 1, 13);
        assert_eq!(a, signed(&[1_500_982_305, 4]));
    }

    #[test]
    fn append_bits_word_aligned() {
        let mut a = vec![0u32; 4];
        append_bits(&mut a, 32, &[7, 11, 13], 1, 64);
        assert_eq!(a, vec![0, 11, 13, 0]);
    }

    #[test]
    fn append_bits_packs_consecutive_fields() {
        // 20-bit fields packed back to back across word boundaries.
        let mut a = vec![0u32; 2];
        append_bits(&mut a, 0, &[0xABCDE], 0, 20);
        append_bits(&mut a, 20, &[0x12345], 0, 20);
        let v = u64::from(a[0]) | (u64::from(a[1]) << 32);
        assert_eq!(v, 0xABCDE | (0x12345 << 20));
    }

    #[test]
    fn sub_mod_pow2_vector() {
        let mut a = vec![3844u32, 0, 0];
        sub_mod_pow2(&mut a, &signed(&[627_199_739, 1_091_992_276, 2332]), 12);
        assert_eq!(a, vec![9, 0, 0]);
    }

    #[test]
    fn sub_mod_pow2_leaves_high_words_alone() {
        let mut a = vec![5u32, 77, 99];
        sub_mod_pow2(&mut a, &[7, 1, 1], 8);
        assert_eq!(a, vec![254, 77, 99]); // 5 - 7 mod 256
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn add_mod_fn_rejects_length_mismatch() {
        let mut a = vec![0u32; 4];
        add_mod_fn(&mut a, &[0, 0]);
    }
}
