//! Schönhage-Strassen multiplication engine.
//!
//! The public entry dispatches on operand size between the schoolbook,
//! Karatsuba, and transform paths. The transform path splits each magnitude
//! into word-aligned pieces, embeds them as Fermat-ring residues with a
//! negacyclic twist, runs an in-place Cooley-Tukey network whose twiddle
//! factors are bit rotations, multiplies pointwise (recursing into this
//! same entry), and recombines the exact convolution coefficients with
//! shifted adds.
//!
//! Every buffer is allocated fresh per call; there is no shared state, so
//! concurrent calls on distinct inputs need no locking. The pointwise stage
//! and the per-element canonicalization are data-parallel and run on rayon;
//! the butterfly stages stay sequential.

use num_bigint::{BigInt, Sign};
use num_traits::Signed;
use rayon::prelude::*;
use tracing::debug;

use crate::arith::add_shifted;
use crate::fermat::{
    add_mod_fn, append_bits, cyclic_shift_left_bits, cyclic_shift_right, mod_fn, sub_mod_fn,
};
use crate::karatsuba::mult_karatsuba_with;
use crate::params::{SsaParams, Thresholds};
use crate::schoolbook::mult_simple;
use crate::words::{to_bigint, to_word_array};

/// Multiply two signed arbitrary-precision integers exactly.
#[must_use]
pub fn multiply(a: &BigInt, b: &BigInt) -> BigInt {
    multiply_with(&Thresholds::default(), a, b)
}

/// Multiply with explicit dispatch thresholds.
///
/// The sign of the product is the XOR of the input signs; magnitudes go
/// through the size dispatch like any other operands (zero and units simply
/// fall through to the schoolbook path).
#[must_use]
pub fn multiply_with(cfg: &Thresholds, a: &BigInt, b: &BigInt) -> BigInt {
    let negative = (a.sign() == Sign::Minus) != (b.sign() == Sign::Minus);
    let aw = to_word_array(&a.abs());
    let bw = to_word_array(&b.abs());
    let c = to_bigint(&mult_words_with(cfg, &aw, &bw));
    if negative {
        -c
    } else {
        c
    }
}

/// Multiply two word arrays with the default thresholds.
///
/// Output length is `a.len() + b.len()` on every path.
#[must_use]
pub fn mult_words(a: &[u32], b: &[u32]) -> Vec<u32> {
    mult_words_with(&Thresholds::default(), a, b)
}

/// Multiply two word arrays, dispatching on the combined significant bit
/// length of the operands.
#[must_use]
pub fn mult_words_with(cfg: &Thresholds, a: &[u32], b: &[u32]) -> Vec<u32> {
    let a_bits = sig_bits(a);
    let b_bits = sig_bits(b);
    let combined = a_bits + b_bits;
    if combined < cfg.karatsuba_bits() {
        return mult_simple(a, b);
    }
    if combined < cfg.ssa_bits() {
        // per-operand base in words: half the combined threshold
        return mult_karatsuba_with(a, b, cfg.karatsuba_bits() / 64);
    }
    mult_ssa(cfg, a, a_bits, b, b_bits)
}

/// Significant bit length of a word array (high zero words ignored).
fn sig_bits(x: &[u32]) -> usize {
    for (i, &w) in x.iter().enumerate().rev() {
        if w != 0 {
            return 32 * i + (32 - w.leading_zeros() as usize);
        }
    }
    0
}

fn mult_ssa(cfg: &Thresholds, a: &[u32], a_bits: usize, b: &[u32], b_bits: usize) -> Vec<u32> {
    let params = SsaParams::derive(a_bits, b_bits)
        .expect("dispatch admits only transform-sized operands");
    debug!(
        m = params.m,
        num_elements = params.num_elements,
        mod_bits = params.mod_bits,
        "transform multiply"
    );

    let mut va = split_into_elements(a, a_bits, &params);
    let mut vb = split_into_elements(b, b_bits, &params);
    twist(&mut va, &params);
    twist(&mut vb, &params);

    dft(&mut va, &params);
    dft(&mut vb, &params);
    va.par_iter_mut().for_each(|e| mod_fn(e));
    vb.par_iter_mut().for_each(|e| mod_fn(e));

    let mut c: Vec<Vec<u32>> = va
        .par_iter()
        .zip(vb.par_iter())
        .map(|(x, y)| mult_mod_fn_with(cfg, x, y))
        .collect();

    idft(&mut c, &params);
    c.par_iter_mut().for_each(|e| mod_fn(e));
    untwist(&mut c, &params);

    // The vectors are at most half occupied, so the negacyclic convolution
    // has no wrap-around terms: each canonical residue IS the coefficient.
    // Recombine them at stride piece_bits and the carries settle exactly.
    let mut z = vec![0u32; a.len() + b.len()];
    for (i, ci) in c.iter().enumerate() {
        let sig = ci.iter().rposition(|&w| w != 0).map_or(0, |p| p + 1);
        if sig > 0 {
            add_shifted(&mut z, &ci[..sig], i * params.piece_words());
        }
    }
    z
}

/// Split a magnitude into `piece_bits`-bit pieces, each embedded in a fresh
/// ring element.
fn split_into_elements(x: &[u32], x_bits: usize, params: &SsaParams) -> Vec<Vec<u32>> {
    assert!(
        x_bits.div_ceil(params.piece_bits) <= params.num_elements / 2,
        "operand exceeds transform capacity"
    );
    let mut v = vec![vec![0u32; params.element_words]; params.num_elements];
    let mut consumed = 0;
    for (i, elem) in v.iter_mut().enumerate() {
        if consumed >= x_bits {
            break;
        }
        let take = params.piece_bits.min(x_bits - consumed);
        append_bits(elem, 0, x, i * params.piece_words(), take);
        consumed += take;
    }
    v
}

/// Apply the negacyclic twist: element `i` is multiplied by `ψ^i` where
/// `ψ = 2^(L/N)`, realized as a left rotation.
fn twist(v: &mut [Vec<u32>], params: &SsaParams) {
    let stride = params.twist_bits();
    v.par_iter_mut()
        .enumerate()
        .skip(1)
        .for_each(|(i, e)| *e = cyclic_shift_left_bits(e, i * stride));
}

/// Remove the twist after the inverse transform and canonicalize.
fn untwist(v: &mut [Vec<u32>], params: &SsaParams) {
    let stride = params.twist_bits();
    v.par_iter_mut().enumerate().skip(1).for_each(|(i, e)| {
        *e = cyclic_shift_right(e, i * stride);
        mod_fn(e);
    });
}

/// In-place forward transform over `Z/(2^L + 1)`.
///
/// Bit-reversal permutation followed by iterative Cooley-Tukey butterflies.
/// The stage twiddle `ω_size = 2^(2L/size)` is a rotation: 2 is a `2L`-th
/// root of unity in the ring.
pub fn dft(data: &mut [Vec<u32>], params: &SsaParams) {
    let n = data.len();
    assert_eq!(n, params.num_elements, "transform vector length mismatch");
    if n <= 1 {
        return;
    }
    for e in data.iter() {
        assert_eq!(e.len(), params.element_words, "ring element length mismatch");
    }
    bit_reverse_permutation(data);

    let total = 2 * params.mod_bits;
    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let step = total / size;
        for start in (0..n).step_by(size) {
            for j in 0..half {
                let u = std::mem::take(&mut data[start + j]);
                let rotated = cyclic_shift_left_bits(&data[start + j + half], step * j);
                let mut sum = u.clone();
                add_mod_fn(&mut sum, &rotated);
                let mut diff = u;
                sub_mod_fn(&mut diff, &rotated);
                data[start + j] = sum;
                data[start + j + half] = diff;
            }
        }
        size *= 2;
    }
}

/// In-place inverse transform: `idft(dft(x)) ≡ x (mod Fn)` element-wise.
///
/// Reverses the tail, reapplies the forward transform, then divides by the
/// vector length with a right rotation per element.
pub fn idft(data: &mut [Vec<u32>], params: &SsaParams) {
    let n = data.len();
    assert_eq!(n, params.num_elements, "transform vector length mismatch");
    if n <= 1 {
        return;
    }
    data[1..].reverse();
    dft(data, params);
    let log_n = n.trailing_zeros() as usize;
    data.par_iter_mut()
        .for_each(|e| *e = cyclic_shift_right(e, log_n));
}

fn bit_reverse_permutation(data: &mut [Vec<u32>]) {
    let n = data.len();
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}

/// Product of two canonical residues modulo `Fn`, in redundant form.
///
/// Inputs must be canonical (value in `[0, 2^L]`): the low halves carry the
/// value, the word at `len/2` is at most 1, everything above it is zero.
/// A set top bit stands for `2^L ≡ -1`, contributing the negated other
/// operand (and `+1` when both are set).
#[must_use]
pub fn mult_mod_fn(a: &[u32], b: &[u32]) -> Vec<u32> {
    mult_mod_fn_with(&Thresholds::default(), a, b)
}

pub(crate) fn mult_mod_fn_with(cfg: &Thresholds, a: &[u32], b: &[u32]) -> Vec<u32> {
    assert_eq!(a.len(), b.len(), "residue length mismatch");
    let len = a.len();
    assert!(len >= 2 && len % 2 == 0, "residue length must be even");
    let half = len / 2;
    assert!(
        is_canonical(a) && is_canonical(b),
        "residue not in canonical form"
    );

    let mut c = mult_words_with(cfg, &a[..half], &b[..half]);
    debug_assert_eq!(c.len(), len);

    let a_top = a[half] == 1;
    let b_top = b[half] == 1;
    if a_top {
        let mut low = b[..half].to_vec();
        low.resize(len, 0);
        sub_mod_fn(&mut c, &low);
    }
    if b_top {
        let mut low = a[..half].to_vec();
        low.resize(len, 0);
        sub_mod_fn(&mut c, &low);
    }
    if a_top && b_top {
        let mut one = vec![0u32; len];
        one[0] = 1;
        add_mod_fn(&mut c, &one);
    }
    c
}

fn is_canonical(x: &[u32]) -> bool {
    let half = x.len() / 2;
    x[half] <= 1 && x[half + 1..].iter().all(|&w| w == 0)
}
