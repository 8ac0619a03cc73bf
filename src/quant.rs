//! Fixed-point quantization of float scales and the integer output pipeline built on it.
use serde::{Deserialize, Serialize};

const MANTISSA_MASK: u32 = 0x007f_ffff;
// Exponent field of 0.5f32; merging the mantissa into it lands in [0.5, 1).
const HALF_EXPONENT_BITS: u32 = 0x3f00_0000;

/// Scale approximated as `multiplier * 2^-31 * 2^-right_shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPointMultiplier {
    pub multiplier: i32,
    pub right_shift: i32,
}

#[inline]
pub fn bits_of(x: f32) -> u32 { x.to_bits() }

#[inline]
pub fn from_bits(bits: u32) -> f32 { f32::from_bits(bits) }

/// Encode a positive, finite, normal `scale` as a fixed-point multiplier.
///
/// The result is bit-exact: the mantissa is re-biased to 0.5 and scaled by 2^31,
/// and the shift is taken from the biased exponent field. Zero, negative,
/// subnormal and non-finite inputs produce an unspecified (but deterministic) pair.
pub fn quantize_multiplier(scale: f32) -> FixedPointMultiplier {
    let bits = bits_of(scale);
    let exponent = ((bits >> 23) & 0xff) as i32;
    let bumped = from_bits((bits & MANTISSA_MASK) | HALF_EXPONENT_BITS);
    let right_shift = 126i32.wrapping_sub(exponent);
    let multiplier = (bumped as f64 * (1i64 << 31) as f64).round() as i64;
    FixedPointMultiplier { multiplier: multiplier as i32, right_shift }
}

impl FixedPointMultiplier {
    /// Value this pair stands for, evaluated in f64.
    pub fn to_f64(&self) -> f64 {
        self.multiplier as f64 * 2f64.powi(-31) * 2f64.powf(-(self.right_shift as f64))
    }

    /// Scale an int32 accumulator by this multiplier using integer arithmetic only.
    ///
    /// Negative shifts become a saturating left shift before the high multiply.
    pub fn apply(&self, acc: i32) -> i32 {
        let left = if self.right_shift < 0 { self.right_shift.unsigned_abs().min(31) } else { 0 };
        let right = if self.right_shift > 0 { self.right_shift.unsigned_abs().min(31) } else { 0 };
        let shifted = saturating_shl(acc, left);
        rounding_divide_by_pot(saturating_rounding_doubling_high_mul(shifted, self.multiplier), right)
    }
}

#[inline]
fn saturating_shl(x: i32, s: u32) -> i32 {
    let wide = (x as i64) << s;
    wide.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// `round(a * b / 2^31)`, saturating the lone overflow `i32::MIN * i32::MIN`.
#[inline]
pub fn saturating_rounding_doubling_high_mul(a: i32, b: i32) -> i32 {
    if a == i32::MIN && b == i32::MIN {
        return i32::MAX;
    }
    let ab = a as i64 * b as i64;
    let nudge: i64 = if ab >= 0 { 1 << 30 } else { 1 - (1 << 30) };
    ((ab + nudge) / (1i64 << 31)) as i32
}

/// Divide by `2^exponent`, rounding half away from zero.
#[inline]
pub fn rounding_divide_by_pot(x: i32, exponent: u32) -> i32 {
    debug_assert!(exponent <= 31);
    if exponent == 0 {
        return x;
    }
    let mask = ((1i64 << exponent) - 1) as i32;
    let remainder = x & mask;
    let threshold = (mask >> 1) + if x < 0 { 1 } else { 0 };
    (x >> exponent) + if remainder > threshold { 1 } else { 0 }
}

/// Right shift with round-half-to-even, the rounding the accelerator applies on writeback.
/// A negative shift is a left shift.
#[inline]
pub fn rounding_right_shift(x: i32, shift: i32) -> i32 {
    if shift <= 0 {
        return x.wrapping_shl(shift.unsigned_abs());
    }
    if shift >= 32 {
        return 0;
    }
    let s = shift as u32;
    let truncated = x >> s;
    let half_bit = (x >> (s - 1)) & 1;
    let below_half = if s <= 1 { 0 } else { x & ((1i32 << (s - 1)) - 1) };
    let round_up = half_bit & ((below_half != 0) as i32 | (truncated & 1));
    truncated + round_up
}

/// Requantize an accumulator to u8 around `offset` (the output zero point).
#[inline]
pub fn requantize_u8(acc: i32, m: FixedPointMultiplier, offset: i32) -> u8 {
    m.apply(acc).saturating_add(offset).clamp(u8::MIN as i32, u8::MAX as i32) as u8
}

/// Requantize an accumulator to i8 around `offset`.
#[inline]
pub fn requantize_i8(acc: i32, m: FixedPointMultiplier, offset: i32) -> i8 {
    m.apply(acc).saturating_add(offset).clamp(i8::MIN as i32, i8::MAX as i32) as i8
}

#[inline]
pub fn saturate_i8(x: i32) -> i8 { x.clamp(i8::MIN as i32, i8::MAX as i32) as i8 }
