use pretty_assertions::assert_eq;
use proptest::prelude::*;
use systolic_dispatch::quant::{
    bits_of, from_bits, quantize_multiplier, requantize_i8, requantize_u8, rounding_divide_by_pot,
    saturating_rounding_doubling_high_mul, FixedPointMultiplier,
};

#[test]
fn half_encodes_to_two_pow_30_without_shift() {
    assert_eq!(quantize_multiplier(0.5), FixedPointMultiplier { multiplier: 1 << 30, right_shift: 0 });
}

#[test]
fn pinned_reference_vectors() {
    // (bit pattern, multiplier, right_shift)
    let cases: [(u32, i32, i32); 8] = [
        (0x3f80_0000, 1_073_741_824, -1), // 1.0
        (0x3e80_0000, 1_073_741_824, 1),  // 0.25
        (0x3f40_0000, 1_610_612_736, 0),  // 0.75
        (0x3dcc_cccd, 1_717_986_944, 3),  // 0.1
        (0x3b80_8081, 1_077_952_640, 7),  // 1/255
        (0x4040_0000, 1_610_612_736, -2), // 3.0
        (0x3586_37bd, 1_125_899_904, 19), // 1e-6
        (0x3f7f_fffe, 2_147_483_392, 0),  // just below 1.0
    ];
    for (bits, multiplier, right_shift) in cases {
        let got = quantize_multiplier(from_bits(bits));
        assert_eq!(got, FixedPointMultiplier { multiplier, right_shift }, "bits {:#010x}", bits);
    }
}

#[test]
fn bit_cast_helpers_are_inverse() {
    for x in [0.5f32, 1.0, 0.1, 1e-30, 123456.78, -2.5] {
        assert_eq!(from_bits(bits_of(x)), x);
    }
    assert_eq!(bits_of(0.5), 0x3f00_0000);
}

#[test]
fn out_of_domain_inputs_do_not_panic() {
    for x in [0.0f32, -0.0, -1.0, f32::NAN, f32::INFINITY, f32::MIN_POSITIVE / 2.0] {
        let _ = quantize_multiplier(x);
    }
}

proptest! {
    #[test]
    fn multiplier_is_normalized(exp in 1u32..255, mantissa in 0u32..(1 << 23)) {
        let s = from_bits((exp << 23) | mantissa);
        let m = quantize_multiplier(s);
        prop_assert!(m.multiplier >= 1 << 30);
        prop_assert!((m.multiplier as i64) < (1i64 << 31));
    }

    #[test]
    fn round_trip_within_one_ulp(s in 1e-30f32..1e30) {
        let m = quantize_multiplier(s);
        let ulp = (from_bits(bits_of(s) + 1) - s) as f64;
        let err = (s as f64 - m.to_f64()).abs();
        prop_assert!(err <= ulp, "scale {} decoded {} err {} ulp {}", s, m.to_f64(), err, ulp);
    }
}

#[test]
fn apply_scales_accumulators() {
    assert_eq!(quantize_multiplier(0.5).apply(100), 50);
    assert_eq!(quantize_multiplier(0.25).apply(100), 25);
    assert_eq!(quantize_multiplier(3.0).apply(100), 300);
    assert_eq!(quantize_multiplier(0.1).apply(1000), 100);
    assert_eq!(quantize_multiplier(1.0).apply(-77), -77);
}

#[test]
fn doubling_high_mul_saturates_single_overflow() {
    assert_eq!(saturating_rounding_doubling_high_mul(i32::MIN, i32::MIN), i32::MAX);
    assert_eq!(saturating_rounding_doubling_high_mul(3, 1 << 30), 2);
    assert_eq!(saturating_rounding_doubling_high_mul(i32::MAX, 1 << 30), 1 << 30);
}

#[test]
fn divide_by_pot_rounds_half_away_from_zero() {
    assert_eq!(rounding_divide_by_pot(3, 1), 2);
    assert_eq!(rounding_divide_by_pot(-3, 1), -2);
    assert_eq!(rounding_divide_by_pot(5, 2), 1);
    assert_eq!(rounding_divide_by_pot(-5, 2), -1);
    assert_eq!(rounding_divide_by_pot(6, 2), 2);
    assert_eq!(rounding_divide_by_pot(42, 0), 42);
}

#[test]
fn requantize_adds_zero_point_and_saturates() {
    let m = quantize_multiplier(0.1);
    assert_eq!(requantize_u8(1000, m, 128), 228);
    assert_eq!(requantize_u8(5000, m, 128), 255);
    assert_eq!(requantize_u8(-5000, m, 128), 0);
    assert_eq!(requantize_i8(-5000, m, 0), -128);
    assert_eq!(requantize_i8(250, m, -3), 22);
}
