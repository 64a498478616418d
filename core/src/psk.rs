//! Bit-to-constellation PSK mapper (spec.md §4.4, C6).
//!
//! QPSK (2 bits/symbol) follows the formula spec.md gives verbatim. The
//! 8-PSK (3 bits/symbol) mapping is not pinned by spec.md beyond "Gray
//! coded"; this implementation locks one Gray-coded mapping (decode the 3
//! input bits as a Gray code word to a linear index, then place that index
//! at `angle = index * pi/4`) and documents it as the fixed choice
//! (SPEC_FULL.md §4.11).

use rustfft::num_complex::Complex32;
use std::f32::consts::{FRAC_1_SQRT_2, PI};

pub fn map_qpsk(b0: bool, b1: bool) -> Complex32 {
    let re = if b0 { -1.0 } else { 1.0 };
    let im = if b1 { -1.0 } else { 1.0 };
    Complex32::new(re * FRAC_1_SQRT_2, im * FRAC_1_SQRT_2)
}

pub fn map_8psk(b0: bool, b1: bool, b2: bool) -> Complex32 {
    let n0 = b0;
    let n1 = n0 ^ b1;
    let n2 = n1 ^ b2;
    let index = (n0 as u32) * 4 + (n1 as u32) * 2 + (n2 as u32);
    let angle = index as f32 * PI / 4.0;
    Complex32::new(angle.cos(), angle.sin())
}

/// Maps `mod_bits` (2 or 3) consecutive code bits, given as `1 - 2*bit`
/// soft values, to one unit-magnitude complex symbol.
pub fn map_symbol(bits: &[i8], mod_bits: usize) -> Complex32 {
    let as_bool = |v: i8| v < 0;
    match mod_bits {
        2 => map_qpsk(as_bool(bits[0]), as_bool(bits[1])),
        3 => map_8psk(as_bool(bits[0]), as_bool(bits[1]), as_bool(bits[2])),
        other => unreachable!("mode table only defines mod_bits 2 or 3, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn qpsk_is_unit_magnitude() {
        for b0 in [false, true] {
            for b1 in [false, true] {
                let s = map_qpsk(b0, b1);
                assert!(approx_eq(s.norm(), 1.0));
            }
        }
    }

    #[test]
    fn qpsk_signs_match_formula() {
        let s = map_qpsk(false, false);
        assert!(s.re > 0.0 && s.im > 0.0);
        let s = map_qpsk(true, true);
        assert!(s.re < 0.0 && s.im < 0.0);
    }

    #[test]
    fn psk8_is_unit_magnitude_and_gray_coded() {
        let mut seen = Vec::new();
        for b0 in [false, true] {
            for b1 in [false, true] {
                for b2 in [false, true] {
                    let s = map_8psk(b0, b1, b2);
                    assert!(approx_eq(s.norm(), 1.0));
                    seen.push(s);
                }
            }
        }
        assert_eq!(seen.len(), 8);
        // all 8 points distinct
        for i in 0..seen.len() {
            for j in (i + 1)..seen.len() {
                assert!((seen[i] - seen[j]).norm() > 1e-3);
            }
        }
    }
}
