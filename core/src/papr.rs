//! Iterative clipping PAPR reducer (spec.md §4.6, C8).
//!
//! Runs only for sample rates at or below 16 kHz, for
//! [`SampleRate::papr_iterations`](crate::config::SampleRate::papr_iterations)
//! rounds. Each round clips the time-domain crest factor and then restores
//! the frequency-domain bins the caller marks as meaningful: exactly, for
//! bins that must carry a known value (pilot bins), or by magnitude only
//! (letting the clip's phase perturbation stand), for data bins — all other
//! bins are forced back to zero. This leaves the buffer in the frequency
//! domain; the final inverse FFT and `1/sqrt(8N)` scale happen once, outside
//! this module, as the symbol constructor's last step (spec.md §4.8).

use crate::fft::Fft;
use rustfft::num_complex::Complex32;
use std::f32::consts::SQRT_2;

/// One entry per frequency bin: `None` means the bin is forced to zero on
/// every iteration, `Some(true)` means it is restored to its exact original
/// value (pilot bin), `Some(false)` means only its magnitude is restored
/// (payload data bin).
pub fn reduce(freq: &mut [Complex32], fft: &Fft, mask: &[Option<bool>], iterations: usize) {
    debug_assert_eq!(freq.len(), mask.len());
    let n = freq.len();
    if iterations == 0 {
        return;
    }
    let original: Vec<Complex32> = freq.to_vec();
    let mut time = vec![Complex32::new(0.0, 0.0); n];

    for _ in 0..iterations {
        time.copy_from_slice(freq);
        fft.inverse(&mut time);

        let mean_sq: f32 = time.iter().map(|s| s.norm_sqr()).sum::<f32>() / n as f32;
        let threshold = SQRT_2 * mean_sq.sqrt();
        for s in time.iter_mut() {
            let mag = s.norm();
            if mag > threshold && mag > 0.0 {
                *s *= threshold / mag;
            }
        }

        fft.forward(&mut time);
        let unscale = 1.0 / n as f32;
        for v in time.iter_mut() {
            *v *= unscale;
        }

        for i in 0..n {
            freq[i] = match mask[i] {
                None => Complex32::new(0.0, 0.0),
                Some(true) => original[i],
                Some(false) => {
                    let mag = time[i].norm();
                    if mag > 1e-12 {
                        time[i] * (original[i].norm() / mag)
                    } else {
                        original[i]
                    }
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_iterations_leaves_buffer_untouched() {
        let fft = Fft::new(8);
        let mut freq = vec![Complex32::new(1.0, 0.0); 8];
        let original = freq.clone();
        let mask = vec![Some(false); 8];
        reduce(&mut freq, &fft, &mask, 0);
        assert_eq!(freq, original);
    }

    #[test]
    fn masked_off_bins_are_zeroed() {
        let n = 16;
        let fft = Fft::new(n);
        let mut freq = vec![Complex32::new(0.0, 0.0); n];
        freq[3] = Complex32::new(2.0, 0.0);
        freq[5] = Complex32::new(0.0, 2.0);
        let mut mask = vec![None; n];
        mask[3] = Some(false);
        mask[5] = Some(true);
        reduce(&mut freq, &fft, &mask, 2);
        for (i, v) in freq.iter().enumerate() {
            if i != 3 && i != 5 {
                assert!(v.norm() < 1e-4, "bin {i} should be zeroed, got {v}");
            }
        }
    }

    #[test]
    fn exact_pilot_bins_are_restored_verbatim() {
        let n = 8;
        let fft = Fft::new(n);
        let mut freq = vec![Complex32::new(0.0, 0.0); n];
        freq[2] = Complex32::new(3.0, -1.0);
        let mut mask = vec![None; n];
        mask[2] = Some(true);
        reduce(&mut freq, &fft, &mask, 3);
        assert!((freq[2] - Complex32::new(3.0, -1.0)).norm() < 1e-3);
    }

    #[test]
    fn data_bins_keep_original_magnitude() {
        let n = 8;
        let fft = Fft::new(n);
        let mut freq = vec![Complex32::new(0.0, 0.0); n];
        freq[1] = Complex32::new(4.0, 0.0);
        let expected_mag = freq[1].norm();
        let mut mask = vec![None; n];
        mask[1] = Some(false);
        reduce(&mut freq, &fft, &mask, 4);
        assert!((freq[1].norm() - expected_mag).abs() < 1e-2);
    }
}
