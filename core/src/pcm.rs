//! Guard-interval overlap-add and PCM quantization (spec.md §4.10, C10).

use crate::config::ChannelSelect;
use rustfft::num_complex::Complex32;
use std::f32::consts::PI;

/// Owns the half-cosine overlap-add tail carried between symbols. A fresh
/// instance (or [`PcmEmitter::reset`]) starts with an all-zero tail, as
/// `configure` requires (spec.md §5: "`guard[]`, which `configure`
/// explicitly zeros").
pub struct PcmEmitter {
    guard: Vec<f32>,
    guard_im: Vec<f32>,
}

impl PcmEmitter {
    pub fn new(guard_length: usize) -> Self {
        Self { guard: vec![0.0; guard_length], guard_im: vec![0.0; guard_length] }
    }

    pub fn reset(&mut self) {
        self.guard.iter_mut().for_each(|v| *v = 0.0);
        self.guard_im.iter_mut().for_each(|v| *v = 0.0);
    }

    fn quantize(value: f32) -> i16 {
        (value * 32767.0).round().clamp(-32768.0, 32767.0) as i16
    }

    fn write_sample(audio: &mut [i16], channel: ChannelSelect, frame_index: usize, signal: Complex32) {
        match channel {
            ChannelSelect::RealLeft => {
                audio[2 * frame_index] = Self::quantize(signal.re);
                audio[2 * frame_index + 1] = 0;
            }
            ChannelSelect::RealRight => {
                audio[2 * frame_index] = 0;
                audio[2 * frame_index + 1] = Self::quantize(signal.re);
            }
            ChannelSelect::Analytic => {
                audio[2 * frame_index] = Self::quantize(signal.re);
                audio[2 * frame_index + 1] = Self::quantize(signal.im);
            }
            ChannelSelect::Mono => {
                audio[frame_index] = Self::quantize(signal.re);
            }
        }
    }

    /// Writes one OFDM symbol's worth of PCM (`extended_length` frames:
    /// guard + body) into `audio`, blending the previous symbol's saved
    /// tail with the current symbol's cyclic prefix.
    pub fn emit(&mut self, audio: &mut [i16], temp: &[Complex32], channel: ChannelSelect) {
        let guard_length = self.guard.len();
        let n = temp.len();
        for i in 0..guard_length {
            let x = i as f32 / (guard_length - 1) as f32;
            let y = 0.5 * (1.0 - (PI * x).cos());
            let prev = Complex32::new(self.guard[i], self.guard_im[i]);
            let cur = temp[i + n - guard_length];
            let blended = prev + (cur - prev) * y;
            Self::write_sample(audio, channel, i, blended);
        }
        for i in 0..guard_length {
            self.guard[i] = temp[i].re;
            self.guard_im[i] = temp[i].im;
        }
        for i in 0..n {
            Self::write_sample(audio, channel, i + guard_length, temp[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_channel_writes_real_part_only() {
        let mut emitter = PcmEmitter::new(4);
        let temp = vec![Complex32::new(0.5, 0.25); 8];
        let mut audio = vec![0i16; 12];
        emitter.emit(&mut audio, &temp, ChannelSelect::Mono);
        assert_eq!(audio[11], (0.5 * 32767.0).round() as i16);
    }

    #[test]
    fn analytic_channel_carries_imaginary_part_on_right() {
        let mut emitter = PcmEmitter::new(4);
        let temp = vec![Complex32::new(0.0, 1.0); 8];
        let mut audio = vec![0i16; 24];
        emitter.emit(&mut audio, &temp, ChannelSelect::Analytic);
        assert_eq!(audio[2 * 4 + 1], 32767);
    }

    #[test]
    fn guard_matches_leading_samples_after_emit() {
        let mut emitter = PcmEmitter::new(4);
        let temp: Vec<Complex32> = (0..8).map(|i| Complex32::new(i as f32 * 0.01, 0.0)).collect();
        let mut audio = vec![0i16; 12];
        emitter.emit(&mut audio, &temp, ChannelSelect::Mono);
        for i in 0..4 {
            assert_eq!(emitter.guard[i], temp[i].re);
        }
    }

    #[test]
    fn reset_zeroes_the_tail() {
        let mut emitter = PcmEmitter::new(4);
        emitter.guard[0] = 1.0;
        emitter.reset();
        assert!(emitter.guard.iter().all(|&v| v == 0.0));
    }
}
