//! Complex FFT/IFFT wrapper for OFDM modulation (spec.md §4.5, C7).
//!
//! `rustfft` plans are expensive to build and cheap to reuse, so each
//! `Fft` instance owns a forward and inverse plan sized to one symbol's
//! carrier count (`N`) and is built once per `Encoder::configure` call.
//! Neither plan normalizes; callers apply the `1/sqrt(8N)` OFDM scale
//! themselves (spec.md §4.5 step 3) since that scale is shared with the
//! guard-interval energy normalization done downstream.

use rustfft::{num_complex::Complex32, Fft as _, FftPlanner};
use std::sync::Arc;

pub struct Fft {
    n: usize,
    forward: Arc<dyn rustfft::Fft<f32>>,
    inverse: Arc<dyn rustfft::Fft<f32>>,
}

impl Fft {
    pub fn new(n: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            n,
            forward: planner.plan_fft_forward(n),
            inverse: planner.plan_fft_inverse(n),
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn forward(&self, buf: &mut [Complex32]) {
        debug_assert_eq!(buf.len(), self.n);
        self.forward.process(buf);
    }

    pub fn inverse(&self, buf: &mut [Complex32]) {
        debug_assert_eq!(buf.len(), self.n);
        self.inverse.process(buf);
    }
}
