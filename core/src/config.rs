//! Sample-rate geometry and per-mode FEC/modulation parameters.
//!
//! Mirrors the per-mode table in the COFDMTV format: each `operation_mode`
//! fixes a payload carrier count, symbol count, modulation order and polar
//! code family. Geometry (`N`, guard length) is keyed by sample rate instead
//! of a C++ template parameter, following a small enum of concrete variants.

use crate::error::{CofdmError, Result};
use crate::tables::FrozenFamily;

/// Supported audio sample rates, one variant per template specialization in
/// the reference design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRate {
    Hz8000,
    Hz16000,
    Hz32000,
    Hz44100,
    Hz48000,
}

impl SampleRate {
    pub fn from_hz(hz: u32) -> Result<Self> {
        match hz {
            8000 => Ok(Self::Hz8000),
            16000 => Ok(Self::Hz16000),
            32000 => Ok(Self::Hz32000),
            44100 => Ok(Self::Hz44100),
            48000 => Ok(Self::Hz48000),
            other => Err(CofdmError::UnsupportedSampleRate(other)),
        }
    }

    pub fn hz(self) -> u32 {
        match self {
            Self::Hz8000 => 8000,
            Self::Hz16000 => 16000,
            Self::Hz32000 => 32000,
            Self::Hz44100 => 44100,
            Self::Hz48000 => 48000,
        }
    }

    /// `symbol_length N = floor(1280 * sample_rate / 8000)`.
    pub fn symbol_length(self) -> usize {
        match self {
            Self::Hz8000 => 1280,
            Self::Hz16000 => 2560,
            Self::Hz32000 => 5120,
            Self::Hz44100 => 7056,
            Self::Hz48000 => 7680,
        }
    }

    pub fn guard_length(self) -> usize {
        self.symbol_length() / 8
    }

    pub fn extended_length(self) -> usize {
        self.symbol_length() + self.guard_length()
    }

    /// PAPR reduction is only run at or below 16 kHz (4 iterations); the
    /// reference implementation skips it entirely above that rate.
    pub fn papr_iterations(self) -> usize {
        if self.hz() <= 16000 {
            4
        } else {
            0
        }
    }

    pub fn carrier_offset(self, carrier_frequency_hz: i32) -> i32 {
        (carrier_frequency_hz as i64 * self.symbol_length() as i64 / self.hz() as i64) as i32
    }
}

/// Per-mode parameters from spec.md §3. `operation_mode == 0` means
/// "silence only" and carries no payload parameters.
#[derive(Debug, Clone, Copy)]
pub struct ModeParams {
    pub pay_car_cnt: usize,
    pub symbol_count: usize,
    pub mod_bits: usize,
    pub cons_bits: usize,
    pub mesg_bits: usize,
    pub frozen_family: FrozenFamily,
}

pub const DATA_BITS: usize = 43040;
pub const CRC32_BITS: usize = 32;
/// Number of non-frozen (information) positions every frozen-bit table
/// carries: the payload bits plus the appended CRC-32.
pub const CRC_BITS: usize = DATA_BITS + CRC32_BITS; // 43072
pub const CODE_ORDER: u32 = 16; // K = 2^16 = 65536
pub const CODE_BLOCK: usize = 1 << CODE_ORDER;
pub const PAYLOAD_BYTES: usize = DATA_BITS / 8; // 5380

/// Looks up the mode table. `operation_mode == 0` is valid and returns
/// `None` (silence-only transmission, spec.md §4.9).
pub fn mode_params(operation_mode: i32) -> Result<Option<ModeParams>> {
    let params = match operation_mode {
        0 => return Ok(None),
        6 => ModeParams { pay_car_cnt: 432, symbol_count: 50, mod_bits: 3, cons_bits: 64800, mesg_bits: 43808, frozen_family: FrozenFamily::A },
        7 => ModeParams { pay_car_cnt: 400, symbol_count: 54, mod_bits: 3, cons_bits: 64800, mesg_bits: 43808, frozen_family: FrozenFamily::A },
        8 => ModeParams { pay_car_cnt: 400, symbol_count: 81, mod_bits: 2, cons_bits: 64800, mesg_bits: 43808, frozen_family: FrozenFamily::A },
        9 => ModeParams { pay_car_cnt: 360, symbol_count: 90, mod_bits: 2, cons_bits: 64800, mesg_bits: 43808, frozen_family: FrozenFamily::A },
        10 => ModeParams { pay_car_cnt: 512, symbol_count: 42, mod_bits: 3, cons_bits: 64512, mesg_bits: 44096, frozen_family: FrozenFamily::B },
        11 => ModeParams { pay_car_cnt: 384, symbol_count: 56, mod_bits: 3, cons_bits: 64512, mesg_bits: 44096, frozen_family: FrozenFamily::B },
        12 => ModeParams { pay_car_cnt: 384, symbol_count: 84, mod_bits: 2, cons_bits: 64512, mesg_bits: 44096, frozen_family: FrozenFamily::B },
        13 => ModeParams { pay_car_cnt: 256, symbol_count: 126, mod_bits: 2, cons_bits: 64512, mesg_bits: 44096, frozen_family: FrozenFamily::B },
        other => return Err(CofdmError::InvalidOperationMode(other)),
    };
    Ok(Some(params))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSelect {
    /// Real on left, silence on right.
    RealLeft,
    /// Real on right, silence on left.
    RealRight,
    /// Analytic stereo: real on left, imaginary on right.
    Analytic,
    /// Single-channel mono (real only).
    Mono,
}

impl ChannelSelect {
    pub fn from_raw(value: i32) -> Self {
        match value {
            1 => Self::RealLeft,
            2 => Self::RealRight,
            4 => Self::Analytic,
            _ => Self::Mono,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::Mono => 1,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_matches_table() {
        assert_eq!(SampleRate::Hz8000.symbol_length(), 1280);
        assert_eq!(SampleRate::Hz8000.guard_length(), 160);
        assert_eq!(SampleRate::Hz16000.symbol_length(), 2560);
        assert_eq!(SampleRate::Hz16000.guard_length(), 320);
        assert_eq!(SampleRate::Hz32000.symbol_length(), 5120);
        assert_eq!(SampleRate::Hz32000.guard_length(), 640);
        assert_eq!(SampleRate::Hz44100.symbol_length(), 7056);
        assert_eq!(SampleRate::Hz44100.guard_length(), 882);
        assert_eq!(SampleRate::Hz48000.symbol_length(), 7680);
        assert_eq!(SampleRate::Hz48000.guard_length(), 960);
    }

    #[test]
    fn rejects_unsupported_rate() {
        assert!(SampleRate::from_hz(11025).is_err());
    }

    #[test]
    fn mode_zero_is_silence_only() {
        assert!(mode_params(0).unwrap().is_none());
    }

    #[test]
    fn mode_out_of_range_is_rejected() {
        assert!(mode_params(5).is_err());
        assert!(mode_params(14).is_err());
    }

    #[test]
    fn mode_table_matches_spec() {
        let p = mode_params(13).unwrap().unwrap();
        assert_eq!(p.pay_car_cnt, 256);
        assert_eq!(p.symbol_count, 126);
        assert_eq!(p.mod_bits, 2);
        assert_eq!(p.cons_bits, 64512);
    }

    #[test]
    fn papr_runs_only_at_low_rates() {
        assert_eq!(SampleRate::Hz8000.papr_iterations(), 4);
        assert_eq!(SampleRate::Hz16000.papr_iterations(), 4);
        assert_eq!(SampleRate::Hz32000.papr_iterations(), 0);
        assert_eq!(SampleRate::Hz44100.papr_iterations(), 0);
        assert_eq!(SampleRate::Hz48000.papr_iterations(), 0);
    }
}
