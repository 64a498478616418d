//! Public facade (spec.md §6, C11): `configure` + `produce` contract.

use crate::callsign::{base37, call_sign_glyphs};
use crate::config::{mode_params, ChannelSelect, SampleRate, PAYLOAD_BYTES};
use crate::error::{CofdmError, Result};
use crate::frame::{Frame, StepOutcome};
use crate::pcm::PcmEmitter;
use crate::polar;
use crate::scrambler::Xorshift32;
use rustfft::num_complex::Complex32;
use tracing::debug;

/// One encoder instance per sample rate (spec.md §9: "enum of
/// rate-specialized encoders"). Owns every scratch buffer it needs up
/// front; `produce` never allocates.
pub struct Encoder {
    rate: SampleRate,
    frame: Frame,
    pcm: PcmEmitter,
    cons: Vec<Complex32>,
    configured: bool,
}

impl Encoder {
    pub fn new(rate_hz: u32) -> Result<Self> {
        let rate = SampleRate::from_hz(rate_hz)?;
        Ok(Self {
            rate,
            frame: Frame::new(rate),
            pcm: PcmEmitter::new(rate.guard_length()),
            cons: Vec::new(),
            configured: false,
        })
    }

    pub fn rate(&self) -> u32 {
        self.rate.hz()
    }

    /// Prepares one transmission: whitens and polar-encodes `payload`
    /// (ignored when `operation_mode == 0`), resets the frame-assembler
    /// state machine, and zeros the overlap-add guard tail.
    pub fn configure(
        &mut self,
        payload: &[u8],
        call_sign: &str,
        operation_mode: i32,
        carrier_frequency_hz: i32,
        fancy_header: bool,
    ) -> Result<()> {
        let params = mode_params(operation_mode)?;
        if params.is_some() && payload.len() != PAYLOAD_BYTES {
            return Err(CofdmError::BufferTooSmall { needed: PAYLOAD_BYTES, got: payload.len() });
        }

        let carrier_offset = self.rate.carrier_offset(carrier_frequency_hz);
        let meta_data = (base37(call_sign).wrapping_shl(8)) | (operation_mode as u64 & 0xFF);
        let call_glyphs = call_sign_glyphs(call_sign)?;

        self.cons.clear();
        if let Some(p) = params.as_ref() {
            let mut whitened = payload.to_vec();
            Xorshift32::new().scramble(&mut whitened);
            self.cons = vec![Complex32::new(0.0, 0.0); p.cons_bits / p.mod_bits];
            polar::encode(&mut self.cons, &whitened, p);
        }

        self.frame.configure(carrier_offset, meta_data, call_glyphs, fancy_header, params.as_ref());
        self.pcm.reset();
        self.configured = true;
        debug!(operation_mode, carrier_frequency_hz, fancy_header, "encoder configured");
        Ok(())
    }

    /// Emits one OFDM symbol's worth of PCM into `audio`. Returns `Ok(true)`
    /// while more symbols remain, `Ok(false)` once the transmission is
    /// complete. `audio` must hold at least `extended_length * channels`
    /// samples.
    pub fn produce(&mut self, audio: &mut [i16], channel_select: ChannelSelect) -> Result<bool> {
        if !self.configured {
            return Err(CofdmError::NotConfigured);
        }
        let needed = self.rate.extended_length() * channel_select.channels();
        if audio.len() < needed {
            return Err(CofdmError::BufferTooSmall { needed, got: audio.len() });
        }
        match self.frame.advance(&self.cons) {
            StepOutcome::Symbol => {
                self.pcm.emit(audio, self.frame.temp(), channel_select);
                Ok(true)
            }
            StepOutcome::Done => Ok(false),
        }
    }
}
