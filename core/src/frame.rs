//! Frame assembler state machine (spec.md §4.8–§4.9, C9).
//!
//! Sequences symbol types (`count_down`) and builds each symbol's
//! frequency-domain content, then hands it to the shared FFT/PAPR pipeline.
//! Leaves the result in `temp[0..N)`; the caller (the public facade) passes
//! that buffer to the PCM emitter.

use crate::config::{ModeParams, SampleRate};
use crate::crc::crc16_header;
use crate::fft::Fft;
use crate::mls::{nrz, Mls, COR_SEQ_POLY, PRE_SEQ_POLY};
use crate::papr;
use crate::tables::base37_bitmap_row;
use rustfft::num_complex::Complex32;

const COR_SEQ_LEN: i32 = 127;
const COR_SEQ_OFF: i32 = 1 - COR_SEQ_LEN;
const PRE_SEQ_LEN: i32 = 255;
const PRE_SEQ_OFF: i32 = -(PRE_SEQ_LEN / 2);
const FANCY_OFF: i32 = -((8 * 9 * 3) / 2);
const PILOT_POLY: u32 = PRE_SEQ_POLY;

/// What a `produce` call just did, for the caller to decide how (or
/// whether) to emit PCM this step.
pub enum StepOutcome {
    /// A symbol was synthesized into `temp[0..n)`; keep calling `produce`.
    Symbol,
    /// The transmission is complete; nothing was written.
    Done,
}

pub struct Frame {
    n: usize,
    carrier_offset: i32,
    fft: Fft,

    freq: Vec<Complex32>,
    temp: Vec<Complex32>,
    prev: Vec<Complex32>,
    papr_mask: Vec<Option<bool>>,
    papr_iterations: usize,

    meta_data: u64,
    call_glyphs: [u8; 9],
    pay_car_cnt: usize,
    pay_car_off: i32,
    symbol_count: usize,

    count_down: i32,
    symbol_number: usize,
    fancy_line: usize,
}

impl Frame {
    pub fn new(rate: SampleRate) -> Self {
        let n = rate.symbol_length();
        Self {
            n,
            carrier_offset: 0,
            fft: Fft::new(n),
            freq: vec![Complex32::new(0.0, 0.0); n],
            temp: vec![Complex32::new(0.0, 0.0); n],
            prev: vec![Complex32::new(0.0, 0.0); 512],
            papr_mask: vec![None; n],
            papr_iterations: rate.papr_iterations(),
            meta_data: 0,
            call_glyphs: [0u8; 9],
            pay_car_cnt: 0,
            pay_car_off: 0,
            symbol_count: 0,
            count_down: 0,
            symbol_number: 0,
            fancy_line: 0,
        }
    }

    pub fn temp(&self) -> &[Complex32] {
        &self.temp
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Resets state for a new transmission (spec.md §4.9, §5 "a second
    /// `configure`... resets all frame-assembler state").
    #[allow(clippy::too_many_arguments)]
    pub fn configure(
        &mut self,
        carrier_offset: i32,
        meta_data: u64,
        call_glyphs: [u8; 9],
        fancy_header: bool,
        mode_params: Option<&ModeParams>,
    ) {
        self.carrier_offset = carrier_offset;
        self.meta_data = meta_data;
        self.call_glyphs = call_glyphs;
        match mode_params {
            Some(p) => {
                self.pay_car_cnt = p.pay_car_cnt;
                self.pay_car_off = -((p.pay_car_cnt / 2) as i32);
                self.symbol_count = p.symbol_count;
            }
            None => {
                self.pay_car_cnt = 0;
                self.pay_car_off = 0;
                self.symbol_count = 0;
            }
        }
        self.symbol_number = 0;
        self.fancy_line = 0;
        self.count_down = 6 + fancy_header as i32;
    }

    fn bin(&self, carrier: i32) -> usize {
        (carrier + self.carrier_offset).rem_euclid(self.n as i32) as usize
    }

    fn transform(&mut self, papr_reduction: bool) {
        if papr_reduction && self.papr_iterations > 0 {
            for slot in self.papr_mask.iter_mut() {
                *slot = None;
            }
            for (i, v) in self.freq.iter().enumerate() {
                if v.norm_sqr() > 0.0 {
                    self.papr_mask[i] = Some(false);
                }
            }
            papr::reduce(&mut self.freq, &self.fft, &self.papr_mask, self.papr_iterations);
        }
        self.temp.copy_from_slice(&self.freq);
        self.fft.inverse(&mut self.temp);
        let scale = 1.0 / (8.0 * self.n as f32).sqrt();
        for v in self.temp.iter_mut() {
            *v *= scale;
        }
    }

    fn schmidl_cox(&mut self) {
        let mut seq = Mls::new(COR_SEQ_POLY);
        let factor = (2.0 * self.n as f32 / COR_SEQ_LEN as f32).sqrt();
        self.freq.iter_mut().for_each(|v| *v = Complex32::new(0.0, 0.0));
        let seed_bin = self.bin(COR_SEQ_OFF - 2);
        self.freq[seed_bin] = Complex32::new(factor, 0.0);
        for i in 0..COR_SEQ_LEN {
            let b = self.bin(2 * i + COR_SEQ_OFF);
            self.freq[b] = Complex32::new(nrz(seq.next_bit()), 0.0);
        }
        for i in 0..COR_SEQ_LEN {
            let cur = self.bin(2 * i + COR_SEQ_OFF);
            let prev = self.bin(2 * (i - 1) + COR_SEQ_OFF);
            self.freq[cur] *= self.freq[prev];
        }
        self.transform(false);
    }

    fn preamble(&mut self) {
        let mut message = [false; crate::bch::MESSAGE_BITS];
        for i in 0..55 {
            message[i] = (self.meta_data >> i) & 1 != 0;
        }
        let cs = crc16_header(self.meta_data);
        for i in 0..16 {
            message[i + 55] = (cs >> i) & 1 != 0;
        }
        let bch = crate::bch::Bch::new();
        let parity = bch.encode(&message);

        let mut seq = Mls::new(PRE_SEQ_POLY);
        let factor = (self.n as f32 / PRE_SEQ_LEN as f32).sqrt();
        self.freq.iter_mut().for_each(|v| *v = Complex32::new(0.0, 0.0));
        let seed_bin = self.bin(PRE_SEQ_OFF - 1);
        self.freq[seed_bin] = Complex32::new(factor, 0.0);
        for i in 0..71i32 {
            let b = self.bin(i + PRE_SEQ_OFF);
            self.freq[b] = Complex32::new(nrz(message[i as usize]), 0.0);
        }
        for i in 71..PRE_SEQ_LEN {
            let b = self.bin(i + PRE_SEQ_OFF);
            self.freq[b] = Complex32::new(nrz(parity[(i - 71) as usize]), 0.0);
        }
        for i in 0..PRE_SEQ_LEN {
            let cur = self.bin(i + PRE_SEQ_OFF);
            let prev = self.bin(i - 1 + PRE_SEQ_OFF);
            self.freq[cur] *= self.freq[prev];
        }
        for i in 0..PRE_SEQ_LEN {
            let cur = self.bin(i + PRE_SEQ_OFF);
            self.freq[cur] *= nrz(seq.next_bit());
        }
        self.transform(true);
    }

    fn fancy_symbol(&mut self) {
        let row = (10 - self.fancy_line) as u8;
        let mut active_carriers: u32 = 1;
        for &glyph in self.call_glyphs.iter() {
            let bits = base37_bitmap_row(glyph, row);
            active_carriers += bits.count_ones();
        }
        let mut seq = Mls::new(PILOT_POLY);
        let factor = (self.n as f32 / active_carriers as f32).sqrt();
        self.freq.iter_mut().for_each(|v| *v = Complex32::new(0.0, 0.0));
        for (j, &glyph) in self.call_glyphs.iter().enumerate() {
            let bits = base37_bitmap_row(glyph, row);
            for i in 0..8i32 {
                if bits & (1 << (7 - i)) != 0 {
                    let b = self.bin((8 * j as i32 + i) * 3 + FANCY_OFF);
                    self.freq[b] = Complex32::new(factor, 0.0) * nrz(seq.next_bit());
                }
            }
        }
        self.transform(false);
    }

    fn pilot_block(&mut self) {
        let mut seq = Mls::new(PILOT_POLY);
        let factor = (self.n as f32 / self.pay_car_cnt as f32).sqrt();
        self.freq.iter_mut().for_each(|v| *v = Complex32::new(0.0, 0.0));
        for i in 0..self.pay_car_cnt {
            let value = Complex32::new(factor, 0.0) * nrz(seq.next_bit());
            let b = self.bin(i as i32 + self.pay_car_off);
            self.freq[b] = value;
            self.prev[i] = value;
        }
        self.transform(true);
    }

    fn payload_symbol(&mut self, cons: &[Complex32]) {
        self.freq.iter_mut().for_each(|v| *v = Complex32::new(0.0, 0.0));
        for i in 0..self.pay_car_cnt {
            let updated = self.prev[i] * cons[self.pay_car_cnt * self.symbol_number + i];
            self.prev[i] = updated;
            let b = self.bin(i as i32 + self.pay_car_off);
            self.freq[b] = updated;
        }
        self.transform(true);
    }

    fn silence(&mut self) {
        self.temp.iter_mut().for_each(|v| *v = Complex32::new(0.0, 0.0));
    }

    /// Runs one step of the state machine (spec.md §4.9 table).
    pub fn advance(&mut self, cons: &[Complex32]) -> StepOutcome {
        match self.count_down {
            7 => {
                self.fancy_symbol();
                self.fancy_line += 1;
                if self.fancy_line == 11 {
                    self.count_down -= 1;
                }
                StepOutcome::Symbol
            }
            6 => {
                self.pilot_block();
                self.count_down -= 1;
                StepOutcome::Symbol
            }
            5 => {
                self.schmidl_cox();
                self.count_down -= 1;
                StepOutcome::Symbol
            }
            4 => {
                self.preamble();
                self.count_down -= 1;
                StepOutcome::Symbol
            }
            3 => {
                self.pilot_block();
                self.count_down -= 1;
                StepOutcome::Symbol
            }
            2 => {
                self.payload_symbol(cons);
                self.symbol_number += 1;
                if self.symbol_number >= self.symbol_count {
                    self.count_down -= 1;
                }
                StepOutcome::Symbol
            }
            1 => {
                self.silence();
                self.count_down -= 1;
                StepOutcome::Symbol
            }
            _ => StepOutcome::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_only_transmission_emits_six_symbols() {
        let mut frame = Frame::new(SampleRate::Hz8000);
        frame.configure(0, 0, [0u8; 9], false, None);
        let cons: Vec<Complex32> = Vec::new();
        let mut count = 0;
        loop {
            match frame.advance(&cons) {
                StepOutcome::Symbol => count += 1,
                StepOutcome::Done => break,
            }
        }
        assert_eq!(count, 6);
    }

    #[test]
    fn fancy_header_adds_eleven_symbols() {
        let mut frame = Frame::new(SampleRate::Hz8000);
        frame.configure(0, 0, [0u8; 9], true, None);
        let cons: Vec<Complex32> = Vec::new();
        let mut count = 0;
        loop {
            match frame.advance(&cons) {
                StepOutcome::Symbol => count += 1,
                StepOutcome::Done => break,
            }
        }
        assert_eq!(count, 17);
    }

    #[test]
    fn bin_wraps_negative_indices() {
        let frame = Frame::new(SampleRate::Hz8000);
        assert_eq!(frame.bin(-1), frame.n - 1);
    }
}
