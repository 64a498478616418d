//! Systematic polar encoder with frozen-bit shortening (spec.md §4.3, C5).

use crate::config::{ModeParams, CODE_BLOCK, CRC32_BITS, CRC_BITS, DATA_BITS};
use crate::crc::crc32_payload;
use crate::psk::map_symbol;
use crate::tables::{frozen_set, FrozenSet};
use rustfft::num_complex::Complex32;

/// In-place Arikan polar transform (`x = u * G_N`, natural bit order,
/// `G_N = F^(x)n` with `F = [[1,0],[1,1]]`) on `{+1,-1}`-valued (NRZ) soft
/// bits: XOR becomes multiplication. Iterative butterfly, `N log N`.
fn polar_transform(x: &mut [i8]) {
    let n = x.len();
    let mut step = 1;
    while step < n {
        let mut base = 0;
        while base < n {
            for k in 0..step {
                x[base + k] *= x[base + k + step];
            }
            base += 2 * step;
        }
        step *= 2;
    }
}

/// Two-pass Arikan systematic encoding: the first transform carries the
/// message into the codeword, the second re-derives a frozen-consistent
/// source vector whose image under the transform reproduces the message
/// verbatim at the information positions (spec.md §4.3, §8 property 6).
fn systematic_encode(message: &[i8], frozen: &FrozenSet) -> Vec<i8> {
    let mut v1 = vec![1i8; CODE_BLOCK];
    let mut msg_idx = 0;
    for i in 0..CODE_BLOCK {
        if !frozen.is_frozen(i) {
            v1[i] = message[msg_idx];
            msg_idx += 1;
        }
    }
    polar_transform(&mut v1);

    let mut v2 = v1;
    for i in 0..CODE_BLOCK {
        if frozen.is_frozen(i) {
            v2[i] = 1;
        }
    }
    polar_transform(&mut v2);
    v2
}

/// Shortens `code` to `cons_bits`: keep a position if it is frozen, or if
/// it is one of the first `crc_bits` non-frozen positions in index order
/// (spec.md §4.3 step 4, §9 "Shortening semantics").
fn shorten(code: &[i8], frozen: &FrozenSet, cons_bits: usize) -> Vec<i8> {
    let mut out = Vec::with_capacity(cons_bits);
    let mut non_frozen_seen = 0usize;
    for (i, &bit) in code.iter().enumerate() {
        let keep = frozen.is_frozen(i) || non_frozen_seen < CRC_BITS;
        if !frozen.is_frozen(i) {
            non_frozen_seen += 1;
        }
        if keep {
            out.push(bit);
        }
    }
    debug_assert_eq!(out.len(), cons_bits);
    out
}

/// Converts a payload byte (LSB-first within the byte, spec.md §4.3 step 1)
/// plus its CRC-32 into `{+1,-1}` soft message bits, pads the tail with
/// `+1` (all-zero info tail), polar-encodes, shortens, and PSK-maps the
/// result into `cons`. Mirrors the reference `Polar::operator()`. `params`
/// is the already-resolved mode table entry for the active operation mode
/// (there is no payload encoding for mode 0).
pub fn encode(cons: &mut [Complex32], payload: &[u8], params: &ModeParams) {
    debug_assert_eq!(payload.len(), DATA_BITS / 8);

    let mut mesg = vec![1i8; params.mesg_bits];
    for i in 0..DATA_BITS {
        let byte = payload[i / 8];
        let bit = (byte >> (i % 8)) & 1 != 0;
        mesg[i] = if bit { -1 } else { 1 };
    }
    let crc = crc32_payload(payload);
    for i in 0..CRC32_BITS {
        let bit = (crc >> i) & 1 != 0;
        mesg[i + DATA_BITS] = if bit { -1 } else { 1 };
    }
    // mesg[crc_bits..mesg_bits) already initialized to +1 (all-zero tail).

    let frozen = frozen_set(params.frozen_family);
    let code = systematic_encode(&mesg, frozen);
    let shortened = shorten(&code, frozen, params.cons_bits);

    let cons_cnt = params.cons_bits / params.mod_bits;
    debug_assert_eq!(cons.len(), cons_cnt);
    for (i, slot) in cons.iter_mut().enumerate() {
        let bits = &shortened[params.mod_bits * i..params.mod_bits * i + params.mod_bits];
        *slot = map_symbol(bits, params.mod_bits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::FrozenFamily;

    #[test]
    fn transform_length_2_matches_xor_truth_table() {
        // u0,u1 -> (u0 xor u1, u1); NRZ(0)=+1, NRZ(1)=-1 so xor is product.
        let mut x = [1i8, 1i8]; // 0,0 -> xor 0 -> +1
        polar_transform(&mut x);
        assert_eq!(x, [1, 1]);

        let mut x = [1i8, -1i8]; // 0,1 -> xor 1 -> -1
        polar_transform(&mut x);
        assert_eq!(x, [-1, -1]);

        let mut x = [-1i8, -1i8]; // 1,1 -> xor 0 -> +1
        polar_transform(&mut x);
        assert_eq!(x, [1, -1]);
    }

    #[test]
    fn transform_length_4_matches_hand_computed_generator() {
        // u = (1,1,0,1) in bits -> NRZ (-1,-1,1,-1)
        let mut x = [-1i8, -1i8, 1i8, -1i8];
        polar_transform(&mut x);
        // x0 = u0^u1^u2^u3 = 1^1^0^1 = 1 -> NRZ -1
        // x1 = u1^u3 = 1^1 = 0 -> NRZ +1
        // x2 = u2^u3 = 0^1 = 1 -> NRZ -1
        // x3 = u3 = 1 -> NRZ -1
        assert_eq!(x, [-1, 1, -1, -1]);
    }

    #[test]
    fn systematic_property_holds() {
        // Info positions of the codeword must reproduce the message verbatim.
        use crate::config::CODE_BLOCK;
        let frozen = frozen_set(FrozenFamily::A);
        let message: Vec<i8> =
            (0..frozen.info_count()).map(|i| if i % 2 == 0 { 1 } else { -1 }).collect();
        let code = systematic_encode(&message, frozen);
        let mut info_positions = Vec::new();
        for i in 0..CODE_BLOCK {
            if !frozen.is_frozen(i) {
                info_positions.push(i);
            }
        }
        for (k, &pos) in info_positions.iter().enumerate() {
            assert_eq!(code[pos], message[k], "mismatch at info position {pos}");
        }
    }

    #[test]
    fn shorten_keeps_requested_length() {
        let frozen = frozen_set(FrozenFamily::A);
        let message = vec![1i8; frozen.info_count()];
        let code = systematic_encode(&message, frozen);
        let shortened = shorten(&code, frozen, 64800);
        assert_eq!(shortened.len(), 64800);
    }
}
