//! Signal-generation core for COFDMTV, a coded OFDM physical-layer
//! transmitter carrying a fixed-size payload over a plain audio channel.
//!
//! Forward error correction (polar + BCH + CRC), PSK constellation mapping,
//! OFDM symbol assembly, differential pilot encoding, Schmidl-Cox
//! synchronization, PAPR reduction, cyclic-prefix guard insertion, and PCM
//! quantization all live here. No audio I/O, no networking, no decoder —
//! this crate only produces samples.

pub mod bch;
pub mod callsign;
pub mod config;
pub mod crc;
pub mod encoder;
pub mod error;
pub mod fft;
pub mod frame;
pub mod mls;
pub mod papr;
pub mod pcm;
pub mod polar;
pub mod psk;
pub mod scrambler;
pub mod tables;

pub use config::{ChannelSelect, ModeParams, SampleRate, DATA_BITS, PAYLOAD_BYTES};
pub use encoder::Encoder;
pub use error::{CofdmError, Result};
