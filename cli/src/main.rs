use clap::Parser;
use cofdmtv_core::{ChannelSelect, Encoder, SampleRate, PAYLOAD_BYTES};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

/// COFDMTV transmitter demo host: reads a payload file (or pads/truncates
/// one to the fixed frame size), drives the encoder to completion, and
/// writes the resulting PCM stream to a WAV file.
#[derive(Parser)]
#[command(name = "cofdmtv")]
#[command(about = "COFDMTV OFDM transmitter demo: payload + call sign -> WAV")]
#[command(version)]
struct Cli {
    /// Input payload file. Shorter files are zero-padded, longer ones
    /// truncated to the fixed frame size (5380 bytes). Ignored for mode 0.
    #[arg(value_name = "PAYLOAD")]
    payload: Option<PathBuf>,

    /// Output WAV file.
    #[arg(value_name = "OUTPUT.WAV")]
    output: PathBuf,

    /// Up to 9 characters, [A-Za-z0-9 ].
    #[arg(short, long, default_value = "CQ CQ CQ")]
    call_sign: String,

    /// Operation mode: 0 (silence only) or 6-13.
    #[arg(short, long, default_value_t = 8)]
    mode: i32,

    /// Carrier frequency in Hz.
    #[arg(long, default_value_t = 1500)]
    carrier: i32,

    /// Sample rate in Hz: 8000, 16000, 32000, 44100, or 48000.
    #[arg(short, long, default_value_t = 8000)]
    rate: u32,

    /// Prepend the 11-row call-sign "image" header.
    #[arg(long)]
    fancy_header: bool,

    /// Channel layout: mono, real-left, real-right, or analytic.
    #[arg(long, default_value = "mono")]
    channel: String,
}

fn parse_channel(s: &str) -> Result<ChannelSelect, String> {
    match s {
        "mono" => Ok(ChannelSelect::Mono),
        "real-left" => Ok(ChannelSelect::RealLeft),
        "real-right" => Ok(ChannelSelect::RealRight),
        "analytic" => Ok(ChannelSelect::Analytic),
        other => Err(format!("unknown channel layout: {other}")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let channel = parse_channel(&cli.channel)?;

    let payload = match &cli.payload {
        Some(path) if cli.mode != 0 => {
            let mut bytes = std::fs::read(path)?;
            bytes.resize(PAYLOAD_BYTES, 0);
            bytes
        }
        _ => vec![0u8; PAYLOAD_BYTES],
    };

    let mut encoder = Encoder::new(cli.rate)?;
    encoder.configure(&payload, &cli.call_sign, cli.mode, cli.carrier, cli.fancy_header)?;
    info!(rate = encoder.rate(), mode = cli.mode, "transmitting");

    let spec = WavSpec {
        channels: channel.channels() as u16,
        sample_rate: encoder.rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::new(File::create(&cli.output)?, spec)?;

    let extended_length = SampleRate::from_hz(cli.rate)?.extended_length();
    let mut audio = vec![0i16; extended_length * channel.channels()];
    let mut symbols = 0usize;
    while encoder.produce(&mut audio, channel)? {
        for &sample in &audio {
            writer.write_sample(sample)?;
        }
        symbols += 1;
    }
    writer.finalize()?;
    info!(symbols, output = %cli.output.display(), "transmission complete");
    Ok(())
}
