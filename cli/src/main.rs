use std::fs::File;
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use hound::WavSpec;

use srcwave_core::sync::SpectralPeakLocator;
use srcwave_core::{
    framing, Decoder, Encoder, LeapSecond, TimeRecord, Zone, DEFAULT_SAMPLE_RATE,
};

#[derive(Parser)]
#[command(name = "srcwave")]
#[command(about = "Encode and decode the SRC audio time code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode the current time into a WAV audio file
    Encode {
        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Time zone label to transmit
        #[arg(long, value_enum, default_value = "cet")]
        zone: ZoneArg,

        /// Days until the next time zone change (0-6; omit for seven or more)
        #[arg(long, value_name = "DAYS")]
        tz_change: Option<u8>,

        /// Leap second warning to transmit
        #[arg(long, value_enum, default_value = "none")]
        leap_second: LeapArg,

        /// Output sample rate in Hz
        #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
        sample_rate: u32,

        /// Tone amplitude (above 1.0 clips in the WAV container)
        #[arg(long, default_value_t = 1.0)]
        amplitude: f32,
    },

    /// Decode a WAV capture and print the carried time record
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Capture starts exactly at the first bit; skip acquisition
        #[arg(long)]
        aligned: bool,

        /// Use the spectral-threshold acquisition strategy
        #[arg(long)]
        spectral_locator: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ZoneArg {
    Cet,
    Cest,
}

impl From<ZoneArg> for Zone {
    fn from(arg: ZoneArg) -> Self {
        match arg {
            ZoneArg::Cet => Zone::Cet,
            ZoneArg::Cest => Zone::Cest,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LeapArg {
    Advance,
    None,
    Delay,
}

impl From<LeapArg> for LeapSecond {
    fn from(arg: LeapArg) -> Self {
        match arg {
            LeapArg::Advance => LeapSecond::Advance,
            LeapArg::None => LeapSecond::None,
            LeapArg::Delay => LeapSecond::Delay,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            output,
            zone,
            tz_change,
            leap_second,
            sample_rate,
            amplitude,
        } => encode_command(
            &output,
            zone.into(),
            tz_change,
            leap_second.into(),
            sample_rate,
            amplitude,
        ),
        Commands::Decode {
            input,
            aligned,
            spectral_locator,
        } => decode_command(&input, aligned, spectral_locator),
    }
}

fn encode_command(
    output: &PathBuf,
    zone: Zone,
    tz_change: Option<u8>,
    leap_second: LeapSecond,
    sample_rate: u32,
    amplitude: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = TimeRecord::from_datetime(&Local::now(), zone, tz_change, leap_second);
    println!("{record}");

    let mut encoder = Encoder::new();
    encoder.set_sample_rate(sample_rate);
    encoder.set_amplitude(amplitude);
    let samples = encoder.encode(&record);
    println!("Encoded to {} audio samples", samples.len());

    // Mono 32-bit float, the transport format of the signal
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let file = File::create(output)?;
    let mut writer = hound::WavWriter::new(file, spec)?;
    for sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    println!("Wrote {}", output.display());
    Ok(())
}

fn decode_command(
    input: &PathBuf,
    aligned: bool,
    spectral_locator: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(input)?;
    let mut reader = hound::WavReader::new(file)?;

    let spec = reader.spec();
    println!(
        "Read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );
    if spec.channels != 1 {
        return Err(format!("expected a mono capture, got {} channels", spec.channels).into());
    }

    // Accept both 16-bit PCM and 32-bit float captures
    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => {
            let int_samples: Result<Vec<i16>, _> = reader.samples::<i16>().collect();
            int_samples?
                .into_iter()
                .map(|s| s as f32 / 32768.0)
                .collect()
        }
        (hound::SampleFormat::Float, 32) => {
            let float_samples: Result<Vec<f32>, _> = reader.samples::<f32>().collect();
            float_samples?
        }
        (_, bits) => {
            return Err(format!("unsupported sample format: {bits} bits").into());
        }
    };
    println!("Extracted {} samples", samples.len());

    let mut decoder = Decoder::new();
    decoder.set_sample_rate(spec.sample_rate);
    decoder.set_assume_aligned(aligned);
    if spectral_locator {
        decoder.set_locator(Box::new(SpectralPeakLocator));
    }

    let sequence = decoder.read_sequence(&samples)?;
    println!("Bit sequence: {sequence}");

    let record = framing::decode(&sequence)?;
    println!("{record}");
    Ok(())
}
