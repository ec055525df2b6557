//! Encoder/decoder for the SRC audio time code
//!
//! The SRC signal carries a time/date record as two-tone FSK: a 2.0 kHz tone
//! for 0 bits, a 2.5 kHz tone for 1 bits, 30 ms per bit. Two parity-protected
//! frames (32 and 16 bits) plus a series of 1 kHz sync beeps fill a fixed
//! 8.1 second waveform. The decoder locates the start of the frames inside a
//! noisy capture and classifies each bit slot by band-filtered variance.

pub mod decoder;
pub mod demodulator;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod modulator;
pub mod record;
pub mod sync;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Result, SrcWaveError};
pub use record::{LeapSecond, TimeRecord, Zone};

// Data and sync tone frequencies
pub const LOW_FREQ: f32 = 2000.0; // 0 bits
pub const HIGH_FREQ: f32 = 2500.0; // 1 bits
pub const SYNC_FREQ: f32 = 1000.0;

// Signal timing
pub const BIT_DURATION_MS: usize = 30;
pub const SYNC_DURATION_MS: usize = 100;
pub const TOTAL_SIGNAL_MS: usize = 8100;
pub const FRAME2_OFFSET_MS: usize = 1000;
pub const SYNC_START_MS: usize = 2000;
pub const SYNC_BEEP_COUNT: usize = 5;

// Frame widths and the textual interchange format: 32 bits, a space, 16 bits
pub const FRAME1_BITS: usize = 32;
pub const FRAME2_BITS: usize = 16;
pub const SEQUENCE_LEN: usize = FRAME1_BITS + 1 + FRAME2_BITS;

/// Half-width of the ideal band-pass masks around each data tone.
pub const BAND_HALF_WIDTH_HZ: f32 = 100.0;
/// Lead-in allowance added to a detected window start so the downstream slot
/// grid does not begin past the first bit.
pub const LEAD_IN_MS: usize = 10;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_AMPLITUDE: f32 = 1.0;

/// Number of samples spanning `ms` milliseconds at `sample_rate`.
pub const fn samples_for_ms(ms: usize, sample_rate: u32) -> usize {
    sample_rate as usize * ms / 1000
}
