//! Waveform synthesis for the SRC signal.

use std::f32::consts::PI;

use crate::framing::{Frame1, Frame2};
use crate::{
    samples_for_ms, BIT_DURATION_MS, FRAME2_OFFSET_MS, HIGH_FREQ, LOW_FREQ, SYNC_BEEP_COUNT,
    SYNC_DURATION_MS, SYNC_FREQ, SYNC_START_MS, TOTAL_SIGNAL_MS,
};

/// Amplitude-scaled cosine burst at `freq`, phase reset at the first sample.
pub(crate) fn tone(freq: f32, len: usize, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let period = 1.0 / sample_rate as f32;
    (0..len)
        .map(|n| amplitude * (2.0 * PI * freq * n as f32 * period).cos())
        .collect()
}

/// Render both frames plus the sync beeps into one fixed-length waveform.
///
/// Frame 1 fills the first 32 bit slots from sample zero, frame 2 starts one
/// second in, five 100 ms beeps run one per second from the two-second mark,
/// and a final beep overwrites the last 100 ms of the buffer. Tone phase
/// restarts at every slot; the receiver decides slots on band energy, not
/// phase.
pub fn generate_waveform(
    frame1: &Frame1,
    frame2: &Frame2,
    sample_rate: u32,
    amplitude: f32,
) -> Vec<f32> {
    let total = samples_for_ms(TOTAL_SIGNAL_MS, sample_rate);
    let mut waveform = vec![0.0f32; total];

    // One 30 ms segment per tone, copied slot by slot
    let bit_len = samples_for_ms(BIT_DURATION_MS, sample_rate);
    let low = tone(LOW_FREQ, bit_len, sample_rate, amplitude);
    let high = tone(HIGH_FREQ, bit_len, sample_rate, amplitude);

    for (i, &bit) in frame1.0.iter().enumerate() {
        let start = i * bit_len;
        waveform[start..start + bit_len].copy_from_slice(if bit { &high } else { &low });
    }

    let frame2_start = samples_for_ms(FRAME2_OFFSET_MS, sample_rate);
    for (i, &bit) in frame2.0.iter().enumerate() {
        let start = frame2_start + i * bit_len;
        waveform[start..start + bit_len].copy_from_slice(if bit { &high } else { &low });
    }

    let beep_len = samples_for_ms(SYNC_DURATION_MS, sample_rate);
    let beep = tone(SYNC_FREQ, beep_len, sample_rate, amplitude);
    let beeps_start = samples_for_ms(SYNC_START_MS, sample_rate);
    for i in 0..SYNC_BEEP_COUNT {
        let start = beeps_start + i * sample_rate as usize;
        waveform[start..start + beep_len].copy_from_slice(&beep);
    }

    // The last 100 ms always carry a beep, whatever was written there
    let tail = total - beep_len;
    waveform[tail..].copy_from_slice(&beep);

    waveform
}
