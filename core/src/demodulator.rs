//! Spectral bit decoding: band-pass filtering and per-slot variance comparison.

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner};

use crate::error::{Result, SrcWaveError};
use crate::{
    samples_for_ms, BAND_HALF_WIDTH_HZ, BIT_DURATION_MS, FRAME1_BITS, FRAME2_BITS,
    FRAME2_OFFSET_MS, HIGH_FREQ, LOW_FREQ, SEQUENCE_LEN,
};

/// Classify every bit slot of both frames, starting at the aligned signal
/// start, into the textual interchange sequence.
///
/// One forward transform covers the whole remaining capture. Each data tone
/// gets an ideal mask spanning 100 Hz to either side and an inverse transform
/// back to a real signal; a 30 ms slot reads as `'0'` when the low band
/// carries strictly more variance there, `'1'` otherwise. Frame 1 slots run
/// from offset zero, frame 2 slots from the one-second mark.
pub fn read_sequence(samples: &[f32], sample_rate: u32) -> Result<String> {
    let (low_band, high_band) = filtered_bands(samples, sample_rate)?;

    let bit_len = samples_for_ms(BIT_DURATION_MS, sample_rate);
    let mut sequence = String::with_capacity(SEQUENCE_LEN);

    for slot in 0..FRAME1_BITS {
        sequence.push(classify_slot(&low_band, &high_band, slot * bit_len, bit_len));
    }
    sequence.push(' ');
    let frame2_start = samples_for_ms(FRAME2_OFFSET_MS, sample_rate);
    for slot in 0..FRAME2_BITS {
        sequence.push(classify_slot(
            &low_band,
            &high_band,
            frame2_start + slot * bit_len,
            bit_len,
        ));
    }
    Ok(sequence)
}

/// Band-limit the capture around each data tone: one forward real FFT, one
/// masked inverse per tone. The spectrum is as large as the capture and is
/// dropped as soon as both bands exist.
fn filtered_bands(samples: &[f32], sample_rate: u32) -> Result<(Vec<f32>, Vec<f32>)> {
    let n = samples.len();
    if n == 0 {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut planner = RealFftPlanner::<f32>::new();
    let r2c = planner.plan_fft_forward(n);
    let c2r = planner.plan_fft_inverse(n);

    let mut input = samples.to_vec();
    let mut spectrum = r2c.make_output_vec();
    r2c.process(&mut input, &mut spectrum)
        .map_err(|e| SrcWaveError::FftError(format!("forward FFT failed: {e:?}")))?;
    drop(input);

    let bin_width = sample_rate as f32 / n as f32;
    let low_band = masked_inverse(c2r.as_ref(), &spectrum, LOW_FREQ, bin_width)?;
    let high_band = masked_inverse(c2r.as_ref(), &spectrum, HIGH_FREQ, bin_width)?;
    Ok((low_band, high_band))
}

/// Inverse-transform the spectrum with every bin outside `center` plus/minus
/// the pass half-width zeroed out.
fn masked_inverse(
    c2r: &dyn ComplexToReal<f32>,
    spectrum: &[Complex<f32>],
    center: f32,
    bin_width: f32,
) -> Result<Vec<f32>> {
    let mut band: Vec<Complex<f32>> = spectrum
        .iter()
        .enumerate()
        .map(|(i, &bin)| {
            let freq = i as f32 * bin_width;
            if (freq - center).abs() <= BAND_HALF_WIDTH_HZ {
                bin
            } else {
                Complex::new(0.0, 0.0)
            }
        })
        .collect();

    let n = c2r.len();
    let mut filtered = vec![0.0f32; n];
    c2r.process(&mut band, &mut filtered)
        .map_err(|e| SrcWaveError::FftError(format!("inverse FFT failed: {e:?}")))?;

    let scale = 1.0 / n as f32;
    for sample in &mut filtered {
        *sample *= scale;
    }
    Ok(filtered)
}

/// Slots that overrun the capture are truncated rather than rejected; an empty
/// slot has zero variance in both bands and reads as `'1'`. The frame codec is
/// what decides whether the resulting sequence is meaningful.
fn classify_slot(low_band: &[f32], high_band: &[f32], start: usize, len: usize) -> char {
    let lower = start.min(low_band.len());
    let upper = (start + len).min(low_band.len());
    if variance(&low_band[lower..upper]) > variance(&high_band[lower..upper]) {
        '0'
    } else {
        '1'
    }
}

/// Population variance.
fn variance(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f32;
    let mean = samples.iter().sum::<f32>() / n;
    samples.iter().map(|&x| (x - mean) * (x - mean)).sum::<f32>() / n
}
