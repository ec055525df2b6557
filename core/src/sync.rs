//! Locating the start of the encoded frames inside an arbitrary capture.

use log::debug;
use realfft::RealFftPlanner;

use crate::error::{Result, SrcWaveError};
use crate::modulator::tone;
use crate::{samples_for_ms, BIT_DURATION_MS, HIGH_FREQ, LEAD_IN_MS, LOW_FREQ};

/// Smallest covariance accepted by the template detector, calibrated for
/// unit-amplitude float captures.
const MIN_COVARIANCE: f32 = 7e-4;
/// Detection threshold relative to the first-window noise baseline.
const BASELINE_FACTOR: f32 = 50.0;
/// Spectral detector threshold relative to the strongest data-tone bin of the
/// noise probe.
const NOISE_FACTOR: f32 = 1.412;

/// Strategy for finding the sample index of the first frame-1 bit.
pub trait SignalLocator {
    fn locate(&self, samples: &[f32], sample_rate: u32) -> Result<usize>;
}

/// Covariance of non-overlapping windows against a dual-tone template.
///
/// The template is one full low-tone slot followed by one full high-tone slot,
/// so detection does not depend on which tone the capture happens to open
/// with. The first window sets the noise-floor baseline; the first later
/// window whose covariance magnitude clears `max(50 x baseline, 7e-4)` wins.
/// Granularity is coarse (one slot pair); the reported offset includes a 10 ms
/// lead-in so the slot grid lands inside the first bit rather than past it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCorrelator;

impl SignalLocator for TemplateCorrelator {
    fn locate(&self, samples: &[f32], sample_rate: u32) -> Result<usize> {
        let bit_len = samples_for_ms(BIT_DURATION_MS, sample_rate);
        let window = bit_len * 2;
        if samples.len() < window {
            return Err(SrcWaveError::SignalNotFound);
        }

        let mut template = tone(LOW_FREQ, bit_len, sample_rate, 1.0);
        template.extend(tone(HIGH_FREQ, bit_len, sample_rate, 1.0));

        let mut baseline = None;
        for start in (0..samples.len() - window + 1).step_by(window) {
            let cov = covariance(&samples[start..start + window], &template).abs();
            match baseline {
                None => baseline = Some(cov),
                Some(noise) => {
                    let threshold = (BASELINE_FACTOR * noise).max(MIN_COVARIANCE);
                    if cov > threshold {
                        let offset = start + samples_for_ms(LEAD_IN_MS, sample_rate);
                        debug!(
                            "template match at sample {start} (covariance {cov:.3e}, \
                             threshold {threshold:.3e})"
                        );
                        return Ok(offset);
                    }
                }
            }
        }
        Err(SrcWaveError::SignalNotFound)
    }
}

/// Covariance of two equal-length sample slices.
fn covariance(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len() as f32;
    let mean_a = a.iter().sum::<f32>() / n;
    let mean_b = b.iter().sum::<f32>() / n;
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x - mean_a) * (y - mean_b))
        .sum::<f32>()
        / n
}

/// DFT magnitude at the two data-tone bins against a scaled noise reference.
///
/// The probe window is a third of a bit slot. The first window supplies the
/// noise reference; a window is accepted once its strongest data-tone bin
/// clears 1.412 times the reference's strongest bin, provided that threshold
/// itself sits above the reference average. A digitally silent lead-in leaves
/// the reference at zero and nothing can qualify, which is why the template
/// detector is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralPeakLocator;

impl SignalLocator for SpectralPeakLocator {
    fn locate(&self, samples: &[f32], sample_rate: u32) -> Result<usize> {
        let probe = samples_for_ms(BIT_DURATION_MS, sample_rate) / 3;
        if probe == 0 || samples.len() < probe * 2 {
            return Err(SrcWaveError::SignalNotFound);
        }

        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(probe);
        let low_bin = tone_bin(LOW_FREQ, probe, sample_rate);
        let high_bin = tone_bin(HIGH_FREQ, probe, sample_rate);

        let mut scratch = vec![0.0f32; probe];
        let mut spectrum = r2c.make_output_vec();

        scratch.copy_from_slice(&samples[..probe]);
        r2c.process(&mut scratch, &mut spectrum)
            .map_err(|e| SrcWaveError::FftError(format!("noise probe FFT failed: {e:?}")))?;
        let noise_low = spectrum[low_bin].norm();
        let noise_high = spectrum[high_bin].norm();
        let noise_avg = (noise_low + noise_high) / 2.0;
        let threshold = NOISE_FACTOR * noise_low.max(noise_high);

        for start in (0..samples.len() - probe + 1).step_by(probe) {
            scratch.copy_from_slice(&samples[start..start + probe]);
            r2c.process(&mut scratch, &mut spectrum)
                .map_err(|e| SrcWaveError::FftError(format!("probe FFT failed: {e:?}")))?;
            let peak = spectrum[low_bin].norm().max(spectrum[high_bin].norm());
            if peak > threshold && threshold > noise_avg {
                debug!("spectral match at sample {start} (peak {peak:.3e}, threshold {threshold:.3e})");
                return Ok(start);
            }
        }
        Err(SrcWaveError::SignalNotFound)
    }
}

/// Index of the DFT bin closest below `freq` for a window of `len` samples.
fn tone_bin(freq: f32, len: usize, sample_rate: u32) -> usize {
    (freq * len as f32 / sample_rate as f32) as usize
}
