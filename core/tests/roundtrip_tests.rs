// Full encode/decode round trips. The acquisition path band-filters several
// hundred thousand samples per decode, so run these in release mode when
// iterating: cargo test -p srcwave-core --test roundtrip_tests --release

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use srcwave_core::sync::SpectralPeakLocator;
use srcwave_core::{
    Decoder, Encoder, LeapSecond, SrcWaveError, TimeRecord, Zone, DEFAULT_SAMPLE_RATE,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sample_record() -> TimeRecord {
    TimeRecord {
        hour: 14,
        minute: 30,
        zone: Zone::Cet,
        month: 6,
        day: 15,
        day_of_week: 6,
        year: 2024,
        tz_change_days: None,
        leap_second: LeapSecond::None,
    }
}

fn aligned_decoder() -> Decoder {
    let mut decoder = Decoder::new();
    decoder.set_assume_aligned(true);
    decoder
}

fn gaussian_noise(len: usize, sigma: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0f32, sigma).unwrap();
    (0..len).map(|_| normal.sample(&mut rng)).collect()
}

#[test]
fn aligned_round_trip_reproduces_the_record() {
    init_logging();
    let record = sample_record();
    let samples = Encoder::new().encode(&record);
    let decoded = aligned_decoder().decode(&samples).expect("decode failed");
    assert_eq!(decoded, record);
}

#[test]
fn aligned_round_trip_covers_every_announced_field() {
    init_logging();
    let record = TimeRecord {
        hour: 23,
        minute: 59,
        zone: Zone::Cest,
        month: 10,
        day: 26,
        day_of_week: 7,
        year: 2025,
        tz_change_days: Some(2),
        leap_second: LeapSecond::Delay,
    };
    let samples = Encoder::new().encode(&record);
    let decoded = aligned_decoder().decode(&samples).expect("decode failed");
    assert_eq!(decoded, record);
}

#[test]
fn round_trip_of_the_current_wall_clock() {
    init_logging();
    let record = TimeRecord::from_datetime(
        &Local::now(),
        Zone::Cet,
        Some(4),
        LeapSecond::None,
    );
    let samples = Encoder::new().encode(&record);
    let decoded = aligned_decoder().decode(&samples).expect("decode failed");
    assert_eq!(decoded, record);
}

#[test]
fn acquisition_round_trip_with_leading_silence() {
    init_logging();
    let record = sample_record();
    let samples = Encoder::new().encode(&record);

    let mut capture = vec![0.0f32; 2 * DEFAULT_SAMPLE_RATE as usize];
    capture.extend_from_slice(&samples);

    let decoded = Decoder::new().decode(&capture).expect("decode failed");
    assert_eq!(decoded, record);
}

#[test]
fn acquisition_round_trip_under_noise() {
    init_logging();
    let record = sample_record();
    let samples = Encoder::new().encode(&record);

    let lead_in = 2 * DEFAULT_SAMPLE_RATE as usize;
    let mut capture = gaussian_noise(lead_in + samples.len(), 0.01, 1234);
    for (out, &s) in capture[lead_in..].iter_mut().zip(&samples) {
        *out += s;
    }

    let decoded = Decoder::new().decode(&capture).expect("decode failed");
    assert_eq!(decoded, record);
}

#[test]
fn acquisition_round_trip_at_reduced_gain() {
    init_logging();
    let record = sample_record();
    let mut encoder = Encoder::new();
    encoder.set_amplitude(0.5);
    let samples = encoder.encode(&record);

    let mut capture = vec![0.0f32; 2 * DEFAULT_SAMPLE_RATE as usize];
    capture.extend_from_slice(&samples);

    let decoded = Decoder::new().decode(&capture).expect("decode failed");
    assert_eq!(decoded, record);
}

#[test]
fn spectral_locator_round_trip() {
    init_logging();
    let record = sample_record();
    let samples = Encoder::new().encode(&record);

    // The spectral strategy needs a non-silent noise reference window
    let probe = srcwave_core::samples_for_ms(srcwave_core::BIT_DURATION_MS, DEFAULT_SAMPLE_RATE) / 3;
    let mut capture = gaussian_noise(probe, 0.01, 99);
    capture.extend_from_slice(&samples);

    let mut decoder = Decoder::new();
    decoder.set_locator(Box::new(SpectralPeakLocator));
    let decoded = decoder.decode(&capture).expect("decode failed");
    assert_eq!(decoded, record);
}

#[test]
fn aligned_round_trip_at_a_lower_sample_rate() {
    init_logging();
    let record = sample_record();
    let mut encoder = Encoder::new();
    encoder.set_sample_rate(22050);
    let samples = encoder.encode(&record);

    let mut decoder = Decoder::new();
    decoder.set_sample_rate(22050);
    decoder.set_assume_aligned(true);
    let decoded = decoder.decode(&samples).expect("decode failed");
    assert_eq!(decoded, record);
}

#[test]
fn truncated_capture_fails_validation_instead_of_panicking() {
    init_logging();
    let samples = Encoder::new().encode(&sample_record());
    // Half a second: frame 2 never appears, its slots read as empty
    let truncated = &samples[..DEFAULT_SAMPLE_RATE as usize / 2];
    assert_eq!(
        aligned_decoder().decode(truncated),
        Err(SrcWaveError::FrameIdMismatch(2))
    );
}

#[test]
fn silent_capture_reports_signal_not_found() {
    init_logging();
    let capture = vec![0.0f32; 3 * DEFAULT_SAMPLE_RATE as usize];
    assert_eq!(
        Decoder::new().decode(&capture),
        Err(SrcWaveError::SignalNotFound)
    );
}
