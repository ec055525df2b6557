use crate::framing;
use crate::modulator::generate_waveform;
use crate::record::TimeRecord;
use crate::{DEFAULT_AMPLITUDE, DEFAULT_SAMPLE_RATE};

/// Renders time records into ready-to-play SRC waveforms.
pub struct Encoder {
    sample_rate: u32,
    amplitude: f32,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    /// Peak amplitude of the generated tones. Values above 1.0 clip once the
    /// samples are persisted to a [-1.0, 1.0] container.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Encode a record into the full 8.1 second waveform: both frames, the
    /// periodic sync beeps and the trailing beep.
    pub fn encode(&self, record: &TimeRecord) -> Vec<f32> {
        let (frame1, frame2) = framing::encode(record);
        generate_waveform(&frame1, &frame2, self.sample_rate, self.amplitude)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
