use log::debug;

use crate::demodulator;
use crate::error::Result;
use crate::framing;
use crate::record::TimeRecord;
use crate::sync::{SignalLocator, TemplateCorrelator};
use crate::DEFAULT_SAMPLE_RATE;

/// Recovers a time record from a mono capture of an SRC transmission.
///
/// Acquisition can be skipped with [`set_assume_aligned`] for captures known
/// to start exactly at the first bit, such as raw synthesizer output.
///
/// [`set_assume_aligned`]: Decoder::set_assume_aligned
pub struct Decoder {
    sample_rate: u32,
    assume_aligned: bool,
    locator: Box<dyn SignalLocator>,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            assume_aligned: false,
            locator: Box::new(TemplateCorrelator),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    /// Decode from sample zero without searching for the signal start.
    pub fn set_assume_aligned(&mut self, aligned: bool) {
        self.assume_aligned = aligned;
    }

    /// Swap the acquisition strategy.
    pub fn set_locator(&mut self, locator: Box<dyn SignalLocator>) {
        self.locator = locator;
    }

    /// Locate the signal, classify every bit slot and validate the frames.
    pub fn decode(&self, samples: &[f32]) -> Result<TimeRecord> {
        let sequence = self.read_sequence(samples)?;
        framing::decode(&sequence)
    }

    /// The raw interchange bit sequence, without frame validation.
    pub fn read_sequence(&self, samples: &[f32]) -> Result<String> {
        let start = if self.assume_aligned {
            0
        } else {
            self.locator.locate(samples, self.sample_rate)?
        };
        debug!("signal starts at sample {start}");
        demodulator::read_sequence(&samples[start..], self.sample_rate)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
