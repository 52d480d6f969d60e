//! Recording segmentation
//!
//! Splits an uploaded recording into fixed 0.5 s analysis windows: short
//! material is zero-padded to a single window, longer material is partitioned
//! into consecutive windows with the final partial window zero-padded.
//! Silent windows are gated out so quiet stretches cannot bias the risk
//! estimate downward.

use crate::audio::{decoder, resampler};
use crate::extractors::{FeatureBundle, SegmentFeatureExtractor, SegmentOutcome};
use crate::params::{SEGMENT_SAMPLES, SILENCE_PEAK};
use tracing::{debug, warn};

/// Why a recording produced no scoreable features
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnusableAudio {
    /// The upload could not be decoded to PCM
    Undecodable(String),
    /// Every window was silent or failed extraction
    NoVoicedSegments,
}

impl std::fmt::Display for UnusableAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnusableAudio::Undecodable(detail) => {
                write!(f, "recording could not be decoded: {detail}")
            }
            UnusableAudio::NoVoicedSegments => write!(f, "no voiced segments in recording"),
        }
    }
}

/// Outcome of chunking one upload
///
/// Unusable audio is an expected value, not an error: the caller degrades to
/// a clinical-only assessment with a zero audio term.
#[derive(Debug)]
pub enum AudioOutcome {
    /// At least one window survived; bundles are batch-aligned
    Features(Vec<FeatureBundle>),
    /// Nothing scoreable in the upload
    Unusable(UnusableAudio),
}

/// Splits uploads into per-window feature batches
pub struct AudioChunker {
    extractor: SegmentFeatureExtractor,
}

impl AudioChunker {
    pub fn new() -> Self {
        Self {
            extractor: SegmentFeatureExtractor::new(),
        }
    }

    /// Decode, resample and window one uploaded recording
    pub fn process(&self, bytes: &[u8]) -> AudioOutcome {
        let decoded = match decoder::decode_bytes(bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, "Treating upload as unusable");
                return AudioOutcome::Unusable(UnusableAudio::Undecodable(e.to_string()));
            }
        };
        let samples = match resampler::resample_to_working_rate(decoded.samples, decoded.sample_rate)
        {
            Ok(samples) => samples,
            Err(e) => {
                warn!(error = %e, "Treating upload as unusable");
                return AudioOutcome::Unusable(UnusableAudio::Undecodable(e.to_string()));
            }
        };
        self.process_samples(&samples)
    }

    /// Window already-decoded 16 kHz mono samples
    pub fn process_samples(&self, samples: &[f32]) -> AudioOutcome {
        let mut bundles = Vec::new();

        if samples.len() < SEGMENT_SAMPLES {
            // Short upload: one zero-padded window, no silence gate
            let segment = pad_segment(samples);
            match self.extractor.extract(&segment) {
                SegmentOutcome::Extracted(bundle) => bundles.push(bundle),
                SegmentOutcome::Skipped => debug!("Padded short window skipped by extractor"),
            }
        } else {
            let windows = samples.len().div_ceil(SEGMENT_SAMPLES);
            for index in 0..windows {
                let start = index * SEGMENT_SAMPLES;
                let end = (start + SEGMENT_SAMPLES).min(samples.len());
                let segment = pad_segment(&samples[start..end]);

                let peak = segment.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
                if peak <= SILENCE_PEAK {
                    debug!(index, peak, "Window gated as silence");
                    continue;
                }

                match self.extractor.extract(&segment) {
                    SegmentOutcome::Extracted(bundle) => bundles.push(bundle),
                    SegmentOutcome::Skipped => debug!(index, "Window skipped by extractor"),
                }
            }
        }

        if bundles.is_empty() {
            return AudioOutcome::Unusable(UnusableAudio::NoVoicedSegments);
        }
        debug!(segments = bundles.len(), "Recording chunked");
        AudioOutcome::Features(bundles)
    }
}

impl Default for AudioChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Right-pad a window with zeros to exactly one segment length
fn pad_segment(window: &[f32]) -> Vec<f32> {
    let mut segment = window.to_vec();
    segment.resize(SEGMENT_SAMPLES, 0.0);
    segment
}
