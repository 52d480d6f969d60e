//! Segment feature extraction
//!
//! Turns one fixed-length audio segment into the two aligned representations
//! the classifier consumes: a sequential per-frame descriptor matrix and a
//! normalized mel spectrogram tensor.

use crate::dsp::mel::{self, DbReference};
use crate::dsp::stft;
use crate::params::{
    FRAME_LENGTH, MINMAX_EPSILON, N_MELS, N_MFCC, SEGMENT_SAMPLES, SEQ_FEATURES, TILE_FACTOR,
};
use tracing::debug;

/// Sequential feature matrix, row-major `frames` x [`SEQ_FEATURES`]
/// (40 cepstral coefficients, zero-crossing rate, RMS energy per row)
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialFeatures {
    pub frames: usize,
    pub data: Vec<f32>,
}

/// Spatial feature tensor, band-major [`N_MELS`] x `frames` x 1,
/// min-max normalized to [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFeatures {
    pub frames: usize,
    pub data: Vec<f32>,
}

/// Aligned per-segment feature pair
///
/// Both views derive from the same segment and must keep the same batch index
/// when stacked for inference.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBundle {
    pub sequential: SequentialFeatures,
    pub spatial: SpatialFeatures,
}

/// Result of extracting one segment
#[derive(Debug, Clone)]
pub enum SegmentOutcome {
    /// Both representations extracted and aligned
    Extracted(FeatureBundle),
    /// Signal processing could not produce usable features; the segment is
    /// dropped, not an error
    Skipped,
}

/// Extractor with the mel filterbank precomputed once
pub struct SegmentFeatureExtractor {
    filters: Vec<f32>,
}

impl SegmentFeatureExtractor {
    pub fn new() -> Self {
        let bins = FRAME_LENGTH / 2 + 1;
        Self {
            filters: mel::mel_filterbank(N_MELS, bins),
        }
    }

    /// Extract both feature views from one segment of [`SEGMENT_SAMPLES`]
    ///
    /// The segment is tiled [`TILE_FACTOR`] times first: the 0.5 s window on
    /// its own is too short for framing parameters tuned for ~2 s of context.
    pub fn extract(&self, segment: &[f32]) -> SegmentOutcome {
        debug_assert_eq!(segment.len(), SEGMENT_SAMPLES);
        let tiled = tile(segment, TILE_FACTOR);

        let power = stft::power_spectrogram(&tiled);
        let mel_power = mel::mel_spectrogram(&power, &self.filters, N_MELS);
        let frames = mel_power.frames;

        // Sequential view: cepstra plus ZCR and RMS rows, stacked per frame
        let log_mel = mel::power_to_db(&mel_power, DbReference::Unit);
        let cepstra = mel::dct_ii(&log_mel, N_MFCC);
        let zcr = stft::zero_crossing_rate(&tiled);
        let rms = stft::rms_energy(&tiled);
        if zcr.len() != frames || rms.len() != frames {
            debug!(
                frames,
                zcr = zcr.len(),
                rms = rms.len(),
                "Descriptor frame counts diverge, skipping segment"
            );
            return SegmentOutcome::Skipped;
        }

        let mut sequential = Vec::with_capacity(frames * SEQ_FEATURES);
        for frame in 0..frames {
            sequential.extend_from_slice(&cepstra[frame * N_MFCC..(frame + 1) * N_MFCC]);
            sequential.push(zcr[frame]);
            sequential.push(rms[frame]);
        }

        // Spatial view: peak-referenced dB mel spectrogram scaled to [0, 1]
        let db = mel::power_to_db(&mel_power, DbReference::Peak);
        let (min, max) = min_max(&db.data);
        let spatial: Vec<f32> = db
            .data
            .iter()
            .map(|&v| (v - min) / (max - min + MINMAX_EPSILON))
            .collect();

        if sequential.iter().chain(spatial.iter()).any(|v| !v.is_finite()) {
            debug!("Non-finite feature values, skipping segment");
            return SegmentOutcome::Skipped;
        }

        SegmentOutcome::Extracted(FeatureBundle {
            sequential: SequentialFeatures {
                frames,
                data: sequential,
            },
            spatial: SpatialFeatures {
                frames,
                data: spatial,
            },
        })
    }
}

impl Default for SegmentFeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Repeat a segment end-to-end
fn tile(segment: &[f32], factor: usize) -> Vec<f32> {
    let mut tiled = Vec::with_capacity(segment.len() * factor);
    for _ in 0..factor {
        tiled.extend_from_slice(segment);
    }
    tiled
}

fn min_max(values: &[f32]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::HOP_LENGTH;

    fn tone_segment(freq: f32, amplitude: f32) -> Vec<f32> {
        let sr = crate::params::SAMPLE_RATE as f32;
        (0..SEGMENT_SAMPLES)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sr).sin())
            .collect()
    }

    fn expected_frames() -> usize {
        SEGMENT_SAMPLES * TILE_FACTOR / HOP_LENGTH + 1
    }

    #[test]
    fn test_extract_tone_shapes() {
        let extractor = SegmentFeatureExtractor::new();
        let outcome = extractor.extract(&tone_segment(440.0, 0.5));
        let bundle = match outcome {
            SegmentOutcome::Extracted(bundle) => bundle,
            SegmentOutcome::Skipped => panic!("tone segment should extract"),
        };
        assert_eq!(bundle.sequential.frames, expected_frames());
        assert_eq!(
            bundle.sequential.data.len(),
            expected_frames() * SEQ_FEATURES
        );
        assert_eq!(bundle.spatial.frames, expected_frames());
        assert_eq!(bundle.spatial.data.len(), N_MELS * expected_frames());
    }

    #[test]
    fn test_spatial_features_normalized() {
        let extractor = SegmentFeatureExtractor::new();
        let SegmentOutcome::Extracted(bundle) = extractor.extract(&tone_segment(1_200.0, 0.8))
        else {
            panic!("tone segment should extract");
        };
        assert!(bundle
            .spatial
            .data
            .iter()
            .all(|&v| (0.0..=1.0).contains(&v)));
        // A tonal segment has real dynamic range: both ends of the scale
        // should be approached
        let max = bundle.spatial.data.iter().copied().fold(0.0f32, f32::max);
        assert!(max > 0.99);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let extractor = SegmentFeatureExtractor::new();
        let segment = tone_segment(600.0, 0.3);
        let first = extractor.extract(&segment);
        let second = extractor.extract(&segment);
        match (first, second) {
            (SegmentOutcome::Extracted(a), SegmentOutcome::Extracted(b)) => {
                assert_eq!(a, b);
            }
            _ => panic!("both extractions should succeed"),
        }
    }

    #[test]
    fn test_sequential_tail_columns_are_zcr_and_rms() {
        let extractor = SegmentFeatureExtractor::new();
        let segment = tone_segment(440.0, 0.5);
        let SegmentOutcome::Extracted(bundle) = extractor.extract(&segment) else {
            panic!("tone segment should extract");
        };

        // Recompute the descriptors over the tiled signal and check they
        // landed in the last two columns of each row
        let tiled = super::tile(&segment, TILE_FACTOR);
        let zcr = crate::dsp::stft::zero_crossing_rate(&tiled);
        let rms = crate::dsp::stft::rms_energy(&tiled);
        for frame in 0..bundle.sequential.frames {
            let row = &bundle.sequential.data[frame * SEQ_FEATURES..(frame + 1) * SEQ_FEATURES];
            assert_eq!(row[crate::params::N_MFCC], zcr[frame]);
            assert_eq!(row[crate::params::N_MFCC + 1], rms[frame]);
        }
    }

    #[test]
    fn test_all_zero_segment_still_extracts() {
        // The short-upload path pads with zeros and extracts without a
        // silence gate; a degenerate segment must yield finite features
        let extractor = SegmentFeatureExtractor::new();
        let SegmentOutcome::Extracted(bundle) = extractor.extract(&vec![0.0; SEGMENT_SAMPLES])
        else {
            panic!("zero segment should extract finite features");
        };
        assert!(bundle.sequential.data.iter().all(|v| v.is_finite()));
        assert!(bundle
            .spatial
            .data
            .iter()
            .all(|&v| (0.0..=1.0).contains(&v)));
    }
}
