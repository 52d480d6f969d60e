//! Fixed analysis parameters
//!
//! These values were calibrated together with the trained classifier.
//! Changing any of them without re-calibrating the decision threshold
//! invalidates the deployment, so they are compile-time constants rather
//! than configuration.

/// Working sample rate for all analysis (Hz)
pub const SAMPLE_RATE: u32 = 16_000;

/// Analysis segment duration (seconds)
pub const SEGMENT_SECONDS: f32 = 0.5;

/// Samples per analysis segment (0.5 s at 16 kHz)
pub const SEGMENT_SAMPLES: usize = 8_000;

/// Times each segment is repeated end-to-end before feature extraction
pub const TILE_FACTOR: usize = 4;

/// Cepstral coefficients kept per frame
pub const N_MFCC: usize = 40;

/// Mel bands in the spectrogram
pub const N_MELS: usize = 128;

/// Spectral analysis frame length (samples)
pub const FRAME_LENGTH: usize = 2_048;

/// Hop between analysis frames (samples)
pub const HOP_LENGTH: usize = 512;

/// Columns in the sequential feature matrix (cepstra + ZCR + RMS)
pub const SEQ_FEATURES: usize = N_MFCC + 2;

/// Peak absolute amplitude at or below which a window counts as silence
pub const SILENCE_PEAK: f32 = 0.01;

/// Epsilon guarding the min-max normalization of the spatial features
pub const MINMAX_EPSILON: f32 = 1e-8;

/// Columns in the tabular model input (scaled age + sex + seven flags)
pub const TABULAR_FEATURES: usize = 9;

/// Weight of the clinical score in the fusion blend
pub const CLINICAL_WEIGHT: f32 = 0.60;

/// Weight of the audio score in the fusion blend
pub const AUDIO_WEIGHT: f32 = 0.40;

/// Probability forced by the hemoptysis red flag
pub const RED_FLAG_PROBABILITY: f32 = 0.95;

/// Decision threshold; strictly greater classifies positive
pub const RISK_THRESHOLD: f32 = 0.4771;
