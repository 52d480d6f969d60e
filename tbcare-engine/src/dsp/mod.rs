//! Signal-processing primitives for segment feature extraction
//!
//! Short-time framing, power spectrogram, mel filterbank and the cepstral
//! transform. All routines share the framing parameters from [`crate::params`]
//! so per-frame descriptors stay aligned when stacked.

pub mod mel;
pub mod stft;
