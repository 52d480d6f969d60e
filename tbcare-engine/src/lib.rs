//! # TB Care Screening Engine
//!
//! Core analysis pipeline for multimodal TB cough screening:
//! - Audio decode/resample and fixed-window chunking with a silence gate
//! - Per-segment feature extraction (cepstral matrix + mel spectrogram)
//! - Batched multimodal classifier inference with max reduction
//! - Rule-based clinical scoring and deterministic risk fusion
//!
//! Consumers construct a [`ScreeningContext`] once at process start and call
//! [`ScreeningContext::screen`] for each request.

pub mod audio;
pub mod clinical;
pub mod dsp;
pub mod extractors;
pub mod fusion;
pub mod inference;
pub mod params;
pub mod screening;

pub use screening::ScreeningContext;
pub use tbcare_common::{EngineConfig, Error, PatientRecord, Result, ScreeningReport};
