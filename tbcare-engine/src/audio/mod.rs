//! Upload decoding, resampling and windowing

pub mod chunker;
pub mod decoder;
pub mod resampler;

pub use chunker::{AudioChunker, AudioOutcome, UnusableAudio};
pub use decoder::DecodedAudio;
