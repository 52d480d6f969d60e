//! Per-segment feature extraction

mod segment;

pub use segment::{
    FeatureBundle, SegmentFeatureExtractor, SegmentOutcome, SequentialFeatures, SpatialFeatures,
};
