//! Mono resampling to the working sample rate
//!
//! Sinc interpolation with a BlackmanHarris2 window and a 0.95 cutoff to
//! prevent aliasing; the chunk size is set to the input length so arbitrary
//! uploads resample in a single pass.

use crate::params::SAMPLE_RATE;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tbcare_common::{Error, Result};
use tracing::debug;

/// Resample mono samples from `source_rate` to the 16 kHz working rate
pub fn resample_to_working_rate(samples: Vec<f32>, source_rate: u32) -> Result<Vec<f32>> {
    if source_rate == SAMPLE_RATE || samples.is_empty() {
        return Ok(samples);
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = SAMPLE_RATE as f64 / source_rate as f64;
    let input_len = samples.len();

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, input_len, 1)
        .map_err(|e| Error::Decode(format!("Failed to create resampler: {e}")))?;

    let output = resampler
        .process(&[samples], None)
        .map_err(|e| Error::Decode(format!("Resampling failed: {e}")))?;
    let mono = output
        .into_iter()
        .next()
        .ok_or_else(|| Error::Decode("Resampler produced no output channel".to_string()))?;

    debug!(
        input = input_len,
        output = mono.len(),
        source_rate,
        target_rate = SAMPLE_RATE,
        "Resampled to working rate"
    );
    Ok(mono)
}
