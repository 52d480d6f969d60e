//! Mel filterbank, decibel conversion and the cepstral transform

use super::stft::PowerSpectrogram;
use crate::params::SAMPLE_RATE;

/// Quietest power considered before the log, matching the analysis floor the
/// classifier was trained against
const AMIN: f32 = 1e-10;

/// Dynamic range kept below the loudest value after dB conversion
const TOP_DB: f32 = 80.0;

/// Mel power spectrogram, band-major `bands` x `frames`
#[derive(Debug, Clone)]
pub struct MelSpectrogram {
    pub bands: usize,
    pub frames: usize,
    pub data: Vec<f32>,
}

/// Reference power for decibel conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbReference {
    /// Absolute scale (0 dB == unit power)
    Unit,
    /// Relative to the spectrogram's own peak (peak maps to 0 dB)
    Peak,
}

fn hz_to_mel(freq: f64) -> f64 {
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1_000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = (6.4f64).ln() / 27.0;
    if freq < min_log_hz {
        freq / f_sp
    } else {
        min_log_mel + (freq / min_log_hz).ln() / logstep
    }
}

fn mel_to_hz(mel: f64) -> f64 {
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1_000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = (6.4f64).ln() / 27.0;
    if mel < min_log_mel {
        f_sp * mel
    } else {
        min_log_hz * (logstep * (mel - min_log_mel)).exp()
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n as f64 - 1.0);
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Triangular mel filterbank with Slaney area normalization,
/// row-major `n_mels` x `bins` (bins covering 0 Hz to Nyquist)
pub fn mel_filterbank(n_mels: usize, bins: usize) -> Vec<f32> {
    let nyquist = SAMPLE_RATE as f64 / 2.0;
    let mel_min = hz_to_mel(0.0);
    let mel_max = hz_to_mel(nyquist);

    let filter_freqs: Vec<f64> = linspace(mel_min, mel_max, n_mels + 2)
        .into_iter()
        .map(mel_to_hz)
        .collect();
    let fft_freqs = linspace(0.0, nyquist, bins);

    let mut filters = vec![0.0f32; n_mels * bins];
    for m in 0..n_mels {
        let left = filter_freqs[m];
        let center = filter_freqs[m + 1];
        let right = filter_freqs[m + 2];

        let denom_left = (center - left).max(f64::MIN_POSITIVE);
        let denom_right = (right - center).max(f64::MIN_POSITIVE);
        let enorm = 2.0 / (right - left).max(f64::MIN_POSITIVE);

        for (k, &f) in fft_freqs.iter().enumerate() {
            let up = (f - left) / denom_left;
            let down = (right - f) / denom_right;
            let weight = up.min(down).max(0.0);
            filters[m * bins + k] = (weight * enorm) as f32;
        }
    }
    filters
}

/// Apply the filterbank to a power spectrogram
pub fn mel_spectrogram(power: &PowerSpectrogram, filters: &[f32], n_mels: usize) -> MelSpectrogram {
    debug_assert_eq!(filters.len(), n_mels * power.bins);
    let mut data = vec![0.0f32; n_mels * power.frames];
    for frame in 0..power.frames {
        let row = &power.data[frame * power.bins..(frame + 1) * power.bins];
        for m in 0..n_mels {
            let filter = &filters[m * power.bins..(m + 1) * power.bins];
            let mut sum = 0.0f32;
            for (w, p) in filter.iter().zip(row.iter()) {
                sum = w.mul_add(*p, sum);
            }
            data[m * power.frames + frame] = sum;
        }
    }
    MelSpectrogram {
        bands: n_mels,
        frames: power.frames,
        data,
    }
}

/// Convert mel power to decibels with an 80 dB floor under the loudest value
pub fn power_to_db(spec: &MelSpectrogram, reference: DbReference) -> MelSpectrogram {
    let ref_power = match reference {
        DbReference::Unit => 1.0f32,
        DbReference::Peak => spec.data.iter().copied().fold(AMIN, f32::max),
    };
    let ref_db = 10.0 * ref_power.max(AMIN).log10();

    let mut data: Vec<f32> = spec
        .data
        .iter()
        .map(|&p| 10.0 * p.max(AMIN).log10() - ref_db)
        .collect();
    let max_db = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let floor = max_db - TOP_DB;
    for v in &mut data {
        if *v < floor {
            *v = floor;
        }
    }

    MelSpectrogram {
        bands: spec.bands,
        frames: spec.frames,
        data,
    }
}

/// Orthonormal DCT-II over the band axis, keeping the first `n_out`
/// coefficients per frame; output is row-major `frames` x `n_out`
pub fn dct_ii(spec: &MelSpectrogram, n_out: usize) -> Vec<f32> {
    let n = spec.bands;
    let scale_0 = (1.0 / n as f32).sqrt();
    let scale_k = (2.0 / n as f32).sqrt();
    let pi_over_2n = std::f32::consts::PI / (2.0 * n as f32);

    let mut out = vec![0.0f32; spec.frames * n_out];
    for frame in 0..spec.frames {
        for k in 0..n_out {
            let mut sum = 0.0f32;
            for band in 0..n {
                let angle = pi_over_2n * (2 * band + 1) as f32 * k as f32;
                sum += spec.data[band * spec.frames + frame] * angle.cos();
            }
            let scale = if k == 0 { scale_0 } else { scale_k };
            out[frame * n_out + k] = scale * sum;
        }
    }
    out
}
