//! Short-time analysis: framing, windowing, power spectrogram, ZCR and RMS

use crate::params::{FRAME_LENGTH, HOP_LENGTH};
use rustfft::{num_complex::Complex, FftPlanner};

/// How a signal is extended for centered framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Mirror the signal around its endpoints (spectral analysis)
    Reflect,
    /// Repeat the edge samples (zero-crossing analysis)
    Edge,
    /// Extend with zeros (energy analysis)
    Zero,
}

/// Power spectrogram, row-major `frames` x `bins`
#[derive(Debug, Clone)]
pub struct PowerSpectrogram {
    pub frames: usize,
    pub bins: usize,
    pub data: Vec<f32>,
}

/// Number of centered analysis frames for a signal of `len` samples
pub fn frame_count(len: usize) -> usize {
    len / HOP_LENGTH + 1
}

/// Periodic Hann window
pub fn hann_window(len: usize) -> Vec<f32> {
    let two_pi = std::f32::consts::PI * 2.0;
    (0..len)
        .map(|i| 0.5 - 0.5 * (two_pi * i as f32 / len as f32).cos())
        .collect()
}

/// Extend `signal` by `pad` samples on each side for centered framing
pub fn pad_centered(signal: &[f32], pad: usize, mode: PadMode) -> Vec<f32> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(signal.len() + 2 * pad);
    for k in 0..signal.len() + 2 * pad {
        let idx = k as isize - pad as isize;
        let value = match mode {
            PadMode::Reflect => signal[reflect_index(idx, signal.len())],
            PadMode::Edge => signal[idx.clamp(0, signal.len() as isize - 1) as usize],
            PadMode::Zero => {
                if idx < 0 || idx >= signal.len() as isize {
                    0.0
                } else {
                    signal[idx as usize]
                }
            }
        };
        out.push(value);
    }
    out
}

/// Mirror an out-of-range index back into `[0, len)`
fn reflect_index(i: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = (2 * (len - 1)) as isize;
    let mut j = i.rem_euclid(period);
    let len_i = len as isize;
    if j >= len_i {
        j = period - j;
    }
    j as usize
}

/// Power spectrogram over centered, Hann-windowed frames
pub fn power_spectrogram(signal: &[f32]) -> PowerSpectrogram {
    let bins = FRAME_LENGTH / 2 + 1;
    if signal.is_empty() {
        return PowerSpectrogram {
            frames: 0,
            bins,
            data: Vec::new(),
        };
    }
    let frames = frame_count(signal.len());
    let padded = pad_centered(signal, FRAME_LENGTH / 2, PadMode::Reflect);
    let window = hann_window(FRAME_LENGTH);

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FRAME_LENGTH);
    let mut buf = vec![Complex::new(0.0f32, 0.0); FRAME_LENGTH];

    let mut data = vec![0.0f32; frames * bins];
    for frame in 0..frames {
        let start = frame * HOP_LENGTH;
        for i in 0..FRAME_LENGTH {
            let x = padded.get(start + i).copied().unwrap_or_default();
            buf[i] = Complex::new(x * window[i], 0.0);
        }
        fft.process(&mut buf);
        for k in 0..bins {
            let c = buf[k];
            data[frame * bins + k] = c.re.mul_add(c.re, c.im * c.im);
        }
    }

    PowerSpectrogram { frames, bins, data }
}

/// Per-frame zero-crossing rate over centered, edge-padded frames
pub fn zero_crossing_rate(signal: &[f32]) -> Vec<f32> {
    if signal.is_empty() {
        return Vec::new();
    }
    let frames = frame_count(signal.len());
    let padded = pad_centered(signal, FRAME_LENGTH / 2, PadMode::Edge);

    (0..frames)
        .map(|frame| {
            let start = frame * HOP_LENGTH;
            let mut crossings = 0usize;
            for i in 1..FRAME_LENGTH {
                let prev = padded[start + i - 1] < 0.0;
                let cur = padded[start + i] < 0.0;
                if prev != cur {
                    crossings += 1;
                }
            }
            crossings as f32 / FRAME_LENGTH as f32
        })
        .collect()
}

/// Per-frame root-mean-square energy over centered, zero-padded frames
pub fn rms_energy(signal: &[f32]) -> Vec<f32> {
    if signal.is_empty() {
        return Vec::new();
    }
    let frames = frame_count(signal.len());
    let padded = pad_centered(signal, FRAME_LENGTH / 2, PadMode::Zero);

    (0..frames)
        .map(|frame| {
            let start = frame * HOP_LENGTH;
            let sum_squares: f32 = padded[start..start + FRAME_LENGTH]
                .iter()
                .map(|&s| s * s)
                .sum();
            (sum_squares / FRAME_LENGTH as f32).sqrt()
        })
        .collect()
}
