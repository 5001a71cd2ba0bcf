//! Digital Signal Processing utilities

pub mod stats;

use num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

use crate::error::{Result, VoiceCheckError};

/// Positive-frequency half of a whole-signal DFT
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Complex bins X[0..N/2)
    pub bins: Vec<Complex<f64>>,
    /// |X[k]|
    pub magnitude: Vec<f64>,
    /// arg X[k], in (-π, π]
    pub phase: Vec<f64>,
    /// Bin centre frequencies in Hz
    pub frequencies: Vec<f64>,
    /// Length of the analysed signal
    pub signal_len: usize,
    pub sample_rate: u32,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Whole-clip spectral analyzer.
///
/// The clip is transformed as a single block: no windowing, no framing and
/// no zero-padding. Only the non-negative frequency half is retained.
pub struct SpectralAnalyzer {
    planner: FftPlanner<f64>,
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Compute the spectrum of the entire sample sequence
    pub fn analyze(&mut self, samples: &[f32], sample_rate: u32) -> Result<Spectrum> {
        let n = samples.len();
        if n == 0 {
            return Err(VoiceCheckError::InvalidSignal("waveform contains no samples".to_string()));
        }
        if n < 2 {
            return Err(VoiceCheckError::InvalidSignal(format!(
                "waveform of {} sample(s) has no positive-frequency bins",
                n
            )));
        }
        if sample_rate == 0 {
            return Err(VoiceCheckError::InvalidSignal("sample rate is zero".to_string()));
        }
        if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
            return Err(VoiceCheckError::InvalidSignal(format!(
                "non-finite sample at index {}",
                pos
            )));
        }

        let fft = self.planner.plan_fft_forward(n);

        let mut buffer: Vec<Complex<f64>> = samples
            .iter()
            .map(|&s| Complex::new(s as f64, 0.0))
            .collect();

        fft.process(&mut buffer);

        buffer.truncate(n / 2);

        let magnitude = buffer.iter().map(|c| c.norm()).collect();
        let phase = buffer.iter().map(|c| principal_angle(c.im.atan2(c.re))).collect();
        let frequencies = (0..buffer.len())
            .map(|k| k as f64 * sample_rate as f64 / n as f64)
            .collect();

        Ok(Spectrum {
            bins: buffer,
            magnitude,
            phase,
            frequencies,
            signal_len: n,
            sample_rate,
        })
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an angle from atan2's [-π, π] onto (-π, π]
pub fn principal_angle(angle: f64) -> f64 {
    if angle <= -PI {
        angle + 2.0 * PI
    } else {
        angle
    }
}

/// Re-wrap an arbitrary angle into (-π, π] via arg(exp(iθ))
pub fn wrap_phase(angle: f64) -> f64 {
    principal_angle(angle.sin().atan2(angle.cos()))
}
