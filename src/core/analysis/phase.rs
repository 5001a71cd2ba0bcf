// src/core/analysis/phase.rs
//
// Phase geometry across frequency bins: local phasor alignment (coherence)
// and wrapped bin-to-bin phase change (velocity).

use num_complex::Complex;

use crate::core::dsp::stats::sanitize;
use crate::core::dsp::wrap_phase;

/// Number of adjacent bins summed per coherence window
pub const COHERENCE_WINDOW: usize = 5;

/// Returned when the phase sequence is shorter than one window
pub const SHORT_SIGNAL_COHERENCE: f64 = 0.5;

/// Phase analysis results
#[derive(Debug, Clone, Default)]
pub struct PhaseAnalysis {
    /// Mean window coherence, in [0, 1]
    pub phase_coherence: f64,
    /// Coherence of each window, in bin order
    pub window_coherence: Vec<f64>,
    /// Mean absolute wrapped phase difference, radians
    pub phase_velocity: f64,
}

/// Analyze phase characteristics of a spectrum's phase sequence
pub fn analyze_phase(phase: &[f64]) -> PhaseAnalysis {
    let phase: Vec<f64> = phase.iter().map(|&p| sanitize(p)).collect();
    let (phase_coherence, window_coherence) = coherence_windows(&phase);

    PhaseAnalysis {
        phase_coherence,
        window_coherence,
        phase_velocity: phase_velocity(&phase),
    }
}

/// Mean resultant length of unit phasors over sliding windows of
/// [`COHERENCE_WINDOW`] bins
pub fn phase_coherence(phase: &[f64]) -> f64 {
    let phase: Vec<f64> = phase.iter().map(|&p| sanitize(p)).collect();
    coherence_windows(&phase).0
}

fn coherence_windows(phase: &[f64]) -> (f64, Vec<f64>) {
    if phase.len() < COHERENCE_WINDOW {
        return (SHORT_SIGNAL_COHERENCE, vec![SHORT_SIGNAL_COHERENCE]);
    }

    let phasors: Vec<Complex<f64>> = phase.iter().map(|&p| Complex::from_polar(1.0, p)).collect();

    let windows: Vec<f64> = phasors
        .windows(COHERENCE_WINDOW)
        .map(|w| w.iter().sum::<Complex<f64>>().norm() / COHERENCE_WINDOW as f64)
        .collect();

    let overall = windows.iter().sum::<f64>() / windows.len() as f64;
    (overall.clamp(0.0, 1.0), windows)
}

/// Mean absolute wrapped first difference of the phase sequence
pub fn phase_velocity(phase: &[f64]) -> f64 {
    if phase.len() < 2 {
        return 0.0;
    }

    let total: f64 = phase
        .windows(2)
        .map(|w| wrap_phase(sanitize(w[1]) - sanitize(w[0])).abs())
        .sum();

    total / (phase.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_aligned_phase_is_fully_coherent() {
        let phase = vec![0.3; 64];
        assert!((phase_coherence(&phase) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_opposed_phases_cancel() {
        // Pairs pointing in opposite directions leave one unmatched phasor
        // per window of five
        let phase: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 0.0 } else { PI }).collect();
        assert!((phase_coherence(&phase) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_short_sequence_fallback() {
        assert_eq!(phase_coherence(&[0.1, 0.2, 0.3, 0.4]), SHORT_SIGNAL_COHERENCE);
        assert_eq!(phase_coherence(&[]), SHORT_SIGNAL_COHERENCE);
    }

    #[test]
    fn test_exactly_one_window() {
        let analysis = analyze_phase(&[1.0; COHERENCE_WINDOW]);
        assert_eq!(analysis.window_coherence.len(), 1);
        assert!((analysis.phase_coherence - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_phase_sanitized() {
        let phase = vec![0.0, f64::NAN, 0.0, f64::INFINITY, 0.0, f64::NEG_INFINITY, 0.0];
        let analysis = analyze_phase(&phase);
        assert!((analysis.phase_coherence - 1.0).abs() < 1e-12);
        assert_eq!(analysis.phase_velocity, 0.0);
    }

    #[test]
    fn test_coherence_within_unit_interval() {
        let phase: Vec<f64> = (0..500)
            .map(|i| ((i * 37 % 101) as f64 / 101.0) * 2.0 * PI - PI)
            .collect();
        let c = phase_coherence(&phase);
        assert!((0.0..=1.0).contains(&c));
    }

    #[test]
    fn test_velocity_of_linear_phase() {
        let phase: Vec<f64> = (0..50).map(|i| wrap_phase(0.1 * i as f64)).collect();
        assert!((phase_velocity(&phase) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_wraps_across_pi() {
        // Jump from just below π to just above -π is a small step
        let phase = vec![PI - 0.05, -PI + 0.05];
        assert!((phase_velocity(&phase) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_degenerate() {
        assert_eq!(phase_velocity(&[]), 0.0);
        assert_eq!(phase_velocity(&[1.0]), 0.0);
    }
}
