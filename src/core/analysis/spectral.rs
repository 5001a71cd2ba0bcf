// src/core/analysis/spectral.rs
//
// Magnitude-spectrum shape: overall energy (L2 norm) and flatness
// (Shannon entropy of the normalised magnitudes).

use crate::core::dsp::stats::l2_norm;

/// Added to every magnitude (and to the normaliser) to keep ln() finite
pub const ENTROPY_EPSILON: f64 = 1e-10;

/// Spectral shape results
#[derive(Debug, Clone, Default)]
pub struct SpectralShape {
    /// Euclidean norm of the magnitude vector
    pub l2_norm: f64,
    /// Entropy of the magnitude distribution, natural-log units
    pub entropy: f64,
}

/// Analyze the magnitude spectrum
pub fn analyze_spectral_shape(magnitude: &[f64]) -> SpectralShape {
    SpectralShape {
        l2_norm: l2_norm(magnitude),
        entropy: spectral_entropy(magnitude),
    }
}

/// Shannon entropy of `p = (m + ε) / (Σm + ε)`.
///
/// Flat spectra approach ln(M); a single dominant bin approaches 0.
pub fn spectral_entropy(magnitude: &[f64]) -> f64 {
    let total: f64 = magnitude.iter().sum::<f64>() + ENTROPY_EPSILON;

    let entropy: f64 = magnitude
        .iter()
        .map(|&m| {
            let p = (m + ENTROPY_EPSILON) / total;
            -p * p.ln()
        })
        .sum();

    // Rounding can leave a tiny negative residue for one-hot spectra
    entropy.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_spectrum_max_entropy() {
        let mags = vec![1.0; 256];
        let entropy = spectral_entropy(&mags);
        assert!((entropy - (256f64).ln()).abs() < 1e-6);
    }

    #[test]
    fn test_one_hot_spectrum_near_zero() {
        let mut mags = vec![0.0; 256];
        mags[40] = 1.0;
        let entropy = spectral_entropy(&mags);
        assert!(entropy >= 0.0);
        assert!(entropy < 1e-5);
    }

    #[test]
    fn test_tonal_below_flat() {
        let mut tonal = vec![0.001; 100];
        tonal[50] = 1.0;
        assert!(spectral_entropy(&tonal) < spectral_entropy(&vec![1.0; 100]));
    }

    #[test]
    fn test_empty_spectrum() {
        let shape = analyze_spectral_shape(&[]);
        assert_eq!(shape.l2_norm, 0.0);
        assert_eq!(shape.entropy, 0.0);
    }

    #[test]
    fn test_l2_norm() {
        let shape = analyze_spectral_shape(&[3.0, 4.0]);
        assert!((shape.l2_norm - 5.0).abs() < 1e-12);
    }
}
