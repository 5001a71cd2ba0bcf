//! Statistical helpers for feature aggregation
//!
//! All helpers return 0.0 on empty input rather than NaN, so aggregated
//! records stay finite even for a class with no usable files.

/// Arithmetic mean
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation (divides by N, not N-1)
pub fn population_std(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mu = mean(data);
    let variance = data.iter().map(|x| (x - mu) * (x - mu)).sum::<f64>() / data.len() as f64;
    variance.max(0.0).sqrt()
}

/// Smallest value
pub fn min(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Largest value
pub fn max(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Euclidean (L2) norm
pub fn l2_norm(data: &[f64]) -> f64 {
    data.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Replace NaN and ±Infinity with 0.0
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_population_std() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&data) - 5.0).abs() < 1e-12);
        // Population std of this classic sample is exactly 2
        assert!((population_std(&data) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_max() {
        let data = vec![0.3, -1.5, 2.25];
        assert_eq!(min(&data), -1.5);
        assert_eq!(max(&data), 2.25);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std(&[]), 0.0);
        assert_eq!(min(&[]), 0.0);
        assert_eq!(max(&[]), 0.0);
    }

    #[test]
    fn test_constant_has_zero_std() {
        assert!(population_std(&[0.7, 0.7, 0.7]) < 1e-12);
    }

    #[test]
    fn test_l2_norm() {
        assert!((l2_norm(&[3.0, 4.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f64::NAN), 0.0);
        assert_eq!(sanitize(f64::INFINITY), 0.0);
        assert_eq!(sanitize(f64::NEG_INFINITY), 0.0);
        assert_eq!(sanitize(1.25), 1.25);
    }
}
