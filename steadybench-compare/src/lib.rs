//! Numerical comparison of exported per-state value vectors against a
//! per-benchmark baseline.

mod comparator;
pub mod sentinel;
mod vector;

pub use comparator::{generate_comparison_values, ErrorScalars};
pub use vector::{parse_state_vector, VectorError};

/// Elementwise absolute errors |candidate − baseline|.
///
/// Two infinities at the same state agree exactly (error 0); a lone
/// infinity on either side is an infinite error.
pub fn absolute_errors(candidate: &[f64], baseline: &[f64]) -> Vec<f64> {
    candidate
        .iter()
        .zip(baseline)
        .map(|(&c, &b)| {
            if c.is_infinite() && b.is_infinite() {
                0.0
            } else if c.is_infinite() || b.is_infinite() {
                f64::INFINITY
            } else {
                (c - b).abs()
            }
        })
        .collect()
}

/// Elementwise relative errors from absolute errors and the baseline.
///
/// A zero absolute error is a zero relative error even where the
/// baseline is zero; a nonzero error against a zero baseline is
/// infinite, and infinite absolute errors carry through.
pub fn relative_errors(absolute: &[f64], baseline: &[f64]) -> Vec<f64> {
    absolute
        .iter()
        .zip(baseline)
        .map(|(&a, &b)| {
            if a == 0.0 {
                0.0
            } else if a.is_infinite() || b == 0.0 {
                f64::INFINITY
            } else {
                a / b
            }
        })
        .collect()
}

/// Maximum norm (∞-norm) of a non-negative error vector.
pub fn max_norm(errors: &[f64]) -> f64 {
    errors.iter().fold(0.0, |acc, &e| acc.max(e))
}

/// Mean absolute deviation of the error vector about its own mean.
/// Any infinite component makes the deviation infinite.
pub fn mean_deviation(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return 0.0;
    }
    if errors.iter().any(|e| e.is_infinite()) {
        return f64::INFINITY;
    }
    let mean = errors.iter().sum::<f64>() / errors.len() as f64;
    errors.iter().map(|e| (e - mean).abs()).sum::<f64>() / errors.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_zero_errors() {
        let v = vec![0.25, 0.5, 0.25];
        let abs = absolute_errors(&v, &v);
        let rel = relative_errors(&abs, &v);
        assert_eq!(max_norm(&abs), 0.0);
        assert_eq!(max_norm(&rel), 0.0);
        assert_eq!(mean_deviation(&abs), 0.0);
    }

    #[test]
    fn agreeing_infinities_are_exact() {
        let abs = absolute_errors(&[f64::INFINITY, 1.0], &[f64::INFINITY, 1.0]);
        assert_eq!(abs, vec![0.0, 0.0]);
    }

    #[test]
    fn lone_infinity_is_an_infinite_error() {
        let abs = absolute_errors(&[f64::INFINITY, 1.0], &[2.0, 1.0]);
        assert_eq!(abs[0], f64::INFINITY);
        assert_eq!(max_norm(&abs), f64::INFINITY);
        assert_eq!(mean_deviation(&abs), f64::INFINITY);
    }

    #[test]
    fn zero_baseline_rules() {
        let abs = absolute_errors(&[0.0, 0.5], &[0.0, 0.0]);
        let rel = relative_errors(&abs, &[0.0, 0.0]);
        assert_eq!(rel, vec![0.0, f64::INFINITY]);
    }

    #[test]
    fn mean_deviation_measures_spread_not_size() {
        // Constant error vector: deviation about its own mean is zero.
        assert_eq!(mean_deviation(&[0.5, 0.5, 0.5]), 0.0);
        // [0, 1] has mean 0.5, deviations [0.5, 0.5] → 0.5.
        assert!((mean_deviation(&[0.0, 1.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_vectors_yield_zero_scalars() {
        assert_eq!(max_norm(&[]), 0.0);
        assert_eq!(mean_deviation(&[]), 0.0);
    }
}
