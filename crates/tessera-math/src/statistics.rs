//! Descriptive statistics over `f64` samples.
//!
//! Sample (n − 1) normalisation is used throughout.

use crate::error::{MathError, MathResult};

/// Arithmetic mean.
///
/// # Errors
///
/// `InsufficientData` for an empty sample.
pub fn mean(xs: &[f64]) -> MathResult<f64> {
    if xs.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Sample covariance of two paired samples.
///
/// # Errors
///
/// `LengthMismatch` if the samples differ in length, `InsufficientData` for
/// fewer than two pairs.
pub fn covariance(xs: &[f64], ys: &[f64]) -> MathResult<f64> {
    if xs.len() != ys.len() {
        return Err(MathError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(MathError::insufficient_data(2, xs.len()));
    }

    let mx = mean(xs)?;
    let my = mean(ys)?;
    let sum: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum();
    Ok(sum / (xs.len() - 1) as f64)
}

/// Sample variance.
///
/// Defined as the covariance of the sample with itself so that ratios of the
/// two (e.g. a regression slope) are exact when the inputs coincide.
pub fn sample_variance(xs: &[f64]) -> MathResult<f64> {
    covariance(xs, xs)
}

/// Sample standard deviation.
pub fn sample_std_dev(xs: &[f64]) -> MathResult<f64> {
    Ok(sample_variance(xs)?.sqrt())
}

/// Pearson correlation of two paired samples.
///
/// Returns `Ok(None)` when either sample has zero variance: the coefficient
/// is undefined there, not zero.
///
/// # Errors
///
/// Same as [`covariance`].
pub fn correlation(xs: &[f64], ys: &[f64]) -> MathResult<Option<f64>> {
    let cov = covariance(xs, ys)?;
    let vx = sample_variance(xs)?;
    let vy = sample_variance(ys)?;
    if vx == 0.0 || vy == 0.0 {
        return Ok(None);
    }
    Ok(Some((cov / (vx * vy).sqrt()).clamp(-1.0, 1.0)))
}
