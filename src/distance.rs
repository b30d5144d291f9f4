//! Pairwise Manhattan (L1) distance kernels.
//!
//! The public entry points validate lengths and forward to the dispatched
//! SIMD kernels. The result is the sum of `|x[i] - y[i]|` over the full
//! length, independent of which target the dispatch layer selects, up to
//! standard floating-point summation-order rounding (different lane widths
//! split the sum differently).

use crate::error::{KernelError, Result};
use crate::simd::dispatch;

/// Compute the Manhattan (L1) distance between two equal-length f32 slices.
///
/// Empty slices yield 0. Mismatched lengths are an `InvalidArgument` error.
///
/// # Example
///
/// ```
/// use gbt_kernels::manhattan_distance_f32;
///
/// let x = [1.0f32, 2.0, 3.0, 4.0];
/// let y = [4.0f32, 3.0, 2.0, 1.0];
/// assert_eq!(manhattan_distance_f32(&x, &y).unwrap(), 8.0);
/// ```
pub fn manhattan_distance_f32(x: &[f32], y: &[f32]) -> Result<f32> {
    check_lengths(x.len(), y.len())?;
    Ok(dispatch::manhattan_f32(x, y))
}

/// Compute the Manhattan (L1) distance between two equal-length f64 slices.
///
/// Empty slices yield 0. Mismatched lengths are an `InvalidArgument` error.
pub fn manhattan_distance_f64(x: &[f64], y: &[f64]) -> Result<f64> {
    check_lengths(x.len(), y.len())?;
    Ok(dispatch::manhattan_f64(x, y))
}

#[inline]
fn check_lengths(x_len: usize, y_len: usize) -> Result<()> {
    if x_len != y_len {
        return Err(KernelError::invalid_argument(format!(
            "input lengths must match: {} vs {}",
            x_len, y_len
        )));
    }
    Ok(())
}
