//! Baseline scalar implementations.
//!
//! These are the reference implementations every vector target is tested
//! against, and the fallback when the dispatch layer finds nothing better.
//! They carry no lane abstraction at all, so they compile anywhere.

/// Manhattan (L1) distance over f32 slices, scalar loop.
#[inline]
pub fn manhattan_f32(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());
    let mut sum = 0.0f32;
    for i in 0..x.len() {
        sum += (x[i] - y[i]).abs();
    }
    sum
}

/// Manhattan (L1) distance over f64 slices, scalar loop.
#[inline]
pub fn manhattan_f64(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let mut sum = 0.0f64;
    for i in 0..x.len() {
        sum += (x[i] - y[i]).abs();
    }
    sum
}

/// Accumulate per-sample statistics into per-bin histogram slots, scalar loop.
///
/// Each sample adds its gradient to `sum_gradients[bin]`, its hessian to
/// `sum_hessians[bin]`, and bumps `count[bin]`. This path serializes every
/// read-modify-write, so it is correct for any bin pattern including
/// duplicates; the vector paths fall back to it whenever a chunk has
/// colliding bins.
#[inline]
pub fn accumulate_histogram(
    bins: &[u32],
    gradients: &[f32],
    hessians: &[f32],
    sum_gradients: &mut [f64],
    sum_hessians: &mut [f64],
    count: &mut [u32],
) {
    debug_assert_eq!(bins.len(), gradients.len());
    debug_assert_eq!(bins.len(), hessians.len());

    for i in 0..bins.len() {
        let bin = bins[i] as usize;
        sum_gradients[bin] += gradients[i] as f64;
        sum_hessians[bin] += hessians[i] as f64;
        count[bin] += 1;
    }
}
