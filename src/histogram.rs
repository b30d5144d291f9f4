//! Histogram accumulation for gradient-boosted-tree training.
//!
//! Each training sample carries a bin id (from an upstream feature-binning
//! step), a gradient, and a hessian. [`build_histogram`] aggregates them into
//! per-bin running sums and counts, held in caller-owned parallel arrays
//! borrowed through [`HistogramAccumulator`].
//!
//! Bins accumulate in f64 even though the per-sample statistics are f32:
//! split-gain computation downstream takes differences of large sums, which
//! loses precision in f32.
//!
//! The result is exact for every bin regardless of sample order or of bin
//! collisions inside a vectorization chunk; the vector path only runs on
//! chunks whose bin ids are pairwise distinct, everything else serializes
//! through a scalar loop.

use crate::error::{KernelError, Result};
use crate::simd::dispatch;

/// Mutable view over the three caller-owned, bin-indexed accumulator arrays.
///
/// The arrays must be equal-length (their common length is the bin count)
/// and are typically zero-initialized before the first
/// [`build_histogram`] call. The accumulator never resizes or reallocates
/// them; repeated calls keep accumulating into the same bins.
#[derive(Debug)]
pub struct HistogramAccumulator<'a> {
    sum_gradients: &'a mut [f64],
    sum_hessians: &'a mut [f64],
    count: &'a mut [u32],
}

impl<'a> HistogramAccumulator<'a> {
    /// Create an accumulator over three parallel per-bin arrays.
    ///
    /// Returns `InvalidArgument` if the arrays differ in length.
    pub fn new(
        sum_gradients: &'a mut [f64],
        sum_hessians: &'a mut [f64],
        count: &'a mut [u32],
    ) -> Result<Self> {
        if sum_gradients.len() != sum_hessians.len() || sum_gradients.len() != count.len() {
            return Err(KernelError::invalid_argument(format!(
                "accumulator arrays must be equal-length: {} / {} / {}",
                sum_gradients.len(),
                sum_hessians.len(),
                count.len()
            )));
        }
        Ok(Self {
            sum_gradients,
            sum_hessians,
            count,
        })
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.count.len()
    }

    /// Per-bin gradient sums.
    pub fn sum_gradients(&self) -> &[f64] {
        self.sum_gradients
    }

    /// Per-bin hessian sums.
    pub fn sum_hessians(&self) -> &[f64] {
        self.sum_hessians
    }

    /// Per-bin sample counts.
    pub fn count(&self) -> &[u32] {
        self.count
    }

    /// Zero all bins.
    pub fn clear(&mut self) {
        self.sum_gradients.fill(0.0);
        self.sum_hessians.fill(0.0);
        self.count.fill(0);
    }

    /// Subtract another histogram bin-wise: `self -= other`.
    ///
    /// This is the sibling trick used by tree growers: the histogram of one
    /// child is the parent's histogram minus the other child's, which is far
    /// cheaper than a second accumulation pass.
    ///
    /// Returns `InvalidArgument` if the bin counts differ, or if any bin of
    /// `other` counts more samples than the same bin of `self` (i.e. `other`
    /// is not a sub-histogram). Validation happens before any mutation.
    pub fn subtract(&mut self, other: &HistogramAccumulator<'_>) -> Result<()> {
        self.check_same_bins(other)?;
        if let Some(b) = (0..self.count.len()).find(|&b| other.count[b] > self.count[b]) {
            return Err(KernelError::invalid_argument(format!(
                "bin {}: cannot subtract count {} from {}",
                b, other.count[b], self.count[b]
            )));
        }
        for b in 0..self.count.len() {
            self.sum_gradients[b] -= other.sum_gradients[b];
            self.sum_hessians[b] -= other.sum_hessians[b];
            self.count[b] -= other.count[b];
        }
        Ok(())
    }

    /// Merge another histogram bin-wise: `self += other`.
    pub fn merge(&mut self, other: &HistogramAccumulator<'_>) -> Result<()> {
        self.check_same_bins(other)?;
        for b in 0..self.count.len() {
            self.sum_gradients[b] += other.sum_gradients[b];
            self.sum_hessians[b] += other.sum_hessians[b];
            self.count[b] += other.count[b];
        }
        Ok(())
    }

    /// Total (sum_gradients, sum_hessians, count) over all bins.
    pub fn totals(&self) -> (f64, f64, u64) {
        let g = self.sum_gradients.iter().sum();
        let h = self.sum_hessians.iter().sum();
        let c = self.count.iter().map(|&c| c as u64).sum();
        (g, h, c)
    }

    fn check_same_bins(&self, other: &HistogramAccumulator<'_>) -> Result<()> {
        if self.n_bins() != other.n_bins() {
            return Err(KernelError::invalid_argument(format!(
                "bin counts must match: {} vs {}",
                self.n_bins(),
                other.n_bins()
            )));
        }
        Ok(())
    }
}

/// Accumulate per-sample gradient/hessian contributions into per-bin sums.
///
/// For every bin `b`, adds the exact sum of `gradients[i]` over all samples
/// with `bins[i] == b` to `out.sum_gradients[b]` (and analogously for
/// hessians and count), independent of sample order.
///
/// Returns `InvalidArgument` if the per-sample arrays are not index-aligned
/// with `bins`, or if any bin id is out of range for `out`.
pub fn build_histogram(
    bins: &[u32],
    gradients: &[f32],
    hessians: &[f32],
    out: &mut HistogramAccumulator<'_>,
) -> Result<()> {
    if gradients.len() != bins.len() || hessians.len() != bins.len() {
        return Err(KernelError::invalid_argument(format!(
            "per-sample arrays must be index-aligned: bins {} / gradients {} / hessians {}",
            bins.len(),
            gradients.len(),
            hessians.len()
        )));
    }

    let n_bins = out.n_bins();
    if let Some(&bad) = bins.iter().find(|&&b| b as usize >= n_bins) {
        return Err(KernelError::invalid_argument(format!(
            "bin id {} out of range for {} bins",
            bad, n_bins
        )));
    }

    dispatch::accumulate_histogram(
        bins,
        gradients,
        hessians,
        out.sum_gradients,
        out.sum_hessians,
        out.count,
    );
    Ok(())
}
