//! Runtime CPU feature detection and dispatch.
//!
//! The best usable target is probed exactly once per process and cached in a
//! [`OnceLock`]; every kernel entry point routes through the cached level.
//! CPU capabilities do not change at runtime, so the cache is immutable after
//! first use and needs no further synchronization. Concurrent first calls
//! race benignly on the probe and converge on the same value.
//!
//! Resolution never fails: when no vector extension is usable the kernels
//! degrade to the portable (or scalar) implementation, which is always
//! compiled.

use std::sync::OnceLock;

use crate::simd::portable::{PortableF32x8, PortableF64x4};
use crate::simd::scalar;
use crate::simd::traits::*;

/// Enumeration of SIMD support levels, ordered from least to most capable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SimdSupportLevel {
    /// No SIMD support (scalar fallback).
    Scalar,
    /// Portable SIMD via the `wide` crate.
    Portable,
    /// AVX2 support (x86_64).
    #[cfg(target_arch = "x86_64")]
    Avx2,
}

static SUPPORT_LEVEL: OnceLock<SimdSupportLevel> = OnceLock::new();

fn detect_support_level() -> SimdSupportLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            return SimdSupportLevel::Avx2;
        }
    }

    SimdSupportLevel::Portable
}

/// The SIMD support level used by the dispatched kernels.
///
/// Probed on first call, cached for the lifetime of the process.
#[inline]
pub fn simd_support_level() -> SimdSupportLevel {
    *SUPPORT_LEVEL.get_or_init(detect_support_level)
}

// ============================================================================
// Dispatched kernel entry points
// ============================================================================

/// Compute Manhattan (L1) distance over f32 slices with automatic dispatch.
pub fn manhattan_f32(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());

    match simd_support_level() {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: level Avx2 means the probe saw AVX2 support
        SimdSupportLevel::Avx2 => unsafe { crate::simd::x86::manhattan_avx2_f32(x, y) },
        SimdSupportLevel::Portable => manhattan_f32_portable(x, y),
        SimdSupportLevel::Scalar => scalar::manhattan_f32(x, y),
    }
}

/// Compute Manhattan (L1) distance over f64 slices with automatic dispatch.
pub fn manhattan_f64(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());

    match simd_support_level() {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: level Avx2 means the probe saw AVX2 support
        SimdSupportLevel::Avx2 => unsafe { crate::simd::x86::manhattan_avx2_f64(x, y) },
        SimdSupportLevel::Portable => manhattan_f64_portable(x, y),
        SimdSupportLevel::Scalar => scalar::manhattan_f64(x, y),
    }
}

/// Accumulate per-sample statistics into histogram bins with automatic
/// dispatch.
///
/// All bin indices must be valid for the output slices; the safe entry point
/// in [`crate::histogram`] validates this before calling.
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

    match simd_support_level() {
        #[cfg(target_arch = "x86_64")]
        // SAFETY: level Avx2 means the probe saw AVX2 support
        SimdSupportLevel::Avx2 => unsafe {
            crate::simd::x86::accumulate_histogram_avx2(
                bins,
                gradients,
                hessians,
                sum_gradients,
                sum_hessians,
                count,
            )
        },
        SimdSupportLevel::Portable => accumulate_histogram_portable(
            bins,
            gradients,
            hessians,
            sum_gradients,
            sum_hessians,
            count,
        ),
        SimdSupportLevel::Scalar => scalar::accumulate_histogram(
            bins,
            gradients,
            hessians,
            sum_gradients,
            sum_hessians,
            count,
        ),
    }
}

// ============================================================================
// Portable implementations
// ============================================================================

/// Generic Manhattan-distance kernel body, instantiated once per lane type.
///
/// The main loop strides `2 * LANES` elements with two independent
/// accumulators to expose instruction-level parallelism; leftover full lanes
/// go into the first accumulator only; anything smaller than a lane is a
/// scalar tail added after the horizontal reduce.
///
/// The lane/remainder split means the summation order differs from a naive
/// scalar loop, so results may differ by normal floating-point rounding
/// across targets. That is accepted and covered by tolerances in the tests.
fn manhattan_generic<V>(x: &[V::Element], y: &[V::Element]) -> V::Element
where
    V: SimdReal,
    V::Element: Real,
{
    debug_assert_eq!(x.len(), y.len());

    let n = x.len();
    let lanes = V::LANES;
    let unroll = lanes * 2;
    let vec_end = n - n % unroll;
    let lane_end = n - n % lanes;

    let mut sum_1 = V::zero();
    let mut sum_2 = V::zero();

    let mut i = 0;
    while i < vec_end {
        let x_1 = V::load(&x[i..]);
        let y_1 = V::load(&y[i..]);
        sum_1 = sum_1.add(x_1.abs_diff(y_1));

        let x_2 = V::load(&x[i + lanes..]);
        let y_2 = V::load(&y[i + lanes..]);
        sum_2 = sum_2.add(x_2.abs_diff(y_2));

        i += unroll;
    }
    while i < lane_end {
        let x_1 = V::load(&x[i..]);
        let y_1 = V::load(&y[i..]);
        sum_1 = sum_1.add(x_1.abs_diff(y_1));
        i += lanes;
    }

    let mut result = sum_1.add(sum_2).horizontal_sum();

    for j in lane_end..n {
        result += x[j].abs_diff(y[j]);
    }

    result
}

/// Portable Manhattan distance over f32 slices (8 lanes).
pub fn manhattan_f32_portable(x: &[f32], y: &[f32]) -> f32 {
    manhattan_generic::<PortableF32x8>(x, y)
}

/// Portable Manhattan distance over f64 slices (4 lanes).
pub fn manhattan_f64_portable(x: &[f64], y: &[f64]) -> f64 {
    manhattan_generic::<PortableF64x4>(x, y)
}

/// Returns true if the bin-index chunk contains a duplicate.
///
/// A duplicated bin inside one vector chunk makes the gather / add /
/// write-back sequence lose all but the last lane's contribution, so such
/// chunks must serialize through the scalar path.
#[inline]
fn chunk_has_collision(chunk: &[u32]) -> bool {
    for i in 1..chunk.len() {
        for j in 0..i {
            if chunk[i] == chunk[j] {
                return true;
            }
        }
    }
    false
}

/// Portable histogram accumulation using the lane abstraction's gather.
///
/// Collision-free chunks of `PortableF64x4::LANES` samples take the
/// gather / add / per-lane write-back path; chunks with duplicate bins and
/// the sub-lane remainder are handled by the scalar loop, which serializes
/// every read-modify-write. Either way the final per-bin sums are exact.
pub fn accumulate_histogram_portable(
    bins: &[u32],
    gradients: &[f32],
    hessians: &[f32],
    sum_gradients: &mut [f64],
    sum_hessians: &mut [f64],
    count: &mut [u32],
) {
    debug_assert_eq!(bins.len(), gradients.len());
    debug_assert_eq!(bins.len(), hessians.len());

    const LANES: usize = PortableF64x4::LANES;

    let n = bins.len();
    let vec_end = n - n % LANES;

    let mut i = 0;
    while i < vec_end {
        let chunk = &bins[i..i + LANES];
        if chunk_has_collision(chunk) {
            scalar::accumulate_histogram(
                chunk,
                &gradients[i..i + LANES],
                &hessians[i..i + LANES],
                sum_gradients,
                sum_hessians,
                count,
            );
        } else {
            let g_cur = PortableF64x4::gather(sum_gradients, chunk);
            let g_upd = g_cur.add(PortableF64x4::from_f32(&gradients[i..]));
            let mut g_lanes = [0.0f64; LANES];
            g_upd.store(&mut g_lanes);

            let h_cur = PortableF64x4::gather(sum_hessians, chunk);
            let h_upd = h_cur.add(PortableF64x4::from_f32(&hessians[i..]));
            let mut h_lanes = [0.0f64; LANES];
            h_upd.store(&mut h_lanes);

            for lane in 0..LANES {
                let bin = chunk[lane] as usize;
                sum_gradients[bin] = g_lanes[lane];
                sum_hessians[bin] = h_lanes[lane];
                count[bin] += 1;
            }
        }
        i += LANES;
    }

    scalar::accumulate_histogram(
        &bins[vec_end..],
        &gradients[vec_end..],
        &hessians[vec_end..],
        sum_gradients,
        sum_hessians,
        count,
    );
}
