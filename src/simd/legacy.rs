//! Legacy fixed-width Manhattan-distance kernels.
//!
//! An earlier generation of the distance kernel written directly against
//! 128-bit SSE2 registers (4 x f32 or 2 x f64), with no lane abstraction and
//! no runtime dispatch. The dispatched kernels in [`crate::simd::dispatch`]
//! supersede these; they are kept as a minimal reference implementation of
//! the two-accumulator unroll and remainder policy, and the test suite runs
//! them against the production paths.
//!
//! SSE2 is part of the x86_64 baseline, so these functions are safe to call
//! on any x86_64 CPU.

#![cfg(target_arch = "x86_64")]

use std::arch::x86_64::*;

/// Horizontal sum of a 128-bit f32x4 register using SSE2 shuffles.
#[inline]
fn horizontal_sum_f32_sse2(v: __m128) -> f32 {
    unsafe {
        let hi = _mm_movehl_ps(v, v);
        let sum2 = _mm_add_ps(v, hi);
        let hi1 = _mm_shuffle_ps(sum2, sum2, 0x55);
        let sum1 = _mm_add_ss(sum2, hi1);
        _mm_cvtss_f32(sum1)
    }
}

/// Horizontal sum of a 128-bit f64x2 register using SSE2 shuffles.
#[inline]
fn horizontal_sum_f64_sse2(v: __m128d) -> f64 {
    unsafe {
        let hi = _mm_unpackhi_pd(v, v);
        _mm_cvtsd_f64(_mm_add_sd(v, hi))
    }
}

/// Fixed-width Manhattan (L1) distance over f32 slices.
///
/// Processes 8 elements per iteration (two 4-lane registers), then a scalar
/// tail. Same contract and remainder policy as the dispatched kernel, minus
/// the multi-target machinery.
pub fn manhattan_sse2_f32(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());

    let n = x.len();
    let vec_end = n - n % 8;

    unsafe {
        let sign_mask = _mm_set1_ps(-0.0);
        let mut sum_1 = _mm_setzero_ps();
        let mut sum_2 = _mm_setzero_ps();

        let mut i = 0;
        while i < vec_end {
            let x_1 = _mm_loadu_ps(x.as_ptr().add(i));
            let y_1 = _mm_loadu_ps(y.as_ptr().add(i));
            sum_1 = _mm_add_ps(sum_1, _mm_andnot_ps(sign_mask, _mm_sub_ps(x_1, y_1)));

            let x_2 = _mm_loadu_ps(x.as_ptr().add(i + 4));
            let y_2 = _mm_loadu_ps(y.as_ptr().add(i + 4));
            sum_2 = _mm_add_ps(sum_2, _mm_andnot_ps(sign_mask, _mm_sub_ps(x_2, y_2)));

            i += 8;
        }

        let mut result = horizontal_sum_f32_sse2(_mm_add_ps(sum_1, sum_2));

        for j in vec_end..n {
            result += (x[j] - y[j]).abs();
        }

        result
    }
}

/// Fixed-width Manhattan (L1) distance over f64 slices.
///
/// Processes 4 elements per iteration (two 2-lane registers), then a scalar
/// tail.
pub fn manhattan_sse2_f64(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());

    let n = x.len();
    let vec_end = n - n % 4;

    unsafe {
        let sign_mask = _mm_set1_pd(-0.0);
        let mut sum_1 = _mm_setzero_pd();
        let mut sum_2 = _mm_setzero_pd();

        let mut i = 0;
        while i < vec_end {
            let x_1 = _mm_loadu_pd(x.as_ptr().add(i));
            let y_1 = _mm_loadu_pd(y.as_ptr().add(i));
            sum_1 = _mm_add_pd(sum_1, _mm_andnot_pd(sign_mask, _mm_sub_pd(x_1, y_1)));

            let x_2 = _mm_loadu_pd(x.as_ptr().add(i + 2));
            let y_2 = _mm_loadu_pd(y.as_ptr().add(i + 2));
            sum_2 = _mm_add_pd(sum_2, _mm_andnot_pd(sign_mask, _mm_sub_pd(x_2, y_2)));

            i += 4;
        }

        let mut result = horizontal_sum_f64_sse2(_mm_add_pd(sum_1, sum_2));

        for j in vec_end..n {
            result += (x[j] - y[j]).abs();
        }

        result
    }
}
