//! x86_64-specific SIMD implementations using AVX2 intrinsics.
//!
//! These implementations provide maximum performance on modern x86_64 CPUs.
//! They require the AVX2 instruction set.
//!
//! Note: These functions are unsafe and require that AVX2 is supported.
//! Use the dispatch module for safe access with automatic feature detection.

#![cfg(target_arch = "x86_64")]

use std::arch::x86_64::*;

/// Check if AVX2 is supported at runtime.
#[inline]
pub fn is_avx2_supported() -> bool {
    is_x86_feature_detected!("avx2")
}

/// Compute horizontal sum of an AVX2 f32x8 register.
///
/// # Safety
/// Caller must ensure AVX2 is supported.
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_sum_f32_avx2(v: __m256) -> f32 {
    // Sum within 128-bit lanes
    let hi = _mm256_extractf128_ps(v, 1);
    let lo = _mm256_castps256_ps128(v);
    let sum128 = _mm_add_ps(lo, hi);

    // Horizontal add within 128-bit register
    let shuf = _mm_movehdup_ps(sum128);
    let sums = _mm_add_ps(sum128, shuf);
    let shuf = _mm_movehl_ps(sums, sums);
    let sums = _mm_add_ss(sums, shuf);

    _mm_cvtss_f32(sums)
}

/// Compute horizontal sum of an AVX2 f64x4 register.
///
/// # Safety
/// Caller must ensure AVX2 is supported.
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_sum_f64_avx2(v: __m256d) -> f64 {
    let hi = _mm256_extractf128_pd(v, 1);
    let lo = _mm256_castpd256_pd128(v);
    let sum128 = _mm_add_pd(lo, hi);

    let hi64 = _mm_unpackhi_pd(sum128, sum128);
    let sum = _mm_add_sd(sum128, hi64);

    _mm_cvtsd_f64(sum)
}

/// Compute Manhattan (L1) distance of two f32 slices using AVX2.
///
/// Processes 16 elements per iteration with two independent accumulators,
/// then 8-element chunks into the first accumulator, then a scalar tail.
///
/// # Safety
/// Caller must ensure AVX2 is supported.
#[target_feature(enable = "avx2")]
pub unsafe fn manhattan_avx2_f32(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());

    let n = x.len();
    let vec_end = n - n % 16;
    let lane_end = n - n % 8;

    // abs: clear the sign bit with andnot
    let sign_mask = _mm256_set1_ps(-0.0);
    let mut sum_1 = _mm256_setzero_ps();
    let mut sum_2 = _mm256_setzero_ps();

    let mut i = 0;
    while i < vec_end {
        let x_1 = _mm256_loadu_ps(x.as_ptr().add(i));
        let y_1 = _mm256_loadu_ps(y.as_ptr().add(i));
        sum_1 = _mm256_add_ps(sum_1, _mm256_andnot_ps(sign_mask, _mm256_sub_ps(x_1, y_1)));

        let x_2 = _mm256_loadu_ps(x.as_ptr().add(i + 8));
        let y_2 = _mm256_loadu_ps(y.as_ptr().add(i + 8));
        sum_2 = _mm256_add_ps(sum_2, _mm256_andnot_ps(sign_mask, _mm256_sub_ps(x_2, y_2)));

        i += 16;
    }
    while i < lane_end {
        let x_1 = _mm256_loadu_ps(x.as_ptr().add(i));
        let y_1 = _mm256_loadu_ps(y.as_ptr().add(i));
        sum_1 = _mm256_add_ps(sum_1, _mm256_andnot_ps(sign_mask, _mm256_sub_ps(x_1, y_1)));
        i += 8;
    }

    let mut result = horizontal_sum_f32_avx2(_mm256_add_ps(sum_1, sum_2));

    for j in lane_end..n {
        result += (x[j] - y[j]).abs();
    }

    result
}

/// Compute Manhattan (L1) distance of two f64 slices using AVX2.
///
/// # Safety
/// Caller must ensure AVX2 is supported.
#[target_feature(enable = "avx2")]
pub unsafe fn manhattan_avx2_f64(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());

    let n = x.len();
    let vec_end = n - n % 8;
    let lane_end = n - n % 4;

    let sign_mask = _mm256_set1_pd(-0.0);
    let mut sum_1 = _mm256_setzero_pd();
    let mut sum_2 = _mm256_setzero_pd();

    let mut i = 0;
    while i < vec_end {
        let x_1 = _mm256_loadu_pd(x.as_ptr().add(i));
        let y_1 = _mm256_loadu_pd(y.as_ptr().add(i));
        sum_1 = _mm256_add_pd(sum_1, _mm256_andnot_pd(sign_mask, _mm256_sub_pd(x_1, y_1)));

        let x_2 = _mm256_loadu_pd(x.as_ptr().add(i + 4));
        let y_2 = _mm256_loadu_pd(y.as_ptr().add(i + 4));
        sum_2 = _mm256_add_pd(sum_2, _mm256_andnot_pd(sign_mask, _mm256_sub_pd(x_2, y_2)));

        i += 8;
    }
    while i < lane_end {
        let x_1 = _mm256_loadu_pd(x.as_ptr().add(i));
        let y_1 = _mm256_loadu_pd(y.as_ptr().add(i));
        sum_1 = _mm256_add_pd(sum_1, _mm256_andnot_pd(sign_mask, _mm256_sub_pd(x_1, y_1)));
        i += 4;
    }

    let mut result = horizontal_sum_f64_avx2(_mm256_add_pd(sum_1, sum_2));

    for j in lane_end..n {
        result += (x[j] - y[j]).abs();
    }

    result
}

/// Returns true if the 4 bin indices starting at `chunk` contain a duplicate.
#[inline]
fn chunk_has_collision(chunk: &[u32]) -> bool {
    debug_assert!(chunk.len() >= 4);
    chunk[0] == chunk[1]
        || chunk[0] == chunk[2]
        || chunk[0] == chunk[3]
        || chunk[1] == chunk[2]
        || chunk[1] == chunk[3]
        || chunk[2] == chunk[3]
}

/// Accumulate per-sample statistics into histogram bins using AVX2 gathers.
///
/// Four samples are processed per iteration: the current per-bin sums are
/// gathered with `vgatherdpd`, the widened f32 statistics are added, and the
/// updated lanes are written back one by one (AVX2 has no scatter). A chunk
/// whose four bin indices are not pairwise distinct would lose contributions
/// to the last writer, so such chunks are serialized through the scalar loop
/// instead.
///
/// All bin indices must be valid for the output slices; the safe entry point
/// validates this before dispatching here.
///
/// # Safety
/// Caller must ensure AVX2 is supported.
#[target_feature(enable = "avx2")]
pub unsafe fn accumulate_histogram_avx2(
    bins: &[u32],
    gradients: &[f32],
    hessians: &[f32],
    sum_gradients: &mut [f64],
    sum_hessians: &mut [f64],
    count: &mut [u32],
) {
    debug_assert_eq!(bins.len(), gradients.len());
    debug_assert_eq!(bins.len(), hessians.len());

    let n = bins.len();
    let vec_end = n - n % 4;

    let mut i = 0;
    while i < vec_end {
        let chunk = &bins[i..i + 4];
        if chunk_has_collision(chunk) {
            for lane in 0..4 {
                let bin = chunk[lane] as usize;
                sum_gradients[bin] += gradients[i + lane] as f64;
                sum_hessians[bin] += hessians[i + lane] as f64;
                count[bin] += 1;
            }
        } else {
            let idx = _mm_loadu_si128(chunk.as_ptr() as *const __m128i);

            let g_cur = _mm256_i32gather_pd(sum_gradients.as_ptr(), idx, 8);
            let g_add = _mm256_cvtps_pd(_mm_loadu_ps(gradients.as_ptr().add(i)));
            let mut g_upd = [0.0f64; 4];
            _mm256_storeu_pd(g_upd.as_mut_ptr(), _mm256_add_pd(g_cur, g_add));

            let h_cur = _mm256_i32gather_pd(sum_hessians.as_ptr(), idx, 8);
            let h_add = _mm256_cvtps_pd(_mm_loadu_ps(hessians.as_ptr().add(i)));
            let mut h_upd = [0.0f64; 4];
            _mm256_storeu_pd(h_upd.as_mut_ptr(), _mm256_add_pd(h_cur, h_add));

            for lane in 0..4 {
                let bin = chunk[lane] as usize;
                sum_gradients[bin] = g_upd[lane];
                sum_hessians[bin] = h_upd[lane];
                count[bin] += 1;
            }
        }
        i += 4;
    }

    for j in vec_end..n {
        let bin = bins[j] as usize;
        sum_gradients[bin] += gradients[j] as f64;
        sum_hessians[bin] += hessians[j] as f64;
        count[bin] += 1;
    }
}
