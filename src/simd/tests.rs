//! Tests for SIMD implementations.

#[cfg(test)]
mod tests {
    use crate::simd::dispatch::*;
    use crate::simd::portable::*;
    use crate::simd::scalar;
    use crate::simd::traits::*;
    use rand::prelude::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Double-precision reference sum for f32 inputs; tolerance scales with n
    /// to absorb summation-order differences between lane widths.
    fn manhattan_ref(x: &[f32], y: &[f32]) -> f64 {
        x.iter()
            .zip(y.iter())
            .map(|(&a, &b)| ((a as f64) - (b as f64)).abs())
            .sum()
    }

    fn random_f32(n: usize, seed: u64) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen::<f32>() * 2.0 - 1.0).collect()
    }

    // ========================================================================
    // Portable lane type tests
    // ========================================================================

    #[test]
    fn test_f32x8_zero() {
        let mut arr = [1.0f32; 8];
        PortableF32x8::zero().store(&mut arr);
        assert!(arr.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_f32x8_load_store() {
        let input = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let v = PortableF32x8::load(&input);
        let mut output = [0.0f32; 8];
        v.store(&mut output);
        assert_eq!(input, output);
    }

    #[test]
    fn test_f32x8_abs_diff() {
        let a = PortableF32x8::load(&[1.0, 5.0, -3.0, 4.0, 0.0, -6.0, 7.0, 8.0]);
        let b = PortableF32x8::load(&[4.0, 2.0, 3.0, 4.0, -1.0, 6.0, 2.0, 10.0]);
        let mut arr = [0.0f32; 8];
        a.abs_diff(b).store(&mut arr);
        let expected = [3.0, 3.0, 6.0, 0.0, 1.0, 12.0, 5.0, 2.0];
        for i in 0..8 {
            assert!(approx_eq(arr[i], expected[i]));
        }
    }

    #[test]
    fn test_f32x8_horizontal_sum() {
        let v = PortableF32x8::load(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert!(approx_eq(v.horizontal_sum(), 36.0));
    }

    #[test]
    fn test_f64x4_horizontal_sum() {
        let v = PortableF64x4::load(&[1.5, 2.5, 3.5, 4.5]);
        assert!((v.horizontal_sum() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_f64x4_gather() {
        let base = [10.0f64, 11.0, 12.0, 13.0, 14.0, 15.0];
        let v = PortableF64x4::gather(&base, &[5, 0, 3, 3]);
        let mut arr = [0.0f64; 4];
        v.store(&mut arr);
        assert_eq!(arr, [15.0, 10.0, 13.0, 13.0]);
    }

    #[test]
    fn test_f32x8_gather() {
        let base: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let idx = [15u32, 0, 7, 8, 1, 1, 2, 3];
        let v = PortableF32x8::gather(&base, &idx);
        let mut arr = [0.0f32; 8];
        v.store(&mut arr);
        for lane in 0..8 {
            assert_eq!(arr[lane], idx[lane] as f32);
        }
    }

    #[test]
    fn test_f64x4_from_f32_widen() {
        let v = PortableF64x4::from_f32(&[1.5f32, -2.5, 0.0, 8.25]);
        let mut arr = [0.0f64; 4];
        v.store(&mut arr);
        assert_eq!(arr, [1.5, -2.5, 0.0, 8.25]);
    }

    // ========================================================================
    // Manhattan kernel: boundary lengths around the unroll/remainder split
    // ========================================================================

    #[test]
    fn test_manhattan_f32_boundary_lengths() {
        // L = 8 for the portable f32 target; cover 0, 1, L-1, L, L+1,
        // 2L-1, 2L, 2L+1 plus a few longer lengths.
        for &n in &[0usize, 1, 7, 8, 9, 15, 16, 17, 31, 32, 33, 100] {
            let x = random_f32(n, 1);
            let y = random_f32(n, 2);

            let result = manhattan_f32_portable(&x, &y) as f64;
            let expected = manhattan_ref(&x, &y);
            let tol = 1e-5 * (n.max(1) as f64);
            assert!(
                (result - expected).abs() < tol,
                "n={}: {} vs {}",
                n,
                result,
                expected
            );
        }
    }

    #[test]
    fn test_manhattan_f64_boundary_lengths() {
        // L = 4 for the portable f64 target.
        for &n in &[0usize, 1, 3, 4, 5, 7, 8, 9, 63, 64, 65] {
            let x: Vec<f64> = random_f32(n, 3).iter().map(|&v| v as f64).collect();
            let y: Vec<f64> = random_f32(n, 4).iter().map(|&v| v as f64).collect();

            let result = manhattan_f64_portable(&x, &y);
            let expected = scalar::manhattan_f64(&x, &y);
            assert!((result - expected).abs() < 1e-12 * (n.max(1) as f64));
        }
    }

    #[test]
    fn test_manhattan_symmetry() {
        let x = random_f32(53, 5);
        let y = random_f32(53, 6);
        assert_eq!(manhattan_f32(&x, &y), manhattan_f32(&y, &x));
    }

    #[test]
    fn test_manhattan_identity() {
        let x = random_f32(41, 7);
        assert_eq!(manhattan_f32(&x, &x), 0.0);
    }

    // ========================================================================
    // Cross-target consistency: force every compiled target
    // ========================================================================

    #[test]
    fn test_manhattan_f32_targets_agree() {
        let x = random_f32(237, 8);
        let y = random_f32(237, 9);
        let reference = manhattan_ref(&x, &y);
        let tol = 1e-4 * x.len() as f64;

        assert!((scalar::manhattan_f32(&x, &y) as f64 - reference).abs() < tol);
        assert!((manhattan_f32_portable(&x, &y) as f64 - reference).abs() < tol);
        assert!((manhattan_f32(&x, &y) as f64 - reference).abs() < tol);

        #[cfg(target_arch = "x86_64")]
        {
            assert!(
                (crate::simd::legacy::manhattan_sse2_f32(&x, &y) as f64 - reference).abs() < tol
            );
            if crate::simd::x86::is_avx2_supported() {
                let avx2 = unsafe { crate::simd::x86::manhattan_avx2_f32(&x, &y) };
                assert!((avx2 as f64 - reference).abs() < tol);
            }
        }
    }

    #[test]
    fn test_manhattan_f64_targets_agree() {
        let x: Vec<f64> = random_f32(145, 10).iter().map(|&v| v as f64).collect();
        let y: Vec<f64> = random_f32(145, 11).iter().map(|&v| v as f64).collect();
        let reference = scalar::manhattan_f64(&x, &y);
        let tol = 1e-12 * x.len() as f64;

        assert!((manhattan_f64_portable(&x, &y) - reference).abs() < tol);
        assert!((manhattan_f64(&x, &y) - reference).abs() < tol);

        #[cfg(target_arch = "x86_64")]
        {
            assert!((crate::simd::legacy::manhattan_sse2_f64(&x, &y) - reference).abs() < tol);
            if crate::simd::x86::is_avx2_supported() {
                let avx2 = unsafe { crate::simd::x86::manhattan_avx2_f64(&x, &y) };
                assert!((avx2 - reference).abs() < tol);
            }
        }
    }

    // ========================================================================
    // Histogram kernel
    // ========================================================================

    fn run_histogram_portable(
        bins: &[u32],
        gradients: &[f32],
        hessians: &[f32],
        n_bins: usize,
    ) -> (Vec<f64>, Vec<f64>, Vec<u32>) {
        let mut sum_g = vec![0.0f64; n_bins];
        let mut sum_h = vec![0.0f64; n_bins];
        let mut count = vec![0u32; n_bins];
        accumulate_histogram_portable(
            bins, gradients, hessians, &mut sum_g, &mut sum_h, &mut count,
        );
        (sum_g, sum_h, count)
    }

    #[test]
    fn test_histogram_collision_chunk() {
        // A full vector chunk of samples sharing one bin is the regression
        // case for gather-based accumulation: every contribution must land.
        let bins = vec![2u32; 8];
        let gradients: Vec<f32> = (1..=8).map(|i| i as f32).collect();
        let hessians = vec![1.0f32; 8];

        let (sum_g, sum_h, count) = run_histogram_portable(&bins, &gradients, &hessians, 4);

        assert_eq!(sum_g[2], 36.0);
        assert_eq!(sum_h[2], 8.0);
        assert_eq!(count[2], 8);
        assert_eq!(count[0] + count[1] + count[3], 0);
    }

    #[test]
    fn test_histogram_partial_collision_chunk() {
        // Duplicates within a chunk but not chunk-wide.
        let bins = [0u32, 1, 0, 2, 3, 3, 1, 2, 5];
        let gradients = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let hessians = [0.5f32; 9];

        let (sum_g, _, count) = run_histogram_portable(&bins, &gradients, &hessians, 6);

        assert_eq!(sum_g, vec![4.0, 9.0, 12.0, 11.0, 0.0, 9.0]);
        assert_eq!(count, vec![2, 2, 2, 2, 0, 1]);
    }

    #[test]
    fn test_histogram_order_independence() {
        let bins = [3u32, 0, 1, 2, 3, 1, 0, 2, 1, 3, 0];
        let gradients: Vec<f32> = (0..11).map(|i| i as f32 * 0.25).collect();
        let hessians: Vec<f32> = (0..11).map(|i| 1.0 + i as f32 * 0.125).collect();

        let forward = run_histogram_portable(&bins, &gradients, &hessians, 4);

        // Reverse the sample order; same per-bin result.
        let rbins: Vec<u32> = bins.iter().rev().copied().collect();
        let rgrad: Vec<f32> = gradients.iter().rev().copied().collect();
        let rhess: Vec<f32> = hessians.iter().rev().copied().collect();
        let reversed = run_histogram_portable(&rbins, &rgrad, &rhess, 4);

        assert_eq!(forward.2, reversed.2);
        for b in 0..4 {
            assert!((forward.0[b] - reversed.0[b]).abs() < 1e-9);
            assert!((forward.1[b] - reversed.1[b]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_histogram_matches_scalar() {
        let n = 513;
        let mut rng = StdRng::seed_from_u64(12);
        let bins: Vec<u32> = (0..n).map(|_| rng.gen_range(0..32u32)).collect();
        let gradients = random_f32(n, 13);
        let hessians: Vec<f32> = random_f32(n, 14).iter().map(|&v| v.abs()).collect();

        let vectorized = run_histogram_portable(&bins, &gradients, &hessians, 32);

        let mut sum_g = vec![0.0f64; 32];
        let mut sum_h = vec![0.0f64; 32];
        let mut count = vec![0u32; 32];
        scalar::accumulate_histogram(
            &bins, &gradients, &hessians, &mut sum_g, &mut sum_h, &mut count,
        );

        assert_eq!(vectorized.2, count);
        for b in 0..32 {
            assert!((vectorized.0[b] - sum_g[b]).abs() < 1e-9);
            assert!((vectorized.1[b] - sum_h[b]).abs() < 1e-9);
        }
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_histogram_avx2_matches_scalar() {
        if !crate::simd::x86::is_avx2_supported() {
            return;
        }

        let n = 259;
        let bins: Vec<u32> = (0..n).map(|i| ((i * 7) % 16) as u32).collect();
        let gradients = random_f32(n, 15);
        let hessians = random_f32(n, 16);

        let mut sum_g = vec![0.0f64; 16];
        let mut sum_h = vec![0.0f64; 16];
        let mut count = vec![0u32; 16];
        unsafe {
            crate::simd::x86::accumulate_histogram_avx2(
                &bins, &gradients, &hessians, &mut sum_g, &mut sum_h, &mut count,
            );
        }

        let mut ref_g = vec![0.0f64; 16];
        let mut ref_h = vec![0.0f64; 16];
        let mut ref_c = vec![0u32; 16];
        scalar::accumulate_histogram(
            &bins, &gradients, &hessians, &mut ref_g, &mut ref_h, &mut ref_c,
        );

        assert_eq!(count, ref_c);
        for b in 0..16 {
            assert!((sum_g[b] - ref_g[b]).abs() < 1e-9);
            assert!((sum_h[b] - ref_h[b]).abs() < 1e-9);
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    #[test]
    fn test_simd_support_level() {
        let level = simd_support_level();
        // Should at least be Portable
        assert!(level >= SimdSupportLevel::Portable);
        // And stable across calls (cached).
        assert_eq!(level, simd_support_level());
    }

    #[test]
    fn test_dispatch_from_threads() {
        // Concurrent first use must converge on one cached level.
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(simd_support_level))
            .collect();
        let levels: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(levels.windows(2).all(|w| w[0] == w[1]));
    }
}
