//! Portable SIMD implementations using the `wide` crate.
//!
//! These implementations work on any platform and serve as the fallback
//! when architecture-specific optimizations are not available.

use crate::simd::traits::*;
use wide::{f32x8, f64x4};

// ============================================================================
// F32x8 - 8-lane f32 SIMD
// ============================================================================

/// 8-lane f32 SIMD vector using the `wide` crate.
#[derive(Clone, Copy)]
pub struct PortableF32x8(pub f32x8);

impl SimdVector for PortableF32x8 {
    type Element = f32;
    const LANES: usize = 8;

    #[inline]
    fn zero() -> Self {
        Self(f32x8::ZERO)
    }

    #[inline]
    fn splat(value: f32) -> Self {
        Self(f32x8::splat(value))
    }

    #[inline]
    fn load(slice: &[f32]) -> Self {
        debug_assert!(slice.len() >= 8);
        Self(f32x8::new([
            slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
        ]))
    }

    #[inline]
    fn store(self, slice: &mut [f32]) {
        debug_assert!(slice.len() >= 8);
        let arr = self.0.to_array();
        slice[..8].copy_from_slice(&arr);
    }
}

impl SimdAdd for PortableF32x8 {
    #[inline]
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl SimdHorizontal for PortableF32x8 {
    #[inline]
    fn horizontal_sum(self) -> f32 {
        self.0.reduce_add()
    }
}

impl SimdReal for PortableF32x8 {
    #[inline]
    fn abs_diff(self, other: Self) -> Self {
        Self((self.0 - other.0).abs())
    }
}

impl SimdGather for PortableF32x8 {
    #[inline]
    fn gather(base: &[f32], indices: &[u32]) -> Self {
        debug_assert!(indices.len() >= 8);
        Self(f32x8::new([
            base[indices[0] as usize],
            base[indices[1] as usize],
            base[indices[2] as usize],
            base[indices[3] as usize],
            base[indices[4] as usize],
            base[indices[5] as usize],
            base[indices[6] as usize],
            base[indices[7] as usize],
        ]))
    }
}

// ============================================================================
// F64x4 - 4-lane f64 SIMD
// ============================================================================

/// 4-lane f64 SIMD vector using the `wide` crate.
#[derive(Clone, Copy)]
pub struct PortableF64x4(pub f64x4);

impl PortableF64x4 {
    /// Widen 4 contiguous f32 values into f64 lanes.
    ///
    /// The histogram kernel accumulates f32 statistics into f64 bins, so
    /// loads of the per-sample arrays widen on the way in.
    #[inline]
    pub fn from_f32(slice: &[f32]) -> Self {
        debug_assert!(slice.len() >= 4);
        Self(f64x4::new([
            slice[0] as f64,
            slice[1] as f64,
            slice[2] as f64,
            slice[3] as f64,
        ]))
    }
}

impl SimdVector for PortableF64x4 {
    type Element = f64;
    const LANES: usize = 4;

    #[inline]
    fn zero() -> Self {
        Self(f64x4::ZERO)
    }

    #[inline]
    fn splat(value: f64) -> Self {
        Self(f64x4::splat(value))
    }

    #[inline]
    fn load(slice: &[f64]) -> Self {
        debug_assert!(slice.len() >= 4);
        Self(f64x4::new([slice[0], slice[1], slice[2], slice[3]]))
    }

    #[inline]
    fn store(self, slice: &mut [f64]) {
        debug_assert!(slice.len() >= 4);
        let arr = self.0.to_array();
        slice[..4].copy_from_slice(&arr);
    }
}

impl SimdAdd for PortableF64x4 {
    #[inline]
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl SimdHorizontal for PortableF64x4 {
    #[inline]
    fn horizontal_sum(self) -> f64 {
        self.0.reduce_add()
    }
}

impl SimdReal for PortableF64x4 {
    #[inline]
    fn abs_diff(self, other: Self) -> Self {
        Self((self.0 - other.0).abs())
    }
}

impl SimdGather for PortableF64x4 {
    #[inline]
    fn gather(base: &[f64], indices: &[u32]) -> Self {
        debug_assert!(indices.len() >= 4);
        Self(f64x4::new([
            base[indices[0] as usize],
            base[indices[1] as usize],
            base[indices[2] as usize],
            base[indices[3] as usize],
        ]))
    }
}

// ============================================================================
// Convenience type aliases
// ============================================================================

/// Default f32 SIMD type for the current platform.
pub type F32Simd = PortableF32x8;

/// Default f64 SIMD type for the current platform.
pub type F64Simd = PortableF64x4;
