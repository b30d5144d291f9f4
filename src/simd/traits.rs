//! Core SIMD traits defining the interface for vectorized operations.
//!
//! These traits describe "process `LANES` elements of one scalar type per
//! vector operation". Kernel bodies are written once against this interface
//! and instantiated per lane type, so the same loop structure runs with an
//! 8-lane f32 vector, a 4-lane f64 vector, or whatever a future target
//! provides.
//!
//! All operations are pure and stateless. Staying in bounds is the calling
//! kernel's responsibility; implementations only `debug_assert` it.

/// Scalar element types that the float kernels operate on.
///
/// The single-element counterpart of [`SimdReal`], used by the remainder
/// loops that finish whatever the vector loop leaves behind.
pub trait Real:
    Copy
    + PartialOrd
    + std::ops::Add<Output = Self>
    + std::ops::AddAssign
    + std::ops::Sub<Output = Self>
{
    /// Absolute difference `|self - other|`.
    fn abs_diff(self, other: Self) -> Self;
}

impl Real for f32 {
    #[inline]
    fn abs_diff(self, other: Self) -> Self {
        (self - other).abs()
    }
}

impl Real for f64 {
    #[inline]
    fn abs_diff(self, other: Self) -> Self {
        (self - other).abs()
    }
}

/// Base trait for all SIMD vector types.
pub trait SimdVector: Sized + Copy + Clone + Send + Sync {
    /// The scalar element type.
    type Element: Copy;

    /// Number of lanes in the vector.
    const LANES: usize;

    /// Create a vector with all lanes set to zero.
    fn zero() -> Self;

    /// Create a vector with all lanes set to the same value.
    fn splat(value: Self::Element) -> Self;

    /// Load a vector from a slice (must have at least LANES elements).
    /// No alignment requirements.
    fn load(slice: &[Self::Element]) -> Self;

    /// Store the vector to a mutable slice (must have at least LANES elements).
    fn store(self, slice: &mut [Self::Element]);
}

/// Trait for SIMD vectors that support element-wise addition.
pub trait SimdAdd: SimdVector {
    /// Add two vectors element-wise.
    fn add(self, other: Self) -> Self;
}

/// Trait for SIMD vectors that support horizontal reduction.
pub trait SimdHorizontal: SimdVector {
    /// Sum all lanes and return a scalar.
    fn horizontal_sum(self) -> Self::Element;
}

/// SIMD operations for floating-point lane types.
///
/// This is the interface the Manhattan-distance kernel is written against.
pub trait SimdReal: SimdAdd + SimdHorizontal
where
    Self::Element: Real,
{
    /// Element-wise absolute difference `|a - b|`.
    fn abs_diff(self, other: Self) -> Self;
}

/// Trait for SIMD vectors that can be gathered from memory at per-lane
/// indices.
///
/// `gather` reads `base[indices[i]]` into lane `i`. The histogram kernel
/// uses this to pull per-bin accumulator values into vector lanes; the
/// matching scatter-back is a per-lane store done by the kernel itself,
/// which must first rule out duplicate indices within the chunk (two lanes
/// writing the same slot would drop one contribution).
pub trait SimdGather: SimdVector {
    /// Gather LANES elements of `base` at the given indices.
    ///
    /// `indices` must have at least LANES entries, each a valid index into
    /// `base`.
    fn gather(base: &[Self::Element], indices: &[u32]) -> Self;
}
