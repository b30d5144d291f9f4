//! SIMD abstraction layer for the training kernels.
//!
//! This module provides a unified interface for SIMD operations across
//! different architectures. It supports:
//! - Portable SIMD via the `wide` crate (default)
//! - AVX2 optimizations on x86_64 via `std::arch`
//! - A plain scalar baseline, always compiled
//!
//! # Architecture
//!
//! The module is organized into layers:
//! - `traits`: Core SIMD traits that define the lane interface
//! - `portable`: Portable implementations using the `wide` crate
//! - `x86`: x86_64-specific implementations using AVX2 intrinsics
//! - `scalar`: Baseline scalar implementations and test references
//! - `legacy`: Superseded fixed-width 128-bit kernels, reference only
//! - `dispatch`: Runtime CPU feature detection and dispatch
//!
//! # Usage
//!
//! ```rust,ignore
//! use gbt_kernels::simd::dispatch;
//!
//! // The dispatch module automatically selects the best implementation
//! let distance = dispatch::manhattan_f32(&x, &y);
//! ```

pub mod traits;
pub mod portable;
pub mod scalar;
#[cfg(target_arch = "x86_64")]
pub mod x86;
#[cfg(target_arch = "x86_64")]
pub mod legacy;
pub mod dispatch;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use traits::{Real, SimdAdd, SimdGather, SimdHorizontal, SimdReal, SimdVector};
pub use dispatch::{
    accumulate_histogram, manhattan_f32, manhattan_f64, simd_support_level, SimdSupportLevel,
};
pub use portable::{PortableF32x8, PortableF64x4};
