//! # gbt-kernels - SIMD kernels for gradient-boosted-tree training
//!
//! A small, performance-critical numeric kernel library providing:
//!
//! - **Manhattan distance**: vectorized pairwise L1 distance over two
//!   equal-length f32 or f64 slices
//! - **Histogram accumulation**: per-sample gradient/hessian contributions
//!   aggregated into per-bin statistics, as used by histogram-based
//!   gradient-boosted-tree training
//!
//! Both kernels are compiled per supported instruction-set target and routed
//! through a runtime dispatch layer that probes the host CPU once and caches
//! the best usable variant. Arbitrary input lengths are handled with scalar
//! remainder loops; results are identical across targets up to floating-point
//! summation-order rounding.
//!
//! ## Quick Start
//!
//! ```rust
//! use gbt_kernels::prelude::*;
//!
//! let x = [1.0f32, 2.0, 3.0, 4.0];
//! let y = [4.0f32, 3.0, 2.0, 1.0];
//! assert_eq!(manhattan_distance_f32(&x, &y).unwrap(), 8.0);
//!
//! // Histogram accumulation: caller owns the per-bin arrays.
//! let bins = [0u32, 1, 0, 1];
//! let gradients = [1.0f32, 2.0, 3.0, 4.0];
//! let hessians = [1.0f32; 4];
//! let mut sum_g = vec![0.0f64; 2];
//! let mut sum_h = vec![0.0f64; 2];
//! let mut count = vec![0u32; 2];
//!
//! let mut hist = HistogramAccumulator::new(&mut sum_g, &mut sum_h, &mut count).unwrap();
//! build_histogram(&bins, &gradients, &hessians, &mut hist).unwrap();
//! assert_eq!(hist.sum_gradients(), &[4.0, 6.0]);
//! assert_eq!(hist.count(), &[2, 2]);
//! ```
//!
//! ## Scope
//!
//! The kernels are single-threaded primitives over caller-owned buffers; the
//! surrounding training loop owns allocation, threading, and I/O. There is no
//! general-purpose vector math here, no strided/non-contiguous input, and no
//! persistence.
//!
//! ## Module Overview
//!
//! - [`distance`]: Manhattan-distance entry points
//! - [`histogram`]: Histogram accumulator and operations
//! - [`simd`]: Lane abstraction, per-target kernels, and runtime dispatch

#![allow(clippy::needless_range_loop)]
#![allow(clippy::manual_div_ceil)]

pub mod distance;
pub mod histogram;
pub mod simd;

mod error;

pub use distance::{manhattan_distance_f32, manhattan_distance_f64};
pub use error::{ErrorCode, KernelError, Result};
pub use histogram::{build_histogram, HistogramAccumulator};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::distance::{manhattan_distance_f32, manhattan_distance_f64};
    pub use crate::error::{ErrorCode, KernelError, Result};
    pub use crate::histogram::{build_histogram, HistogramAccumulator};
    pub use crate::simd::{simd_support_level, SimdSupportLevel};
}
