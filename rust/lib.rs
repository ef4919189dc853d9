//! # lanewise - Compile-Time Short-Vector Numerics
//!
//! * Fixed-size vectors of 1 to a few dozen lanes, shaped as scalars, rows, matrices or rank-3 tensors.
//! * Shapes, broadcasting and type promotion are resolved while compiling: no runtime branching
//!   on shapes or types, no allocation.
//! * Handles `bool`, all integer widths, f64 double-, f32 single-, f16 half-precision and bf16
//!   brain-float lanes, with two-lanes-per-call paths for the 16-bit floats.
//! * `no_std` compatible.
//!
//! ## Building blocks
//!
//! * [`extents`]: the shape model, the broadcasting rules and their const-evaluated unification.
//! * [`promote`]: the lattice that picks a common type for mixed-type operands.
//! * [`storage`]: fixed-size lane storage.
//! * [`apply`]: the functor traits and the `map`/`zip`/`zip_common` engine, with the packed-lane
//!   hook that narrow floats override.
//! * [`reduce`], [`convert`] and [`ternary`]: folds, casts with rounding modes, `select` and `fma`.
//! * [`vector`]: the [`Vector`] value type and its operators.
//! * [`constant`]: literals that promote like the value they wrap.
//! * [`ops`] and [`math`]: the functor catalogues.
//!
//! # Example
//!
//! ```rust
//! use lanewise::{zip, Ext1, Vector, Vector4};
//!
//! let ints = Vector4::from([1i32, 2, 3, 4]);
//! let halves = Vector4::from([0.5f32; 4]);
//!
//! // Mixed operands are promoted to their common type.
//! let scaled: Vector4<f32> = ints * halves;
//! assert_eq!(scaled.as_slice(), &[0.5, 1.0, 1.5, 2.0]);
//!
//! // A single lane broadcasts against any extent.
//! let seven = Vector::<i32, Ext1<1>>::from([7]);
//! let sums: Vector4<i32> = zip(|a: i32, b: i32| a + b, seven, ints);
//! assert_eq!(sums.as_slice(), &[8, 9, 10, 11]);
//!
//! assert_eq!(ints.sum(), 10);
//! assert_eq!(ints.dot(ints), 30);
//! ```
//!
//! Shapes that do not broadcast are rejected by the compiler:
//!
//! ```compile_fail
//! use lanewise::{zip, Vector3, Vector4};
//!
//! let sums: Vector4<i32> = zip(|a: i32, b: i32| a + b, Vector3::from([1i32, 2, 3]), Vector4::from([1i32; 4]));
//! ```
#![allow(non_camel_case_types)]
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]

pub mod apply;
pub mod broadcast;
pub mod constant;
pub mod convert;
pub mod extents;
#[cfg(feature = "std")]
pub mod math;
pub mod ops;
pub mod promote;
pub mod reduce;
pub mod scalars;
pub mod storage;
pub mod ternary;
pub mod vector;

pub use apply::{
    apply, apply2, apply3, map, zip, zip_common, BinaryOp, PackedLanes, PairedBinary, PairedUnary,
    Reduce, TernaryOp, UnaryOp,
};
pub use broadcast::broadcast;
pub use constant::{kconst, Constant};
pub use convert::{cast, convert, convert_with, CastTo, Common, CommonWith, Rounding, RoundingMode};
pub use extents::{Ext0, Ext1, Extent, Shape};
#[cfg(feature = "tensor")]
pub use extents::{Ext2, Ext3};
pub use promote::{Promote, PromoteAll, Promoted, Promoted3, Promoted4};
pub use reduce::{all, any, count, dot, max, min, product, reduce, sum};
pub use scalars::{bf16, bf16x2, f16, f16x2, Scalar};
pub use storage::Storage;
pub use ternary::{fma, mask, select, select_or_zero};
pub use vector::{
    AssignCompatible, CommonOutput, IntoVector, Vector, Vector1, Vector2, Vector3, Vector4,
    VectorError, VectorN,
};
#[cfg(feature = "tensor")]
pub use vector::{Matrix, Tensor3};
