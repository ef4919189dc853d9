//! Elementary functions as unary and binary functors.
//!
//! Available with the `std` feature, which provides the floating-point routines. Every functor
//! covers `f32` and `f64` directly, and [`f16`] and [`bf16`] by widening to `f32`, two lanes per
//! call through the packed-lane path. [`NextAfter`] steps narrow floats in their own format.
//!
//! The binary functions promote both operands to their common type, like the operators:
//!
//! ```
//! use lanewise::math::{hypot, pow};
//! use lanewise::Vector2;
//!
//! let squares: Vector2<f32> = pow(Vector2::from([2.0f32, 3.0]), 2i32);
//! assert_eq!(squares.as_slice(), &[4.0, 9.0]);
//! let lengths: Vector2<f64> = hypot(Vector2::from([3.0f64, 5.0]), Vector2::from([4.0f64, 12.0]));
//! assert_eq!(lengths.as_slice(), &[5.0, 13.0]);
//! ```
//!
//! ```
//! use lanewise::math::{sqrt, Sqrt};
//! use lanewise::{map, Vector3};
//!
//! let v = Vector3::from([1.0f32, 4.0, 9.0]);
//! assert_eq!(sqrt(v).as_slice(), &[1.0, 2.0, 3.0]);
//! assert_eq!(map(Sqrt, v), v.map(Sqrt));
//! ```

use crate::apply::{
    map, map_pairs, zip_common, zip_pairs, BinaryOp, PairedBinary, PairedUnary, UnaryOp,
};
use crate::convert::{Common, CommonWith};
use crate::extents::Extent;
use crate::scalars::{bf16, bf16x2, f16, f16x2, NarrowFloat};
use crate::storage::Storage;
use crate::vector::{CommonOutput, IntoVector, Vector};

// region: Unary Functions

macro_rules! math_functions {
    (@narrow $functor:ident, $method:ident, $ty:ident, $pair:ident) => {
        impl UnaryOp<$ty> for $functor {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, input: $ty) -> $ty {
                $ty::from_f32(input.to_f32().$method())
            }

            #[inline]
            fn apply<E: Extent>(&self, input: &Storage<$ty, E>) -> Storage<$ty, E> {
                map_pairs(self, input)
            }
        }

        impl PairedUnary<$ty> for $functor {
            #[inline(always)]
            fn call_pair(&self, input: $pair) -> $pair {
                input.map_f32(|x| x.$method())
            }
        }
    };
    ($($(#[$meta:meta])* $functor:ident, $function:ident => $method:ident;)*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $functor;

        impl UnaryOp<f32> for $functor {
            type Output = f32;

            #[inline(always)]
            fn call(&self, input: f32) -> f32 {
                input.$method()
            }
        }

        impl UnaryOp<f64> for $functor {
            type Output = f64;

            #[inline(always)]
            fn call(&self, input: f64) -> f64 {
                input.$method()
            }
        }

        math_functions!(@narrow $functor, $method, f16, f16x2);
        math_functions!(@narrow $functor, $method, bf16, bf16x2);

        $(#[$meta])*
        #[inline]
        pub fn $function<V>(input: V) -> Vector<<$functor as UnaryOp<V::Scalar>>::Output, V::Extent>
        where
            V: IntoVector,
            $functor: UnaryOp<V::Scalar>,
        {
            map($functor, input)
        }
    )*};
}

math_functions! {
    /// Square root.
    Sqrt, sqrt => sqrt;
    /// `e` raised to the lane.
    Exp, exp => exp;
    /// Natural logarithm.
    Ln, ln => ln;
    Sin, sin => sin;
    Cos, cos => cos;
    Tan, tan => tan;
    /// Largest integer not above the lane.
    Floor, floor => floor;
    /// Smallest integer not below the lane.
    Ceil, ceil => ceil;
    /// Nearest integer, ties away from zero.
    Round, round => round;
    /// Integer part, rounding toward zero.
    Trunc, trunc => trunc;
}

// endregion: Unary Functions

// region: Binary Functions

/// Bit-level helpers shared by the `f32` and `f64` binary functions.
trait WideFloat: Copy + PartialOrd {
    fn next_toward(self, target: Self) -> Self;
    fn ieee_remainder(self, divisor: Self) -> Self;
}

macro_rules! wide_float {
    ($($ty:ty),*) => {$(
        impl WideFloat for $ty {
            #[inline]
            fn next_toward(self, target: $ty) -> $ty {
                if self.is_nan() || target.is_nan() {
                    return self + target;
                }
                if self == target {
                    return target;
                }
                if self == 0.0 {
                    return <$ty>::from_bits(1).copysign(target);
                }
                let bits = self.to_bits();
                if (target > self) == (self > 0.0) {
                    <$ty>::from_bits(bits + 1)
                } else {
                    <$ty>::from_bits(bits - 1)
                }
            }

            /// `self - n * divisor` with `n` the quotient rounded to nearest, ties to even.
            #[inline]
            fn ieee_remainder(self, divisor: $ty) -> $ty {
                let divisor = divisor.abs();
                // Exact: `%` never rounds, and the subtraction below meets Sterbenz's bound.
                let mut rest = (self % (divisor + divisor)).abs();
                let odd = rest >= divisor;
                if odd {
                    rest -= divisor;
                }
                let past_half = if divisor < <$ty>::MAX / 2.0 {
                    rest + rest > divisor || (rest + rest == divisor && odd)
                } else {
                    rest > divisor * 0.5 || (rest == divisor * 0.5 && odd)
                };
                if past_half {
                    rest -= divisor;
                }
                if self.is_sign_negative() {
                    -rest
                } else {
                    rest
                }
            }
        }
    )*};
}

wide_float!(f32, f64);

macro_rules! binary_math_functions {
    (@narrow $functor:ident, $ty:ident, $pair:ident, |$a:ident, $b:ident| $body:expr) => {
        impl BinaryOp<$ty, $ty> for $functor {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, left: $ty, right: $ty) -> $ty {
                let ($a, $b) = (left.to_f32(), right.to_f32());
                $ty::from_f32($body)
            }

            #[inline]
            fn apply<E: Extent>(&self, left: &Storage<$ty, E>, right: &Storage<$ty, E>) -> Storage<$ty, E> {
                zip_pairs(self, left, right)
            }
        }

        impl PairedBinary<$ty> for $functor {
            #[inline(always)]
            fn call_pair(&self, left: $pair, right: $pair) -> $pair {
                left.zip_f32(right, |$a, $b| $body)
            }
        }
    };
    (@wide $functor:ident, $ty:ty, |$a:ident, $b:ident| $body:expr) => {
        impl BinaryOp<$ty, $ty> for $functor {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, $a: $ty, $b: $ty) -> $ty {
                $body
            }
        }
    };
    (@function $(#[$meta:meta])* $functor:ident, $function:ident) => {
        $(#[$meta])*
        #[inline]
        pub fn $function<E, L, R>(left: L, right: R) -> Vector<CommonOutput<$functor, L::Scalar, R::Scalar>, E>
        where
            E: Extent,
            L: IntoVector,
            R: IntoVector,
            L::Scalar: CommonWith<R::Scalar>,
            $functor: BinaryOp<Common<L::Scalar, R::Scalar>, Common<L::Scalar, R::Scalar>>,
        {
            zip_common($functor, left, right)
        }
    };
    ($($(#[$meta:meta])* $functor:ident, $function:ident => |$a:ident, $b:ident| $body:expr;)*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $functor;

        binary_math_functions!(@wide $functor, f32, |$a, $b| $body);
        binary_math_functions!(@wide $functor, f64, |$a, $b| $body);
        binary_math_functions!(@narrow $functor, f16, f16x2, |$a, $b| $body);
        binary_math_functions!(@narrow $functor, bf16, bf16x2, |$a, $b| $body);
        binary_math_functions!(@function $(#[$meta])* $functor, $function);
    )*};
}

binary_math_functions! {
    /// `a` raised to the power `b`.
    Pow, pow => |a, b| a.powf(b);
    /// `sqrt(a * a + b * b)` without intermediate overflow.
    Hypot, hypot => |a, b| a.hypot(b);
    /// The magnitude of `a` with the sign of `b`.
    CopySign, copysign => |a, b| a.copysign(b);
    /// `a - n * b` where `n` is `a / b` rounded to nearest, ties to even. Always exact.
    Remainder, remainder => |a, b| a.ieee_remainder(b);
}

/// The representable neighbour of `a` in the direction of `b`, or `b` when they are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NextAfter;

binary_math_functions!(@wide NextAfter, f32, |a, b| a.next_toward(b));
binary_math_functions!(@wide NextAfter, f64, |a, b| a.next_toward(b));

macro_rules! narrow_next_after {
    ($($ty:ty),*) => {$(
        impl BinaryOp<$ty, $ty> for NextAfter {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, from: $ty, toward: $ty) -> $ty {
                if from.is_nan() || toward.is_nan() {
                    <$ty>::NAN
                } else if from == toward {
                    toward
                } else if toward > from {
                    NarrowFloat::next_up(from)
                } else {
                    NarrowFloat::next_down(from)
                }
            }
        }
    )*};
}

narrow_next_after!(f16, bf16);

binary_math_functions!(@function
    /// The representable neighbour of `a` in the direction of `b`, lane by lane.
    NextAfter, next_after
);

// endregion: Binary Functions
