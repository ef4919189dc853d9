//! Scalar element types and their packed-lane pairs.
//!
//! This module defines the element types a vector can hold:
//!
//! - `bool`, the signed and unsigned integers, `f32` and `f64`
//! - [`f16`]: IEEE 754 half-precision (16-bit) floating point, from the `half` crate
//! - [`bf16`]: Brain floating point (bfloat16), from the `half` crate
//!
//! and the 2-lane packed pairs [`f16x2`] and [`bf16x2`], which let the apply engine process two
//! narrow floats per call. Pair arithmetic widens both lanes to `f32` in one slice conversion,
//! which `half` maps onto hardware conversion instructions when they are available.

#![allow(non_camel_case_types)]

use core::fmt;

use half::slice::HalfFloatSliceExt;
pub use half::{bf16, f16};

use crate::apply::PackedLanes;

/// Compatibility function for pre 1.85 Rust versions lacking `f64::abs`.
#[inline(always)]
pub(crate) fn f64_abs_compat(x: f64) -> f64 {
    f64::from_bits(x.to_bits() & 0x7FFF_FFFF_FFFF_FFFF)
}

/// Compatibility function for pre 1.85 Rust versions lacking `f32::abs`.
#[inline(always)]
pub(crate) fn f32_abs_compat(x: f32) -> f32 {
    f32::from_bits(x.to_bits() & 0x7FFF_FFFF)
}

// region: Scalar Trait

mod private {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for isize {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
    impl Sealed for usize {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for super::f16 {}
    impl Sealed for super::bf16 {}
}

/// Element type of a vector.
///
/// This trait is sealed - users cannot implement it for their own types.
pub trait Scalar:
    Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static + private::Sealed
{
    const ZERO: Self;
    const ONE: Self;

    /// `ONE` for `true`, `ZERO` for `false`.
    fn from_bool(value: bool) -> Self;

    /// Truthiness used by casts to `bool` and by logical operators. NaN counts as true.
    fn is_nonzero(self) -> bool;
}

macro_rules! impl_scalar {
    ($zero:literal, $one:literal; $($ty:ty),*) => {$(
        impl Scalar for $ty {
            const ZERO: Self = $zero;
            const ONE: Self = $one;

            #[inline(always)]
            fn from_bool(value: bool) -> Self {
                if value { $one } else { $zero }
            }

            #[inline(always)]
            fn is_nonzero(self) -> bool {
                self != $zero
            }
        }
    )*};
}

impl_scalar!(0, 1; i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_scalar!(0.0, 1.0; f32, f64);

impl Scalar for bool {
    const ZERO: Self = false;
    const ONE: Self = true;

    #[inline(always)]
    fn from_bool(value: bool) -> Self {
        value
    }

    #[inline(always)]
    fn is_nonzero(self) -> bool {
        self
    }
}

// endregion: Scalar Trait

// region: Narrow Floats

/// The 16-bit floating point types, with the bit-level stepping needed for directed rounding.
///
/// This trait is sealed - users cannot implement it for their own types.
pub trait NarrowFloat: Scalar + PackedLanes + PartialOrd {
    const SIGN_MASK: u16 = 0x8000;
    const POSITIVE_INFINITY_BITS: u16;
    const NEGATIVE_INFINITY_BITS: u16;

    fn from_f32(value: f32) -> Self;
    fn to_f32(self) -> f32;
    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
    fn from_bits(bits: u16) -> Self;
    fn to_bits(self) -> u16;

    #[inline(always)]
    fn is_nan(self) -> bool {
        self.to_f32().is_nan()
    }

    /// The least value greater than `self`. Infinities and NaN are returned unchanged at the
    /// top of the range.
    fn next_up(self) -> Self {
        let bits = self.to_bits();
        if self.is_nan() || bits == Self::POSITIVE_INFINITY_BITS {
            return self;
        }
        if bits & !Self::SIGN_MASK == 0 {
            return Self::from_bits(1);
        }
        if bits & Self::SIGN_MASK == 0 {
            Self::from_bits(bits + 1)
        } else {
            Self::from_bits(bits - 1)
        }
    }

    /// The greatest value less than `self`.
    fn next_down(self) -> Self {
        let bits = self.to_bits();
        if self.is_nan() || bits == Self::NEGATIVE_INFINITY_BITS {
            return self;
        }
        if bits & !Self::SIGN_MASK == 0 {
            return Self::from_bits(Self::SIGN_MASK | 1);
        }
        if bits & Self::SIGN_MASK == 0 {
            Self::from_bits(bits - 1)
        } else {
            Self::from_bits(bits + 1)
        }
    }
}

impl Scalar for f16 {
    const ZERO: Self = f16::ZERO;
    const ONE: Self = f16::ONE;

    #[inline(always)]
    fn from_bool(value: bool) -> Self {
        if value {
            f16::ONE
        } else {
            f16::ZERO
        }
    }

    #[inline(always)]
    fn is_nonzero(self) -> bool {
        self.to_f32() != 0.0
    }
}

impl Scalar for bf16 {
    const ZERO: Self = bf16::ZERO;
    const ONE: Self = bf16::ONE;

    #[inline(always)]
    fn from_bool(value: bool) -> Self {
        if value {
            bf16::ONE
        } else {
            bf16::ZERO
        }
    }

    #[inline(always)]
    fn is_nonzero(self) -> bool {
        self.to_f32() != 0.0
    }
}

impl NarrowFloat for f16 {
    const POSITIVE_INFINITY_BITS: u16 = 0x7C00;
    const NEGATIVE_INFINITY_BITS: u16 = 0xFC00;

    #[inline(always)]
    fn from_f32(value: f32) -> Self {
        f16::from_f32(value)
    }
    #[inline(always)]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }
    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        f16::from_f64(value)
    }
    #[inline(always)]
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }
    #[inline(always)]
    fn from_bits(bits: u16) -> Self {
        f16::from_bits(bits)
    }
    #[inline(always)]
    fn to_bits(self) -> u16 {
        f16::to_bits(self)
    }
}

impl NarrowFloat for bf16 {
    const POSITIVE_INFINITY_BITS: u16 = 0x7F80;
    const NEGATIVE_INFINITY_BITS: u16 = 0xFF80;

    #[inline(always)]
    fn from_f32(value: f32) -> Self {
        bf16::from_f32(value)
    }
    #[inline(always)]
    fn to_f32(self) -> f32 {
        bf16::to_f32(self)
    }
    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        bf16::from_f64(value)
    }
    #[inline(always)]
    fn to_f64(self) -> f64 {
        bf16::to_f64(self)
    }
    #[inline(always)]
    fn from_bits(bits: u16) -> Self {
        bf16::from_bits(bits)
    }
    #[inline(always)]
    fn to_bits(self) -> u16 {
        bf16::to_bits(self)
    }
}

// endregion: Narrow Floats

// region: Packed Pairs

macro_rules! packed_pair {
    ($(#[$meta:meta])* $pair:ident, $lane:ident) => {
        $(#[$meta])*
        #[repr(C, align(4))]
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $pair(pub $lane, pub $lane);

        impl $pair {
            #[inline(always)]
            pub const fn new(lo: $lane, hi: $lane) -> Self {
                $pair(lo, hi)
            }

            /// Both lanes set to `value`.
            #[inline(always)]
            pub const fn splat(value: $lane) -> Self {
                $pair(value, value)
            }

            /// Narrows two `f32` values with round-to-nearest-even in one conversion.
            #[inline(always)]
            pub fn from_f32s(values: [f32; 2]) -> Self {
                let mut lanes = [$lane::ZERO; 2];
                lanes.convert_from_f32_slice(&values);
                $pair(lanes[0], lanes[1])
            }

            /// Widens both lanes to `f32` in one conversion.
            #[inline(always)]
            pub fn to_f32s(self) -> [f32; 2] {
                let mut wide = [0.0f32; 2];
                [self.0, self.1].convert_to_f32_slice(&mut wide);
                wide
            }

            /// Applies `f` to both widened lanes and narrows the results.
            #[inline(always)]
            pub fn map_f32(self, f: impl Fn(f32) -> f32) -> Self {
                let [lo, hi] = self.to_f32s();
                Self::from_f32s([f(lo), f(hi)])
            }

            /// Combines lane `lo` with `other.lo` and lane `hi` with `other.hi`.
            #[inline(always)]
            pub fn zip_f32(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
                let [a_lo, a_hi] = self.to_f32s();
                let [b_lo, b_hi] = other.to_f32s();
                Self::from_f32s([f(a_lo, b_lo), f(a_hi, b_hi)])
            }

            /// Lane-wise predicate, producing `ONE` where it holds and `ZERO` elsewhere.
            #[inline(always)]
            pub fn compare_f32(self, other: Self, predicate: impl Fn(f32, f32) -> bool) -> Self {
                let [a_lo, a_hi] = self.to_f32s();
                let [b_lo, b_hi] = other.to_f32s();
                $pair(
                    <$lane as Scalar>::from_bool(predicate(a_lo, b_lo)),
                    <$lane as Scalar>::from_bool(predicate(a_hi, b_hi)),
                )
            }
        }

        impl From<($lane, $lane)> for $pair {
            #[inline(always)]
            fn from(v: ($lane, $lane)) -> Self {
                $pair(v.0, v.1)
            }
        }

        impl From<$pair> for ($lane, $lane) {
            #[inline(always)]
            fn from(v: $pair) -> Self {
                (v.0, v.1)
            }
        }

        impl PackedLanes for $lane {
            type Pair = $pair;

            #[inline(always)]
            fn pack(lo: Self, hi: Self) -> $pair {
                $pair(lo, hi)
            }

            #[inline(always)]
            fn unpack(pair: $pair) -> (Self, Self) {
                (pair.0, pair.1)
            }
        }

        impl core::ops::Add for $pair {
            type Output = Self;
            #[inline(always)]
            fn add(self, rhs: Self) -> Self::Output {
                self.zip_f32(rhs, |a, b| a + b)
            }
        }

        impl core::ops::Sub for $pair {
            type Output = Self;
            #[inline(always)]
            fn sub(self, rhs: Self) -> Self::Output {
                self.zip_f32(rhs, |a, b| a - b)
            }
        }

        impl core::ops::Mul for $pair {
            type Output = Self;
            #[inline(always)]
            fn mul(self, rhs: Self) -> Self::Output {
                self.zip_f32(rhs, |a, b| a * b)
            }
        }

        impl core::ops::Div for $pair {
            type Output = Self;
            #[inline(always)]
            fn div(self, rhs: Self) -> Self::Output {
                self.zip_f32(rhs, |a, b| a / b)
            }
        }

        impl core::ops::Neg for $pair {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self::Output {
                $pair(-self.0, -self.1)
            }
        }
    };
}

packed_pair!(
    /// Two [`f16`] lanes packed into one 32-bit register-sized value.
    f16x2,
    f16
);

packed_pair!(
    /// Two [`bf16`] lanes packed into one 32-bit register-sized value.
    bf16x2,
    bf16
);

// endregion: Packed Pairs
