//! Literal constants that take part in promotion like the value they wrap.
//!
//! A [`Constant`] is a rank-0 operand: it broadcasts to any extent, and promotes with another
//! element type exactly as its inner value would, so `v * kconst(2.0f32)` computes in
//! `Promoted<T, f32>`. Two constants of the same type promote to that constant type.
//!
//! ```
//! use lanewise::constant::kconst;
//! use lanewise::{f16, Vector2};
//!
//! let halves = Vector2::from([f16::ONE, f16::from_f32(3.0)]) * kconst(f16::from_f32(0.5));
//! assert_eq!(halves.as_slice(), &[f16::from_f32(0.5), f16::from_f32(1.5)]);
//!
//! let scaled = kconst(2.0f32) * Vector2::from([1u8, 2]);
//! assert_eq!(scaled.as_slice(), &[2.0f32, 4.0]);
//! ```

use crate::apply::{zip_common, BinaryOp};
use crate::convert::{CastTo, Common, CommonWith, RoundingMode};
use crate::extents::{Ext0, Extent};
use crate::ops;
use crate::promote::{Promote, Promoted};
use crate::scalars::{bf16, f16, Scalar};
use crate::storage::Storage;
use crate::vector::{CommonOutput, IntoVector, Vector};

/// A scalar literal, `f64` unless stated otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Hash)]
pub struct Constant<T = f64>(pub T);

/// Wraps `value` as a [`Constant`].
#[inline(always)]
pub const fn kconst<T>(value: T) -> Constant<T> {
    Constant(value)
}

impl<T: Copy> Constant<T> {
    #[inline(always)]
    pub const fn get(self) -> T {
        self.0
    }
}

impl<T: Scalar> Constant<T> {
    /// The value cast to `R` under `mode`, as `T` itself would be.
    #[inline(always)]
    pub fn cast<R: Scalar>(self, mode: RoundingMode) -> R
    where
        T: CastTo<R>,
    {
        self.0.cast_to(mode)
    }
}

impl<T> From<T> for Constant<T> {
    #[inline(always)]
    fn from(value: T) -> Self {
        Constant(value)
    }
}

impl<T: Scalar> IntoVector for Constant<T> {
    type Scalar = T;
    type Extent = Ext0;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, Ext0> {
        Storage::splat(self.0)
    }
}

// region: Promotion

macro_rules! promote_constant {
    ($($ty:ty),*) => {$(
        impl<L: Promote<$ty>> Promote<$ty> for Constant<L> {
            type Output = Promoted<L, $ty>;
        }

        impl<R> Promote<Constant<R>> for $ty
        where
            $ty: Promote<R>,
        {
            type Output = Promoted<$ty, R>;
        }
    )*};
}

promote_constant!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, f16, bf16);

// endregion: Promotion

// region: Operators

macro_rules! constant_left_operators {
    ($($trait:ident :: $method:ident => $functor:ident;)*) => {$(
        impl<C, T, E> core::ops::$trait<Vector<T, E>> for Constant<C>
        where
            C: Scalar + CommonWith<T>,
            T: Scalar,
            E: Extent,
            ops::$functor: BinaryOp<Common<C, T>, Common<C, T>>,
        {
            type Output = Vector<CommonOutput<ops::$functor, C, T>, E>;

            #[inline]
            fn $method(self, rhs: Vector<T, E>) -> Self::Output {
                zip_common(ops::$functor, self, rhs)
            }
        }
    )*};
}

constant_left_operators! {
    Add::add => Add;
    Sub::sub => Sub;
    Mul::mul => Mul;
    Div::div => Div;
    Rem::rem => Rem;
    BitAnd::bitand => BitAnd;
    BitOr::bitor => BitOr;
    BitXor::bitxor => BitXor;
}

// endregion: Operators
