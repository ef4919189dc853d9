//! The type-promotion lattice.
//!
//! [`Promote`] maps a pair of scalar types onto the common type both operands are converted to
//! before a homogeneous functor runs. The rules:
//!
//! - identical types promote to themselves
//! - `bool` with any arithmetic type gives the other type
//! - among floating types the wider wins (`f16` and `bf16` meet at `f32`)
//! - a floating type with an integer gives the floating type
//! - signed integers promote with signed, unsigned with unsigned; the higher rank wins, with
//!   `isize`/`usize` ranked between the 32-bit and 64-bit types
//! - a raw pointer with an integer gives the pointer
//!
//! Any other pair, such as a signed with an unsigned integer, has no implementation and fails to
//! compile. Promotion of more than two types is the left fold, see [`Promoted3`] and
//! [`PromoteAll`].
//!
//! ```compile_fail
//! use lanewise::promote::Promoted;
//! let mixed: Promoted<i32, u32> = 0;
//! ```

use crate::scalars::{bf16, f16};

/// Pairwise promotion to a common type.
pub trait Promote<Rhs> {
    type Output;
}

/// The common type of `A` and `B`.
pub type Promoted<A, B> = <A as Promote<B>>::Output;

/// The left fold `promote(promote(A, B), C)`.
pub type Promoted3<A, B, C> = Promoted<Promoted<A, B>, C>;

/// The left fold `promote(promote(promote(A, B), C), D)`.
pub type Promoted4<A, B, C, D> = Promoted<Promoted3<A, B, C>, D>;

impl<T> Promote<T> for T {
    type Output = T;
}

macro_rules! promote_symmetric {
    ($($a:ty, $b:ty => $out:ty;)*) => {$(
        impl Promote<$b> for $a {
            type Output = $out;
        }
        impl Promote<$a> for $b {
            type Output = $out;
        }
    )*};
}

/// `bool` against each listed type, and each float against each listed integer.
macro_rules! promote_absorbing {
    ($winner:ty => $($loser:ty),*) => {
        promote_symmetric!($($winner, $loser => $winner;)*);
    };
}

// region: Boolean

promote_absorbing!(i8 => bool);
promote_absorbing!(i16 => bool);
promote_absorbing!(i32 => bool);
promote_absorbing!(i64 => bool);
promote_absorbing!(isize => bool);
promote_absorbing!(u8 => bool);
promote_absorbing!(u16 => bool);
promote_absorbing!(u32 => bool);
promote_absorbing!(u64 => bool);
promote_absorbing!(usize => bool);
promote_absorbing!(f16 => bool);
promote_absorbing!(bf16 => bool);
promote_absorbing!(f32 => bool);
promote_absorbing!(f64 => bool);

// endregion: Boolean

// region: Floating Point

promote_symmetric! {
    f16, bf16 => f32;
    f16, f32 => f32;
    f16, f64 => f64;
    bf16, f32 => f32;
    bf16, f64 => f64;
    f32, f64 => f64;
}

promote_absorbing!(f16 => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
promote_absorbing!(bf16 => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
promote_absorbing!(f32 => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
promote_absorbing!(f64 => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// endregion: Floating Point

// region: Integers

promote_absorbing!(i16 => i8);
promote_absorbing!(i32 => i8, i16);
promote_absorbing!(isize => i8, i16, i32);
promote_absorbing!(i64 => i8, i16, i32, isize);

promote_absorbing!(u16 => u8);
promote_absorbing!(u32 => u8, u16);
promote_absorbing!(usize => u8, u16, u32);
promote_absorbing!(u64 => u8, u16, u32, usize);

// endregion: Integers

// region: Pointers

macro_rules! promote_pointer {
    ($($int:ty),*) => {$(
        impl<T> Promote<$int> for *const T {
            type Output = *const T;
        }
        impl<T> Promote<*const T> for $int {
            type Output = *const T;
        }
        impl<T> Promote<$int> for *mut T {
            type Output = *mut T;
        }
        impl<T> Promote<*mut T> for $int {
            type Output = *mut T;
        }
    )*};
}

promote_pointer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// endregion: Pointers

// region: N-ary Promotion

/// Left-fold promotion over a tuple of types.
pub trait PromoteAll {
    type Output;
}

impl<A> PromoteAll for (A,) {
    type Output = A;
}

impl<A: Promote<B>, B> PromoteAll for (A, B) {
    type Output = Promoted<A, B>;
}

impl<A: Promote<B>, B, C> PromoteAll for (A, B, C)
where
    Promoted<A, B>: Promote<C>,
{
    type Output = Promoted3<A, B, C>;
}

impl<A: Promote<B>, B, C, D> PromoteAll for (A, B, C, D)
where
    Promoted<A, B>: Promote<C>,
    Promoted3<A, B, C>: Promote<D>,
{
    type Output = Promoted4<A, B, C, D>;
}

// endregion: N-ary Promotion
