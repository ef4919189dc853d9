//! Element casts, rounding modes, and the convert engine.
//!
//! [`CastTo`] is the scalar conversion matrix between every pair of element types. Conversions
//! between built-in types behave like `as` and ignore the rounding mode. Conversions into or out
//! of [`f16`] and [`bf16`] honor it, with directed modes realized by stepping the
//! round-to-nearest result one unit in the last place when it landed on the wrong side.
//!
//! [`convert`] composes a cast with a broadcast and picks one of four paths at compile time:
//! identity, broadcast only, cast only, or cast then broadcast.
//!
//! ```
//! use lanewise::convert::{convert, convert_with, rounding};
//! use lanewise::{f16, Ext1, Vector};
//!
//! let third = Vector::<f32, lanewise::Ext0>::splat(1.0 / 3.0);
//! let down: Vector<f16, Ext1<2>> = convert_with::<_, _, rounding::Down, _>(third);
//! let up: Vector<f16, Ext1<2>> = convert_with::<_, _, rounding::Up, _>(third);
//! assert!(down[0] < up[0]);
//!
//! let ints: Vector<i32, Ext1<3>> = convert(Vector::<f64, Ext1<3>>::from([1.9, -1.9, 0.5]));
//! assert_eq!(ints.as_slice(), &[1, -1, 0]);
//! ```

use core::any::Any;
use core::cmp::Ordering;
use core::marker::PhantomData;

use half::slice::HalfFloatSliceExt;

use crate::apply::UnaryOp;
use crate::broadcast::broadcast;
use crate::extents::{is_broadcastable, Extent};
use crate::promote::{Promote, Promoted};
use crate::scalars::{bf16, f16, f64_abs_compat, NarrowFloat, Scalar};
use crate::storage::Storage;
use crate::vector::{IntoVector, Vector};

// region: Rounding Modes

/// How a conversion picks among the representable neighbours of an inexact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMode {
    /// Whatever the conversion does natively: round-to-nearest for narrow floats, truncation
    /// for float-to-integer.
    #[default]
    Any,
    /// Toward negative infinity.
    Down,
    /// Toward positive infinity.
    Up,
    /// To nearest, ties to even.
    Nearest,
    /// Toward zero.
    TowardZero,
}

/// A rounding mode carried in a type, so that casts can fix it at compile time.
pub trait Rounding: Copy + Default + Send + Sync + 'static {
    const MODE: RoundingMode;
}

/// Marker types for [`Rounding`].
pub mod rounding {
    use super::{Rounding, RoundingMode};

    #[derive(Debug, Clone, Copy, Default)]
    pub struct Any;
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Down;
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Up;
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Nearest;
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TowardZero;

    impl Rounding for Any {
        const MODE: RoundingMode = RoundingMode::Any;
    }
    impl Rounding for Down {
        const MODE: RoundingMode = RoundingMode::Down;
    }
    impl Rounding for Up {
        const MODE: RoundingMode = RoundingMode::Up;
    }
    impl Rounding for Nearest {
        const MODE: RoundingMode = RoundingMode::Nearest;
    }
    impl Rounding for TowardZero {
        const MODE: RoundingMode = RoundingMode::TowardZero;
    }
}

const TWO_POW_52: f64 = 4_503_599_627_370_496.0;

#[inline]
fn trunc(x: f64) -> f64 {
    // NaN, infinities and magnitudes past 2^52 are already integral.
    if !(f64_abs_compat(x) < TWO_POW_52) {
        return x;
    }
    (x as i64) as f64
}

#[inline]
fn floor(x: f64) -> f64 {
    let t = trunc(x);
    if t > x {
        t - 1.0
    } else {
        t
    }
}

#[inline]
fn ceil(x: f64) -> f64 {
    let t = trunc(x);
    if t < x {
        t + 1.0
    } else {
        t
    }
}

#[inline]
fn round_ties_even(x: f64) -> f64 {
    let f = floor(x);
    let fraction = x - f;
    if fraction > 0.5 || (fraction == 0.5 && f % 2.0 != 0.0) {
        f + 1.0
    } else {
        f
    }
}

/// Rounds `x` to an integral value under `mode`. [`RoundingMode::Any`] truncates.
#[inline]
pub fn round_integral(x: f64, mode: RoundingMode) -> f64 {
    match mode {
        RoundingMode::Any | RoundingMode::TowardZero => trunc(x),
        RoundingMode::Down => floor(x),
        RoundingMode::Up => ceil(x),
        RoundingMode::Nearest => round_ties_even(x),
    }
}

/// Narrows `x` to a 16-bit float under `mode`. [`RoundingMode::Any`] rounds to nearest.
#[inline]
pub fn round_narrow<H: NarrowFloat>(x: f64, mode: RoundingMode) -> H {
    let nearest = H::from_f64(x);
    if x.is_nan() {
        return nearest;
    }
    let y = nearest.to_f64();
    match mode {
        RoundingMode::Any | RoundingMode::Nearest => nearest,
        RoundingMode::Down if y > x => nearest.next_down(),
        RoundingMode::Up if y < x => nearest.next_up(),
        RoundingMode::TowardZero if f64_abs_compat(y) > f64_abs_compat(x) => {
            if x > 0.0 {
                nearest.next_down()
            } else {
                nearest.next_up()
            }
        }
        _ => nearest,
    }
}

/// Narrows the integer `x` to a 16-bit float under `mode`.
///
/// `x as f64` is inexact past 2^53, so the side checks run against the exact integer.
#[inline]
pub fn round_narrow_integer<H: NarrowFloat>(x: i128, mode: RoundingMode) -> H {
    let wide = x as f64;
    let nearest = H::from_f64(wide);
    let y = nearest.to_f64() as i128;
    match mode {
        RoundingMode::Any | RoundingMode::Nearest => {
            if wide as i128 == x || !nearest.to_f64().is_finite() {
                return nearest;
            }
            let other = match y.cmp(&x) {
                Ordering::Less => nearest.next_up(),
                Ordering::Greater => nearest.next_down(),
                Ordering::Equal => return nearest,
            };
            if (other.to_f64() as i128).abs_diff(x) < y.abs_diff(x) {
                other
            } else {
                nearest
            }
        }
        RoundingMode::Down if y > x => nearest.next_down(),
        RoundingMode::Up if y < x => nearest.next_up(),
        RoundingMode::TowardZero if y.unsigned_abs() > x.unsigned_abs() => {
            if x > 0 {
                nearest.next_down()
            } else {
                nearest.next_up()
            }
        }
        _ => nearest,
    }
}

// endregion: Rounding Modes

// region: Cast Matrix

/// Scalar conversion into `R`.
///
/// Casting a type to itself is the identity under every mode.
pub trait CastTo<R: Scalar>: Scalar {
    fn cast_to(self, mode: RoundingMode) -> R;

    /// Casts every lane. Overridden where a whole-slice conversion routine exists.
    #[inline]
    fn cast_lanes<E: Extent>(input: &Storage<Self, E>, mode: RoundingMode) -> Storage<R, E> {
        Storage::from_fn(|i| input[i].cast_to(mode))
    }
}

macro_rules! cast_primitive {
    (@from $src:ty => $($dst:ty),*) => {$(
        impl CastTo<$dst> for $src {
            #[inline(always)]
            fn cast_to(self, _mode: RoundingMode) -> $dst {
                self as $dst
            }
        }
    )*};
    ($($src:ty),*) => {$(
        cast_primitive!(@from $src => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
    )*};
}

cast_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

macro_rules! cast_bool {
    ($($ty:ty),*) => {$(
        impl CastTo<$ty> for bool {
            #[inline(always)]
            fn cast_to(self, _mode: RoundingMode) -> $ty {
                self as u8 as $ty
            }
        }

        impl CastTo<bool> for $ty {
            #[inline(always)]
            fn cast_to(self, _mode: RoundingMode) -> bool {
                self.is_nonzero()
            }
        }
    )*};
}

cast_bool!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl CastTo<bool> for bool {
    #[inline(always)]
    fn cast_to(self, _mode: RoundingMode) -> bool {
        self
    }
}

macro_rules! cast_narrow {
    (@int $narrow:ty; $($int:ty),*) => {$(
        impl CastTo<$int> for $narrow {
            #[inline(always)]
            fn cast_to(self, mode: RoundingMode) -> $int {
                round_integral(self.to_f64(), mode) as $int
            }
        }

        impl CastTo<$narrow> for $int {
            #[inline(always)]
            fn cast_to(self, mode: RoundingMode) -> $narrow {
                round_narrow_integer(self as i128, mode)
            }
        }
    )*};
    ($narrow:ty) => {
        impl CastTo<$narrow> for $narrow {
            #[inline(always)]
            fn cast_to(self, _mode: RoundingMode) -> $narrow {
                self
            }
        }

        impl CastTo<f32> for $narrow {
            #[inline(always)]
            fn cast_to(self, _mode: RoundingMode) -> f32 {
                self.to_f32()
            }

            fn cast_lanes<E: Extent>(input: &Storage<$narrow, E>, _mode: RoundingMode) -> Storage<f32, E> {
                let mut output = Storage::splat(0.0f32);
                input.as_slice().convert_to_f32_slice(output.as_mut_slice());
                output
            }
        }

        impl CastTo<f64> for $narrow {
            #[inline(always)]
            fn cast_to(self, _mode: RoundingMode) -> f64 {
                self.to_f64()
            }
        }

        impl CastTo<$narrow> for f32 {
            #[inline(always)]
            fn cast_to(self, mode: RoundingMode) -> $narrow {
                round_narrow(self as f64, mode)
            }

            fn cast_lanes<E: Extent>(input: &Storage<f32, E>, mode: RoundingMode) -> Storage<$narrow, E> {
                match mode {
                    RoundingMode::Any | RoundingMode::Nearest => {
                        let mut output = Storage::splat(<$narrow>::ZERO);
                        output.as_mut_slice().convert_from_f32_slice(input.as_slice());
                        output
                    }
                    _ => Storage::from_fn(|i| input[i].cast_to(mode)),
                }
            }
        }

        impl CastTo<$narrow> for f64 {
            #[inline(always)]
            fn cast_to(self, mode: RoundingMode) -> $narrow {
                round_narrow(self, mode)
            }
        }

        impl CastTo<bool> for $narrow {
            #[inline(always)]
            fn cast_to(self, _mode: RoundingMode) -> bool {
                self.is_nonzero()
            }
        }

        impl CastTo<$narrow> for bool {
            #[inline(always)]
            fn cast_to(self, _mode: RoundingMode) -> $narrow {
                <$narrow as Scalar>::from_bool(self)
            }
        }

        cast_narrow!(@int $narrow; i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
    };
}

cast_narrow!(f16);
cast_narrow!(bf16);

impl CastTo<bf16> for f16 {
    #[inline(always)]
    fn cast_to(self, mode: RoundingMode) -> bf16 {
        round_narrow(self.to_f64(), mode)
    }
}

impl CastTo<f16> for bf16 {
    #[inline(always)]
    fn cast_to(self, mode: RoundingMode) -> f16 {
        round_narrow(self.to_f64(), mode)
    }
}

// endregion: Cast Matrix

// region: Promotion Casts

/// A scalar type that, paired with `R`, has a promoted common type both sides cast into.
pub trait CommonWith<R: Scalar>: Scalar {
    type Common: Scalar;

    fn promote(self) -> Self::Common;
    fn promote_rhs(rhs: R) -> Self::Common;
}

/// The common type of `L` and `R`.
pub type Common<L, R> = <L as CommonWith<R>>::Common;

impl<L, R> CommonWith<R> for L
where
    L: Scalar + Promote<R> + CastTo<Promoted<L, R>>,
    R: Scalar + CastTo<Promoted<L, R>>,
    Promoted<L, R>: Scalar,
{
    type Common = Promoted<L, R>;

    #[inline(always)]
    fn promote(self) -> Promoted<L, R> {
        self.cast_to(RoundingMode::Any)
    }

    #[inline(always)]
    fn promote_rhs(rhs: R) -> Promoted<L, R> {
        rhs.cast_to(RoundingMode::Any)
    }
}

// endregion: Promotion Casts

// region: Convert Engine

/// Cast functor into `R` under the rounding mode `M`.
pub struct Cast<R, M = rounding::Any>(PhantomData<fn() -> (R, M)>);

impl<R, M> Cast<R, M> {
    pub const fn new() -> Self {
        Cast(PhantomData)
    }
}

impl<R, M> Default for Cast<R, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, M> Clone for Cast<R, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, M> Copy for Cast<R, M> {}

impl<T, R, M> UnaryOp<T> for Cast<R, M>
where
    T: CastTo<R>,
    R: Scalar,
    M: Rounding,
{
    type Output = R;

    #[inline(always)]
    fn call(&self, input: T) -> R {
        input.cast_to(M::MODE)
    }

    #[inline]
    fn apply<E: Extent>(&self, input: &Storage<T, E>) -> Storage<R, E> {
        T::cast_lanes(input, M::MODE)
    }
}

/// Casts `input` to `R` under `M` and broadcasts it into `To`.
///
/// Matching types skip the cast and matching extents skip the broadcast; when both match the
/// input is returned as is.
#[inline]
pub fn convert_storage<T, R, From, To, M>(input: &Storage<T, From>) -> Storage<R, To>
where
    T: CastTo<R>,
    R: Scalar,
    From: Extent,
    To: Extent,
    M: Rounding,
{
    const {
        assert!(
            is_broadcastable(From::SHAPE, To::SHAPE),
            "cannot convert to the requested extent"
        )
    };
    // Both `TypeId`s are constants after monomorphization, so only one path survives.
    let any = input as &dyn Any;
    if let Some(same) = any.downcast_ref::<Storage<R, To>>() {
        return *same;
    }
    if let Some(typed) = any.downcast_ref::<Storage<R, From>>() {
        return broadcast(typed);
    }
    broadcast(&Cast::<R, M>::new().apply(input))
}

/// Converts any vector-like value into a `Vector<R, E>` with the default rounding mode.
#[inline]
pub fn convert<R, E, V>(input: V) -> Vector<R, E>
where
    R: Scalar,
    E: Extent,
    V: IntoVector,
    V::Scalar: CastTo<R>,
{
    convert_with::<R, E, rounding::Any, V>(input)
}

/// Converts any vector-like value into a `Vector<R, E>` rounding under `M`.
#[inline]
pub fn convert_with<R, E, M, V>(input: V) -> Vector<R, E>
where
    R: Scalar,
    E: Extent,
    M: Rounding,
    V: IntoVector,
    V::Scalar: CastTo<R>,
{
    Vector::from_storage(convert_storage::<_, R, _, E, M>(&input.into_storage()))
}

/// Casts every lane to `R`, keeping the extent.
#[inline]
pub fn cast<R, V>(input: V) -> Vector<R, V::Extent>
where
    R: Scalar,
    V: IntoVector,
    V::Scalar: CastTo<R>,
{
    convert::<R, V::Extent, V>(input)
}

// endregion: Convert Engine
