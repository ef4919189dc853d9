//! The public vector type and its operators.
//!
//! [`Vector`] owns one [`Storage`] and forwards every computation to the engines: operators and
//! comparison methods go through [`zip_common`], unary operators through [`map`], reductions
//! through [`crate::reduce`] and conversions through [`crate::convert`]. Binary operators accept
//! any [`IntoVector`] operand on the right (another vector, a scalar, an array, a tuple) and
//! broadcast it into the extent of the left operand.
//!
//! ```
//! use lanewise::{Vector3, Vector4};
//!
//! let a = Vector3::from([1i32, 2, 3]);
//! let b = Vector3::from([0.5f32, 0.5, 0.5]);
//! assert_eq!((a * b).as_slice(), &[0.5, 1.0, 1.5]);
//! assert_eq!((a + 10i32).as_slice(), &[11, 12, 13]);
//! assert_eq!(a.dot(a), 14);
//!
//! let mut c = Vector4::<f64>::zeros();
//! c += 2i32;
//! c *= [1.0f64, 2.0, 3.0, 4.0];
//! assert_eq!(c.sum(), 20.0);
//! ```
//!
//! Compound assignment is only available when the result fits the receiver's element type:
//!
//! ```compile_fail
//! use lanewise::Vector3;
//!
//! let mut ints = Vector3::from([1i32, 2, 3]);
//! ints += 0.5f32;
//! ```
//!
//! and operands must broadcast into the receiver's extent:
//!
//! ```compile_fail
//! use lanewise::{Vector3, Vector4};
//!
//! let sums = Vector3::from([1i32, 2, 3]) + Vector4::from([1i32, 2, 3, 4]);
//! ```
//!
//! The same holds when only the left operand would need to stretch, as in `Vector1 + Vector4`.
//! [`zip_common`] with a named result extent unifies both sides:
//!
//! ```
//! use lanewise::{ops, zip_common, Vector1, Vector4};
//!
//! let sums: Vector4<i32> = zip_common(ops::Add, Vector1::from([1]), Vector4::from([1, 2, 3, 4]));
//! assert_eq!(sums.as_slice(), &[2, 3, 4, 5]);
//! ```

use core::fmt;
use core::ops::{Index, IndexMut};
use core::slice;

use crate::apply::{map, zip, zip_common, BinaryOp, Reduce, TernaryOp, UnaryOp};
use crate::broadcast::broadcast;
use crate::convert::{self, CastTo, Common, CommonWith, Rounding};
use crate::extents::{is_broadcastable, Ext0, Ext1, Extent, Shape};
#[cfg(feature = "tensor")]
use crate::extents::{Ext2, Ext3};
use crate::ops;
use crate::promote::{Promote, Promoted, Promoted3};
use crate::reduce;
use crate::scalars::{bf16, bf16x2, f16, f16x2, Scalar};
use crate::storage::Storage;
use crate::ternary;

// region: Error Types

/// Error type for vector accesses with runtime lengths or indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorError {
    /// A slice does not hold exactly one element per lane.
    LengthMismatch { expected: usize, got: usize },
    /// A flat index or a coordinate is out of range.
    IndexOutOfBounds { index: usize, size: usize },
    /// A multi-index has the wrong number of coordinates.
    DimensionMismatch { expected: usize, got: usize },
}

#[cfg(feature = "std")]
impl std::error::Error for VectorError {}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::LengthMismatch { expected, got } => {
                write!(f, "expected {} elements, got {}", expected, got)
            }
            VectorError::IndexOutOfBounds { index, size } => {
                write!(f, "index {} out of bounds for size {}", index, size)
            }
            VectorError::DimensionMismatch { expected, got } => {
                write!(f, "expected {} dimensions, got {}", expected, got)
            }
        }
    }
}

// endregion: Error Types

// region: Vector

/// A fixed-size vector of `T` shaped by the extent `E`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Vector<T: Scalar, E: Extent> {
    storage: Storage<T, E>,
}

/// A rank-1 vector of `N` lanes.
pub type VectorN<T, const N: usize> = Vector<T, Ext1<N>>;
pub type Vector1<T> = VectorN<T, 1>;
pub type Vector2<T> = VectorN<T, 2>;
pub type Vector3<T> = VectorN<T, 3>;
pub type Vector4<T> = VectorN<T, 4>;

/// A row-major `R` by `C` matrix.
#[cfg(feature = "tensor")]
pub type Matrix<T, const R: usize, const C: usize> = Vector<T, Ext2<R, C>>;

#[cfg(feature = "tensor")]
pub type Tensor3<T, const N: usize, const M: usize, const K: usize> = Vector<T, Ext3<N, M, K>>;

/// Output type of the functor `F` applied to the common type of `L` and `R`.
pub type CommonOutput<F, L, R> = <F as BinaryOp<Common<L, R>, Common<L, R>>>::Output;

macro_rules! lane_methods {
    ($($(#[$meta:meta])* $name:ident => $functor:ident;)*) => {$(
        $(#[$meta])*
        #[inline]
        pub fn $name<R>(self, rhs: R) -> Vector<CommonOutput<ops::$functor, T, R::Scalar>, E>
        where
            R: IntoVector,
            T: CommonWith<R::Scalar>,
            ops::$functor: BinaryOp<Common<T, R::Scalar>, Common<T, R::Scalar>>,
        {
            zip_common(ops::$functor, self, rhs)
        }
    )*};
}

impl<T: Scalar, E: Extent> Vector<T, E> {
    #[inline(always)]
    pub const fn from_storage(storage: Storage<T, E>) -> Self {
        Self { storage }
    }

    /// Builds the vector from exactly one initializer per lane, row-major.
    #[inline(always)]
    pub fn from_array(lanes: E::Array<T>) -> Self {
        Self::from_storage(Storage::from_array(lanes))
    }

    /// Builds the vector from a function of the flat row-major lane index.
    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        Self::from_storage(Storage::from_fn(f))
    }

    /// Every lane set to `value`.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self::from_storage(Storage::splat(value))
    }

    #[inline(always)]
    pub fn zeros() -> Self {
        Self::splat(T::ZERO)
    }

    #[inline(always)]
    pub fn ones() -> Self {
        Self::splat(T::ONE)
    }

    /// A vector of zeros with the type and extent of `self`.
    #[inline(always)]
    pub fn zeros_like(&self) -> Self {
        Self::zeros()
    }

    #[inline(always)]
    pub fn ones_like(&self) -> Self {
        Self::ones()
    }

    /// A vector with the type and extent of `self`, every lane set to `value`.
    #[inline(always)]
    pub fn full_like(&self, value: T) -> Self {
        Self::splat(value)
    }

    /// Copies the lanes out of a slice of runtime length.
    ///
    /// # Errors
    ///
    /// [`VectorError::LengthMismatch`] unless the slice holds exactly one element per lane.
    pub fn try_from_slice(lanes: &[T]) -> Result<Self, VectorError> {
        if lanes.len() != E::VOLUME {
            return Err(VectorError::LengthMismatch {
                expected: E::VOLUME,
                got: lanes.len(),
            });
        }
        Ok(Self::from_fn(|i| lanes[i]))
    }

    #[inline(always)]
    pub fn storage(&self) -> &Storage<T, E> {
        &self.storage
    }

    #[inline(always)]
    pub fn into_storage(self) -> Storage<T, E> {
        self.storage
    }

    #[inline(always)]
    pub const fn shape(&self) -> Shape {
        E::SHAPE
    }

    #[inline(always)]
    pub const fn rank(&self) -> usize {
        E::RANK
    }

    /// Number of lanes.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        E::VOLUME
    }

    /// Always `false`: every vector has at least one lane.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    #[inline(always)]
    pub fn as_array(&self) -> &E::Array<T> {
        self.storage.as_array()
    }

    #[inline(always)]
    pub fn into_array(self) -> E::Array<T> {
        self.storage.into_array()
    }

    #[inline(always)]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// The lane at a flat row-major index, or `None` when out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).copied()
    }

    /// # Errors
    ///
    /// [`VectorError::IndexOutOfBounds`] when `index` is not below [`Self::len`].
    #[inline]
    pub fn try_get(&self, index: usize) -> Result<T, VectorError> {
        self.get(index).ok_or(VectorError::IndexOutOfBounds {
            index,
            size: E::VOLUME,
        })
    }

    /// The lane at a multi-index with one coordinate per dimension.
    ///
    /// # Errors
    ///
    /// [`VectorError::DimensionMismatch`] when the number of coordinates differs from the rank,
    /// [`VectorError::IndexOutOfBounds`] when a coordinate exceeds its dimension.
    pub fn get_at(&self, index: &[usize]) -> Result<T, VectorError> {
        let shape = E::SHAPE;
        if index.len() != shape.rank() {
            return Err(VectorError::DimensionMismatch {
                expected: shape.rank(),
                got: index.len(),
            });
        }
        match shape.offset(index) {
            Some(offset) => Ok(self.storage[offset]),
            None => {
                let (index, size) = index
                    .iter()
                    .zip(shape.dims())
                    .map(|(&coordinate, &size)| (coordinate, size))
                    .find(|&(coordinate, size)| coordinate >= size)
                    .unwrap_or((0, 0));
                Err(VectorError::IndexOutOfBounds { index, size })
            }
        }
    }

    // region: Conversions

    /// Casts every lane to `R`.
    #[inline]
    pub fn cast<R: Scalar>(self) -> Vector<R, E>
    where
        T: CastTo<R>,
    {
        convert::cast(self)
    }

    /// Casts every lane to `R` rounding under `M`.
    #[inline]
    pub fn cast_with<R: Scalar, M: Rounding>(self) -> Vector<R, E>
    where
        T: CastTo<R>,
    {
        convert::convert_with::<R, E, M, Self>(self)
    }

    /// Casts to `R` and broadcasts into `To`.
    #[inline]
    pub fn convert<R: Scalar, To: Extent>(self) -> Vector<R, To>
    where
        T: CastTo<R>,
    {
        convert::convert(self)
    }

    /// Broadcasts into `To`.
    #[inline]
    pub fn broadcast<To: Extent>(self) -> Vector<T, To> {
        Vector::from_storage(broadcast(&self.storage))
    }

    // endregion: Conversions

    // region: Engine Forwarding

    #[inline]
    pub fn map<F: UnaryOp<T>>(self, fun: F) -> Vector<F::Output, E> {
        map(fun, self)
    }

    /// [`zip`] into the extent of `self`.
    #[inline]
    pub fn zip<F, R>(self, fun: F, rhs: R) -> Vector<F::Output, E>
    where
        R: IntoVector,
        F: BinaryOp<T, R::Scalar>,
    {
        zip(fun, self, rhs)
    }

    /// [`zip_common`] into the extent of `self`.
    #[inline]
    pub fn zip_common<F, R>(self, fun: F, rhs: R) -> Vector<CommonOutput<F, T, R::Scalar>, E>
    where
        R: IntoVector,
        T: CommonWith<R::Scalar>,
        F: BinaryOp<Common<T, R::Scalar>, Common<T, R::Scalar>>,
    {
        zip_common(fun, self, rhs)
    }

    #[inline]
    pub fn reduce<F: Reduce<T>>(self, fun: F) -> T {
        reduce::reduce(fun, self)
    }

    #[inline]
    pub fn min(self) -> T
    where
        ops::Min: Reduce<T>,
    {
        reduce::min(self)
    }

    #[inline]
    pub fn max(self) -> T
    where
        ops::Max: Reduce<T>,
    {
        reduce::max(self)
    }

    #[inline]
    pub fn sum(self) -> T
    where
        ops::Add: Reduce<T>,
    {
        reduce::sum(self)
    }

    #[inline]
    pub fn product(self) -> T
    where
        ops::Mul: Reduce<T>,
    {
        reduce::product(self)
    }

    #[inline]
    pub fn dot<R>(self, rhs: R) -> Common<T, R::Scalar>
    where
        R: IntoVector,
        T: CommonWith<R::Scalar>,
        ops::Mul: BinaryOp<
            Common<T, R::Scalar>,
            Common<T, R::Scalar>,
            Output = Common<T, R::Scalar>,
        >,
        ops::Add: Reduce<Common<T, R::Scalar>>,
    {
        reduce::dot(self, rhs)
    }

    #[inline]
    pub fn all(self) -> bool
    where
        T: CastTo<bool>,
    {
        reduce::all(self)
    }

    #[inline]
    pub fn any(self) -> bool
    where
        T: CastTo<bool>,
    {
        reduce::any(self)
    }

    /// Number of nonzero lanes.
    #[inline]
    pub fn count(self) -> usize
    where
        T: CastTo<bool>,
    {
        reduce::count(self)
    }

    /// Uses `self` as the condition of [`ternary::select`], into the extent of `self`.
    #[inline]
    pub fn select<L, R>(self, on_true: L, on_false: R) -> Vector<Common<L::Scalar, R::Scalar>, E>
    where
        T: CastTo<bool>,
        L: IntoVector,
        R: IntoVector,
        L::Scalar: CommonWith<R::Scalar>,
    {
        ternary::select(self, on_true, on_false)
    }

    /// `self * b + c` through [`ternary::fma`], into the extent of `self`.
    #[inline]
    pub fn mul_add<B, C>(self, b: B, c: C) -> Vector<Promoted3<T, B::Scalar, C::Scalar>, E>
    where
        B: IntoVector,
        C: IntoVector,
        T: Promote<B::Scalar> + CastTo<Promoted3<T, B::Scalar, C::Scalar>>,
        Promoted<T, B::Scalar>: Promote<C::Scalar>,
        Promoted3<T, B::Scalar, C::Scalar>: Scalar,
        B::Scalar: CastTo<Promoted3<T, B::Scalar, C::Scalar>>,
        C::Scalar: CastTo<Promoted3<T, B::Scalar, C::Scalar>>,
        ops::Fma: TernaryOp<
            Promoted3<T, B::Scalar, C::Scalar>,
            Promoted3<T, B::Scalar, C::Scalar>,
            Promoted3<T, B::Scalar, C::Scalar>,
            Output = Promoted3<T, B::Scalar, C::Scalar>,
        >,
    {
        ternary::fma(self, b, c)
    }

    /// `|x|` lane by lane.
    #[inline]
    pub fn abs(self) -> Vector<<ops::Abs as UnaryOp<T>>::Output, E>
    where
        ops::Abs: UnaryOp<T>,
    {
        map(ops::Abs, self)
    }

    /// One where a lane is zero, zero elsewhere.
    #[inline]
    pub fn logical_not(self) -> Vector<<ops::LogicalNot as UnaryOp<T>>::Output, E>
    where
        ops::LogicalNot: UnaryOp<T>,
    {
        map(ops::LogicalNot, self)
    }

    // endregion: Engine Forwarding

    // region: Lane-wise Comparisons

    lane_methods! {
        /// `self[i] == rhs[i]` as a mask in the common type.
        lanes_eq => Eq;
        /// `self[i] != rhs[i]` as a mask in the common type.
        lanes_ne => Ne;
        /// `self[i] < rhs[i]` as a mask in the common type.
        lanes_lt => Lt;
        /// `self[i] <= rhs[i]` as a mask in the common type.
        lanes_le => Le;
        /// `self[i] > rhs[i]` as a mask in the common type.
        lanes_gt => Gt;
        /// `self[i] >= rhs[i]` as a mask in the common type.
        lanes_ge => Ge;
        /// The lesser of `self[i]` and `rhs[i]`.
        lanes_min => Min;
        /// The greater of `self[i]` and `rhs[i]`.
        lanes_max => Max;
    }

    // endregion: Lane-wise Comparisons
}

impl<T: Scalar, E: Extent> Index<usize> for Vector<T, E> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        &self.storage[index]
    }
}

impl<T: Scalar, E: Extent> IndexMut<usize> for Vector<T, E> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.storage[index]
    }
}

impl<'a, T: Scalar, E: Extent> IntoIterator for &'a Vector<T, E> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Scalar, E: Extent> IntoIterator for &'a mut Vector<T, E> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: Scalar, const N: usize> IntoIterator for Vector<T, Ext1<N>> {
    type Item = T;
    type IntoIter = core::array::IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_array().into_iter()
    }
}

impl<T: Scalar, E: Extent> fmt::Debug for Vector<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vector").field(&self.storage).finish()
    }
}

/// Writes `lanes` with one level of brackets per dimension.
fn write_nested<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    lanes: &[T],
    dims: &[usize],
) -> fmt::Result {
    let Some((&outer, inner)) = dims.split_first() else {
        return write!(f, "{}", lanes[0]);
    };
    f.write_str("[")?;
    for (i, chunk) in lanes.chunks(lanes.len() / outer).enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_nested(f, chunk, inner)?;
    }
    f.write_str("]")
}

impl<T: Scalar + fmt::Display, E: Extent> fmt::Display for Vector<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nested(f, self.as_slice(), E::SHAPE.dims())
    }
}

// endregion: Vector

// region: Adapters

/// Values that can be turned into the storage of a vector: vectors themselves, scalars as rank-0
/// vectors, arrays, homogeneous tuples and packed pairs.
pub trait IntoVector {
    type Scalar: Scalar;
    type Extent: Extent;

    fn into_storage(self) -> Storage<Self::Scalar, Self::Extent>;

    #[inline(always)]
    fn into_vector(self) -> Vector<Self::Scalar, Self::Extent>
    where
        Self: Sized,
    {
        Vector::from_storage(self.into_storage())
    }
}

impl<T: Scalar, E: Extent> IntoVector for Vector<T, E> {
    type Scalar = T;
    type Extent = E;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, E> {
        self.storage
    }
}

impl<T: Scalar, E: Extent> IntoVector for &Vector<T, E> {
    type Scalar = T;
    type Extent = E;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, E> {
        self.storage
    }
}

impl<T: Scalar, E: Extent> IntoVector for Storage<T, E> {
    type Scalar = T;
    type Extent = E;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, E> {
        self
    }
}

macro_rules! scalar_into_vector {
    ($($ty:ty),*) => {$(
        impl IntoVector for $ty {
            type Scalar = $ty;
            type Extent = Ext0;

            #[inline(always)]
            fn into_storage(self) -> Storage<$ty, Ext0> {
                Storage::splat(self)
            }
        }
    )*};
}

scalar_into_vector!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, f16, bf16);

impl<T: Scalar, const N: usize> IntoVector for [T; N] {
    type Scalar = T;
    type Extent = Ext1<N>;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, Ext1<N>> {
        Storage::from_array(self)
    }
}

#[cfg(feature = "tensor")]
impl<T: Scalar, const N: usize, const M: usize> IntoVector for [[T; M]; N] {
    type Scalar = T;
    type Extent = Ext2<N, M>;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, Ext2<N, M>> {
        Storage::from_array(self)
    }
}

#[cfg(feature = "tensor")]
impl<T: Scalar, const N: usize, const M: usize, const K: usize> IntoVector for [[[T; K]; M]; N] {
    type Scalar = T;
    type Extent = Ext3<N, M, K>;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, Ext3<N, M, K>> {
        Storage::from_array(self)
    }
}

impl<T: Scalar> IntoVector for (T, T) {
    type Scalar = T;
    type Extent = Ext1<2>;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, Ext1<2>> {
        Storage::from_array([self.0, self.1])
    }
}

impl<T: Scalar> IntoVector for (T, T, T) {
    type Scalar = T;
    type Extent = Ext1<3>;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, Ext1<3>> {
        Storage::from_array([self.0, self.1, self.2])
    }
}

impl<T: Scalar> IntoVector for (T, T, T, T) {
    type Scalar = T;
    type Extent = Ext1<4>;

    #[inline(always)]
    fn into_storage(self) -> Storage<T, Ext1<4>> {
        Storage::from_array([self.0, self.1, self.2, self.3])
    }
}

impl IntoVector for f16x2 {
    type Scalar = f16;
    type Extent = Ext1<2>;

    #[inline(always)]
    fn into_storage(self) -> Storage<f16, Ext1<2>> {
        Storage::from_array([self.0, self.1])
    }
}

impl IntoVector for bf16x2 {
    type Scalar = bf16;
    type Extent = Ext1<2>;

    #[inline(always)]
    fn into_storage(self) -> Storage<bf16, Ext1<2>> {
        Storage::from_array([self.0, self.1])
    }
}

impl<T: Scalar, E: Extent> From<Storage<T, E>> for Vector<T, E> {
    #[inline(always)]
    fn from(storage: Storage<T, E>) -> Self {
        Self::from_storage(storage)
    }
}

impl<T: Scalar, const N: usize> From<[T; N]> for Vector<T, Ext1<N>> {
    #[inline(always)]
    fn from(lanes: [T; N]) -> Self {
        Self::from_array(lanes)
    }
}

#[cfg(feature = "tensor")]
impl<T: Scalar, const N: usize, const M: usize> From<[[T; M]; N]> for Vector<T, Ext2<N, M>> {
    #[inline(always)]
    fn from(lanes: [[T; M]; N]) -> Self {
        Self::from_array(lanes)
    }
}

#[cfg(feature = "tensor")]
impl<T: Scalar, const N: usize, const M: usize, const K: usize> From<[[[T; K]; M]; N]>
    for Vector<T, Ext3<N, M, K>>
{
    #[inline(always)]
    fn from(lanes: [[[T; K]; M]; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: Scalar> From<(T, T)> for Vector<T, Ext1<2>> {
    #[inline(always)]
    fn from(lanes: (T, T)) -> Self {
        lanes.into_vector()
    }
}

impl<T: Scalar> From<(T, T, T)> for Vector<T, Ext1<3>> {
    #[inline(always)]
    fn from(lanes: (T, T, T)) -> Self {
        lanes.into_vector()
    }
}

impl<T: Scalar> From<(T, T, T, T)> for Vector<T, Ext1<4>> {
    #[inline(always)]
    fn from(lanes: (T, T, T, T)) -> Self {
        lanes.into_vector()
    }
}

impl From<f16x2> for Vector<f16, Ext1<2>> {
    #[inline(always)]
    fn from(pair: f16x2) -> Self {
        pair.into_vector()
    }
}

impl From<bf16x2> for Vector<bf16, Ext1<2>> {
    #[inline(always)]
    fn from(pair: bf16x2) -> Self {
        pair.into_vector()
    }
}

impl<T: Scalar, const N: usize> From<Vector<T, Ext1<N>>> for [T; N] {
    #[inline(always)]
    fn from(vector: Vector<T, Ext1<N>>) -> Self {
        vector.into_array()
    }
}

// endregion: Adapters

// region: Operators

/// Compound assignment into `Vector<Self, _>` from an operand of type `R` is allowed when the
/// promoted common type is `Self`, so the result needs no narrowing.
pub trait AssignCompatible<R: Scalar>: CommonWith<R, Common = Self> {}

impl<T, R> AssignCompatible<R> for T
where
    T: CommonWith<R, Common = T>,
    R: Scalar,
{
}

/// Whether an operand of extent `R` can be assigned into a vector of extent `E`.
pub const fn is_assign_allowed<E: Extent, R: Extent>() -> bool {
    is_broadcastable(R::SHAPE, E::SHAPE)
}

// Operators target the receiver's extent; `zip_common` unifies both operands instead.
macro_rules! binary_operators {
    ($($trait:ident :: $method:ident, $assign:ident :: $assign_method:ident => $functor:ident;)*) => {$(
        impl<T, E, R> core::ops::$trait<R> for Vector<T, E>
        where
            T: Scalar + CommonWith<R::Scalar>,
            E: Extent,
            R: IntoVector,
            ops::$functor: BinaryOp<Common<T, R::Scalar>, Common<T, R::Scalar>>,
        {
            type Output = Vector<CommonOutput<ops::$functor, T, R::Scalar>, E>;

            #[inline]
            fn $method(self, rhs: R) -> Self::Output {
                zip_common(ops::$functor, self, rhs)
            }
        }

        impl<T, E, R> core::ops::$assign<R> for Vector<T, E>
        where
            T: AssignCompatible<R::Scalar>,
            E: Extent,
            R: IntoVector,
            ops::$functor: BinaryOp<T, T, Output = T>,
        {
            #[inline]
            fn $assign_method(&mut self, rhs: R) {
                const {
                    assert!(
                        is_assign_allowed::<E, R::Extent>(),
                        "operand does not broadcast into the assigned extent"
                    )
                };
                *self = zip_common(ops::$functor, *self, rhs);
            }
        }
    )*};
}

binary_operators! {
    Add::add, AddAssign::add_assign => Add;
    Sub::sub, SubAssign::sub_assign => Sub;
    Mul::mul, MulAssign::mul_assign => Mul;
    Div::div, DivAssign::div_assign => Div;
    Rem::rem, RemAssign::rem_assign => Rem;
    BitAnd::bitand, BitAndAssign::bitand_assign => BitAnd;
    BitOr::bitor, BitOrAssign::bitor_assign => BitOr;
    BitXor::bitxor, BitXorAssign::bitxor_assign => BitXor;
}

macro_rules! scalar_left_operators {
    (@each $scalar:ty; $($trait:ident :: $method:ident => $functor:ident),*) => {$(
        impl<T, E> core::ops::$trait<Vector<T, E>> for $scalar
        where
            T: Scalar,
            E: Extent,
            $scalar: CommonWith<T>,
            ops::$functor: BinaryOp<Common<$scalar, T>, Common<$scalar, T>>,
        {
            type Output = Vector<CommonOutput<ops::$functor, $scalar, T>, E>;

            #[inline]
            fn $method(self, rhs: Vector<T, E>) -> Self::Output {
                zip_common(ops::$functor, self, rhs)
            }
        }
    )*};
    ($($scalar:ty),*) => {$(
        scalar_left_operators!(@each $scalar;
            Add::add => Add,
            Sub::sub => Sub,
            Mul::mul => Mul,
            Div::div => Div,
            Rem::rem => Rem,
            BitAnd::bitand => BitAnd,
            BitOr::bitor => BitOr,
            BitXor::bitxor => BitXor
        );
    )*};
}

scalar_left_operators!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, f16, bf16);

impl<T, E> core::ops::Neg for Vector<T, E>
where
    T: Scalar,
    E: Extent,
    ops::Neg: UnaryOp<T>,
{
    type Output = Vector<<ops::Neg as UnaryOp<T>>::Output, E>;

    #[inline]
    fn neg(self) -> Self::Output {
        map(ops::Neg, self)
    }
}

impl<T, E> core::ops::Not for Vector<T, E>
where
    T: Scalar,
    E: Extent,
    ops::BitNot: UnaryOp<T>,
{
    type Output = Vector<<ops::BitNot as UnaryOp<T>>::Output, E>;

    #[inline]
    fn not(self) -> Self::Output {
        map(ops::BitNot, self)
    }
}

// endregion: Operators

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::rounding;

    #[test]
    fn construction() {
        let zeros = Vector4::<f32>::zeros();
        assert_eq!(zeros.as_slice(), &[0.0; 4]);
        assert_eq!(zeros.ones_like().as_slice(), &[1.0; 4]);
        assert_eq!(zeros.full_like(2.5).as_slice(), &[2.5; 4]);
        assert_eq!(Vector3::<u8>::from_fn(|i| i as u8 * 2).as_slice(), &[0, 2, 4]);
        assert_eq!(Vector2::from((1i64, 2i64)).as_slice(), &[1, 2]);
        assert_eq!(Vector4::from((1u8, 2, 3, 4)).len(), 4);

        let pair = f16x2::from_f32s([0.5, 1.5]);
        assert_eq!(Vector2::from(pair).as_slice(), &[pair.0, pair.1]);

        let lanes: [i32; 3] = Vector3::from([7, 8, 9]).into();
        assert_eq!(lanes, [7, 8, 9]);
    }

    #[test]
    fn runtime_lengths_and_indices() {
        let v = Vector3::<i32>::try_from_slice(&[1, 2, 3]);
        assert_eq!(v.map(|v| v.into_array()), Ok([1, 2, 3]));

        let short = Vector3::<i32>::try_from_slice(&[1, 2]);
        assert_eq!(short, Err(VectorError::LengthMismatch { expected: 3, got: 2 }));

        let v = Vector3::from([4u8, 5, 6]);
        assert_eq!(v.try_get(2), Ok(6));
        assert_eq!(v.try_get(3), Err(VectorError::IndexOutOfBounds { index: 3, size: 3 }));
        assert_eq!(v.get_at(&[1]), Ok(5));
        assert_eq!(
            v.get_at(&[1, 0]),
            Err(VectorError::DimensionMismatch { expected: 1, got: 2 })
        );
        assert_eq!(
            VectorError::IndexOutOfBounds { index: 3, size: 3 }.to_string(),
            "index 3 out of bounds for size 3"
        );
    }

    #[test]
    #[cfg(feature = "tensor")]
    fn matrix_access_and_display() {
        let m = Matrix::<i32, 2, 3>::from([[1, 2, 3], [4, 5, 6]]);
        assert_eq!(m.get_at(&[1, 2]), Ok(6));
        assert_eq!(
            m.get_at(&[2, 0]),
            Err(VectorError::IndexOutOfBounds { index: 2, size: 2 })
        );
        assert_eq!(m.to_string(), "[[1, 2, 3], [4, 5, 6]]");
        assert_eq!(m.rank(), 2);
        assert_eq!(m.shape().to_string(), "[2, 3]");

        let t = Tensor3::<u8, 1, 2, 2>::from([[[1, 2], [3, 4]]]);
        assert_eq!(t.get_at(&[0, 1, 0]), Ok(3));

        let scaled = m * Vector3::from([1i32, 10, 100]);
        assert_eq!(scaled.as_slice(), &[1, 20, 300, 4, 50, 600]);
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(Vector3::from([1, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(Vector::<f32, Ext0>::splat(1.5).to_string(), "1.5");
        assert_eq!(format!("{:?}", Vector2::from([true, false])), "Vector([true, false])");
    }

    #[test]
    fn arithmetic_operators_promote() {
        let ints = Vector3::from([1i32, 2, 3]);
        let floats = Vector3::from([0.5f32, 0.25, 2.0]);
        let sums: Vector3<f32> = ints + floats;
        assert_eq!(sums.as_slice(), &[1.5, 2.25, 5.0]);
        assert_eq!((ints - 1i32).as_slice(), &[0, 1, 2]);
        assert_eq!((ints * ints).as_slice(), &[1, 4, 9]);
        assert_eq!((ints / 2i32).as_slice(), &[0, 1, 1]);
        assert_eq!((ints % 2i32).as_slice(), &[1, 0, 1]);
        assert_eq!((10i32 - ints).as_slice(), &[9, 8, 7]);
        assert_eq!((2.0f64 * ints).as_slice(), &[2.0, 4.0, 6.0]);
        assert_eq!((ints & 1i32).as_slice(), &[1, 0, 1]);
        assert_eq!((ints | [4i32, 4, 4]).as_slice(), &[5, 6, 7]);
        assert_eq!((ints ^ ints).as_slice(), &[0, 0, 0]);
        assert_eq!((-ints).as_slice(), &[-1, -2, -3]);
        assert_eq!((!Vector2::from([true, false])).as_slice(), &[false, true]);
        assert_eq!((!Vector2::from([0u8, 0xF0])).as_slice(), &[0xFF, 0x0F]);

        let narrow = Vector2::from([f16::from_f32(1.0), f16::from_f32(2.0)]);
        let wide: Vector2<f32> = narrow + Vector2::from([bf16::ONE, bf16::ONE]);
        assert_eq!(wide.as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn unified_extent_needs_zip_common() {
        let one = Vector1::from([10i32]);
        let four = Vector4::from([1.0f32, 2.0, 3.0, 4.0]);
        let sums: Vector4<f32> = zip_common(ops::Add, one, four);
        assert_eq!(sums.as_slice(), &[11.0, 12.0, 13.0, 14.0]);
        assert_eq!(four + one, sums);
    }

    #[test]
    fn compound_assignment() {
        let mut v = Vector3::from([1.0f32, 2.0, 3.0]);
        v += 1i32;
        v *= Vector3::from([2.0f32, 2.0, 2.0]);
        v -= [1.0f32, 1.0, 1.0];
        assert_eq!(v.as_slice(), &[3.0, 5.0, 7.0]);

        let mut bits = Vector2::from([0b1100u8, 0b1010]);
        bits &= 0b0110u8;
        bits |= true;
        assert_eq!(bits.as_slice(), &[0b0101, 0b0011]);

        let mut wide = Vector2::from([1i64, 2]);
        wide += Vector2::from([1i8, 1]);
        wide %= 2i16;
        assert_eq!(wide.as_slice(), &[0, 1]);
    }

    #[test]
    fn comparisons_and_lane_extrema() {
        let a = Vector4::from([1i32, 5, 3, 3]);
        let b = Vector4::from([2i32, 4, 3, 3]);
        assert_eq!(a.lanes_lt(b).as_slice(), &[1, 0, 0, 0]);
        assert_eq!(a.lanes_le(b).as_slice(), &[1, 0, 1, 1]);
        assert_eq!(a.lanes_eq(b).as_slice(), &[0, 0, 1, 1]);
        assert_eq!(a.lanes_ne(3i32).as_slice(), &[1, 1, 0, 0]);
        assert_eq!(a.lanes_gt(2.5f32).as_slice(), &[0.0, 1.0, 1.0, 1.0]);
        assert_eq!(a.lanes_ge(b).count(), 3);
        assert_eq!(a.lanes_min(b).as_slice(), &[1, 4, 3, 3]);
        assert_eq!(a.lanes_max(b).as_slice(), &[2, 5, 3, 3]);
    }

    #[test]
    fn reductions_and_selection() {
        let v = VectorN::<i32, 5>::from([5, 0, 2, 1, 0]);
        assert_eq!(v.sum(), 8);
        assert_eq!(v.min(), 0);
        assert_eq!(v.max(), 5);
        assert_eq!(v.product(), 0);
        assert_eq!(v.count(), 3);
        assert!(!v.all());
        assert!(v.any());
        assert_eq!(v.reduce(|a: i32, b: i32| a * 10 + b), 50210);
        assert_eq!(Vector3::from([1i32, 2, 3]).dot([4i32, 5, 6]), 32);

        let picked: Vector3<i32> =
            Vector3::from([1i32, 0, 1]).select([10i32, 20, 30], [100i32, 200, 300]);
        assert_eq!(picked.as_slice(), &[10, 200, 30]);

        let fused = Vector2::from([2.0f32, 3.0]).mul_add(4.0f32, 1i32);
        assert_eq!(fused.as_slice(), &[9.0, 13.0]);
        assert_eq!(Vector2::from([-2i8, 3]).abs().as_slice(), &[2, 3]);
        assert_eq!(Vector2::from([0.0f32, 3.0]).logical_not().as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn conversions() {
        let v = Vector3::from([1.7f32, -0.2, 2.5]);
        assert_eq!(v.cast::<i32>().as_slice(), &[1, 0, 2]);
        assert_eq!(v.cast_with::<i32, rounding::Nearest>().as_slice(), &[1, 0, 2]);
        let narrow = v.cast_with::<f16, rounding::Down>();
        for (n, x) in narrow.iter().zip(&v) {
            assert!(n.to_f32() <= *x);
        }

        let identity: Vector3<f32> = v.convert();
        assert_eq!(identity, v);
        let scalar = Vector::<u8, Ext0>::splat(7);
        assert_eq!(scalar.convert::<f64, Ext1<2>>().as_slice(), &[7.0, 7.0]);
        assert_eq!(Vector1::from([7]).broadcast::<Ext1<4>>().as_slice(), &[7; 4]);
        let pair = Vector2::from([1, 2]);
        assert_eq!(pair.broadcast::<Ext1<2>>(), pair);
    }

    #[test]
    fn iteration() {
        let mut v = Vector3::from([1i32, 2, 3]);
        for lane in &mut v {
            *lane *= 2;
        }
        let collected: Vec<i32> = (&v).into_iter().copied().collect();
        assert_eq!(collected, vec![2, 4, 6]);
        assert_eq!(v.into_iter().sum::<i32>(), 12);
        v[0] = -1;
        assert_eq!(v.get(0), Some(-1));
        assert_eq!(v.get(3), None);
    }
}
