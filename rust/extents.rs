//! Compile-time extents and the broadcasting algebra over them.
//!
//! An extent is a zero-sized type describing a fixed shape of rank 0 to 3:
//!
//! - [`Ext0`]: a scalar, volume 1
//! - [`Ext1<N>`]: a vector of `N` lanes
//! - [`Ext2<N, M>`]: `N` rows of `M` lanes (requires the `tensor` feature)
//! - [`Ext3<N, M, K>`]: `N × M × K` lanes (requires the `tensor` feature)
//!
//! Every extent exposes its [`Shape`] as an associated constant. The broadcasting rules are
//! `const fn`s over shapes, so incompatible shapes are rejected while the program is compiled:
//! lower-rank shapes are left-padded with ones, then each dimension must either match or be `1`.
//!
//! ```
//! use lanewise::extents::{unify, Shape};
//!
//! const ROW: Shape = Shape::new(&[4]);
//! const COLUMN: Shape = Shape::new(&[3, 1]);
//! const GRID: Option<Shape> = unify(ROW, COLUMN);
//! assert_eq!(GRID, Some(Shape::new(&[3, 4])));
//! ```

use core::fmt;

/// Highest rank an extent can have.
pub const MAX_RANK: usize = 3;

// region: Shape

/// Value-level description of an extent: its rank and its dimension sizes.
///
/// Unused trailing slots hold `1`, so the volume is always the product of all slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: [usize; MAX_RANK],
    rank: usize,
}

impl Shape {
    /// The rank-0 shape of a single scalar.
    pub const SCALAR: Shape = Shape {
        dims: [1; MAX_RANK],
        rank: 0,
    };

    /// Creates a shape from its dimension sizes, outermost first.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_RANK`] dimensions are given. In a constant context this is a
    /// compilation error.
    pub const fn new(dims: &[usize]) -> Self {
        assert!(dims.len() <= MAX_RANK, "too many ranks for a shape");
        let mut padded = [1; MAX_RANK];
        let mut axis = 0;
        while axis < dims.len() {
            padded[axis] = dims[axis];
            axis += 1;
        }
        Shape {
            dims: padded,
            rank: dims.len(),
        }
    }

    #[inline(always)]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Dimension sizes, outermost first.
    #[inline(always)]
    pub const fn dims(&self) -> &[usize] {
        self.dims.split_at(self.rank).0
    }

    /// Total number of elements: the product of all dimension sizes, `1` for rank 0.
    pub const fn volume(&self) -> usize {
        let mut volume = 1;
        let mut axis = 0;
        while axis < self.rank {
            volume *= self.dims[axis];
            axis += 1;
        }
        volume
    }

    /// Size of `axis` once this shape is left-padded with ones up to `rank`.
    const fn padded_dim(&self, rank: usize, axis: usize) -> usize {
        let offset = rank - self.rank;
        if axis < offset {
            1
        } else {
            self.dims[axis - offset]
        }
    }

    /// Const-evaluable equality.
    pub const fn same_as(&self, other: &Shape) -> bool {
        if self.rank != other.rank {
            return false;
        }
        let mut axis = 0;
        while axis < self.rank {
            if self.dims[axis] != other.dims[axis] {
                return false;
            }
            axis += 1;
        }
        true
    }

    /// Row-major strides, in elements. Slots beyond the rank are zero.
    pub const fn strides(&self) -> [usize; MAX_RANK] {
        let mut strides = [0; MAX_RANK];
        let mut stride = 1;
        let mut axis = self.rank;
        while axis > 0 {
            axis -= 1;
            strides[axis] = stride;
            stride *= self.dims[axis];
        }
        strides
    }

    /// Flat offset of a multi-index, or `None` if the index has the wrong rank or is out of
    /// bounds along any axis.
    pub fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.rank {
            return None;
        }
        let strides = self.strides();
        let mut offset = 0;
        for (axis, &coordinate) in index.iter().enumerate() {
            if coordinate >= self.dims[axis] {
                return None;
            }
            offset += coordinate * strides[axis];
        }
        Some(offset)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, &d) in self.dims().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

// endregion: Shape

// region: Broadcasting

/// Unifies two shapes under the broadcasting rules, or returns `None` when some dimension pair
/// differs and neither side is `1`.
pub const fn unify(a: Shape, b: Shape) -> Option<Shape> {
    let rank = if a.rank > b.rank { a.rank } else { b.rank };
    let mut dims = [1; MAX_RANK];
    let mut axis = 0;
    while axis < rank {
        let x = a.padded_dim(rank, axis);
        let y = b.padded_dim(rank, axis);
        dims[axis] = if x == y || y == 1 {
            x
        } else if x == 1 {
            y
        } else {
            return None;
        };
        axis += 1;
    }
    Some(Shape { dims, rank })
}

/// True iff `a` and `b` unify exactly into `target`.
pub const fn unifies_to(a: Shape, b: Shape, target: Shape) -> bool {
    match unify(a, b) {
        Some(unified) => unified.same_as(&target),
        None => false,
    }
}

/// True iff `from` can be broadcast into `to`, i.e. `unify(from, to) == to`.
pub const fn is_broadcastable(from: Shape, to: Shape) -> bool {
    unifies_to(from, to, to)
}

/// [`is_broadcastable`] lifted to extent types.
pub const fn broadcastable<From: Extent, To: Extent>() -> bool {
    is_broadcastable(From::SHAPE, To::SHAPE)
}

/// Maps a flat index of `to` onto the flat index of `from` that feeds it when broadcasting:
/// every coordinate along a size-1 source dimension collapses to zero.
#[inline]
pub(crate) fn broadcast_source(from: &Shape, to: &Shape, flat: usize) -> usize {
    let mut remaining = flat;
    let mut source = 0;
    let mut stride = 1;
    let mut axis = to.rank;
    while axis > 0 {
        axis -= 1;
        let coordinate = remaining % to.dims[axis];
        remaining /= to.dims[axis];
        let source_dim = from.padded_dim(to.rank, axis);
        if source_dim != 1 {
            source += coordinate * stride;
        }
        stride *= source_dim;
    }
    source
}

// endregion: Broadcasting

// region: Extent Types

mod private {
    pub trait Sealed {}
    impl Sealed for super::Ext0 {}
    impl<const N: usize> Sealed for super::Ext1<N> {}
    #[cfg(feature = "tensor")]
    impl<const N: usize, const M: usize> Sealed for super::Ext2<N, M> {}
    #[cfg(feature = "tensor")]
    impl<const N: usize, const M: usize, const K: usize> Sealed for super::Ext3<N, M, K> {}
}

/// A compile-time shape.
///
/// This trait is sealed - the set of extents is fixed by this crate.
pub trait Extent:
    Copy + Default + fmt::Debug + PartialEq + Eq + Send + Sync + 'static + private::Sealed
{
    const SHAPE: Shape;
    const RANK: usize = Self::SHAPE.rank();
    const VOLUME: usize = Self::SHAPE.volume();

    /// Row-major nested array holding one element per lane.
    type Array<T: Copy>: Copy;

    /// Views the nested array as a flat row-major slice.
    fn flat<T: Copy>(array: &Self::Array<T>) -> &[T];
    fn flat_mut<T: Copy>(array: &mut Self::Array<T>) -> &mut [T];

    /// Builds the nested array from a function of the flat row-major index.
    fn build<T: Copy>(f: impl FnMut(usize) -> T) -> Self::Array<T>;
}

/// Rank 0: a single scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ext0;

/// Rank 1: `N` lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ext1<const N: usize>;

/// Rank 2: `N` rows of `M` lanes.
#[cfg(feature = "tensor")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ext2<const N: usize, const M: usize>;

/// Rank 3: `N` planes of `M` rows of `K` lanes.
#[cfg(feature = "tensor")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ext3<const N: usize, const M: usize, const K: usize>;

impl Extent for Ext0 {
    const SHAPE: Shape = Shape::SCALAR;
    type Array<T: Copy> = [T; 1];

    #[inline(always)]
    fn flat<T: Copy>(array: &[T; 1]) -> &[T] {
        array
    }

    #[inline(always)]
    fn flat_mut<T: Copy>(array: &mut [T; 1]) -> &mut [T] {
        array
    }

    #[inline(always)]
    fn build<T: Copy>(mut f: impl FnMut(usize) -> T) -> [T; 1] {
        [f(0)]
    }
}

impl<const N: usize> Extent for Ext1<N> {
    const SHAPE: Shape = Shape::new(&[N]);
    type Array<T: Copy> = [T; N];

    #[inline(always)]
    fn flat<T: Copy>(array: &[T; N]) -> &[T] {
        array
    }

    #[inline(always)]
    fn flat_mut<T: Copy>(array: &mut [T; N]) -> &mut [T] {
        array
    }

    #[inline(always)]
    fn build<T: Copy>(f: impl FnMut(usize) -> T) -> [T; N] {
        core::array::from_fn(f)
    }
}

#[cfg(feature = "tensor")]
impl<const N: usize, const M: usize> Extent for Ext2<N, M> {
    const SHAPE: Shape = Shape::new(&[N, M]);
    type Array<T: Copy> = [[T; M]; N];

    #[inline(always)]
    fn flat<T: Copy>(array: &[[T; M]; N]) -> &[T] {
        array.as_slice().as_flattened()
    }

    #[inline(always)]
    fn flat_mut<T: Copy>(array: &mut [[T; M]; N]) -> &mut [T] {
        array.as_mut_slice().as_flattened_mut()
    }

    #[inline(always)]
    fn build<T: Copy>(mut f: impl FnMut(usize) -> T) -> [[T; M]; N] {
        core::array::from_fn(|i| core::array::from_fn(|j| f(i * M + j)))
    }
}

#[cfg(feature = "tensor")]
impl<const N: usize, const M: usize, const K: usize> Extent for Ext3<N, M, K> {
    const SHAPE: Shape = Shape::new(&[N, M, K]);
    type Array<T: Copy> = [[[T; K]; M]; N];

    #[inline(always)]
    fn flat<T: Copy>(array: &[[[T; K]; M]; N]) -> &[T] {
        array.as_slice().as_flattened().as_flattened()
    }

    #[inline(always)]
    fn flat_mut<T: Copy>(array: &mut [[[T; K]; M]; N]) -> &mut [T] {
        array.as_mut_slice().as_flattened_mut().as_flattened_mut()
    }

    #[inline(always)]
    fn build<T: Copy>(mut f: impl FnMut(usize) -> T) -> [[[T; K]; M]; N] {
        core::array::from_fn(|i| {
            core::array::from_fn(|j| core::array::from_fn(|k| f((i * M + j) * K + k)))
        })
    }
}

// endregion: Extent Types
