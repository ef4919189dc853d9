//! Fixed-size lane storage.
//!
//! [`Storage`] owns exactly `E::VOLUME` scalars in a row-major nested array. It is a plain value:
//! copying a storage copies its lanes. Zero-volume extents are rejected when a constructor is
//! instantiated, so every storage that exists has at least one lane.

use core::fmt;
use core::mem::{align_of, size_of};
use core::ops::{Index, IndexMut};

use crate::extents::Extent;
use crate::scalars::Scalar;

/// Upper bound on the alignment picked by [`natural_alignment`], the width of the widest
/// load/store instructions the lanes are expected to feed.
pub const MAX_ALIGNMENT: usize = 32;

/// Largest power of two not exceeding [`MAX_ALIGNMENT`] that divides `total_size`, and never less
/// than `min_alignment`.
pub const fn natural_alignment(total_size: usize, min_alignment: usize) -> usize {
    let mut alignment = MAX_ALIGNMENT;
    while alignment > min_alignment {
        if total_size % alignment == 0 {
            return alignment;
        }
        alignment /= 2;
    }
    min_alignment
}

/// Contiguous, fixed-length lanes of `T` shaped by `E`.
#[repr(transparent)]
pub struct Storage<T: Scalar, E: Extent> {
    lanes: E::Array<T>,
}

impl<T: Scalar, E: Extent> Storage<T, E> {
    /// Number of lanes.
    pub const LEN: usize = E::VOLUME;

    /// Size of the lanes in bytes.
    pub const SIZE: usize = E::VOLUME * size_of::<T>();

    /// Natural alignment of the lanes for wide loads and stores, see [`natural_alignment`].
    ///
    /// Placement at this alignment is the caller's concern: the in-memory alignment of a
    /// `Storage` value is that of `T`, since `repr(align)` cannot depend on `T` or `E`.
    pub const ALIGNMENT: usize = natural_alignment(Self::SIZE, align_of::<T>());

    /// Builds the storage from a function of the flat row-major lane index.
    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        const { assert!(E::VOLUME > 0, "zero-length storage is not supported") };
        Self { lanes: E::build(f) }
    }

    #[inline(always)]
    pub fn from_array(lanes: E::Array<T>) -> Self {
        const { assert!(E::VOLUME > 0, "zero-length storage is not supported") };
        Self { lanes }
    }

    /// Every lane set to `value`.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value)
    }

    #[inline(always)]
    pub fn as_array(&self) -> &E::Array<T> {
        &self.lanes
    }

    #[inline(always)]
    pub fn into_array(self) -> E::Array<T> {
        self.lanes
    }

    /// Lanes in row-major order.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        E::flat(&self.lanes)
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        E::flat_mut(&mut self.lanes)
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        E::VOLUME
    }

    /// Always `false`: zero-length storage cannot be built.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl<T: Scalar, E: Extent> Clone for Storage<T, E> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Scalar, E: Extent> Copy for Storage<T, E> {}

impl<T: Scalar, E: Extent> Default for Storage<T, E> {
    fn default() -> Self {
        Self::splat(T::default())
    }
}

impl<T: Scalar, E: Extent> PartialEq for Storage<T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Scalar, E: Extent> fmt::Debug for Storage<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Scalar, E: Extent> Index<usize> for Storage<T, E> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: Scalar, E: Extent> IndexMut<usize> for Storage<T, E> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extents::{Ext0, Ext1};
    use crate::scalars::f16;

    #[test]
    fn alignment_follows_total_size() {
        assert_eq!(natural_alignment(16, 4), 16);
        assert_eq!(natural_alignment(12, 4), 4);
        assert_eq!(natural_alignment(3, 1), 1);
        assert_eq!(natural_alignment(64, 1), 32);
        assert_eq!(natural_alignment(24, 8), 8);

        assert_eq!(Storage::<f32, Ext1<4>>::ALIGNMENT, 16);
        assert_eq!(Storage::<f32, Ext1<3>>::ALIGNMENT, 4);
        assert_eq!(Storage::<f64, Ext1<4>>::ALIGNMENT, 32);
        assert_eq!(Storage::<u8, Ext1<6>>::ALIGNMENT, 2);
        assert_eq!(Storage::<f16, Ext1<2>>::ALIGNMENT, 4);
        assert_eq!(Storage::<i64, Ext0>::ALIGNMENT, 8);
    }

    #[test]
    fn construction_and_indexing() {
        let mut lanes = Storage::<i32, Ext1<4>>::from_fn(|i| i as i32 * 10);
        assert_eq!(lanes.as_slice(), &[0, 10, 20, 30]);
        lanes[2] = -1;
        assert_eq!(lanes[2], -1);
        assert_eq!(lanes.len(), 4);
        assert_eq!(lanes.into_array(), [0, 10, -1, 30]);

        let sevens = Storage::<u8, Ext1<3>>::splat(7);
        assert_eq!(sevens, Storage::from_array([7, 7, 7]));
        assert_eq!(format!("{:?}", sevens), "[7, 7, 7]");
        assert_eq!(Storage::<f32, Ext0>::default().as_slice(), &[0.0]);
    }

    #[test]
    #[cfg(feature = "tensor")]
    fn nested_storage_is_row_major() {
        use crate::extents::Ext2;
        let grid = Storage::<u16, Ext2<2, 3>>::from_array([[1, 2, 3], [4, 5, 6]]);
        assert_eq!(grid[4], 5);
        assert_eq!(grid.as_array()[1][1], 5);
        assert_eq!(Storage::<u16, Ext2<2, 3>>::SIZE, 12);
    }
}
