//! Replication of a storage into a larger extent.

use core::any::Any;

use crate::extents::{broadcast_source, is_broadcastable, Extent};
use crate::scalars::Scalar;
use crate::storage::Storage;

/// Broadcasts `input` into the extent `To`.
///
/// Each size-1 dimension of `From`, after left-padding `From` with ones up to the rank of `To`,
/// is replicated along the matching dimension of `To`. When `From` and `To` are the same extent
/// the lanes are copied unchanged.
///
/// Broadcasting to an extent that `From` cannot stretch into fails to compile:
///
/// ```compile_fail
/// use lanewise::{broadcast, Ext1, Storage};
///
/// let three = Storage::<i32, Ext1<3>>::splat(1);
/// let four: Storage<i32, Ext1<4>> = broadcast(&three);
/// ```
#[inline]
pub fn broadcast<T, From, To>(input: &Storage<T, From>) -> Storage<T, To>
where
    T: Scalar,
    From: Extent,
    To: Extent,
{
    const {
        assert!(
            is_broadcastable(From::SHAPE, To::SHAPE),
            "cannot broadcast to the requested extent"
        )
    };
    // Folded at compile time: the `TypeId` comparison is between two constants.
    if let Some(same) = (input as &dyn Any).downcast_ref::<Storage<T, To>>() {
        return *same;
    }
    let source = input.as_slice();
    Storage::from_fn(|i| source[broadcast_source(&From::SHAPE, &To::SHAPE, i)])
}
