//! Reductions of all lanes into one value.
//!
//! Each reduction is [`Reduce::reduce`] with a functor from [`crate::ops`]. Element types with a
//! packed-lane path reduce adjacent pairs first, so their sums and products may differ from the
//! strict left fold in the last bits.

use crate::apply::{map, zip_common, BinaryOp, Reduce};
use crate::convert::{cast, CastTo, Common, CommonWith};
use crate::ops::{Add, Max, Min, Mul};
use crate::vector::{IntoVector, Vector};

/// Left fold of `fun` over every lane, starting from lane 0.
#[inline]
pub fn reduce<F, V>(fun: F, input: V) -> V::Scalar
where
    V: IntoVector,
    F: Reduce<V::Scalar>,
{
    fun.reduce(&input.into_storage())
}

/// The least lane.
#[inline]
pub fn min<V>(input: V) -> V::Scalar
where
    V: IntoVector,
    Min: Reduce<V::Scalar>,
{
    reduce(Min, input)
}

/// The greatest lane.
#[inline]
pub fn max<V>(input: V) -> V::Scalar
where
    V: IntoVector,
    Max: Reduce<V::Scalar>,
{
    reduce(Max, input)
}

/// Sum of all lanes. For `bool` this is `any`.
#[inline]
pub fn sum<V>(input: V) -> V::Scalar
where
    V: IntoVector,
    Add: Reduce<V::Scalar>,
{
    reduce(Add, input)
}

/// Product of all lanes. For `bool` this is `all`.
#[inline]
pub fn product<V>(input: V) -> V::Scalar
where
    V: IntoVector,
    Mul: Reduce<V::Scalar>,
{
    reduce(Mul, input)
}

/// Sum of the lane-wise products, computed in the promoted common type.
///
/// `right` is broadcast into the extent of `left`.
#[inline]
pub fn dot<L, R>(left: L, right: R) -> Common<L::Scalar, R::Scalar>
where
    L: IntoVector,
    R: IntoVector,
    L::Scalar: CommonWith<R::Scalar>,
    Mul: BinaryOp<
        Common<L::Scalar, R::Scalar>,
        Common<L::Scalar, R::Scalar>,
        Output = Common<L::Scalar, R::Scalar>,
    >,
    Add: Reduce<Common<L::Scalar, R::Scalar>>,
{
    let products: Vector<_, L::Extent> = zip_common(Mul, left, right);
    sum(products)
}

/// Whether every lane is nonzero.
#[inline]
pub fn all<V>(input: V) -> bool
where
    V: IntoVector,
    V::Scalar: CastTo<bool>,
{
    product(cast::<bool, V>(input))
}

/// Whether any lane is nonzero.
#[inline]
pub fn any<V>(input: V) -> bool
where
    V: IntoVector,
    V::Scalar: CastTo<bool>,
{
    sum(cast::<bool, V>(input))
}

/// Number of nonzero lanes.
#[inline]
pub fn count<V>(input: V) -> usize
where
    V: IntoVector,
    V::Scalar: CastTo<bool>,
{
    sum(map(|flag: bool| flag as usize, cast::<bool, V>(input)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extents::Ext1;
    use crate::scalars::{bf16, f16};

    #[test]
    fn reductions_over_mixed_lanes() {
        let v = Vector::<i32, Ext1<5>>::from([5, 0, 2, 1, 0]);
        assert_eq!(sum(v), 8);
        assert_eq!(min(v), 0);
        assert_eq!(max(v), 5);
        assert_eq!(product(v), 0);
        assert_eq!(count(v), 3);
        assert!(!all(v));
        assert!(any(v));
    }

    #[test]
    fn reductions_over_floats() {
        let v = Vector::<f32, Ext1<4>>::from([1.5, -2.0, 4.0, 0.5]);
        assert_eq!(sum(v), 4.0);
        assert_eq!(product(v), -6.0);
        assert_eq!(min(v), -2.0);
        assert!(all(v));

        let narrow = Vector::<bf16, Ext1<3>>::from([
            bf16::from_f32(1.0),
            bf16::from_f32(2.0),
            bf16::from_f32(-4.0),
        ]);
        assert_eq!(sum(narrow), bf16::from_f32(-1.0));
        assert_eq!(max(narrow), bf16::from_f32(2.0));
    }

    #[test]
    fn dot_product() {
        let a = Vector::<i32, Ext1<3>>::from([1, 2, 3]);
        let b = Vector::<i32, Ext1<3>>::from([4, 5, 6]);
        assert_eq!(dot(a, b), 32);

        let halves = Vector::<f16, Ext1<3>>::from([f16::from_f32(0.5); 3]);
        assert_eq!(dot(a, halves), f16::from_f32(3.0));
        assert_eq!(dot(a, 2i32), 12);
    }

    #[test]
    fn single_lane() {
        let one = Vector::<u8, Ext1<1>>::from([9]);
        assert_eq!(sum(one), 9);
        assert_eq!(min(one), 9);
        assert_eq!(count(one), 1);
        assert_eq!(reduce(|a: u8, b: u8| a.max(b), one), 9);
    }
}
