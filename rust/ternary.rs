//! Three-operand element-wise operations: lane selection and fused multiply-add.
//!
//! Both operations broadcast all three operands into one unified extent. [`select`] promotes
//! only its two value operands, the condition is cast to `bool`. [`fma`] promotes all three.
//!
//! ```
//! use lanewise::{fma, select, Vector3};
//!
//! let cond = Vector3::from([1i32, 0, 1]);
//! let on_true = Vector3::from([10i32, 20, 30]);
//! let on_false = Vector3::from([100i32, 200, 300]);
//! let picked: Vector3<i32> = select(cond, on_true, on_false);
//! assert_eq!(picked.as_slice(), &[10, 200, 30]);
//!
//! let fused: Vector3<f32> = fma(Vector3::from([1.0f32, 2.0, 3.0]), 2.0f32, 1i32);
//! assert_eq!(fused.as_slice(), &[3.0, 5.0, 7.0]);
//! ```

use crate::apply::TernaryOp;
use crate::broadcast::broadcast;
use crate::convert::{convert_storage, rounding, CastTo, Common, CommonWith};
use crate::extents::{unify, unifies_to, Extent, Shape};
use crate::ops::{Fma, Select};
use crate::promote::{Promote, Promoted, Promoted3};
use crate::scalars::Scalar;
use crate::storage::Storage;
use crate::vector::{IntoVector, Vector};

/// Whether `a`, `b` and `c` unify into exactly `target`.
const fn unify3_to(a: Shape, b: Shape, c: Shape, target: Shape) -> bool {
    match unify(a, b) {
        Some(ab) => unifies_to(ab, c, target),
        None => false,
    }
}

/// Picks `on_true[i]` where `cond[i]` is nonzero and `on_false[i]` elsewhere.
///
/// The value operands are promoted to their common type. All three operands are broadcast into
/// `E`, which must be their unified extent.
#[inline]
pub fn select<E, C, L, R>(cond: C, on_true: L, on_false: R) -> Vector<Common<L::Scalar, R::Scalar>, E>
where
    E: Extent,
    C: IntoVector,
    C::Scalar: CastTo<bool>,
    L: IntoVector,
    R: IntoVector,
    L::Scalar: CommonWith<R::Scalar>,
{
    const {
        assert!(
            unify3_to(
                <C::Extent as Extent>::SHAPE,
                <L::Extent as Extent>::SHAPE,
                <R::Extent as Extent>::SHAPE,
                E::SHAPE
            ),
            "operand extents do not unify into the result extent"
        )
    };
    let cond = convert_storage::<_, bool, _, E, rounding::Any>(&cond.into_storage());
    let on_true = on_true.into_storage();
    let on_false = on_false.into_storage();
    let on_true = broadcast::<_, L::Extent, E>(&Storage::from_fn(|i| on_true[i].promote()));
    let on_false = broadcast::<_, R::Extent, E>(&Storage::from_fn(|i| {
        <L::Scalar as CommonWith<R::Scalar>>::promote_rhs(on_false[i])
    }));
    Vector::from_storage(Select.apply(&cond, &on_true, &on_false))
}

/// [`select`] with zero in place of the false operand.
#[inline]
pub fn select_or_zero<E, C, L>(cond: C, on_true: L) -> Vector<L::Scalar, E>
where
    E: Extent,
    C: IntoVector,
    C::Scalar: CastTo<bool>,
    L: IntoVector,
{
    const {
        assert!(
            unifies_to(
                <C::Extent as Extent>::SHAPE,
                <L::Extent as Extent>::SHAPE,
                E::SHAPE
            ),
            "operand extents do not unify into the result extent"
        )
    };
    let cond = convert_storage::<_, bool, _, E, rounding::Any>(&cond.into_storage());
    let on_true = broadcast::<_, _, E>(&on_true.into_storage());
    Vector::from_storage(Select.apply(&cond, &on_true, &Storage::splat(L::Scalar::ZERO)))
}

/// One where `cond` is nonzero and zero elsewhere, in the element type `T`.
#[inline]
pub fn mask<T, C>(cond: C) -> Vector<T, C::Extent>
where
    T: Scalar,
    C: IntoVector,
    C::Scalar: CastTo<bool>,
{
    let cond = convert_storage::<_, bool, _, C::Extent, rounding::Any>(&cond.into_storage());
    Vector::from_storage(Select.apply(&cond, &Storage::splat(T::ONE), &Storage::splat(T::ZERO)))
}

/// `a[i] * b[i] + c[i]` after promoting all three operands to their common type and
/// broadcasting them into `E`.
///
/// Floating types round once when the `std` feature provides the native fused operation.
#[inline]
pub fn fma<E, A, B, C>(a: A, b: B, c: C) -> Vector<Promoted3<A::Scalar, B::Scalar, C::Scalar>, E>
where
    E: Extent,
    A: IntoVector,
    B: IntoVector,
    C: IntoVector,
    A::Scalar: Promote<B::Scalar>,
    Promoted<A::Scalar, B::Scalar>: Promote<C::Scalar>,
    Promoted3<A::Scalar, B::Scalar, C::Scalar>: Scalar,
    A::Scalar: CastTo<Promoted3<A::Scalar, B::Scalar, C::Scalar>>,
    B::Scalar: CastTo<Promoted3<A::Scalar, B::Scalar, C::Scalar>>,
    C::Scalar: CastTo<Promoted3<A::Scalar, B::Scalar, C::Scalar>>,
    Fma: TernaryOp<
        Promoted3<A::Scalar, B::Scalar, C::Scalar>,
        Promoted3<A::Scalar, B::Scalar, C::Scalar>,
        Promoted3<A::Scalar, B::Scalar, C::Scalar>,
        Output = Promoted3<A::Scalar, B::Scalar, C::Scalar>,
    >,
{
    const {
        assert!(
            unify3_to(
                <A::Extent as Extent>::SHAPE,
                <B::Extent as Extent>::SHAPE,
                <C::Extent as Extent>::SHAPE,
                E::SHAPE
            ),
            "operand extents do not unify into the result extent"
        )
    };
    let a = convert_storage::<_, _, _, E, rounding::Any>(&a.into_storage());
    let b = convert_storage::<_, _, _, E, rounding::Any>(&b.into_storage());
    let c = convert_storage::<_, _, _, E, rounding::Any>(&c.into_storage());
    Vector::from_storage(Fma.apply(&a, &b, &c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extents::{Ext0, Ext1};
    use crate::scalars::f16;

    #[test]
    fn select_mixes_lanes() {
        let cond = Vector::<i32, Ext1<3>>::from([1, 0, 1]);
        let on_true = Vector::<i32, Ext1<3>>::from([10, 20, 30]);
        let on_false = Vector::<i32, Ext1<3>>::from([100, 200, 300]);
        let picked: Vector<i32, Ext1<3>> = select(cond, on_true, on_false);
        assert_eq!(picked.as_slice(), &[10, 200, 30]);
    }

    #[test]
    fn select_promotes_and_broadcasts() {
        let cond = Vector::<f32, Ext1<4>>::from([0.0, 0.5, f32::NAN, -0.0]);
        let picked: Vector<f64, Ext1<4>> = select(cond, 1.5f64, 7i32);
        assert_eq!(picked.as_slice(), &[7.0, 1.5, 1.5, 7.0]);

        let flag = Vector::<bool, Ext0>::splat(true);
        let all: Vector<u8, Ext1<2>> = select(flag, Vector::<u8, Ext1<2>>::from([4, 5]), 0u8);
        assert_eq!(all.as_slice(), &[4, 5]);
    }

    #[test]
    fn select_defaults() {
        let cond = Vector::<u8, Ext1<3>>::from([2, 0, 1]);
        let values = Vector::<i16, Ext1<3>>::from([-1, -2, -3]);
        let kept: Vector<i16, Ext1<3>> = select_or_zero(cond, values);
        assert_eq!(kept.as_slice(), &[-1, 0, -3]);

        let ones = mask::<f16, _>(cond);
        assert_eq!(ones.as_slice(), &[f16::ONE, f16::ZERO, f16::ONE]);
    }

    #[test]
    fn fma_matches_multiply_add() {
        let samples = [
            (1.5f64, -2.0f64, 0.25f64),
            (3.0, 4.0, 5.0),
            (-0.5, 0.5, 0.0),
            (1e10, 1e-10, -1.0),
        ];
        for (a, b, c) in samples {
            let fused: Vector<f64, Ext0> = fma(a, b, c);
            assert!((fused[0] - (a * b + c)).abs() <= 1e-12 * (a * b + c).abs().max(1.0));
        }

        let ramp = Vector::<i32, Ext1<3>>::from([1, 2, 3]);
        let ints: Vector<i32, Ext1<3>> = fma(ramp, 10i8, Vector::<i32, Ext1<1>>::from([-1]));
        assert_eq!(ints.as_slice(), &[9, 19, 29]);
    }

    #[test]
    #[cfg(feature = "std")]
    fn fma_keeps_the_low_bits() {
        let tiny = 1.0 / (1u64 << 30) as f64;
        let (a, b, c) = (1.0 + tiny, 1.0 - tiny, -1.0);
        let fused: Vector<f64, Ext0> = fma(a, b, c);
        assert_eq!(fused[0], -tiny * tiny);
        assert_eq!(a * b + c, 0.0);
    }
}
