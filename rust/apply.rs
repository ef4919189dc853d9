//! The generic apply engine and its packed-lane hook.
//!
//! Every element-wise computation in this crate runs through one of the functor traits:
//!
//! - [`UnaryOp`]: one input lane to one output lane
//! - [`BinaryOp`]: two input lanes to one output lane
//! - [`TernaryOp`]: three input lanes to one output lane
//! - [`Reduce`]: a homogeneous [`BinaryOp`] folded over all lanes
//!
//! Each trait carries a provided `apply` (or `reduce`) method holding the scalar loop. A functor
//! implementation for a specific element type may override it, which is how packed-lane types
//! take a two-lanes-per-call path: the element type implements [`PackedLanes`], the functor
//! implements [`PairedUnary`] or [`PairedBinary`], and the override forwards to [`map_pairs`],
//! [`zip_pairs`] or [`reduce_pairs`]. Both paths must produce identical lanes.
//!
//! Closures implement the functor traits directly:
//!
//! ```
//! use lanewise::{map, Vector4};
//!
//! let v = Vector4::from([1, 2, 3, 4]);
//! let squares = map(|x: i32| x * x, v);
//! assert_eq!(squares.as_slice(), &[1, 4, 9, 16]);
//! ```

use crate::broadcast::broadcast;
use crate::convert::CommonWith;
use crate::extents::{unifies_to, Extent};
use crate::scalars::Scalar;
use crate::storage::Storage;
use crate::vector::{IntoVector, Vector};

// region: Functor Traits

/// One-argument scalar functor.
pub trait UnaryOp<T: Scalar> {
    type Output: Scalar;

    fn call(&self, input: T) -> Self::Output;

    /// Applies the functor to every lane.
    #[inline]
    fn apply<E: Extent>(&self, input: &Storage<T, E>) -> Storage<Self::Output, E> {
        Storage::from_fn(|i| self.call(input[i]))
    }
}

/// Two-argument scalar functor.
pub trait BinaryOp<L: Scalar, R: Scalar> {
    type Output: Scalar;

    fn call(&self, left: L, right: R) -> Self::Output;

    /// Applies the functor to every pair of lanes with the same index.
    #[inline]
    fn apply<E: Extent>(
        &self,
        left: &Storage<L, E>,
        right: &Storage<R, E>,
    ) -> Storage<Self::Output, E> {
        Storage::from_fn(|i| self.call(left[i], right[i]))
    }
}

/// Three-argument scalar functor.
pub trait TernaryOp<A: Scalar, B: Scalar, C: Scalar> {
    type Output: Scalar;

    fn call(&self, a: A, b: B, c: C) -> Self::Output;

    #[inline]
    fn apply<E: Extent>(
        &self,
        a: &Storage<A, E>,
        b: &Storage<B, E>,
        c: &Storage<C, E>,
    ) -> Storage<Self::Output, E> {
        Storage::from_fn(|i| self.call(a[i], b[i], c[i]))
    }
}

/// A homogeneous binary functor that can fold lanes into one value.
///
/// The provided `reduce` is the left fold starting from lane 0. Overrides may combine lanes in
/// another order, so functors with overridden reductions must be associative and commutative.
pub trait Reduce<T: Scalar>: BinaryOp<T, T, Output = T> {
    #[inline]
    fn reduce<E: Extent>(&self, input: &Storage<T, E>) -> T {
        let lanes = input.as_slice();
        let mut accumulator = lanes[0];
        for &lane in &lanes[1..] {
            accumulator = self.call(accumulator, lane);
        }
        accumulator
    }
}

impl<T, O, F> UnaryOp<T> for F
where
    T: Scalar,
    O: Scalar,
    F: Fn(T) -> O,
{
    type Output = O;

    #[inline(always)]
    fn call(&self, input: T) -> O {
        self(input)
    }
}

impl<L, R, O, F> BinaryOp<L, R> for F
where
    L: Scalar,
    R: Scalar,
    O: Scalar,
    F: Fn(L, R) -> O,
{
    type Output = O;

    #[inline(always)]
    fn call(&self, left: L, right: R) -> O {
        self(left, right)
    }
}

impl<T, F> Reduce<T> for F
where
    T: Scalar,
    F: Fn(T, T) -> T,
{
}

impl<A, B, C, O, F> TernaryOp<A, B, C> for F
where
    A: Scalar,
    B: Scalar,
    C: Scalar,
    O: Scalar,
    F: Fn(A, B, C) -> O,
{
    type Output = O;

    #[inline(always)]
    fn call(&self, a: A, b: B, c: C) -> O {
        self(a, b, c)
    }
}

// endregion: Functor Traits

// region: Packed Lanes

/// Element types with a native two-lane representation.
pub trait PackedLanes: Scalar {
    type Pair: Copy;

    fn pack(lo: Self, hi: Self) -> Self::Pair;
    fn unpack(pair: Self::Pair) -> (Self, Self);
}

/// A unary functor with a paired variant over [`PackedLanes::Pair`].
pub trait PairedUnary<T: PackedLanes>: UnaryOp<T, Output = T> {
    fn call_pair(&self, input: T::Pair) -> T::Pair;
}

/// A binary functor with a paired variant over [`PackedLanes::Pair`].
pub trait PairedBinary<T: PackedLanes>: BinaryOp<T, T, Output = T> {
    /// Combines the low lanes of both operands and the high lanes of both operands.
    fn call_pair(&self, left: T::Pair, right: T::Pair) -> T::Pair;
}

/// Maps lanes two at a time; an odd trailing lane goes through the scalar functor.
pub fn map_pairs<T, E, F>(fun: &F, input: &Storage<T, E>) -> Storage<T, E>
where
    T: PackedLanes,
    E: Extent,
    F: PairedUnary<T> + ?Sized,
{
    let mut output = *input;
    let source = input.as_slice();
    let target = output.as_mut_slice();
    let mut target_pairs = target.chunks_exact_mut(2);
    let mut source_pairs = source.chunks_exact(2);
    for (out, lanes) in (&mut target_pairs).zip(&mut source_pairs) {
        let (lo, hi) = T::unpack(fun.call_pair(T::pack(lanes[0], lanes[1])));
        out[0] = lo;
        out[1] = hi;
    }
    if let ([out], [lane]) = (target_pairs.into_remainder(), source_pairs.remainder()) {
        *out = fun.call(*lane);
    }
    output
}

/// Zips lanes two at a time; an odd trailing lane goes through the scalar functor.
pub fn zip_pairs<T, E, F>(fun: &F, left: &Storage<T, E>, right: &Storage<T, E>) -> Storage<T, E>
where
    T: PackedLanes,
    E: Extent,
    F: PairedBinary<T> + ?Sized,
{
    let mut output = *left;
    let mut target_pairs = output.as_mut_slice().chunks_exact_mut(2);
    let mut left_pairs = left.as_slice().chunks_exact(2);
    let mut right_pairs = right.as_slice().chunks_exact(2);
    for ((out, l), r) in (&mut target_pairs)
        .zip(&mut left_pairs)
        .zip(&mut right_pairs)
    {
        let (lo, hi) = T::unpack(fun.call_pair(T::pack(l[0], l[1]), T::pack(r[0], r[1])));
        out[0] = lo;
        out[1] = hi;
    }
    if let ([out], [l], [r]) = (
        target_pairs.into_remainder(),
        left_pairs.remainder(),
        right_pairs.remainder(),
    ) {
        *out = fun.call(*l, *r);
    }
    output
}

/// Reduces adjacent pairs into a paired accumulator, folds its two lanes together, then folds in
/// an odd trailing lane.
pub fn reduce_pairs<T, E, F>(fun: &F, input: &Storage<T, E>) -> T
where
    T: PackedLanes,
    E: Extent,
    F: PairedBinary<T> + ?Sized,
{
    let lanes = input.as_slice();
    if lanes.len() < 2 {
        return lanes[0];
    }
    let mut pairs = lanes.chunks_exact(2);
    let mut accumulator = T::pack(lanes[0], lanes[1]);
    for pair in (&mut pairs).skip(1) {
        accumulator = fun.call_pair(accumulator, T::pack(pair[0], pair[1]));
    }
    let (lo, hi) = T::unpack(accumulator);
    let mut result = fun.call(lo, hi);
    if let [last] = pairs.remainder() {
        result = fun.call(result, *last);
    }
    result
}

// endregion: Packed Lanes

// region: Engine Entry Points

/// `output[i] = fun(input[i])`.
#[inline]
pub fn apply<T, E, F>(fun: &F, input: &Storage<T, E>) -> Storage<F::Output, E>
where
    T: Scalar,
    E: Extent,
    F: UnaryOp<T>,
{
    fun.apply(input)
}

/// `output[i] = fun(left[i], right[i])`.
#[inline]
pub fn apply2<L, R, E, F>(
    fun: &F,
    left: &Storage<L, E>,
    right: &Storage<R, E>,
) -> Storage<F::Output, E>
where
    L: Scalar,
    R: Scalar,
    E: Extent,
    F: BinaryOp<L, R>,
{
    fun.apply(left, right)
}

/// `output[i] = fun(a[i], b[i], c[i])`.
#[inline]
pub fn apply3<A, B, C, E, F>(
    fun: &F,
    a: &Storage<A, E>,
    b: &Storage<B, E>,
    c: &Storage<C, E>,
) -> Storage<F::Output, E>
where
    A: Scalar,
    B: Scalar,
    C: Scalar,
    E: Extent,
    F: TernaryOp<A, B, C>,
{
    fun.apply(a, b, c)
}

/// Applies a unary functor to every lane of `input`.
#[inline]
pub fn map<F, V>(fun: F, input: V) -> Vector<F::Output, V::Extent>
where
    V: IntoVector,
    F: UnaryOp<V::Scalar>,
{
    Vector::from_storage(fun.apply(&input.into_storage()))
}

/// Broadcasts both operands to `E`, their unified extent, and applies `fun` lane by lane.
///
/// `E` is usually inferred from the result type. Naming an extent that is not the unification
/// of the operand extents fails to compile.
#[inline]
pub fn zip<E, F, L, R>(fun: F, left: L, right: R) -> Vector<F::Output, E>
where
    E: Extent,
    L: IntoVector,
    R: IntoVector,
    F: BinaryOp<L::Scalar, R::Scalar>,
{
    const {
        assert!(
            unifies_to(
                <L::Extent as Extent>::SHAPE,
                <R::Extent as Extent>::SHAPE,
                E::SHAPE
            ),
            "operand extents do not unify into the result extent"
        )
    };
    let left = broadcast::<_, _, E>(&left.into_storage());
    let right = broadcast::<_, _, E>(&right.into_storage());
    Vector::from_storage(fun.apply(&left, &right))
}

/// Like [`zip`], but first converts both operands to their promoted common type, so `fun` only
/// needs a homogeneous implementation.
#[inline]
pub fn zip_common<E, F, L, R>(fun: F, left: L, right: R) -> Vector<F::Output, E>
where
    E: Extent,
    L: IntoVector,
    R: IntoVector,
    L::Scalar: CommonWith<R::Scalar>,
    F: BinaryOp<
        <L::Scalar as CommonWith<R::Scalar>>::Common,
        <L::Scalar as CommonWith<R::Scalar>>::Common,
    >,
{
    const {
        assert!(
            unifies_to(
                <L::Extent as Extent>::SHAPE,
                <R::Extent as Extent>::SHAPE,
                E::SHAPE
            ),
            "operand extents do not unify into the result extent"
        )
    };
    let left = left.into_storage();
    let right = right.into_storage();
    let left = broadcast::<_, L::Extent, E>(&Storage::from_fn(|i| left[i].promote()));
    let right = broadcast::<_, R::Extent, E>(&Storage::from_fn(|i| {
        <L::Scalar as CommonWith<R::Scalar>>::promote_rhs(right[i])
    }));
    Vector::from_storage(fun.apply(&left, &right))
}

// endregion: Engine Entry Points

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extents::Ext1;
    use crate::scalars::{f16, f16x2};
    use core::cell::Cell;

    /// Halves lanes, counting paired and scalar calls.
    #[derive(Default)]
    struct CountingHalve {
        pairs: Cell<usize>,
        scalars: Cell<usize>,
    }

    impl UnaryOp<f16> for CountingHalve {
        type Output = f16;

        fn call(&self, input: f16) -> f16 {
            self.scalars.set(self.scalars.get() + 1);
            f16::from_f32(input.to_f32() * 0.5)
        }

        fn apply<E: Extent>(&self, input: &Storage<f16, E>) -> Storage<f16, E> {
            map_pairs(self, input)
        }
    }

    impl PairedUnary<f16> for CountingHalve {
        fn call_pair(&self, input: f16x2) -> f16x2 {
            self.pairs.set(self.pairs.get() + 1);
            input.map_f32(|x| x * 0.5)
        }
    }

    /// Adds lanes, counting paired calls.
    #[derive(Default)]
    struct CountingAdd {
        pairs: Cell<usize>,
    }

    impl BinaryOp<f16, f16> for CountingAdd {
        type Output = f16;

        fn call(&self, left: f16, right: f16) -> f16 {
            left + right
        }

        fn apply<E: Extent>(&self, l: &Storage<f16, E>, r: &Storage<f16, E>) -> Storage<f16, E> {
            zip_pairs(self, l, r)
        }
    }

    impl PairedBinary<f16> for CountingAdd {
        fn call_pair(&self, left: f16x2, right: f16x2) -> f16x2 {
            self.pairs.set(self.pairs.get() + 1);
            left + right
        }
    }

    impl Reduce<f16> for CountingAdd {
        fn reduce<E: Extent>(&self, input: &Storage<f16, E>) -> f16 {
            reduce_pairs(self, input)
        }
    }

    fn narrow(values: &[f32]) -> Vec<f16> {
        values.iter().map(|&x| f16::from_f32(x)).collect()
    }

    #[test]
    fn closures_are_functors() {
        let input = Storage::<i32, Ext1<3>>::from_array([1, 2, 3]);
        let doubled = apply(&|x: i32| x * 2, &input);
        assert_eq!(doubled.as_slice(), &[2, 4, 6]);

        let sums = apply2(&|a: i32, b: i32| a + b, &input, &doubled);
        assert_eq!(sums.as_slice(), &[3, 6, 9]);

        let mixed = apply3(&|a: i32, b: i32, c: i32| a * b - c, &input, &doubled, &sums);
        assert_eq!(mixed.as_slice(), &[-1, 2, 9]);

        assert_eq!((|a: i32, b: i32| a.max(b)).reduce(&input), 3);
    }

    #[test]
    fn paired_map_handles_odd_tail() {
        let functor = CountingHalve::default();
        let input = Storage::<f16, Ext1<5>>::from_fn(|i| f16::from_f32(i as f32 + 1.0));
        let output = functor.apply(&input);
        assert_eq!(output.as_slice(), narrow(&[0.5, 1.0, 1.5, 2.0, 2.5]).as_slice());
        assert_eq!(functor.pairs.get(), 2);
        assert_eq!(functor.scalars.get(), 1);
    }

    #[test]
    fn paired_map_matches_scalar_path() {
        let functor = CountingHalve::default();
        let input = Storage::<f16, Ext1<6>>::from_fn(|i| f16::from_f32(0.3 * i as f32 - 0.7));
        let paired = functor.apply(&input);
        let scalar = Storage::<f16, Ext1<6>>::from_fn(|i| functor.call(input[i]));
        assert_eq!(paired, scalar);
        assert_eq!(functor.pairs.get(), 3);
    }

    #[test]
    fn paired_zip_combines_matching_lanes() {
        let functor = CountingAdd::default();
        let left = Storage::<f16, Ext1<3>>::from_fn(|i| f16::from_f32(i as f32));
        let right = Storage::<f16, Ext1<3>>::from_fn(|i| f16::from_f32(10.0 * (i as f32 + 1.0)));
        let output = functor.apply(&left, &right);
        assert_eq!(output.as_slice(), narrow(&[10.0, 21.0, 32.0]).as_slice());
        assert_eq!(functor.pairs.get(), 1);
    }

    #[test]
    fn paired_reduce() {
        let functor = CountingAdd::default();
        let odd = Storage::<f16, Ext1<5>>::from_fn(|i| f16::from_f32(i as f32 + 1.0));
        assert_eq!(functor.reduce(&odd), f16::from_f32(15.0));
        assert_eq!(functor.pairs.get(), 1);

        let single = Storage::<f16, Ext1<1>>::splat(f16::from_f32(4.0));
        assert_eq!(functor.reduce(&single), f16::from_f32(4.0));

        let even = Storage::<f16, Ext1<4>>::from_fn(|i| f16::from_f32(i as f32));
        assert_eq!(functor.reduce(&even), f16::from_f32(6.0));
    }

    #[test]
    fn zip_broadcasts_operands() {
        let seven = Vector::<i32, Ext1<1>>::from([7]);
        let ramp = Vector::<i32, Ext1<4>>::from([1, 2, 3, 4]);
        let sums: Vector<i32, Ext1<4>> = zip(|a: i32, b: i32| a + b, seven, ramp);
        assert_eq!(sums.as_slice(), &[8, 9, 10, 11]);

        let scaled: Vector<i32, Ext1<4>> = zip(|a: i32, b: i32| a * b, ramp, 3i32);
        assert_eq!(scaled.as_slice(), &[3, 6, 9, 12]);
    }

    #[test]
    #[cfg(feature = "tensor")]
    fn zip_builds_outer_products() {
        use crate::extents::Ext2;
        let column = Vector::<i32, Ext2<3, 1>>::from_array([[1], [2], [3]]);
        let row = Vector::<i32, Ext1<2>>::from([10, 100]);
        let table: Vector<i32, Ext2<3, 2>> = zip(|a: i32, b: i32| a * b, column, row);
        assert_eq!(table.as_slice(), &[10, 100, 20, 200, 30, 300]);
    }

    #[test]
    fn zip_common_promotes_operands() {
        let ints = Vector::<i32, Ext1<3>>::from([1, 2, 3]);
        let floats = Vector::<f32, Ext1<3>>::from([0.5, 0.25, 0.125]);
        let sums: Vector<f32, Ext1<3>> = zip_common(|a: f32, b: f32| a + b, ints, floats);
        assert_eq!(sums.as_slice(), &[1.5, 2.25, 3.125]);

        let flags = Vector::<bool, Ext1<3>>::from([true, false, true]);
        let masked: Vector<u8, Ext1<3>> = zip_common(|a: u8, b: u8| a * b, flags, 9u8);
        assert_eq!(masked.as_slice(), &[9, 0, 9]);
    }
}
