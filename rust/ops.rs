//! The scalar functor catalogue.
//!
//! Each functor is a unit struct implementing [`UnaryOp`], [`BinaryOp`] or [`TernaryOp`] for
//! every element type it supports, plus [`Reduce`] where folding makes sense. The vector
//! operators and reductions are thin wrappers that pick one of these functors and hand it to the
//! engine, so `a + b` and `zip_common(Add, a, b)` are the same computation.
//!
//! Element-type specifics:
//!
//! - integer arithmetic wraps on overflow; division and remainder by zero panic
//! - comparisons produce a mask in the operand type: one where the predicate holds, zero elsewhere
//! - for `bool`, addition and maximum are `or`, multiplication and minimum are `and`
//! - bitwise operators on floating types are logical and produce a 0/1 mask
//! - [`f16`] and [`bf16`] compute in `f32` and round once; their arithmetic and comparisons
//!   override `apply` to take two lanes per call through [`f16x2`] and [`bf16x2`]

use crate::apply::{
    map_pairs, reduce_pairs, zip_pairs, BinaryOp, PairedBinary, PairedUnary, Reduce, TernaryOp,
    UnaryOp,
};
use crate::extents::Extent;
use crate::scalars::{bf16, bf16x2, f16, f16x2, f32_abs_compat, f64_abs_compat, Scalar};
use crate::storage::Storage;

macro_rules! functor {
    ($($(#[$meta:meta])* $name:ident;)*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;
    )*};
}

functor! {
    /// `a + b`
    Add;
    /// `a - b`
    Sub;
    /// `a * b`
    Mul;
    /// `a / b`
    Div;
    /// `a % b`
    Rem;
    /// The lesser operand, `a` when they compare equal or unordered.
    Min;
    /// The greater operand, `a` when they compare equal or unordered.
    Max;
    /// `a == b` as a mask.
    Eq;
    /// `a != b` as a mask.
    Ne;
    /// `a < b` as a mask.
    Lt;
    /// `a <= b` as a mask.
    Le;
    /// `a > b` as a mask.
    Gt;
    /// `a >= b` as a mask.
    Ge;
    BitAnd;
    BitOr;
    BitXor;
    /// `-a`
    Neg;
    /// `!a`, logical for `bool` and floating types.
    BitNot;
    /// One where `a` is zero, zero elsewhere.
    LogicalNot;
    /// `|a|`
    Abs;
    /// `if cond { a } else { b }`
    Select;
    /// `a * b + c`, rounded once where the hardware allows.
    Fma;
}

macro_rules! binary {
    ($op:ident, $ty:ty, |$a:ident, $b:ident| $body:expr) => {
        impl BinaryOp<$ty, $ty> for $op {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, $a: $ty, $b: $ty) -> $ty {
                $body
            }
        }
    };
}

macro_rules! unary {
    ($op:ident, $ty:ty, |$a:ident| $body:expr) => {
        impl UnaryOp<$ty> for $op {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, $a: $ty) -> $ty {
                $body
            }
        }
    };
}

macro_rules! comparisons {
    ($ty:ty) => {
        binary!(Eq, $ty, |a, b| <$ty as Scalar>::from_bool(a.eq(&b)));
        binary!(Ne, $ty, |a, b| <$ty as Scalar>::from_bool(a.ne(&b)));
        binary!(Lt, $ty, |a, b| <$ty as Scalar>::from_bool(a.lt(&b)));
        binary!(Le, $ty, |a, b| <$ty as Scalar>::from_bool(a.le(&b)));
        binary!(Gt, $ty, |a, b| <$ty as Scalar>::from_bool(a.gt(&b)));
        binary!(Ge, $ty, |a, b| <$ty as Scalar>::from_bool(a.ge(&b)));
    };
}

macro_rules! folds {
    ($ty:ty; $($op:ident),*) => {$(
        impl Reduce<$ty> for $op {}
    )*};
}

// region: Integers

macro_rules! integer_ops {
    ($($ty:ty),*) => {$(
        binary!(Add, $ty, |a, b| a.wrapping_add(b));
        binary!(Sub, $ty, |a, b| a.wrapping_sub(b));
        binary!(Mul, $ty, |a, b| a.wrapping_mul(b));
        binary!(Div, $ty, |a, b| a.wrapping_div(b));
        binary!(Rem, $ty, |a, b| a.wrapping_rem(b));
        binary!(Min, $ty, |a, b| if b < a { b } else { a });
        binary!(Max, $ty, |a, b| if a < b { b } else { a });
        binary!(BitAnd, $ty, |a, b| a & b);
        binary!(BitOr, $ty, |a, b| a | b);
        binary!(BitXor, $ty, |a, b| a ^ b);
        comparisons!($ty);

        unary!(Neg, $ty, |a| a.wrapping_neg());
        unary!(BitNot, $ty, |a| !a);
        unary!(LogicalNot, $ty, |a| <$ty as Scalar>::from_bool(a == 0));

        impl TernaryOp<$ty, $ty, $ty> for Fma {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, a: $ty, b: $ty, c: $ty) -> $ty {
                a.wrapping_mul(b).wrapping_add(c)
            }
        }

        folds!($ty; Add, Mul, Min, Max, BitAnd, BitOr, BitXor);
    )*};
}

integer_ops!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! signed_abs {
    ($($ty:ty),*) => {$(
        unary!(Abs, $ty, |a| a.wrapping_abs());
    )*};
}

macro_rules! unsigned_abs {
    ($($ty:ty),*) => {$(
        unary!(Abs, $ty, |a| a);
    )*};
}

signed_abs!(i8, i16, i32, i64, isize);
unsigned_abs!(u8, u16, u32, u64, usize);

// endregion: Integers

// region: Floating Point

macro_rules! float_ops {
    ($($ty:ty => $abs:ident),*) => {$(
        binary!(Add, $ty, |a, b| a + b);
        binary!(Sub, $ty, |a, b| a - b);
        binary!(Mul, $ty, |a, b| a * b);
        binary!(Div, $ty, |a, b| a / b);
        binary!(Rem, $ty, |a, b| a % b);
        binary!(Min, $ty, |a, b| if b < a { b } else { a });
        binary!(Max, $ty, |a, b| if a < b { b } else { a });
        binary!(BitAnd, $ty, |a, b| <$ty as Scalar>::from_bool(a.is_nonzero() && b.is_nonzero()));
        binary!(BitOr, $ty, |a, b| <$ty as Scalar>::from_bool(a.is_nonzero() || b.is_nonzero()));
        binary!(BitXor, $ty, |a, b| <$ty as Scalar>::from_bool(a.is_nonzero() != b.is_nonzero()));
        comparisons!($ty);

        unary!(Neg, $ty, |a| -a);
        unary!(BitNot, $ty, |a| <$ty as Scalar>::from_bool(!a.is_nonzero()));
        unary!(LogicalNot, $ty, |a| <$ty as Scalar>::from_bool(!a.is_nonzero()));
        unary!(Abs, $ty, |a| $abs(a));

        impl TernaryOp<$ty, $ty, $ty> for Fma {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, a: $ty, b: $ty, c: $ty) -> $ty {
                #[cfg(feature = "std")]
                {
                    a.mul_add(b, c)
                }
                #[cfg(not(feature = "std"))]
                {
                    a * b + c
                }
            }
        }

        folds!($ty; Add, Mul, Min, Max);
    )*};
}

float_ops!(f32 => f32_abs_compat, f64 => f64_abs_compat);

// endregion: Floating Point

// region: Boolean

binary!(Add, bool, |a, b| a | b);
binary!(Mul, bool, |a, b| a & b);
binary!(Min, bool, |a, b| a & b);
binary!(Max, bool, |a, b| a | b);
binary!(BitAnd, bool, |a, b| a & b);
binary!(BitOr, bool, |a, b| a | b);
binary!(BitXor, bool, |a, b| a ^ b);
comparisons!(bool);

unary!(BitNot, bool, |a| !a);
unary!(LogicalNot, bool, |a| !a);
unary!(Abs, bool, |a| a);

impl TernaryOp<bool, bool, bool> for Fma {
    type Output = bool;

    #[inline(always)]
    fn call(&self, a: bool, b: bool, c: bool) -> bool {
        (a & b) | c
    }
}

folds!(bool; Add, Mul, Min, Max, BitAnd, BitOr, BitXor);

// endregion: Boolean

// region: Narrow Floats

macro_rules! narrow_arithmetic {
    ($ty:ident, $pair:ident; $($op:ident => |$a:ident, $b:ident| $body:expr;)*) => {$(
        impl BinaryOp<$ty, $ty> for $op {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, left: $ty, right: $ty) -> $ty {
                let ($a, $b) = (left.to_f32(), right.to_f32());
                $ty::from_f32($body)
            }

            #[inline]
            fn apply<E: Extent>(&self, left: &Storage<$ty, E>, right: &Storage<$ty, E>) -> Storage<$ty, E> {
                zip_pairs(self, left, right)
            }
        }

        impl PairedBinary<$ty> for $op {
            #[inline(always)]
            fn call_pair(&self, left: $pair, right: $pair) -> $pair {
                left.zip_f32(right, |$a, $b| $body)
            }
        }
    )*};
}

macro_rules! narrow_comparisons {
    ($ty:ident, $pair:ident; $($op:ident => $predicate:ident),*) => {$(
        impl BinaryOp<$ty, $ty> for $op {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, left: $ty, right: $ty) -> $ty {
                <$ty as Scalar>::from_bool(left.to_f32().$predicate(&right.to_f32()))
            }

            #[inline]
            fn apply<E: Extent>(&self, left: &Storage<$ty, E>, right: &Storage<$ty, E>) -> Storage<$ty, E> {
                zip_pairs(self, left, right)
            }
        }

        impl PairedBinary<$ty> for $op {
            #[inline(always)]
            fn call_pair(&self, left: $pair, right: $pair) -> $pair {
                left.compare_f32(right, |a, b| a.$predicate(&b))
            }
        }
    )*};
}

macro_rules! narrow_ops {
    ($ty:ident, $pair:ident) => {
        narrow_arithmetic! {
            $ty, $pair;
            Add => |a, b| a + b;
            Sub => |a, b| a - b;
            Mul => |a, b| a * b;
            Div => |a, b| a / b;
            Rem => |a, b| a % b;
            Min => |a, b| if b < a { b } else { a };
            Max => |a, b| if a < b { b } else { a };
        }

        narrow_comparisons!($ty, $pair; Eq => eq, Ne => ne, Lt => lt, Le => le, Gt => gt, Ge => ge);

        binary!(BitAnd, $ty, |a, b| <$ty as Scalar>::from_bool(a.is_nonzero() && b.is_nonzero()));
        binary!(BitOr, $ty, |a, b| <$ty as Scalar>::from_bool(a.is_nonzero() || b.is_nonzero()));
        binary!(BitXor, $ty, |a, b| <$ty as Scalar>::from_bool(a.is_nonzero() != b.is_nonzero()));

        impl UnaryOp<$ty> for Neg {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, input: $ty) -> $ty {
                -input
            }

            #[inline]
            fn apply<E: Extent>(&self, input: &Storage<$ty, E>) -> Storage<$ty, E> {
                map_pairs(self, input)
            }
        }

        impl PairedUnary<$ty> for Neg {
            #[inline(always)]
            fn call_pair(&self, input: $pair) -> $pair {
                -input
            }
        }

        impl UnaryOp<$ty> for Abs {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, input: $ty) -> $ty {
                $ty::from_bits(input.to_bits() & 0x7FFF)
            }

            #[inline]
            fn apply<E: Extent>(&self, input: &Storage<$ty, E>) -> Storage<$ty, E> {
                map_pairs(self, input)
            }
        }

        impl PairedUnary<$ty> for Abs {
            #[inline(always)]
            fn call_pair(&self, input: $pair) -> $pair {
                $pair(self.call(input.0), self.call(input.1))
            }
        }

        unary!(BitNot, $ty, |a| <$ty as Scalar>::from_bool(!a.is_nonzero()));
        unary!(LogicalNot, $ty, |a| <$ty as Scalar>::from_bool(!a.is_nonzero()));

        impl TernaryOp<$ty, $ty, $ty> for Fma {
            type Output = $ty;

            #[inline(always)]
            fn call(&self, a: $ty, b: $ty, c: $ty) -> $ty {
                $ty::from_f64(sum_to_odd(a.to_f64() * b.to_f64(), c.to_f64()))
            }
        }

        // `Min` and `Max` keep the left operand when unordered, so they may not be reordered.
        narrow_folds!($ty; Add, Mul);
        folds!($ty; Min, Max);
    };
}

/// `p + c` rounded to odd in `f64`.
///
/// The product of two 16-bit floats is exact in `f64`. Rounding the sum to odd keeps a sticky bit
/// for the error term, so the final narrowing rounds once.
#[inline(always)]
fn sum_to_odd(p: f64, c: f64) -> f64 {
    let sum = p + c;
    let c_part = sum - p;
    let error = (p - (sum - c_part)) + (c - c_part);
    let bits = sum.to_bits();
    if error == 0.0 || !sum.is_finite() || bits & 1 == 1 {
        return sum;
    }
    if (error > 0.0) == (sum > 0.0) {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

macro_rules! narrow_folds {
    ($ty:ident; $($op:ident),*) => {$(
        impl Reduce<$ty> for $op {
            #[inline]
            fn reduce<E: Extent>(&self, input: &Storage<$ty, E>) -> $ty {
                reduce_pairs(self, input)
            }
        }
    )*};
}

narrow_ops!(f16, f16x2);
narrow_ops!(bf16, bf16x2);

// endregion: Narrow Floats

// region: Selection

impl<T: Scalar> TernaryOp<bool, T, T> for Select {
    type Output = T;

    #[inline(always)]
    fn call(&self, cond: bool, on_true: T, on_false: T) -> T {
        if cond {
            on_true
        } else {
            on_false
        }
    }
}

// endregion: Selection

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extents::Ext1;

    #[test]
    fn integer_arithmetic_wraps() {
        assert_eq!(Add.call(i8::MAX, 1i8), i8::MIN);
        assert_eq!(Sub.call(0u8, 1u8), u8::MAX);
        assert_eq!(Mul.call(16u8, 16u8), 0);
        assert_eq!(Neg.call(i32::MIN), i32::MIN);
        assert_eq!(Abs.call(-7i16), 7);
        assert_eq!(Div.call(-7i32, 2i32), -3);
        assert_eq!(Rem.call(-7i32, 2i32), -1);
        assert_eq!(Fma.call(3i64, 4i64, -5i64), 7);
    }

    #[test]
    fn comparisons_are_masks_in_operand_type() {
        assert_eq!(Lt.call(1i32, 2i32), 1);
        assert_eq!(Ge.call(1u16, 2u16), 0);
        assert_eq!(Eq.call(0.5f32, 0.5f32), 1.0);
        assert_eq!(Ne.call(f64::NAN, f64::NAN), 1.0);
        assert_eq!(Le.call(f64::NAN, 1.0f64), 0.0);
        assert!(Gt.call(true, false));
    }

    #[test]
    fn boolean_semantics() {
        assert!(Add.call(true, false));
        assert!(!Mul.call(true, false));
        assert!(!Min.call(true, false));
        assert!(Max.call(false, true));
        assert!(Fma.call(false, true, true));
        assert!(!BitNot.call(true));
    }

    #[test]
    fn float_bitwise_is_logical() {
        assert_eq!(BitAnd.call(2.5f32, -1.0f32), 1.0);
        assert_eq!(BitOr.call(0.0f64, 0.0f64), 0.0);
        assert_eq!(BitXor.call(3.0f32, 0.0f32), 1.0);
        assert_eq!(BitNot.call(0.0f32), 1.0);
        assert_eq!(LogicalNot.call(4u8), 0);
    }

    #[test]
    fn min_max_keep_first_on_ties() {
        assert_eq!(Min.call(3i32, 1i32), 1);
        assert_eq!(Max.call(3u64, 9u64), 9);
        assert_eq!(Min.call(-0.0f32, 0.0f32).to_bits(), (-0.0f32).to_bits());
        assert_eq!(Max.call(1.0f64, f64::NAN), 1.0);
    }

    #[test]
    fn fused_multiply_add_rounds_once() {
        let a = 1.0 + f64::EPSILON;
        let b = 1.0 - f64::EPSILON;
        let fused = Fma.call(a, b, -1.0f64);
        #[cfg(feature = "std")]
        assert_eq!(fused, -f64::EPSILON * f64::EPSILON);
        #[cfg(not(feature = "std"))]
        assert_eq!(fused, 0.0);
    }

    #[test]
    fn narrow_paths_agree() {
        let left = Storage::<f16, Ext1<5>>::from_fn(|i| f16::from_f32(0.37 * i as f32 - 0.5));
        let right = Storage::<f16, Ext1<5>>::from_fn(|i| f16::from_f32(1.1 - 0.21 * i as f32));

        let sums = Add.apply(&left, &right);
        let ratios = Div.apply(&left, &right);
        let less = Lt.apply(&left, &right);
        let least = Min.apply(&left, &right);
        for i in 0..5 {
            assert_eq!(sums[i], Add.call(left[i], right[i]));
            assert_eq!(ratios[i], Div.call(left[i], right[i]));
            assert_eq!(less[i], Lt.call(left[i], right[i]));
            assert_eq!(least[i], Min.call(left[i], right[i]));
        }

        let negated = Neg.apply(&left);
        let magnitudes = Abs.apply(&left);
        for i in 0..5 {
            assert_eq!(negated[i], -left[i]);
            assert_eq!(magnitudes[i].to_f32(), left[i].to_f32().abs());
        }
    }

    #[test]
    fn narrow_comparisons_use_their_own_predicate() {
        let nan = bf16::NAN;
        let one = bf16::ONE;
        assert_eq!(Le.call(one, one), bf16::ONE);
        assert_eq!(Ne.call(nan, nan), bf16::ONE);
        assert_eq!(Ge.call(nan, one), bf16::ZERO);
        let pair = bf16x2(nan, one);
        assert_eq!(
            PairedBinary::<bf16>::call_pair(&Ne, pair, pair),
            bf16x2(bf16::ONE, bf16::ZERO)
        );
    }

    #[test]
    fn narrow_reductions() {
        let lanes = Storage::<f16, Ext1<5>>::from_fn(|i| f16::from_f32([5.0, 0.0, 2.0, 1.0, 0.0][i]));
        assert_eq!(Add.reduce(&lanes), f16::from_f32(8.0));
        assert_eq!(Max.reduce(&lanes), f16::from_f32(5.0));
        assert_eq!(Min.reduce(&lanes), f16::ZERO);
        assert_eq!(Mul.reduce(&lanes), f16::ZERO);
        assert_eq!(
            Fma.call(f16::from_f32(2.0), f16::from_f32(3.0), f16::ONE),
            f16::from_f32(7.0)
        );
    }

    #[test]
    fn narrow_fma_rounds_once() {
        let a = bf16::from_f32(2.5364718e-25);
        let b = bf16::from_f32(-1.485528e28);
        let c = bf16::from_f32(1.4281909e-12);
        assert_eq!(Fma.call(a, b, c), bf16::from_f32(-3760.0));
        assert_eq!(Fma.call(a, b, -c), bf16::from_f32(-3776.0));
        assert_eq!(Fma.call(a, b, bf16::ZERO), bf16::from_f32(-3776.0));

        let tiny = f16::from_bits(1);
        let half = f16::from_f32(0.5);
        assert_eq!(Fma.call(half, tiny, f16::ONE), f16::ONE);
        assert_eq!(Fma.call(f16::from_f32(3.0), f16::ZERO, f16::NEG_ZERO), f16::ZERO);
    }

    #[test]
    fn narrow_min_max_reductions_match_wide_fold() {
        let wide = [1.0f32, f32::NAN, 2.0, 0.0];
        let lanes = Storage::<f16, Ext1<4>>::from_fn(|i| f16::from_f32(wide[i]));
        let wide = Storage::<f32, Ext1<4>>::from_array(wide);
        assert_eq!(Min.reduce(&wide), 0.0);
        assert_eq!(Min.reduce(&lanes), f16::ZERO);
        assert_eq!(Max.reduce(&wide), 2.0);
        assert_eq!(Max.reduce(&lanes), f16::from_f32(2.0));
    }

    #[test]
    fn select_picks_by_condition() {
        assert_eq!(Select.call(true, 1u8, 2u8), 1);
        assert_eq!(Select.call(false, f16::ONE, f16::ZERO), f16::ZERO);
    }
}
