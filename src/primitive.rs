use num::{Float, NumCast};
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    ops::{AddAssign, SubAssign},
};

/// Floating point type all calculations (and their results) are carried out in.
pub trait Primitive: Float + NumCast + AddAssign + SubAssign + Sum + Default + Display + Debug
                + LowerExp + Send + Sync + 'static + for<'a> AddAssign<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}

/// Converts a count into the primitive type. Counts used here are far below the range where
/// this could fail, so a failed cast maps to NaN and is caught by the callers' NaN checks.
#[inline(always)]
pub(crate) fn from_count<T: Primitive>(cnt: usize) -> T {
    T::from(cnt).unwrap_or_else(T::nan)
}
