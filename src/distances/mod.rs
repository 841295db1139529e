use crate::Primitive;

mod euclidean;

pub use euclidean::EuclideanDistance;

/// Dissimilarity measure between two samples of equal dimensionality.
///
/// Implementations have to return a non-negative value, with `distance(u, u) == 0`.
/// The diagnostics treat the returned value as a squared distance: the silhouette
/// calculation takes its square root to get back to a linear distance.
///
/// Any `Fn(&[T], &[T]) -> T` closure can be used as distance function as well.
pub trait DistanceFunction<T: Primitive>: Send + Sync {
    fn distance(&self, a: &[T], b: &[T]) -> T;
}

impl<T, F> DistanceFunction<T> for F
where
    T: Primitive,
    F: Fn(&[T], &[T]) -> T + Send + Sync,
{
    #[inline(always)]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        self(a, b)
    }
}
