use crate::{DistanceFunction, Primitive};

/// Squared euclidean distance: `sum((a_i - b_i)^2)`
#[derive(Clone, Copy, Debug, Default)]
pub struct EuclideanDistance;

impl<T: Primitive> DistanceFunction<T> for EuclideanDistance {
    #[inline(always)]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        a.iter().zip(b.iter())
            .map(|(sp, cp)| *sp - *cp)      // <sample> - <centroid>
            .map(|v| v * v)                 // <vec_components> ^2
            .sum::<T>()                     // sum(<vec_components>^2)
    }
}
