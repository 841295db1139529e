use crate::primitive::*;

/// Enum with the supported convergence tests.
/// A running k-means calculation stops as soon as the chosen test reports, that the centroids
/// computed by the latest iteration no longer differ from the ones of the previous iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConvergenceStrategy<T: Primitive> {
	/// Stops when the sum of all signed, component-wise differences between the new and the previous
	/// centroids is exactly zero. There is no epsilon involved: floating point noise that does not
	/// cancel out keeps the calculation running (use a `max_iter` cap, if that is a concern).
	ExactDifference,
	/// Stops when the sum of all absolute, component-wise differences between the new and the
	/// previous centroids is smaller than or equal to **epsilon**.
	/// ## Fields:
	/// - **epsilon**: Largest total centroid movement that still counts as converged
	Tolerance { epsilon: T }
}
impl<T: Primitive> Default for ConvergenceStrategy<T> {
	fn default() -> Self { ConvergenceStrategy::ExactDifference }
}
impl<T: Primitive> ConvergenceStrategy<T> {
	/// Returns the shift between both (row-major, equally shaped) centroid sets, as measured by this
	/// strategy, and whether that shift counts as converged.
	pub(crate) fn check(&self, old_centroids: &[T], new_centroids: &[T]) -> (T, bool) {
		let pairs = old_centroids.iter().zip(new_centroids.iter());
		match *self {
			ConvergenceStrategy::ExactDifference => {
				let shift: T = pairs.map(|(o, n)| *n - *o).sum();
				(shift, shift.abs() == T::zero())
			},
			ConvergenceStrategy::Tolerance { epsilon } => {
				let shift: T = pairs.map(|(o, n)| (*n - *o).abs()).sum();
				(shift, shift <= epsilon)
			}
		}
	}
}
