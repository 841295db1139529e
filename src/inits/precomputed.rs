use crate::{KMeans, KMeansState, KMeansConfig, KMeansError, DistanceFunction, api::check_finite, error::Result, primitive::*};

pub(crate) fn calculate<T, D>(
	kmean: &KMeans<T, D>, state: &mut KMeansState<T>, _config: &KMeansConfig<'_, T>, computed: &[T],
) -> Result<()> where T: Primitive, D: DistanceFunction<T> {
	let expected = state.k * kmean.sample_dims;
	if computed.len() != expected {
		return Err(KMeansError::ShapeMismatch { expected, actual: computed.len() });
	}
	check_finite(computed)?;
	state.centroids.copy_from_slice(computed);
	Ok(())
}
