use crate::{DistanceFunction, KMeans, KMeansConfig, KMeansError, KMeansState, error::Result, primitive::*, variants::Lloyd};
use log::info;

pub(crate) fn calculate<'a, T, D, F>(data: &KMeans<T, D>, max_k: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<Vec<T>>
		where T: Primitive, D: DistanceFunction<T>,
			for<'c> F: Fn(&KMeans<T, D>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
	if max_k == 0 {
		return Err(KMeansError::InvalidClusterCount(max_k));
	}
	(1..=max_k)
		.map(|k| {
			let state = Lloyd::calculate(data, k, &init, config)?;
			info!("elbow: k = {} -> error {:e} ({} iterations)", k, state.distsum, state.iterations);
			Ok(state.distsum)
		})
		.collect()
}
