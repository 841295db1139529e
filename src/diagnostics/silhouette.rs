use crate::{DistanceFunction, KMeans, KMeansConfig, KMeansError, KMeansState, error::Result, primitive::*, variants::Lloyd};
use log::info;
use rayon::prelude::*;

/// Accumulated distance from one sample to the members of one cluster.
#[derive(Clone, Copy)]
struct DistanceCount<T> {
	total_distance: T,
	count: usize
}
impl<T: Primitive> DistanceCount<T> {
	fn new(count: usize) -> Self {
		Self { total_distance: T::zero(), count }
	}

	/// Mean distance to the members of another cluster. Empty clusters are infinitely far away.
	fn mean_distance(&self) -> T {
		if self.count == 0 {
			return T::infinity();
		}
		self.total_distance / from_count(self.count)
	}

	/// Mean distance to the other members of the sample's own cluster (its distance to itself is 0).
	fn same_cluster_mean_distance(&self) -> T {
		if self.count <= 1 {
			return T::zero();
		}
		self.total_distance / from_count(self.count - 1)
	}
}

/// Silhouette coefficient of one sample, given the mean distance to its own cluster **a**,
/// and the smallest mean distance to any other cluster **b**.
fn coefficient<T: Primitive>(a: T, b: T) -> T {
	if b.is_infinite() {
		return T::zero(); // no other non-empty cluster
	}
	let max = a.max(b);
	if max == T::zero() {
		return T::zero();
	}
	(b - a) / max
}

pub(crate) fn calculate<'a, T, D, F>(data: &KMeans<T, D>, k: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<T>
		where T: Primitive, D: DistanceFunction<T>,
			for<'c> F: FnOnce(&KMeans<T, D>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
	let state = Lloyd::calculate(data, k, init, config)?;
	let dims = data.sample_dims;
	let assignments = &state.assignments;
	let clusters = state.centroid_frequency.iter()
		.map(|cnt| DistanceCount::<T>::new(*cnt))
		.collect::<Vec<_>>();

	let work_packet_size = (data.sample_cnt / rayon::current_num_threads()).max(1);
	let coefficients = data.samples.par_chunks_exact(dims)
		.zip(assignments.par_iter())
		.with_min_len(work_packet_size)
		.map(|(s, own)| {
			let mut clusters = clusters.clone();
			for (o, cluster) in data.samples.chunks_exact(dims).zip(assignments.iter().cloned()) {
				let dist = data.distance.distance(s, o);
				if dist.is_nan() {
					return Err(KMeansError::InvalidComputation("sample distance"));
				}
				clusters[cluster].total_distance += dist.sqrt();
			}

			let a = clusters[*own].same_cluster_mean_distance();
			let b = clusters.iter().enumerate()
				.filter(|(ci, _)| ci != own)
				.map(|(_, c)| c.mean_distance())
				.fold(T::infinity(), T::min);
			let s = coefficient(a, b);
			if s.is_nan() {
				return Err(KMeansError::InvalidComputation("silhouette coefficient"));
			}
			Ok(s)
		})
		.collect::<Result<Vec<T>>>()?;

	let score = coefficients.into_iter().sum::<T>() / from_count(data.sample_cnt);
	info!("silhouette: k = {} -> {}", k, score);
	Ok(score)
}
