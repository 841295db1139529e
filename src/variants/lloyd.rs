use crate::{KMeans, KMeansState, KMeansConfig, KMeansError, DistanceFunction, error::Result, primitive::*};
use log::{debug, trace, warn};

pub(crate) struct Lloyd<T, D> where T: Primitive, D: DistanceFunction<T> {
	_p: std::marker::PhantomData<(T, D)>
}
impl<T, D> Lloyd<T, D> where T: Primitive, D: DistanceFunction<T> {
	/// Computes the centroids implied by the current assignments: the mean of each cluster's samples.
	/// Clusters without samples keep their current centroid.
	pub(crate) fn update_centroids(data: &KMeans<T, D>, state: &mut KMeansState<T>) -> Vec<T> {
		let dims = data.sample_dims;
		data.update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);

		// Sum all samples in a cluster together into new_centroids
		let mut new_centroids = vec![T::zero(); state.centroids.len()];
		data.samples.chunks_exact(dims)
			.zip(state.assignments.iter().cloned())
			.for_each(|(s, centroid_id)| {
				new_centroids[centroid_id * dims..(centroid_id + 1) * dims].iter_mut()
					.zip(s.iter())
					.for_each(|(c, v)| *c += v);
			});

		new_centroids.chunks_exact_mut(dims)
			.zip(state.centroids.chunks_exact(dims))
			.zip(state.centroid_frequency.iter().cloned())
			.for_each(|((nc, c), cfreq)| {
				if cfreq == 0 {
					nc.copy_from_slice(c);
				} else {
					let cfreq = from_count::<T>(cfreq);
					nc.iter_mut().for_each(|v| *v = *v / cfreq);
				}
			});
		new_centroids
	}

	pub fn calculate<'a, F>(data: &KMeans<T, D>, k: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>>
				where for<'c> F: FnOnce(&KMeans<T, D>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
		if k == 0 {
			return Err(KMeansError::InvalidClusterCount(k));
		}

		let mut state = KMeansState::new(data.sample_cnt, data.sample_dims, k);
		state.distsum = T::infinity();

		// Initialize clusters and notify subscriber
		init(data, &mut state, config)?;
		(config.init_done)(&state);
		debug!("k-means: {} samples, {} dimensions, k = {}, {:?}", data.sample_cnt, data.sample_dims, k, config.convergence);

		loop {
			if let Some(max_iter) = config.max_iter {
				if state.iterations >= max_iter {
					warn!("k-means (k = {}) did not converge within {} iterations", k, max_iter);
					break;
				}
			}

			data.update_cluster_assignments(&mut state)?;
			state.distsum = state.centroid_distances.iter().cloned().sum();
			let new_centroids = Self::update_centroids(data, &mut state);
			let (shift, converged) = config.convergence.check(&state.centroids, &new_centroids);
			if shift.is_nan() {
				return Err(KMeansError::InvalidComputation("centroid shift"));
			}
			state.centroids = new_centroids;
			state.iterations += 1;

			// Notify subscriber about finished iteration
			(config.iteration_done)(&state, state.iterations, shift);
			trace!("k-means iteration {}: shift {:e}", state.iterations, shift);
			if converged {
				state.converged = true;
				break;
			}
		}

		// Final assignment against the frozen centroids
		data.update_cluster_assignments(&mut state)?;
		data.update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
		state.distsum = state.centroid_distances.iter().cloned().sum();
		debug!("k-means (k = {}) finished after {} iterations, converged: {}, error: {}",
			k, state.iterations, state.converged, state.distsum);
		Ok(state)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{ConvergenceStrategy, EuclideanDistance};
	use crate::helpers::testing::*;
	use rand::prelude::*;
	use std::cell::Cell;

	#[test]
	fn iris_dataset_f64() {
		let kmean = KMeans::new(iris_petals::<f64>(), 150, 2, EuclideanDistance).unwrap();
		let rnd = StdRng::seed_from_u64(1);
		let conf = KMeansConfig::build().random_generator(rnd).build();
		let res = kmean.kmeans_lloyd(3, KMeans::init_random_sample, &conf).unwrap();

		assert!(res.converged);
		assert_eq!(res.centroids.len(), 3 * 2);
		assert_eq!(res.centroid_frequency.iter().sum::<usize>(), 150);
		assert_fixed_point(&kmean, &res);
		assert_centroids_are_means(&kmean, &res);
		assert_approx_eq!(res.distsum, res.centroid_distances.iter().sum::<f64>(), 1e-9);
	}

	#[test]
	fn iris_dataset_f32() {
		let kmean = KMeans::new(iris_petals::<f32>(), 150, 2, EuclideanDistance).unwrap();
		let rnd = StdRng::seed_from_u64(1);
		let conf = KMeansConfig::build().random_generator(rnd).build();
		let res = kmean.kmeans_lloyd(3, KMeans::init_random_sample, &conf).unwrap();

		assert!(res.converged);
		assert_eq!(res.centroid_frequency.iter().sum::<usize>(), 150);
		assert_fixed_point(&kmean, &res);
		assert_centroids_are_means(&kmean, &res);
	}

	#[test]
	fn iris_dataset_precomputed() {
		// one seed per species
		let kmean = KMeans::new(iris_petals::<f64>(), 150, 2, EuclideanDistance).unwrap();
		let init = KMeans::init_precomputed(vec![1.4, 0.2, 4.7, 1.4, 6.0, 2.5]);
		let res = kmean.kmeans_lloyd(3, init, &KMeansConfig::default()).unwrap();

		assert!(res.converged);
		// the setosa cluster is perfectly separated
		assert!(res.assignments[..50].iter().all(|a| *a == 0));
		assert_eq!(res.centroid_frequency[0], 50);
		assert_approx_eq!(res.centroids[0], 1.462, 1e-9);
		assert_approx_eq!(res.centroids[1], 0.246, 1e-9);
		assert_centroids_are_means(&kmean, &res);
	}

	#[test]
	fn two_separated_groups() {
		let kmean = KMeans::new(vec![0.0f64, 0.0, 0.0, 1.0, 10.0, 0.0, 10.0, 1.0], 4, 2, EuclideanDistance).unwrap();
		let mut separated_runs = 0;
		for seed in 0..20 {
			let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(seed)).build();
			let res = kmean.kmeans_lloyd(2, KMeans::init_random_sample, &conf).unwrap();
			assert!(res.converged);
			assert_eq!(res.centroids.len(), 4);
			assert_fixed_point(&kmean, &res);
			assert_centroids_are_means(&kmean, &res);

			let a = &res.assignments;
			if a[0] == a[1] && a[2] == a[3] && a[0] != a[2] {
				separated_runs += 1;
				assert_eq!(res.centroid(a[0]), &[0.0, 0.5]);
				assert_eq!(res.centroid(a[2]), &[10.0, 0.5]);
				assert_eq!(res.distsum, 1.0);
			}
		}
		assert!(separated_runs > 0);
	}

	#[test]
	fn empty_cluster_keeps_its_centroid() {
		let samples = vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0];
		let kmean = KMeans::new(samples, 3, 2, EuclideanDistance).unwrap();
		let init = KMeans::init_precomputed(vec![2.0, 0.0, 1337.0, 0.0]);
		let res = kmean.kmeans_lloyd(2, init, &KMeansConfig::default()).unwrap();

		assert!(res.converged);
		assert_eq!(&res.assignments, &[0, 0, 0]);
		assert_eq!(&res.centroids, &[2.0, 0.0, 1337.0, 0.0]);
		assert_eq!(&res.centroid_frequency, &[3, 0]);
		assert_eq!(&res.centroid_distances, &[1.0, 0.0, 1.0]);
		assert_eq!(res.distsum, 2.0);
	}

	#[test]
	fn duplicate_samples_leave_centroid_empty() {
		// more centroids than distinct samples: ties go to centroid 0, centroid 1 never gets a sample
		let kmean = KMeans::new(vec![2.0, 2.0, 2.0], 3, 1, EuclideanDistance).unwrap();
		let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(9)).build();
		let res = kmean.kmeans_lloyd(2, KMeans::init_random_sample, &conf).unwrap();

		assert!(res.converged);
		assert_eq!(&res.centroids, &[2.0, 2.0]);
		assert_eq!(&res.centroid_frequency, &[3, 0]);
		assert_eq!(res.distsum, 0.0);
	}

	#[test]
	fn one_centroid_per_distinct_sample() {
		let samples = vec![0.0f64, 0.0, 0.0, 1.0, 10.0, 0.0, 10.0, 1.0];
		let kmean = KMeans::new(samples.clone(), 4, 2, EuclideanDistance).unwrap();
		let res = kmean.kmeans_lloyd(4, KMeans::init_precomputed(samples.clone()), &KMeansConfig::default()).unwrap();

		assert_eq!(res.centroids, samples);
		assert_eq!(res.distsum, 0.0);
		assert_eq!(res.iterations, 1);
	}

	#[test]
	fn cancelling_shift_adopts_new_centroids() {
		// both centroids move by 0.5 in opposite directions: the signed shift sums to 0
		let kmean = KMeans::new(vec![0.0f64, 1.0, 9.0, 10.0], 4, 1, EuclideanDistance).unwrap();
		let res = kmean.kmeans_lloyd(2, KMeans::init_precomputed(vec![1.0, 9.0]), &KMeansConfig::default()).unwrap();

		assert!(res.converged);
		assert_eq!(res.iterations, 1);
		assert_eq!(&res.centroids, &[0.5, 9.5]);
		assert_eq!(&res.assignments, &[0, 0, 1, 1]);
		assert_eq!(res.distsum, 1.0);
		assert_centroids_are_means(&kmean, &res);
	}

	#[test]
	fn iteration_callbacks() {
		let init_calls = Cell::new(0);
		let iterations = Cell::new(0);
		let init_done = |_: &KMeansState<f64>| init_calls.set(init_calls.get() + 1);
		let iteration_done = |s: &KMeansState<f64>, nr: usize, _: f64| {
			assert_eq!(s.iterations, nr);
			iterations.set(nr);
		};
		let conf = KMeansConfig::build()
			.init_done(&init_done)
			.iteration_done(&iteration_done)
			.random_generator(StdRng::seed_from_u64(3))
			.build();

		let kmean = KMeans::new(iris_petals::<f64>(), 150, 2, EuclideanDistance).unwrap();
		let res = kmean.kmeans_lloyd(3, KMeans::init_random_sample, &conf).unwrap();
		assert_eq!(init_calls.get(), 1);
		assert_eq!(iterations.get(), res.iterations);
		assert!(res.iterations >= 1);
	}

	#[test]
	fn max_iter_stops_without_convergence() {
		let kmean = KMeans::new(iris_petals::<f64>(), 150, 2, EuclideanDistance).unwrap();
		// centroids far from the data need several iterations to settle
		let init = KMeans::init_precomputed(vec![0.0, 0.0, 0.5, 0.0, 1.0, 0.0]);
		let conf = KMeansConfig::build().max_iter(1).build();
		let res = kmean.kmeans_lloyd(3, init, &conf).unwrap();

		assert_eq!(res.iterations, 1);
		assert!(!res.converged);
		assert_eq!(res.centroid_frequency.iter().sum::<usize>(), 150);
	}

	#[test]
	fn tolerance_convergence() {
		let kmean = KMeans::new(iris_petals::<f64>(), 150, 2, EuclideanDistance).unwrap();
		let exact = kmean.kmeans_lloyd(3, KMeans::init_precomputed(vec![0.0, 0.0, 0.5, 0.0, 1.0, 0.0]),
			&KMeansConfig::default()).unwrap();
		let conf = KMeansConfig::build().convergence(ConvergenceStrategy::Tolerance { epsilon: 1e9 }).build();
		let loose = kmean.kmeans_lloyd(3, KMeans::init_precomputed(vec![0.0, 0.0, 0.5, 0.0, 1.0, 0.0]), &conf).unwrap();

		assert!(loose.converged);
		assert_eq!(loose.iterations, 1);
		assert!(exact.iterations > 1);
	}

	#[test]
	fn zero_clusters_rejected() {
		let kmean = KMeans::new(vec![0.0f64, 1.0], 2, 1, EuclideanDistance).unwrap();
		assert_eq!(kmean.kmeans_lloyd(0, KMeans::init_random_sample, &KMeansConfig::default()).err(),
			Some(KMeansError::InvalidClusterCount(0)));
	}
}
