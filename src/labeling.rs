use crate::{DistanceFunction, KMeans, KMeansConfig, KMeansResult, KMeansState, Label, Labeler, error::Result, primitive::*};
use log::debug;

/// Attaches a label to each converged centroid and classifies the optional query point.
pub(crate) fn calculate<'a, T, D, L, C>(data: &KMeans<T, D>, state: KMeansState<T>, labels: &[L], query: Option<&[T]>,
			labeler: &C, config: &KMeansConfig<'a, T>) -> Result<KMeansResult<T, L>>
		where T: Primitive, D: DistanceFunction<T>, L: Label, C: Labeler<T, L> + ?Sized {
	let centroid_labels = if labels.is_empty() {
		Vec::new()
	} else {
		state.centroids.chunks_exact(data.sample_dims)
			.map(|c| labeler.classify(c, &data.samples, data.sample_dims, labels, config.label_neighbours)
				.map(|prediction| prediction.label))
			.collect::<Result<Vec<_>>>()?
	};

	let query_cluster = match query {
		Some(query) => Some(data.closest_centroid(query, &state.centroids)?.0),
		None => None
	};
	let query_label = query_cluster.and_then(|idx| centroid_labels.get(idx).cloned());
	debug!("centroid labels: {:?}, query cluster: {:?}", centroid_labels, query_cluster);

	Ok(KMeansResult { state, centroid_labels, query_cluster, query_label })
}

#[cfg(test)]
mod tests {
	use crate::*;
	use crate::helpers::testing::*;
	use rand::prelude::*;

	fn four_points() -> (KMeans<f64>, Vec<&'static str>) {
		let kmean = KMeans::new(vec![0.0, 0.0, 0.0, 1.0, 10.0, 0.0, 10.0, 1.0], 4, 2, EuclideanDistance).unwrap();
		(kmean, vec!["left", "left", "right", "right"])
	}

	#[test]
	fn labels_follow_the_groups() {
		let (kmean, labels) = four_points();
		let init = KMeans::init_precomputed(vec![0.0, 0.0, 10.0, 0.0]);
		let conf = KMeansConfig::build().label_neighbours(2).build();
		let res = kmean.cluster(2, &labels, Some(&[9.0, 0.2][..]), init, &conf).unwrap();

		assert_eq!(res.state.centroids, vec![0.0, 0.5, 10.0, 0.5]);
		assert_eq!(res.centroid_labels, vec!["left", "right"]);
		assert_eq!(res.query_cluster, Some(1));
		assert_eq!(res.query_label, Some("right"));
	}

	#[test]
	fn query_on_a_sample_matches_brute_force() {
		let kmean = KMeans::new(iris_petals::<f64>(), 150, 2, EuclideanDistance).unwrap();
		let labels = iris_species();
		for seed in 0..5 {
			let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(seed)).build();
			let query = kmean.sample(120).to_vec();
			let res = kmean.cluster(3, &labels, Some(&query[..]), KMeans::init_random_sample, &conf).unwrap();
			assert_eq!(res.centroid_labels.len(), 3);

			// nearest centroid, first one wins on ties
			let mut should = (0, f64::INFINITY);
			for ci in 0..3 {
				let d = EuclideanDistance.distance(&query, res.state.centroid(ci));
				if d < should.1 {
					should = (ci, d);
				}
			}
			assert_eq!(res.query_cluster, Some(should.0));
			assert_eq!(res.query_label.as_ref(), Some(&res.centroid_labels[should.0]));
		}
	}

	#[test]
	fn iris_centroids_get_species_labels() {
		let kmean = KMeans::new(iris_petals::<f64>(), 150, 2, EuclideanDistance).unwrap();
		let init = KMeans::init_precomputed(vec![1.4, 0.2, 4.7, 1.4, 6.0, 2.5]);
		let res = kmean.cluster(3, &iris_species(), None, init, &KMeansConfig::default()).unwrap();

		assert_eq!(res.centroid_labels, vec!["setosa", "versicolor", "virginica"]);
		assert_eq!(res.query_cluster, None);
		assert_eq!(res.query_label, None);
	}

	#[test]
	fn unlabeled_run() {
		let (kmean, _) = four_points();
		let init = KMeans::init_precomputed(vec![0.0, 0.0, 10.0, 0.0]);
		let res = kmean.cluster::<String, _>(2, &[], Some(&[1.0, 1.0][..]), init, &KMeansConfig::default()).unwrap();

		assert!(res.centroid_labels.is_empty());
		assert_eq!(res.query_cluster, Some(0));
		assert_eq!(res.query_label, None);
	}

	struct Constant;
	impl Labeler<f64, &'static str> for Constant {
		fn classify(&self, _: &[f64], _: &[f64], _: usize, _: &[&'static str], k: usize) -> Result<Prediction<&'static str>> {
			Ok(Prediction { neighbours: (0..k).collect(), label: "constant" })
		}
	}

	#[test]
	fn custom_labeler() {
		let (kmean, labels) = four_points();
		let init = KMeans::init_precomputed(vec![0.0, 0.0, 10.0, 0.0]);
		let res = kmean.cluster_with(2, &labels, None, init, &Constant, &KMeansConfig::default()).unwrap();
		assert_eq!(res.centroid_labels, vec!["constant", "constant"]);
	}

	#[test]
	fn invalid_inputs_fail_fast() {
		let (kmean, labels) = four_points();
		let conf = KMeansConfig::default();
		assert_eq!(kmean.cluster(2, &labels[..3], None, KMeans::init_random_sample, &conf).err(),
			Some(KMeansError::LabelCountMismatch { labels: 3, samples: 4 }));
		assert_eq!(kmean.cluster(2, &labels, Some(&[1.0][..]), KMeans::init_random_sample, &conf).err(),
			Some(KMeansError::ShapeMismatch { expected: 2, actual: 1 }));
		assert_eq!(kmean.cluster(2, &labels, Some(&[1.0, f64::NAN][..]), KMeans::init_random_sample, &conf).err(),
			Some(KMeansError::NonFiniteInput { index: 1 }));
		assert_eq!(kmean.cluster(0, &labels, None, KMeans::init_random_sample, &conf).err(),
			Some(KMeansError::InvalidClusterCount(0)));

		let conf = KMeansConfig::build().label_neighbours(0).build();
		assert_eq!(kmean.cluster(2, &labels, None, KMeans::init_random_sample, &conf).err(),
			Some(KMeansError::InvalidNeighbourCount));
	}
}
