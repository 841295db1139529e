use kmeans_diagnostics::*;

fn main() {
    let (sample_cnt, sample_dims, k) = (20000, 20, 4);

    // Generate some random data
    let mut samples = vec![0.0f64;sample_cnt * sample_dims];
    samples.iter_mut().for_each(|v| *v = rand::random());

	let conf = KMeansConfig::build()
		.init_done(&|s| println!("Initialization completed: {} centroids.", s.k))
		.iteration_done(&|s, nr, shift|
			println!("Iteration {} - Error: {:.2} | Centroid shift: {:e}", nr, s.distsum, shift))
		.convergence(ConvergenceStrategy::Tolerance { epsilon: 1e-6 })
		.max_iter(500)
		.build();

    let kmean = KMeans::new(samples, sample_cnt, sample_dims, EuclideanDistance).unwrap();
    let result = kmean.kmeans_lloyd(k, KMeans::init_random_sample, &conf).unwrap();

    println!("Converged: {} after {} iterations", result.converged, result.iterations);
    println!("Cluster sizes: {:?}", result.centroid_frequency);
    println!("Error: {}", result.distsum);
}
