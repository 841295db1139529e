use kmeans_diagnostics::*;
use rand::prelude::*;

fn main() {
    let (sample_cnt, sample_dims, max_k) = (3000, 2, 8);
    let mut rnd = StdRng::seed_from_u64(1337);

    // Four blobs in the unit square
    let centers = [(0.2, 0.2), (0.2, 0.8), (0.8, 0.2), (0.8, 0.8)];
    let mut samples = Vec::with_capacity(sample_cnt * sample_dims);
    for i in 0..sample_cnt {
        let (x, y) = centers[i % centers.len()];
        samples.push(x + rnd.gen_range(-0.1f64, 0.1));
        samples.push(y + rnd.gen_range(-0.1f64, 0.1));
    }

    let kmean = KMeans::new(samples, sample_cnt, sample_dims, EuclideanDistance).unwrap();
    let conf = KMeansConfig::build()
        .random_generator(rnd)
        .convergence(ConvergenceStrategy::Tolerance { epsilon: 1e-9 })
        .max_iter(300)
        .build();

    let errors = kmean.elbow_method(max_k, KMeans::init_random_sample, &conf).unwrap();
    for (i, error) in errors.iter().enumerate() {
        let silhouette = if i == 0 { 0.0 } else { kmean.silhouette(i + 1, KMeans::init_random_sample, &conf).unwrap() };
        println!("k = {}: error {:10.4} | silhouette {:.4}", i + 1, error, silhouette);
    }
}
