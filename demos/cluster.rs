use kmeans_diagnostics::*;
use rand::prelude::*;

fn main() {
    let mut rnd = StdRng::seed_from_u64(7);

    // Three blobs around (0,0), (5,5) and (10,0), labeled after the blob they were drawn from
    let blobs = [(0.0, 0.0, "south-west"), (5.0, 5.0, "north"), (10.0, 0.0, "south-east")];
    let (mut samples, mut labels) = (Vec::new(), Vec::new());
    for &(x, y, label) in &blobs {
        for _ in 0..100 {
            samples.push(x + rnd.gen_range(-1.0f64, 1.0));
            samples.push(y + rnd.gen_range(-1.0f64, 1.0));
            labels.push(label);
        }
    }

    let kmean = KMeans::new(samples, labels.len(), 2, EuclideanDistance).unwrap();
    let conf = KMeansConfig::build().random_generator(rnd).max_iter(100).build();
    let result = kmean.cluster(3, &labels, Some(&[9.0, 1.0][..]), KMeans::init_random_sample, &conf).unwrap();

    for ci in 0..result.state.k {
        println!("Centroid {:?} ({} samples): {}", result.state.centroid(ci), result.state.centroid_frequency[ci], result.centroid_labels[ci]);
    }
    println!("Query (9, 1) belongs to cluster {:?}: {:?}", result.query_cluster, result.query_label);
    println!("Error: {} after {} iterations", result.state.distsum, result.state.iterations);
}
