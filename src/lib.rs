//! # kmeans-diagnostics - API documentation
//!
//! kmeans-diagnostics is a small rust library for k-means clustering of (optionally labeled) samples,
//! together with the two classic model-selection diagnostics: the elbow method and the silhouette coefficient.
//!
//! ## Design target
//! Samples are given using a raw, row-major vector, instead of any high-level arithmetics / matrix crate
//! such as nalgebra or ndarray. The per-sample distance calculations of each iteration are parallelized
//! with rayon, while the per-centroid accumulation stays sequential, so results do not depend on the
//! amount of threads.
//!
//! ## Supported calculations
//! - k-Means clustering (Lloyd) with exact (default) or epsilon-tolerance convergence, see [`ConvergenceStrategy`]
//! - Labeled clustering: each converged centroid gets the label of its k nearest samples ([`Labeler`], [`KNearestNeighbours`]),
//!   and an optional query point is classified with the label of its nearest centroid
//! - Elbow diagnostic: error (sum of distances to the nearest centroid) for every k in `1..=max_k`
//! - Silhouette diagnostic: mean silhouette coefficient of a single run
//!
//! For details, have a look at the documentation of [`KMeans`].
//!
//! ## Supported centroid initializations
//! - Random-Sample (with replacement)
//! - Precomputed
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeans_diagnostics::*;
//! use rand::prelude::*;
//!
//! fn main() {
//!     let (sample_cnt, sample_dims, k) = (2000, 4, 3);
//!
//!     // Generate some random data
//!     let mut samples = vec![0.0f64;sample_cnt * sample_dims];
//!     samples.iter_mut().for_each(|v| *v = rand::random());
//!
//!     let kmean = KMeans::new(samples, sample_cnt, sample_dims, EuclideanDistance).unwrap();
//!     let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(1)).max_iter(300).build();
//!
//!     let errors = kmean.elbow_method(6, KMeans::init_random_sample, &conf).unwrap();
//!     println!("Elbow: {:?}", errors);
//!     let score = kmean.silhouette(k, KMeans::init_random_sample, &conf).unwrap();
//!     println!("Silhouette (k = {}): {}", k, score);
//! }
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use kmeans_diagnostics::*;
//!
//! fn main() {
//!     let (sample_cnt, sample_dims, k) = (2000, 4, 3);
//!
//!     // Generate some random data
//!     let mut samples = vec![0.0f64;sample_cnt * sample_dims];
//!     samples.iter_mut().for_each(|v| *v = rand::random());
//!
//!     let conf = KMeansConfig::build()
//!         .init_done(&|_| println!("Initialization completed."))
//!         .iteration_done(&|s, nr, shift| println!("Iteration {} - Error: {:.2} | Shift: {:e}", nr, s.distsum, shift))
//!         .max_iter(300)
//!         .build();
//!
//!     let kmean = KMeans::new(samples, sample_cnt, sample_dims, EuclideanDistance).unwrap();
//!     let result = kmean.kmeans_lloyd(k, KMeans::init_random_sample, &conf).unwrap();
//!
//!     println!("Centroids: {:?}", result.centroids);
//!     println!("Error: {}", result.distsum);
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct. This struct is generic over the underlying primitive
//! type, that should be used for the calculations, and over the [`DistanceFunction`] (squared euclidean
//! distance by default). An instance takes over the sample data into its ownership and validates it once.
//!
//! The [`KMeans`] struct's instance-methods represent the supported calculations. Calling such a method does not
//! mutate it, so multiple runs can be done in parallel. Internally, a new instance of [`KMeansState`] is used to
//! store the state (and finally the result) of a k-means calculation.
//!
//! All of the instance-methods take the chosen centroid initialization method as argument. These
//! initialization-method implementations are static methods within the [`KMeans`] struct, which are simply passed in.
//!
//! Failures (invalid input, NaN produced during a calculation) are reported as [`KMeansError`]. Progress is
//! reported through the [`log`] facade; the library does not install a logger.

#[macro_use] mod helpers;
mod primitive;
mod error;
mod convergence;
mod distances;
mod knn;
mod api;
mod variants;
mod inits;
mod labeling;
mod diagnostics;

pub use api::{KMeans, KMeansConfig, KMeansConfigBuilder, KMeansState, KMeansResult, InitDoneCallbackFn, IterationDoneCallbackFn, DEFAULT_LABEL_NEIGHBOURS};
pub use convergence::ConvergenceStrategy;
pub use distances::{DistanceFunction, EuclideanDistance};
pub use error::{KMeansError, Result};
pub use knn::{Label, Labeler, KNearestNeighbours, Prediction};
pub use primitive::Primitive;
