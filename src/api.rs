use crate::{error::Result, primitive::*, ConvergenceStrategy, DistanceFunction, EuclideanDistance, KMeansError, KNearestNeighbours, Label, Labeler};
use std::cell::RefCell;
use rayon::prelude::*;
use rand::prelude::*;

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>);
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>, usize, T);

/// Amount of neighbours consulted when labeling a converged centroid.
pub const DEFAULT_LABEL_NEIGHBOURS: usize = 5;

/// This is a structure holding various configuration options for the a k-means calculations, such as
/// the random number generator to use, the convergence test, or a couple of callbacks, that can be set to
/// get status information from a running k-means calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the iteration (already holding the new centroids)
    /// - **iteration_id**: Number of the current iteration
    /// - **shift**: Centroid shift of this iteration, as measured by the [`ConvergenceStrategy`]
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// The convergence test to use for the running calculation
    pub(crate) convergence: ConvergenceStrategy<T>,
    /// Optional safety cap on the amount of iterations
    pub(crate) max_iter: Option<usize>,
    /// Amount of neighbours the labeler consults per centroid
    pub(crate) label_neighbours: usize
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_,_,_| {},
            rnd: Box::new(RefCell::new(rand::thread_rng())),
            convergence: ConvergenceStrategy::ExactDifference,
            max_iter: None,
            label_neighbours: DEFAULT_LABEL_NEIGHBOURS
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("convergence", &self.convergence)
            .field("max_iter", &self.max_iter)
            .field("label_neighbours", &self.label_neighbours)
            .finish()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running k-means calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that should be used in the k-means calculation.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Set the convergence test to use during a running k-means calculation. For more information,
    /// see documentation of [`ConvergenceStrategy`].
    /// ## Default
    /// [`ConvergenceStrategy::ExactDifference`]
    pub fn convergence(mut self, convergence: ConvergenceStrategy<T>) -> Self {
        self.config.convergence = convergence; self
    }
    /// Stop a calculation after **max_iter** iterations, even if it did not converge.
    /// The result of such a run is flagged with `converged == false`.
    /// ## Default
    /// No limit: the calculation runs until the convergence test passes.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = Some(max_iter); self
    }
    /// Set the amount of neighbours consulted when labeling the converged centroids.
    /// ## Default
    /// [`DEFAULT_LABEL_NEIGHBOURS`] (5)
    pub fn label_neighbours(mut self, label_neighbours: usize) -> Self {
        self.config.label_neighbours = label_neighbours; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// This is the internally used data-structure, storing the current state during calculation, as
/// well as the final result, as returned by the API.
/// All mutations are done in this structure, making [`KMeans`] immutable, and therefore allowing
/// it to be used in parallel, without having to duplicate the input-data.
///
/// ## Generics
/// - **T**: Underlying primitive type that was used for the calculation
///
/// ## Fields
/// - **k**: The amount of clusters that were requested when calculating this k-means result
/// - **distsum**: The total sum of distances from all samples to their nearest centroid (during a run: against the centroids of the previous iteration)
/// - **centroids**: Calculated cluster centers [row-major] = [<centroid0>,<centroid1>,<centroid2>,...]
/// - **centroid_frequency**: Amount of samples in each centroid
/// - **assignments**: Vector mapping each sample to its respective nearest cluster
/// - **centroid_distances**: Vector containing each sample's distance to its centroid
/// - **iterations**: Amount of iterations the calculation took
/// - **converged**: Whether the convergence test passed (`false` only when stopped by `max_iter`)
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub distsum: T,
    pub centroids: Vec<T>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub centroid_distances: Vec<T>,
    pub iterations: usize,
    pub converged: bool,

    pub(crate) sample_dims: usize
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(sample_cnt: usize, sample_dims: usize, k: usize) -> Self {
        Self {
            k,
            distsum: T::zero(),
            centroids: vec![T::zero();sample_dims * k],
            centroid_frequency: vec![0usize;k],
            assignments: vec![0usize;sample_cnt],
            centroid_distances: vec![T::infinity();sample_cnt],
            iterations: 0,
            converged: false,
            sample_dims
        }
    }
    pub(crate) fn set_centroid_from_iter(&mut self, idx: usize, src: impl Iterator<Item = T>) {
        self.centroids.iter_mut().skip(self.sample_dims * idx).take(self.sample_dims)
                .zip(src)
                .for_each(|(c,s)| *c = s);
    }

    /// Amount of dimensions of each centroid.
    pub fn sample_dims(&self) -> usize { self.sample_dims }

    /// The centroid of cluster **idx**.
    pub fn centroid(&self, idx: usize) -> &[T] {
        &self.centroids[idx * self.sample_dims..(idx + 1) * self.sample_dims]
    }
}


/// Result of a labeled clustering run, as returned by [`KMeans::cluster`].
///
/// ## Fields
/// - **state**: Final state of the underlying k-means calculation
/// - **centroid_labels**: One label per centroid (empty for unlabeled runs)
/// - **query_cluster**: Index of the centroid nearest to the query point, if one was given
/// - **query_label**: Label of that centroid (`None` without query point, or for unlabeled runs)
#[derive(Clone, Debug)]
pub struct KMeansResult<T: Primitive, L> {
    pub state: KMeansState<T>,
    pub centroid_labels: Vec<L>,
    pub query_cluster: Option<usize>,
    pub query_label: Option<L>
}


/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the samples you want to operate on. The primitive type
/// of the passed samples array will be the type used internaly for all calculations, as well as the result
/// as stored in the returned [`KMeansState`] structure.
///
/// ## Supported calculations
/// - k-Means clustering (Lloyd) [`KMeans::kmeans_lloyd`]
/// - Labeled clustering with query classification [`KMeans::cluster`], [`KMeans::cluster_with`]
/// - Elbow diagnostic [`KMeans::elbow_method`]
/// - Silhouette diagnostic [`KMeans::silhouette`]
///
/// ## Supported initialization methods
/// - Random-Sample (with replacement) [`KMeans::init_random_sample`]
/// - Precomputed [`KMeans::init_precomputed`]
pub struct KMeans<T: Primitive, D: DistanceFunction<T> = EuclideanDistance> {
    pub(crate) sample_cnt: usize,
    pub(crate) sample_dims: usize,
    pub(crate) samples: Vec<T>,
    pub(crate) distance: D
}
impl<T: Primitive, D: DistanceFunction<T>> KMeans<T, D> {
    /// Create a new instance of the [`KMeans`] structure.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples, contained in the passed **samples** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **sample** vector has
    /// - **distance**: Distance function used for all calculations
    ///
    /// ## Errors
    /// Fails for an empty feature matrix, a **samples** vector of the wrong length, or non-finite values.
    pub fn new(samples: Vec<T>, sample_cnt: usize, sample_dims: usize, distance: D) -> Result<Self> {
        if sample_cnt == 0 || sample_dims == 0 {
            return Err(KMeansError::EmptySamples);
        }
        if samples.len() != sample_cnt * sample_dims {
            return Err(KMeansError::ShapeMismatch { expected: sample_cnt * sample_dims, actual: samples.len() });
        }
        check_finite(&samples)?;
        Ok(Self { sample_cnt, sample_dims, samples, distance })
    }

    /// Amount of samples in the feature matrix.
    pub fn sample_cnt(&self) -> usize { self.sample_cnt }
    /// Amount of dimensions of each sample.
    pub fn sample_dims(&self) -> usize { self.sample_dims }
    /// The samples [row-major], as passed to [`KMeans::new`].
    pub fn samples(&self) -> &[T] { &self.samples }
    /// The sample at row **idx**.
    pub fn sample(&self, idx: usize) -> &[T] {
        &self.samples[idx * self.sample_dims..(idx + 1) * self.sample_dims]
    }
    /// The distance function all calculations use.
    pub fn distance(&self) -> &D { &self.distance }


    /// Index of, and distance to, the centroid nearest to **sample**. Equal distances resolve to
    /// the lowest centroid index.
    pub(crate) fn closest_centroid(&self, sample: &[T], centroids: &[T]) -> Result<(usize, T)> {
        let mut best = (0, T::infinity());
        for (idx, c) in centroids.chunks_exact(self.sample_dims).enumerate() {
            let dist = self.distance.distance(sample, c);
            if dist.is_nan() {
                return Err(KMeansError::InvalidComputation("centroid distance"));
            }
            if idx == 0 || dist < best.1 {
                best = (idx, dist);
            }
        }
        Ok(best)
    }

    pub(crate) fn update_cluster_assignments(&self, state: &mut KMeansState<T>) -> Result<()> {
        let centroids = &state.centroids;

        // manually calculate work-packet size, because rayon does not do static scheduling (which is more apropriate here)
        let work_packet_size = (self.sample_cnt / rayon::current_num_threads()).max(1);
        let nearest = self.samples.par_chunks_exact(self.sample_dims)
            .with_min_len(work_packet_size)
            .map(|s| self.closest_centroid(s, centroids))
            .collect::<Result<Vec<_>>>()?;

        state.assignments.iter_mut()
            .zip(state.centroid_distances.iter_mut())
            .zip(nearest)
            .for_each(|((assignment, centroid_dist), (best_idx, best_dist))| {
                *assignment = best_idx;
                *centroid_dist = best_dist;
            });
        Ok(())
    }

    pub(crate) fn update_cluster_frequencies(&self, assignments: &[usize], centroid_frequency: &mut[usize]) {
        centroid_frequency.iter_mut().for_each(|v| *v = 0);
        assignments.iter().for_each(|centroid_id| centroid_frequency[*centroid_id] += 1);
    }

    pub(crate) fn check_labels<L>(&self, labels: &[L]) -> Result<()> {
        if !labels.is_empty() && labels.len() != self.sample_cnt {
            return Err(KMeansError::LabelCountMismatch { labels: labels.len(), samples: self.sample_cnt });
        }
        Ok(())
    }

    pub(crate) fn check_point(&self, point: &[T]) -> Result<()> {
        if point.len() != self.sample_dims {
            return Err(KMeansError::ShapeMismatch { expected: self.sample_dims, actual: point.len() });
        }
        check_finite(point)
    }


    /// Normal K-Means algorithm implementation (Lloyd): Assign each sample to its nearest centroid, then move
    /// each centroid to the mean of its samples, until the [`ConvergenceStrategy`] reports no movement.
    /// Centroids without samples stay where they are.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result).
    ///
    /// ## Example
    /// ```rust
    /// use kmeans_diagnostics::*;
    /// use rand::prelude::*;
    ///
    /// let (sample_cnt, sample_dims, k) = (2000, 8, 4);
    ///
    /// // Generate some random data
    /// let mut samples = vec![0.0f64;sample_cnt * sample_dims];
    /// samples.iter_mut().for_each(|v| *v = rand::random());
    ///
    /// let kmean = KMeans::new(samples, sample_cnt, sample_dims, EuclideanDistance).unwrap();
    /// let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(42)).max_iter(500).build();
    /// let result = kmean.kmeans_lloyd(k, KMeans::init_random_sample, &conf).unwrap();
    ///
    /// println!("Centroids: {:?}", result.centroids);
    /// println!("Cluster-Assignments: {:?}", result.assignments);
    /// println!("Error: {}", result.distsum);
    /// ```
    pub fn kmeans_lloyd<'a, F>(&self, k: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>>
                where for<'c> F: FnOnce(&KMeans<T, D>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        crate::variants::Lloyd::calculate(self, k, init, config)
    }

    /// Labeled k-means clustering.
    /// Runs [`KMeans::kmeans_lloyd`], labels each converged centroid with the k-nearest-neighbours vote
    /// (using this instance's distance function) over all samples, and classifies the optional **query**
    /// point with the label of its nearest centroid.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **labels**: One label per sample, or an empty slice for an unlabeled run
    /// - **query**: Optional point (`sample_dims` values) to classify against the converged centroids
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Example
    /// ```rust
    /// use kmeans_diagnostics::*;
    /// use rand::prelude::*;
    ///
    /// let samples = vec![0.0f64, 0.0, 0.0, 1.0, 10.0, 0.0, 10.0, 1.0];
    /// let labels = vec!["left", "left", "right", "right"];
    /// let kmean = KMeans::new(samples, 4, 2, EuclideanDistance).unwrap();
    /// let conf = KMeansConfig::build().random_generator(StdRng::seed_from_u64(7)).build();
    /// let result = kmean.cluster(2, &labels, Some(&[9.0, 0.5][..]), KMeans::init_random_sample, &conf).unwrap();
    /// println!("Centroid labels: {:?}, query label: {:?}", result.centroid_labels, result.query_label);
    /// ```
    pub fn cluster<'a, L, F>(&self, k: usize, labels: &[L], query: Option<&[T]>, init: F, config: &KMeansConfig<'a, T>)
                -> Result<KMeansResult<T, L>>
                where L: Label, D: Clone,
                    for<'c> F: FnOnce(&KMeans<T, D>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        let labeler = KNearestNeighbours::new(self.distance.clone());
        self.cluster_with(k, labels, query, init, &labeler, config)
    }

    /// Same as [`KMeans::cluster`], but labels the centroids using the given **labeler**.
    pub fn cluster_with<'a, L, F, C>(&self, k: usize, labels: &[L], query: Option<&[T]>, init: F, labeler: &C,
                config: &KMeansConfig<'a, T>) -> Result<KMeansResult<T, L>>
                where L: Label, C: Labeler<T, L> + ?Sized,
                    for<'c> F: FnOnce(&KMeans<T, D>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        self.check_labels(labels)?;
        if let Some(query) = query {
            self.check_point(query)?;
        }
        let state = self.kmeans_lloyd(k, init, config)?;
        crate::labeling::calculate(self, state, labels, query, labeler, config)
    }

    /// Elbow diagnostic: Runs [`KMeans::kmeans_lloyd`] for every k in `1..=max_k`, and reports the sum of
    /// distances from all samples to their nearest converged centroid for each k.
    ///
    /// ## Returns
    /// Vector of length **max_k**, where index `i` holds the error for `k = i + 1`.
    pub fn elbow_method<'a, F>(&self, max_k: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<Vec<T>>
                where for<'c> F: Fn(&KMeans<T, D>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        crate::diagnostics::elbow::calculate(self, max_k, init, config)
    }

    /// Silhouette diagnostic: Runs [`KMeans::kmeans_lloyd`] once for **k** clusters, and returns the mean
    /// silhouette coefficient over all samples. Distances are the square root of the distance function's
    /// output.
    pub fn silhouette<'a, F>(&self, k: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<T>
                where for<'c> F: FnOnce(&KMeans<T, D>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        crate::diagnostics::silhouette::calculate(self, k, init, config)
    }

    /// Random sample initialization method (a.k.a. Forgy, with replacement)
    ///
    /// ## Description
    /// This initialization method draws each of the k initial centroids independently and uniformly
    /// from the samples. The same sample may be drawn more than once.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_random_sample<'a>(kmean: &KMeans<T, D>, state: &mut KMeansState<T>, config: &KMeansConfig<'a, T>) -> Result<()> {
        crate::inits::randomsample::calculate(kmean, state, config)
    }

    /// Precomputed initialization method
    ///
    /// ## Description
    /// Uses the given **centroids** [row-major] as initial centroids. Their amount has to match the k
    /// the calculation is started with.
    pub fn init_precomputed(centroids: Vec<T>) -> impl for<'c> Fn(&KMeans<T, D>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        move |kmean, state, config| crate::inits::precomputed::calculate(kmean, state, config, &centroids)
    }
}

pub(crate) fn check_finite<T: Primitive>(values: &[T]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(KMeansError::NonFiniteInput { index }),
        None => Ok(())
    }
}
