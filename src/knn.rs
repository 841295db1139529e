use crate::{DistanceFunction, KMeansError, Primitive, error::Result};
use std::{collections::HashMap, fmt::Debug, hash::Hash};

/// Marker for types usable as sample labels.
pub trait Label: Clone + Eq + Hash + Debug + Send + Sync {}
impl<L: Clone + Eq + Hash + Debug + Send + Sync> Label for L {}

/// Outcome of a single classification.
///
/// ## Fields
/// - **neighbours**: Row-indices of the neighbours that took part in the vote, nearest first
/// - **label**: The predicted label
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction<L> {
    pub neighbours: Vec<usize>,
    pub label: L,
}

/// Classifier used to attach a label to each converged centroid.
pub trait Labeler<T: Primitive, L: Label> {
    /// Predict the label of **point**.
    ///
    /// ## Arguments
    /// - **point**: The point to classify (`sample_dims` values)
    /// - **samples**: Reference samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_dims**: Amount of dimensions each sample has
    /// - **labels**: One label per reference sample
    /// - **k**: Amount of neighbours to consult
    fn classify(&self, point: &[T], samples: &[T], sample_dims: usize, labels: &[L], k: usize) -> Result<Prediction<L>>;
}

/// k-nearest-neighbours classifier using exhaustive search.
///
/// Neighbours are ordered by distance, equal distances by row index. The predicted label is the
/// one occurring most often among the `min(k, sample_cnt)` nearest neighbours. Tied votes go to
/// the tied label that shows up first in that ordering, i.e. the one closest to the point.
#[derive(Clone, Debug, Default)]
pub struct KNearestNeighbours<D> {
    distance: D,
}
impl<D> KNearestNeighbours<D> {
    pub fn new(distance: D) -> Self {
        Self { distance }
    }

    /// Row-indices of the **k** samples nearest to **point**, nearest first.
    pub fn k_nearest<T: Primitive>(&self, point: &[T], samples: &[T], sample_dims: usize, k: usize) -> Result<Vec<usize>>
            where D: DistanceFunction<T> {
        if sample_dims == 0 || samples.is_empty() {
            return Err(KMeansError::EmptySamples);
        }
        if samples.len() % sample_dims != 0 {
            let expected = (samples.len() / sample_dims + 1) * sample_dims;
            return Err(KMeansError::ShapeMismatch { expected, actual: samples.len() });
        }
        if point.len() != sample_dims {
            return Err(KMeansError::ShapeMismatch { expected: sample_dims, actual: point.len() });
        }

        let mut distances = samples.chunks_exact(sample_dims)
            .map(|s| self.distance.distance(point, s))
            .enumerate()
            .collect::<Vec<_>>();
        if distances.iter().any(|(_, d)| d.is_nan()) {
            return Err(KMeansError::InvalidComputation("neighbour distance"));
        }
        // stable sort keeps lower row indices first on equal distances
        distances.sort_by(|(_, d0), (_, d1)| d0.partial_cmp(d1).unwrap_or(std::cmp::Ordering::Equal));
        distances.truncate(k);
        Ok(distances.into_iter().map(|(idx, _)| idx).collect())
    }
}

impl<T: Primitive, L: Label, D: DistanceFunction<T>> Labeler<T, L> for KNearestNeighbours<D> {
    fn classify(&self, point: &[T], samples: &[T], sample_dims: usize, labels: &[L], k: usize) -> Result<Prediction<L>> {
        if k == 0 {
            return Err(KMeansError::InvalidNeighbourCount);
        }
        let sample_cnt = if sample_dims == 0 { 0 } else { samples.len() / sample_dims };
        if labels.len() != sample_cnt {
            return Err(KMeansError::LabelCountMismatch { labels: labels.len(), samples: sample_cnt });
        }
        let neighbours = self.k_nearest(point, samples, sample_dims, k)?;

        // label -> (votes, rank of its nearest voter)
        let mut votes: HashMap<&L, (usize, usize)> = HashMap::new();
        for (rank, &idx) in neighbours.iter().enumerate() {
            votes.entry(&labels[idx]).or_insert((0, rank)).0 += 1;
        }
        let label = votes.into_iter()
            .max_by(|(_, (v0, r0)), (_, (v1, r1))| v0.cmp(v1).then(r1.cmp(r0)))
            .map(|(label, _)| label.clone())
            .ok_or(KMeansError::EmptySamples)?;

        Ok(Prediction { neighbours, label })
    }
}
