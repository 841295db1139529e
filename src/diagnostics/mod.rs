//! Model-selection diagnostics built on top of [`crate::KMeans::kmeans_lloyd`].
pub(crate) mod elbow;
pub(crate) mod silhouette;
