use crate::{KMeans, KMeansState, KMeansConfig, DistanceFunction, error::Result, primitive::*};
use rand::distributions::{Distribution, Uniform};
use std::ops::DerefMut;

pub(crate) fn calculate<T, D>(kmean: &KMeans<T, D>, state: &mut KMeansState<T>, config: &KMeansConfig<'_, T>) -> Result<()>
		where T: Primitive, D: DistanceFunction<T> {
	let rows = Uniform::new(0, kmean.sample_cnt);
	let mut rnd = config.rnd.borrow_mut();
	for ci in 0..state.k { // every centroid is drawn independently, duplicates allowed
		let si = rows.sample(rnd.deref_mut());
		state.set_centroid_from_iter(ci, kmean.sample(si).iter().cloned());
	}
	Ok(())
}
