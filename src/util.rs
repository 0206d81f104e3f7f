use nalgebra::Vector3;
use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::Rng;
use std::ops::RangeBounds;

pub fn random_vec<T, R, G>(rng: &mut G, range: R) -> Vector3<T>
where
    T: SampleUniform + nalgebra::Scalar,
    R: RangeBounds<T> + SampleRange<T> + Clone,
    G: Rng + ?Sized,
{
    Vector3::new(
        rng.gen_range(range.clone()),
        rng.gen_range(range.clone()),
        rng.gen_range(range),
    )
}
