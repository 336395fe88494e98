#![allow(dead_code)]

use phasestitch_core::field::{DenseField, Field2};
use phasestitch_core::pool::WorkerPool;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn pool() -> WorkerPool {
    WorkerPool::new(4).unwrap()
}

/// Field of independent uniform samples in `0..255`.
pub fn random_field<const N: usize>(dims: [usize; N], seed: u64) -> DenseField<N> {
    let mut rng = StdRng::seed_from_u64(seed);
    DenseField::from_fn(dims, |_| rng.random_range(0.0f32..255.0)).unwrap()
}

/// Add zero-mean Gaussian noise (Box-Muller).
pub fn add_noise<const N: usize>(field: &mut DenseField<N>, sigma: f32, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for v in field.as_mut_slice() {
        let u1: f64 = rng.random::<f64>().max(1e-300);
        let u2: f64 = rng.random::<f64>();
        let gauss = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        *v += sigma * gauss as f32;
    }
}

/// Copy the `w` x `h` window of `scene` starting at `(x0, y0)`.
pub fn crop(scene: &Field2, x0: usize, y0: usize, w: usize, h: usize) -> Field2 {
    DenseField::from_fn([w, h], |[x, y]| scene.get([x0 + x, y0 + y])).unwrap()
}

/// Copy the box of `dims` starting at `origin`.
pub fn crop_nd<const N: usize>(
    scene: &DenseField<N>,
    origin: [usize; N],
    dims: [usize; N],
) -> DenseField<N> {
    DenseField::from_fn(dims, |pos| {
        let mut src = pos;
        for axis in 0..N {
            src[axis] += origin[axis];
        }
        scene.get(src)
    })
    .unwrap()
}

/// `b(x) = a((x + shift) mod dims)`.
pub fn circular_shift<const N: usize>(a: &DenseField<N>, shift: [i64; N]) -> DenseField<N> {
    let dims = a.dims();
    DenseField::from_fn(dims, |pos| {
        let mut src = [0usize; N];
        for axis in 0..N {
            src[axis] = (pos[axis] as i64 + shift[axis]).rem_euclid(dims[axis] as i64) as usize;
        }
        a.get(src)
    })
    .unwrap()
}
