use crate::consts::{EXPONENTIAL_WINDOW_BASE, MIRROR_EXTENSION_DIVISOR};
use crate::error::{Result, StitchError};
use crate::field::{position_of, DenseField};

/// A mirror-extended tile and where the tile itself sits inside it.
#[derive(Clone, Debug)]
pub struct ExtendedField<const N: usize> {
    pub field: DenseField<N>,
    pub offset: [usize; N],
}

/// Dims after growing each axis by a quarter, rounded up to an even amount so
/// both sides extend equally.
pub fn extension_dims<const N: usize>(dims: [usize; N]) -> [usize; N] {
    let mut out = dims;
    for (o, &d) in out.iter_mut().zip(dims.iter()) {
        let mut ext = d / MIRROR_EXTENSION_DIVISOR;
        if ext % 2 != 0 {
            ext += 1;
        }
        *o = d + ext;
    }
    out
}

/// Centre `field` in a field of dims `target`, filling the border by
/// mirroring the field's own samples.
pub fn mirror_extend<const N: usize>(
    field: &DenseField<N>,
    target: [usize; N],
) -> Result<ExtendedField<N>> {
    let dims = field.dims();
    let mut offset = [0usize; N];
    for axis in 0..N {
        if target[axis] < dims[axis] {
            return Err(StitchError::Dimension(format!(
                "extended size on axis {} smaller than field: {} < {}",
                axis, target[axis], dims[axis]
            )));
        }
        offset[axis] = (target[axis] - dims[axis]) / 2;
    }

    let mut extended = DenseField::zeros(target)?;
    for (i, value) in extended.as_mut_slice().iter_mut().enumerate() {
        let pos = position_of(&target, i);
        let mut src = [0i64; N];
        for axis in 0..N {
            src[axis] = pos[axis] as i64 - offset[axis] as i64;
        }
        *value = field.get_mirror(src);
    }

    Ok(ExtendedField {
        field: extended,
        offset,
    })
}

/// Weight of the exponential edge window at index `i` of `n`.
///
/// Rises from 0 at the border to nearly 1 in the centre:
/// `1 - base^(-2 * rel)` with `rel` the relative distance to the nearer edge.
pub fn exponential_weight(i: usize, n: usize) -> f64 {
    if n <= 1 {
        return 1.0;
    }
    let rel = i as f64 / (n - 1) as f64;
    let edge = if rel <= 0.5 { rel } else { 1.0 - rel };
    1.0 - 1.0 / EXPONENTIAL_WINDOW_BASE.powf(edge * 2.0)
}

/// Multiply `field` in place by the separable exponential edge window.
pub fn exponential_window<const N: usize>(field: &mut DenseField<N>) {
    let dims = field.dims();
    let weights: Vec<Vec<f64>> = dims
        .iter()
        .map(|&n| (0..n).map(|i| exponential_weight(i, n)).collect())
        .collect();

    for (i, value) in field.as_mut_slice().iter_mut().enumerate() {
        let pos = position_of(&dims, i);
        let w: f64 = (0..N).map(|axis| weights[axis][pos[axis]]).product();
        *value = (*value as f64 * w) as f32;
    }
}
