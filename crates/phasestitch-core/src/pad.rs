use crate::error::{Result, StitchError};
use crate::fft::fast_dims;
use crate::field::{line_origin, DenseField};

/// A zero-padded field together with where the source landed inside it.
#[derive(Clone, Debug)]
pub struct PaddedField<const N: usize> {
    pub field: DenseField<N>,
    /// Position of the source's first sample inside `field`.
    pub offset: [usize; N],
}

/// Centre `field` in a zeroed field of dims `target`.
///
/// Consumes the source: once copied it is dropped, leaving the padded copy as
/// the only owner of the data. Each axis is offset by
/// `(target - source) / 2`. A target smaller than the source on any axis is a
/// dimension error.
pub fn pad<const N: usize>(field: DenseField<N>, target: [usize; N]) -> Result<PaddedField<N>> {
    let dims = field.dims();
    let mut offset = [0usize; N];
    for axis in 0..N {
        if target[axis] < dims[axis] {
            return Err(StitchError::Dimension(format!(
                "padding size on axis {} smaller than field: {} < {}",
                axis, target[axis], dims[axis]
            )));
        }
        offset[axis] = (target[axis] - dims[axis]) / 2;
    }

    let mut padded = DenseField::zeros(target)?;
    let width = dims[0];
    for (line_idx, line) in field.as_slice().chunks_exact(width).enumerate() {
        let mut start = line_origin(&dims, line_idx);
        for axis in 0..N {
            start[axis] += offset[axis];
        }
        let dst = padded.index_of(start);
        padded.as_mut_slice()[dst..dst + width].copy_from_slice(line);
    }

    Ok(PaddedField {
        field: padded,
        offset,
    })
}

/// Pad two fields to the fast transform size covering both.
pub fn pad_pair<const N: usize>(
    a: DenseField<N>,
    b: DenseField<N>,
) -> Result<(PaddedField<N>, PaddedField<N>)> {
    let target = common_fast_dims(a.dims(), b.dims());
    Ok((pad(a, target)?, pad(b, target)?))
}

/// Smallest fast dims at least as large as both `a` and `b` on every axis.
pub fn common_fast_dims<const N: usize>(a: [usize; N], b: [usize; N]) -> [usize; N] {
    let mut largest = a;
    for axis in 0..N {
        largest[axis] = a[axis].max(b[axis]);
    }
    fast_dims(largest)
}
