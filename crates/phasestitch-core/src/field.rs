use ndarray::{Array2, IxDyn};

use crate::error::{Result, StitchError};

/// A dense real-valued field of 1, 2 or 3 dimensions.
///
/// `dims` is ordered `[width, height, depth]` and samples are stored
/// row-major with `x` varying fastest, so a 2-D field's buffer is a sequence
/// of `height` rows of `width` samples.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseField<const N: usize> {
    dims: [usize; N],
    data: Vec<f32>,
}

pub type Field1 = DenseField<1>;
pub type Field2 = DenseField<2>;
pub type Field3 = DenseField<3>;

impl<const N: usize> DenseField<N> {
    /// Allocate a zero-filled field. Every dimension must be at least 1.
    pub fn zeros(dims: [usize; N]) -> Result<Self> {
        check_dims(&dims)?;
        Ok(Self::zeroed(dims))
    }

    /// Wrap an existing buffer. Its length must equal the product of `dims`.
    pub fn from_vec(dims: [usize; N], data: Vec<f32>) -> Result<Self> {
        check_dims(&dims)?;
        let expected = volume(&dims);
        if data.len() != expected {
            return Err(StitchError::Dimension(format!(
                "buffer holds {} samples but dims {:?} need {}",
                data.len(),
                dims,
                expected
            )));
        }
        Ok(Self { dims, data })
    }

    /// Build a field by evaluating `f` at every position.
    pub fn from_fn(dims: [usize; N], mut f: impl FnMut([usize; N]) -> f32) -> Result<Self> {
        let mut field = Self::zeros(dims)?;
        for (i, value) in field.data.iter_mut().enumerate() {
            *value = f(position_of(&dims, i));
        }
        Ok(field)
    }

    pub(crate) fn zeroed(dims: [usize; N]) -> Self {
        Self {
            dims,
            data: vec![0.0; volume(&dims)],
        }
    }

    pub fn dims(&self) -> [usize; N] {
        self.dims
    }

    /// Extent along `axis` (0 = x).
    pub fn dim(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    pub fn width(&self) -> usize {
        self.dims[0]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains(&self, pos: [usize; N]) -> bool {
        pos.iter().zip(self.dims.iter()).all(|(&p, &d)| p < d)
    }

    /// Linear buffer index of `pos`. Does not check bounds.
    pub fn index_of(&self, pos: [usize; N]) -> usize {
        linear_index(&self.dims, &pos)
    }

    /// Value at `pos`.
    ///
    /// # Panics
    /// If any coordinate is outside the field.
    pub fn get(&self, pos: [usize; N]) -> f32 {
        assert!(
            self.contains(pos),
            "position {:?} outside field {:?}",
            pos,
            self.dims
        );
        self.data[self.index_of(pos)]
    }

    pub fn try_get(&self, pos: [usize; N]) -> Option<f32> {
        if self.contains(pos) {
            Some(self.data[self.index_of(pos)])
        } else {
            None
        }
    }

    /// Value at a signed position, zero outside the field.
    pub fn get_zero(&self, pos: [i64; N]) -> f32 {
        let mut unsigned = [0usize; N];
        for axis in 0..N {
            if pos[axis] < 0 || pos[axis] >= self.dims[axis] as i64 {
                return 0.0;
            }
            unsigned[axis] = pos[axis] as usize;
        }
        self.data[self.index_of(unsigned)]
    }

    /// Value at a signed position, reflecting coordinates outside the field
    /// about its border samples (the border itself is not repeated).
    pub fn get_mirror(&self, pos: [i64; N]) -> f32 {
        let mut unsigned = [0usize; N];
        for axis in 0..N {
            unsigned[axis] = mirror_coordinate(pos[axis], self.dims[axis]);
        }
        self.data[self.index_of(unsigned)]
    }

    /// # Panics
    /// If any coordinate is outside the field.
    pub fn set(&mut self, pos: [usize; N], value: f32) {
        assert!(
            self.contains(pos),
            "position {:?} outside field {:?}",
            pos,
            self.dims
        );
        let idx = self.index_of(pos);
        self.data[idx] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Smallest and largest sample. `None` only for an empty buffer.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let first = *self.data.first()?;
        Some(
            self.data
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    /// Multiply every sample by `factor`.
    pub fn scale(&mut self, factor: f32) {
        self.data.iter_mut().for_each(|v| *v *= factor);
    }
}

impl DenseField<2> {
    pub fn height(&self) -> usize {
        self.dims[1]
    }

    /// Copy an `ndarray` image of shape `(height, width)`.
    pub fn from_array2(array: &Array2<f32>) -> Result<Self> {
        let (h, w) = array.dim();
        Self::from_vec([w, h], array.iter().copied().collect())
    }

    /// Copy into an `ndarray` image of shape `(height, width)`.
    pub fn to_array2(&self) -> Array2<f32> {
        let [w, h] = self.dims;
        Array2::from_shape_fn((h, w), |(row, col)| self.data[row * w + col])
    }

    /// One row of samples.
    pub fn row(&self, y: usize) -> &[f32] {
        let w = self.dims[0];
        &self.data[y * w..(y + 1) * w]
    }
}

impl DenseField<3> {
    pub fn height(&self) -> usize {
        self.dims[1]
    }

    pub fn depth(&self) -> usize {
        self.dims[2]
    }
}

/// Number of samples spanned by `dims`.
pub fn volume(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Row-major linear index with axis 0 fastest.
pub(crate) fn linear_index(dims: &[usize], pos: &[usize]) -> usize {
    let mut idx = 0;
    for axis in (0..dims.len()).rev() {
        idx = idx * dims[axis] + pos[axis];
    }
    idx
}

pub(crate) fn position_of<const N: usize>(dims: &[usize; N], mut idx: usize) -> [usize; N] {
    let mut pos = [0usize; N];
    for axis in 0..N {
        pos[axis] = idx % dims[axis];
        idx /= dims[axis];
    }
    pos
}

/// Position of the first sample of axis-0 line `line_idx` in a grid of
/// `dims`, i.e. `[0, y, z]`.
pub(crate) fn line_origin<const N: usize>(dims: &[usize; N], line_idx: usize) -> [usize; N] {
    let mut pos = [0usize; N];
    let mut rest = line_idx;
    for axis in 1..N {
        pos[axis] = rest % dims[axis];
        rest /= dims[axis];
    }
    pos
}

/// `ndarray` shape of a buffer laid out with axis 0 fastest: the dims in
/// reverse order, so the last `ndarray` axis is contiguous.
pub(crate) fn nd_shape(dims: &[usize]) -> IxDyn {
    let reversed: Vec<usize> = dims.iter().rev().copied().collect();
    IxDyn(&reversed)
}

/// Reflect `p` into `0..n` without repeating the border sample
/// (`-1 -> 1`, `n -> n - 2`).
pub fn mirror_coordinate(p: i64, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as i64 - 1);
    let m = p.rem_euclid(period);
    if m >= n as i64 {
        (period - m) as usize
    } else {
        m as usize
    }
}

fn check_dims(dims: &[usize]) -> Result<()> {
    if dims.is_empty() || dims.iter().any(|&d| d == 0) {
        return Err(StitchError::Dimension(format!(
            "every dimension must be at least 1, got {:?}",
            dims
        )));
    }
    Ok(())
}
