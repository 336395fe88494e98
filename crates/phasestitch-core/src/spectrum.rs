use num_complex::Complex64;

use crate::field::{linear_index, volume};

/// Number of complex bins a real line of `real_len` samples transforms to.
pub fn half_spectrum_len(real_len: usize) -> usize {
    real_len / 2 + 1
}

/// Packed half-spectrum of a real field.
///
/// Axis 0 holds only the non-negative frequencies (`real_width / 2 + 1`
/// bins, the rest follow from Hermitian symmetry); every other axis keeps
/// its full length. Bins are row-major with axis 0 fastest, matching
/// [`DenseField`](crate::field::DenseField). Viewed as interleaved floats a
/// line along axis 0 is [`packed_width`](Self::packed_width) values wide.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexSpectrum<const N: usize> {
    real_dims: [usize; N],
    dims: [usize; N],
    bins: Vec<Complex64>,
}

impl<const N: usize> ComplexSpectrum<N> {
    pub(crate) fn zeroed(real_dims: [usize; N]) -> Self {
        let mut dims = real_dims;
        dims[0] = half_spectrum_len(real_dims[0]);
        Self {
            real_dims,
            dims,
            bins: vec![Complex64::new(0.0, 0.0); volume(&dims)],
        }
    }

    /// Dims of the real field this spectrum transforms back to.
    pub fn real_dims(&self) -> [usize; N] {
        self.real_dims
    }

    /// Dims of the complex bin grid.
    pub fn dims(&self) -> [usize; N] {
        self.dims
    }

    /// Width of one axis-0 line in interleaved `re, im` floats.
    pub fn packed_width(&self) -> usize {
        2 * self.dims[0]
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// # Panics
    /// If `pos` lies outside the bin grid.
    pub fn bin(&self, pos: [usize; N]) -> Complex64 {
        assert!(
            pos.iter().zip(self.dims.iter()).all(|(&p, &d)| p < d),
            "bin {:?} outside spectrum {:?}",
            pos,
            self.dims
        );
        self.bins[linear_index(&self.dims, &pos)]
    }

    pub fn bins(&self) -> &[Complex64] {
        &self.bins
    }

    pub fn bins_mut(&mut self) -> &mut [Complex64] {
        &mut self.bins
    }

    pub fn same_shape(&self, other: &Self) -> bool {
        self.real_dims == other.real_dims
    }

    /// Interleaved `re, im` float copy of the bins.
    pub fn to_interleaved(&self) -> Vec<f32> {
        self.bins
            .iter()
            .flat_map(|c| [c.re as f32, c.im as f32])
            .collect()
    }
}
