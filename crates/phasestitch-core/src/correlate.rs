use num_complex::Complex64;
use rayon::prelude::*;
use tracing::debug;

use crate::consts::PHASE_NORMALIZATION_EPSILON;
use crate::error::{Result, StitchError};
use crate::fft;
use crate::field::DenseField;
use crate::pool::WorkerPool;
use crate::spectrum::ComplexSpectrum;

/// Replace every bin by its unit phasor, zeroing bins whose magnitude is at
/// or below [`PHASE_NORMALIZATION_EPSILON`].
pub fn normalize_phase<const N: usize>(spectrum: &mut ComplexSpectrum<N>, pool: &WorkerPool) {
    pool.install(|| spectrum.bins_mut().par_iter_mut().for_each(unit_phasor));
}

fn unit_phasor(c: &mut Complex64) {
    let magnitude = c.norm();
    if magnitude > PHASE_NORMALIZATION_EPSILON {
        *c /= magnitude;
    } else {
        *c = Complex64::new(0.0, 0.0);
    }
}

/// Negate every imaginary component in place.
pub fn conjugate<const N: usize>(spectrum: &mut ComplexSpectrum<N>, pool: &WorkerPool) {
    pool.install(|| {
        spectrum
            .bins_mut()
            .par_iter_mut()
            .for_each(|c| c.im = -c.im)
    });
}

/// Elementwise `a * b` written into `a`.
pub fn multiply_in_place<const N: usize>(
    a: &mut ComplexSpectrum<N>,
    b: &ComplexSpectrum<N>,
    pool: &WorkerPool,
) -> Result<()> {
    check_same_shape(a, b)?;
    pool.install(|| {
        a.bins_mut()
            .par_iter_mut()
            .zip(b.bins().par_iter())
            .for_each(|(x, y)| {
                let (p, q) = (x.re, x.im);
                let (r, s) = (y.re, y.im);
                *x = Complex64::new(p * r - q * s, p * s + q * r);
            })
    });
    Ok(())
}

/// Normalized cross-power spectrum `phase(a) * conj(phase(b))`.
///
/// Consumes both spectra; the result reuses `a`'s buffer. Every step runs
/// on `pool`.
pub fn cross_power_spectrum<const N: usize>(
    mut a: ComplexSpectrum<N>,
    mut b: ComplexSpectrum<N>,
    pool: &WorkerPool,
) -> Result<ComplexSpectrum<N>> {
    check_same_shape(&a, &b)?;
    normalize_phase(&mut a, pool);
    normalize_phase(&mut b, pool);
    conjugate(&mut b, pool);
    multiply_in_place(&mut a, &b, pool)?;
    Ok(a)
}

/// Phase correlation matrix of two same-shape fields.
///
/// Both fields are consumed. A peak at index `d` (after folding, see
/// [`fold_index`](crate::peaks::fold_index)) means `b(x) ≈ a(x + d)`: `b`'s
/// origin sits at `d` in `a`'s coordinates.
pub fn compute_pcm<const N: usize>(
    a: DenseField<N>,
    b: DenseField<N>,
    pool: &WorkerPool,
) -> Result<DenseField<N>> {
    if a.dims() != b.dims() {
        return Err(StitchError::Dimension(format!(
            "cannot correlate fields of dims {:?} and {:?}",
            a.dims(),
            b.dims()
        )));
    }
    debug!(dims = ?a.dims(), "computing phase correlation matrix");

    let spectrum_a = fft::forward(a, pool)?;
    let spectrum_b = fft::forward(b, pool)?;
    let cross = cross_power_spectrum(spectrum_a, spectrum_b, pool)?;
    fft::inverse(cross, pool)
}

fn check_same_shape<const N: usize>(a: &ComplexSpectrum<N>, b: &ComplexSpectrum<N>) -> Result<()> {
    if !a.same_shape(b) {
        return Err(StitchError::Dimension(format!(
            "spectra of real dims {:?} and {:?} differ",
            a.real_dims(),
            b.real_dims()
        )));
    }
    Ok(())
}
