use ndarray::{ArrayViewMutD, Axis};
use num_complex::Complex64;
use num_traits::Zero;
use realfft::RealFftPlanner;
use rustfft::{FftDirection, FftPlanner};
use tracing::trace;

use crate::consts::PARALLEL_SAMPLE_THRESHOLD;
use crate::error::{Result, StitchError};
use crate::field::{nd_shape, volume, DenseField};
use crate::pool::WorkerPool;
use crate::spectrum::{half_spectrum_len, ComplexSpectrum};

use super::lengths::check_transform_dims;

/// Forward transform of a real field into its packed half-spectrum.
///
/// Consumes `field`; its buffer is released once the first pass has read it.
/// Passes run x (real to half-complex), then y, then z, each joined before
/// the next starts. Every length must be fast (`x` additionally even),
/// otherwise a dimension error is returned before any work is done.
pub fn forward<const N: usize>(
    field: DenseField<N>,
    pool: &WorkerPool,
) -> Result<ComplexSpectrum<N>> {
    let dims = field.dims();
    check_transform_dims(&dims)?;

    let mut spectrum = ComplexSpectrum::zeroed(dims);
    real_to_complex_pass(field, &mut spectrum, pool)?;
    for axis in 1..N {
        complex_pass(&mut spectrum, axis, FftDirection::Forward, pool)?;
    }
    Ok(spectrum)
}

/// Inverse transform back to a real field of the spectrum's recorded dims.
///
/// Consumes `spectrum`, which is overwritten by the z and y passes. The
/// `1 / (N0 * N1 * N2)` normalization is applied in the final x pass.
pub fn inverse<const N: usize>(
    mut spectrum: ComplexSpectrum<N>,
    pool: &WorkerPool,
) -> Result<DenseField<N>> {
    check_transform_dims(&spectrum.real_dims())?;

    for axis in (1..N).rev() {
        complex_pass(&mut spectrum, axis, FftDirection::Inverse, pool)?;
    }
    complex_to_real_pass(spectrum, pool)
}

fn real_to_complex_pass<const N: usize>(
    field: DenseField<N>,
    spectrum: &mut ComplexSpectrum<N>,
    pool: &WorkerPool,
) -> Result<()> {
    let width = field.width();
    let bins = half_spectrum_len(width);
    let r2c = RealFftPlanner::<f64>::new().plan_fft_forward(width);
    trace!(width, lines = field.len() / width, "real-to-complex pass");

    let lines: Vec<(&[f32], &mut [Complex64])> = field
        .as_slice()
        .chunks_exact(width)
        .zip(spectrum.bins_mut().chunks_exact_mut(bins))
        .collect();

    dispatch(
        pool,
        field.len(),
        lines,
        || (r2c.make_input_vec(), r2c.make_scratch_vec()),
        |(input, scratch), (src, dst)| {
            for (x, &v) in input.iter_mut().zip(src) {
                *x = v as f64;
            }
            r2c.process_with_scratch(input, dst, scratch)
                .map_err(|e| StitchError::Fft(e.to_string()))
        },
    )
}

/// Full complex transform of every line along `axis` (1 = y, 2 = z).
fn complex_pass<const N: usize>(
    spectrum: &mut ComplexSpectrum<N>,
    axis: usize,
    direction: FftDirection,
    pool: &WorkerPool,
) -> Result<()> {
    let dims = spectrum.dims();
    let len = dims[axis];
    if len == 1 {
        return Ok(());
    }
    let fft = FftPlanner::<f64>::new().plan_fft(len, direction);
    let total = spectrum.len();
    trace!(axis, len, ?direction, "complex pass");

    let mut view = ArrayViewMutD::from_shape(nd_shape(&dims), spectrum.bins_mut())
        .map_err(|e| StitchError::Dimension(e.to_string()))?;
    // ndarray axes are reversed: field axis 0 is the last ndarray axis.
    let lines: Vec<_> = view.lanes_mut(Axis(N - 1 - axis)).into_iter().collect();

    dispatch(
        pool,
        total,
        lines,
        || {
            (
                vec![Complex64::zero(); len],
                vec![Complex64::zero(); fft.get_inplace_scratch_len()],
            )
        },
        |(buffer, scratch), mut lane| {
            for (b, v) in buffer.iter_mut().zip(lane.iter()) {
                *b = *v;
            }
            fft.process_with_scratch(buffer, scratch);
            for (v, b) in lane.iter_mut().zip(buffer.iter()) {
                *v = *b;
            }
            Ok(())
        },
    )
}

fn complex_to_real_pass<const N: usize>(
    mut spectrum: ComplexSpectrum<N>,
    pool: &WorkerPool,
) -> Result<DenseField<N>> {
    let real_dims = spectrum.real_dims();
    let width = real_dims[0];
    let bins = half_spectrum_len(width);
    let scale = 1.0 / volume(&real_dims) as f64;
    let c2r = RealFftPlanner::<f64>::new().plan_fft_inverse(width);
    trace!(width, "complex-to-real pass");

    let mut output = DenseField::zeroed(real_dims);
    let total = output.len();
    let lines: Vec<(&mut [Complex64], &mut [f32])> = spectrum
        .bins_mut()
        .chunks_exact_mut(bins)
        .zip(output.as_mut_slice().chunks_exact_mut(width))
        .collect();

    dispatch(
        pool,
        total,
        lines,
        || (c2r.make_output_vec(), c2r.make_scratch_vec()),
        |(real, scratch), (src, dst)| {
            // A real line has purely real DC and Nyquist bins.
            src[0].im = 0.0;
            if width % 2 == 0 {
                src[bins - 1].im = 0.0;
            }
            c2r.process_with_scratch(src, real, scratch)
                .map_err(|e| StitchError::Fft(e.to_string()))?;
            for (d, &v) in dst.iter_mut().zip(real.iter()) {
                *d = (v * scale) as f32;
            }
            Ok(())
        },
    )?;

    Ok(output)
}

/// Run a pass on the pool, or inline when it is too small to be worth
/// splitting.
fn dispatch<T, S, I, F>(
    pool: &WorkerPool,
    samples: usize,
    lines: Vec<T>,
    init: I,
    task: F,
) -> Result<()>
where
    T: Send,
    I: Fn() -> S + Sync,
    F: Fn(&mut S, T) -> Result<()> + Sync,
{
    if samples < PARALLEL_SAMPLE_THRESHOLD {
        let mut state = init();
        lines.into_iter().try_for_each(|line| task(&mut state, line))
    } else {
        pool.for_each_strided(lines, init, task)
    }
}
