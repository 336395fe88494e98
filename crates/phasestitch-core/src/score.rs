use serde::Serialize;

use crate::consts::{DEFAULT_MIN_OVERLAP_FRACTION, VARIANCE_EPSILON};
use crate::field::{line_origin, volume, DenseField};
use crate::peaks::TranslationCandidate;
use crate::pool::WorkerPool;

/// Quality of one candidate shift, measured on the tiles' actual overlap.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrossCorrelationResult<const N: usize> {
    /// Position of tile B's origin in tile A's coordinates.
    #[serde(with = "crate::serde_arrays")]
    pub shift: [i64; N],
    pub overlapping_pixels: usize,
    /// Mean squared intensity difference over the overlap.
    pub ssq: f64,
    /// Pearson correlation coefficient over the overlap.
    pub r: f64,
    pub pcm_value: f32,
}

impl<const N: usize> CrossCorrelationResult<N> {
    /// A result with no usable overlap: `r = 0` and `ssq = f64::MAX`.
    pub fn rejected(candidate: &TranslationCandidate<N>, overlapping_pixels: usize) -> Self {
        Self {
            shift: candidate.shift,
            overlapping_pixels,
            ssq: f64::MAX,
            r: 0.0,
            pcm_value: candidate.pcm_value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringParams {
    /// Overlaps of at most this fraction of the smaller tile's extent are
    /// reported with `r = 0` and `ssq = f64::MAX`.
    ///
    /// At `0.0` only empty overlaps are rejected: every shift leaving at least
    /// one shared pixel gets its computed `r` (still `0` when either side of
    /// the overlap is constant). The default of `0.01` drops slivers.
    pub min_overlap_fraction: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            min_overlap_fraction: DEFAULT_MIN_OVERLAP_FRACTION,
        }
    }
}

/// Corresponding boxes of the two tiles under a shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlapRegion<const N: usize> {
    pub start_a: [usize; N],
    pub start_b: [usize; N],
    pub extent: [usize; N],
}

impl<const N: usize> OverlapRegion<N> {
    pub fn len(&self) -> usize {
        volume(&self.extent)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where tile `b`, placed with its origin at `shift` in `a`'s coordinates,
/// overlaps `a`. `None` when the boxes do not intersect.
pub fn overlap_region<const N: usize>(
    dims_a: [usize; N],
    dims_b: [usize; N],
    shift: [i64; N],
) -> Option<OverlapRegion<N>> {
    let mut region = OverlapRegion {
        start_a: [0; N],
        start_b: [0; N],
        extent: [0; N],
    };
    for axis in 0..N {
        let s = shift[axis];
        let lo = s.max(0);
        let hi = (dims_a[axis] as i64).min(s + dims_b[axis] as i64);
        if lo >= hi {
            return None;
        }
        region.start_a[axis] = lo as usize;
        region.start_b[axis] = (lo - s) as usize;
        region.extent[axis] = (hi - lo) as usize;
    }
    Some(region)
}

/// Score one candidate shift against the unpadded tiles.
///
/// Means are taken in a first pass and the squared difference, variances and
/// covariance in a second. Overlaps too small for `params`, or where either
/// tile is constant, come back rejected with the pixel count still set.
pub fn score<const N: usize>(
    a: &DenseField<N>,
    b: &DenseField<N>,
    candidate: &TranslationCandidate<N>,
    params: &ScoringParams,
) -> CrossCorrelationResult<N> {
    let Some(region) = overlap_region(a.dims(), b.dims(), candidate.shift) else {
        return CrossCorrelationResult::rejected(candidate, 0);
    };
    let count = region.len();

    let smaller_extent: f64 = (0..N)
        .map(|axis| a.dim(axis).min(b.dim(axis)) as f64)
        .product();
    if count as f64 <= params.min_overlap_fraction * smaller_extent {
        return CrossCorrelationResult::rejected(candidate, count);
    }

    let mut sum_a = 0.0f64;
    let mut sum_b = 0.0f64;
    for_each_overlap_row(a, b, &region, |row_a, row_b| {
        sum_a += row_a.iter().map(|&v| v as f64).sum::<f64>();
        sum_b += row_b.iter().map(|&v| v as f64).sum::<f64>();
    });
    let n = count as f64;
    let mean_a = sum_a / n;
    let mean_b = sum_b / n;

    let mut ssq = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    let mut covar = 0.0f64;
    for_each_overlap_row(a, b, &region, |row_a, row_b| {
        for (&va, &vb) in row_a.iter().zip(row_b.iter()) {
            let (va, vb) = (va as f64, vb as f64);
            let diff = va - vb;
            ssq += diff * diff;
            let da = va - mean_a;
            let db = vb - mean_b;
            var_a += da * da;
            var_b += db * db;
            covar += da * db;
        }
    });

    let sd_a = (var_a / n).sqrt();
    let sd_b = (var_b / n).sqrt();
    if sd_a <= VARIANCE_EPSILON || sd_b <= VARIANCE_EPSILON {
        return CrossCorrelationResult::rejected(candidate, count);
    }

    CrossCorrelationResult {
        shift: candidate.shift,
        overlapping_pixels: count,
        ssq: ssq / n,
        r: (covar / n) / (sd_a * sd_b),
        pcm_value: candidate.pcm_value,
    }
}

/// Score every candidate on the pool, in input order.
pub fn score_all<const N: usize>(
    a: &DenseField<N>,
    b: &DenseField<N>,
    candidates: &[TranslationCandidate<N>],
    params: &ScoringParams,
    pool: &WorkerPool,
) -> Vec<CrossCorrelationResult<N>> {
    pool.map(candidates, |candidate| score(a, b, candidate, params))
}

fn for_each_overlap_row<const N: usize>(
    a: &DenseField<N>,
    b: &DenseField<N>,
    region: &OverlapRegion<N>,
    mut f: impl FnMut(&[f32], &[f32]),
) {
    let width = region.extent[0];
    let rows = region.len() / width;
    for row in 0..rows {
        let rel = line_origin(&region.extent, row);
        let mut pos_a = region.start_a;
        let mut pos_b = region.start_b;
        for axis in 0..N {
            pos_a[axis] += rel[axis];
            pos_b[axis] += rel[axis];
        }
        let ia = a.index_of(pos_a);
        let ib = b.index_of(pos_b);
        f(
            &a.as_slice()[ia..ia + width],
            &b.as_slice()[ib..ib + width],
        );
    }
}
