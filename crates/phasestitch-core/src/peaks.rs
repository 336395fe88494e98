use serde::Serialize;

use crate::consts::FLAT_PCM_EPSILON;
use crate::field::{position_of, DenseField};

/// A signed displacement read off the PCM, with the peak height it came from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TranslationCandidate<const N: usize> {
    #[serde(with = "crate::serde_arrays")]
    pub shift: [i64; N],
    pub pcm_value: f32,
}

/// Map a toroidal index to a signed offset.
///
/// Indices past the middle of the axis wrap to negative displacements:
/// `i` when `i <= size / 2`, otherwise `i - size`.
pub fn fold_index(i: usize, size: usize) -> i64 {
    if i <= size / 2 {
        i as i64
    } else {
        i as i64 - size as i64
    }
}

/// Up to `max_candidates` highest PCM samples, best first, with indices
/// folded to signed shifts.
///
/// The PCM is scanned once while a small sorted list of the best values seen
/// so far is kept. A sample only displaces an entry it strictly exceeds, so
/// among equal values the first one found wins. No suppression is applied
/// around a peak unless `local_maxima_only` is set, in which case a sample
/// only qualifies when none of its toroidal neighbours is larger.
///
/// A flat PCM (blank or constant tile) has no meaningful peak and yields no
/// candidates.
pub fn extract_peaks<const N: usize>(
    pcm: &DenseField<N>,
    max_candidates: usize,
    local_maxima_only: bool,
) -> Vec<TranslationCandidate<N>> {
    if max_candidates == 0 {
        return Vec::new();
    }
    match pcm.min_max() {
        Some((lo, hi)) if hi - lo > FLAT_PCM_EPSILON => {}
        _ => return Vec::new(),
    }

    let dims = pcm.dims();
    // (value, linear index), sorted by descending value
    let mut best: Vec<(f32, usize)> = Vec::with_capacity(max_candidates + 1);

    for (idx, &value) in pcm.as_slice().iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        if best.len() == max_candidates && value <= best[best.len() - 1].0 {
            continue;
        }
        if local_maxima_only && !is_local_maximum(pcm, idx) {
            continue;
        }
        let insert_at = best
            .iter()
            .position(|&(v, _)| value > v)
            .unwrap_or(best.len());
        best.insert(insert_at, (value, idx));
        best.truncate(max_candidates);
    }

    best.into_iter()
        .map(|(value, idx)| {
            let pos = position_of(&dims, idx);
            let mut shift = [0i64; N];
            for axis in 0..N {
                shift[axis] = fold_index(pos[axis], dims[axis]);
            }
            TranslationCandidate {
                shift,
                pcm_value: value,
            }
        })
        .collect()
}

/// Whether no toroidal neighbour of `idx` is larger than it.
pub fn is_local_maximum<const N: usize>(pcm: &DenseField<N>, idx: usize) -> bool {
    let dims = pcm.dims();
    let pos = position_of(&dims, idx);
    let value = pcm.as_slice()[idx];

    let neighbours = 3usize.pow(N as u32);
    for code in 0..neighbours {
        let mut rest = code;
        let mut neighbour = [0usize; N];
        let mut is_centre = true;
        for axis in 0..N {
            let step = (rest % 3) as i64 - 1;
            rest /= 3;
            if step != 0 {
                is_centre = false;
            }
            let n = dims[axis] as i64;
            neighbour[axis] = (pos[axis] as i64 + step).rem_euclid(n) as usize;
        }
        if !is_centre && pcm.as_slice()[pcm.index_of(neighbour)] > value {
            return false;
        }
    }
    true
}

/// The `2^N` readings of an aliased shift.
///
/// A PCM of size `size` cannot tell `d` from `d ± size` on any axis. For each
/// axis the alternative is `d + size` when `d < 0`, else `d - size`; every
/// combination is returned, the original shift first.
pub fn wrap_variants<const N: usize>(
    candidate: &TranslationCandidate<N>,
    size: [usize; N],
) -> Vec<TranslationCandidate<N>> {
    let count = 1usize << N;
    (0..count)
        .map(|mask| {
            let mut shift = candidate.shift;
            for axis in 0..N {
                if mask & (1 << axis) != 0 {
                    let s = size[axis] as i64;
                    shift[axis] = if shift[axis] < 0 {
                        shift[axis] + s
                    } else {
                        shift[axis] - s
                    };
                }
            }
            TranslationCandidate {
                shift,
                pcm_value: candidate.pcm_value,
            }
        })
        .collect()
}
