use tracing::{debug, info, warn};

use crate::config::RegistrationConfig;
use crate::consts::FLAT_PCM_EPSILON;
use crate::correlate::compute_pcm;
use crate::error::{Result, StitchError};
use crate::field::DenseField;
use crate::pad::pad_pair;
use crate::peaks::{extract_peaks, wrap_variants, TranslationCandidate};
use crate::pool::WorkerPool;
use crate::rank::rank;
use crate::score::{score_all, CrossCorrelationResult};
use crate::window::{exponential_window, extension_dims, mirror_extend};

/// A configuration and a worker pool, reused across many tile pairs.
#[derive(Debug)]
pub struct Registration {
    config: RegistrationConfig,
    pool: WorkerPool,
}

impl Registration {
    /// Validate `config` and build its pool.
    pub fn new(config: RegistrationConfig) -> Result<Self> {
        config.validate()?;
        let pool = config.build_pool()?;
        Ok(Self { config, pool })
    }

    /// Use an existing pool, ignoring `config.threads`.
    pub fn with_pool(config: RegistrationConfig, pool: WorkerPool) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn register<const N: usize>(
        &self,
        a: &DenseField<N>,
        b: &DenseField<N>,
    ) -> Result<Vec<CrossCorrelationResult<N>>> {
        register_pair(a, b, &self.config, &self.pool)
    }

    /// Best candidate only, if any survived.
    pub fn best<const N: usize>(
        &self,
        a: &DenseField<N>,
        b: &DenseField<N>,
    ) -> Result<Option<CrossCorrelationResult<N>>> {
        Ok(self.register(a, b)?.into_iter().next())
    }
}

/// Estimate the translation of tile `b` relative to tile `a`.
///
/// Returns every verified candidate, best first. A shift `s` in the result
/// means `b`'s origin sits at `s` in `a`'s coordinates, so `b(x) ≈ a(x + s)`.
/// Tiles may differ in size. A blank or constant tile gives an empty list.
pub fn register_pair<const N: usize>(
    a: &DenseField<N>,
    b: &DenseField<N>,
    config: &RegistrationConfig,
    pool: &WorkerPool,
) -> Result<Vec<CrossCorrelationResult<N>>> {
    config.validate()?;

    if is_flat(a) || is_flat(b) {
        warn!(
            dims_a = ?a.dims(),
            dims_b = ?b.dims(),
            "constant tile, no candidate shifts"
        );
        return Ok(Vec::new());
    }

    let pair = prepare_pair(a, b, config.windowing)?;
    let size = pair.a.dims();

    info!(
        dims_a = ?a.dims(),
        dims_b = ?b.dims(),
        padded = ?size,
        windowing = config.windowing,
        "registering tile pair"
    );

    let (origin_a, origin_b) = (pair.origin_a, pair.origin_b);
    let pcm = compute_pcm(pair.a, pair.b, pool)?;
    let peaks = extract_peaks(&pcm, config.check_peaks, config.local_maxima_only);
    drop(pcm);

    if peaks.is_empty() {
        warn!("phase correlation is flat, no candidate shifts");
        return Ok(Vec::new());
    }

    let candidates: Vec<TranslationCandidate<N>> = peaks
        .iter()
        .flat_map(|peak| wrap_variants(&to_tile_coordinates(peak, origin_a, origin_b), size))
        .collect();
    debug!(
        peaks = peaks.len(),
        candidates = candidates.len(),
        "scoring candidate shifts"
    );

    let mut results = score_all(a, b, &candidates, &config.scoring_params(), pool);
    rank(&mut results);

    for result in &results {
        debug!(
            shift = ?result.shift,
            r = result.r,
            overlap = result.overlapping_pixels,
            pcm = result.pcm_value,
            "candidate"
        );
    }
    if let Some(best) = results.first() {
        info!(
            shift = ?best.shift,
            r = best.r,
            overlap = best.overlapping_pixels,
            "best translation"
        );
    }

    Ok(results)
}

/// The phase correlation matrix [`register_pair`] searches, for inspection.
///
/// Its dims are the common padded size of the two (possibly windowed)
/// tiles; a peak at `d` corresponds to the tile shift
/// `d + origin_b - origin_a`.
pub fn phase_correlation_map<const N: usize>(
    a: &DenseField<N>,
    b: &DenseField<N>,
    config: &RegistrationConfig,
    pool: &WorkerPool,
) -> Result<DenseField<N>> {
    config.validate()?;
    let pair = prepare_pair(a, b, config.windowing)?;
    compute_pcm(pair.a, pair.b, pool)
}

/// Two tiles padded to a common fast size, with where each tile's first
/// sample sits in its buffer.
/// True for a tile whose samples all lie within [`FLAT_PCM_EPSILON`] of each
/// other. Windowing would turn such a tile into a bump that still correlates.
fn is_flat<const N: usize>(tile: &DenseField<N>) -> bool {
    match tile.min_max() {
        Some((lo, hi)) => hi - lo <= FLAT_PCM_EPSILON,
        None => false,
    }
}

struct PaddedPair<const N: usize> {
    a: DenseField<N>,
    b: DenseField<N>,
    origin_a: [i64; N],
    origin_b: [i64; N],
}

fn prepare_pair<const N: usize>(
    a: &DenseField<N>,
    b: &DenseField<N>,
    windowing: bool,
) -> Result<PaddedPair<N>> {
    let (prepared_a, inner_a) = prepare_tile(a, windowing)?;
    let (prepared_b, inner_b) = prepare_tile(b, windowing)?;
    let (padded_a, padded_b) = pad_pair(prepared_a, prepared_b)?;

    let mut origin_a = [0i64; N];
    let mut origin_b = [0i64; N];
    for axis in 0..N {
        origin_a[axis] = (padded_a.offset[axis] + inner_a[axis]) as i64;
        origin_b[axis] = (padded_b.offset[axis] + inner_b[axis]) as i64;
    }
    Ok(PaddedPair {
        a: padded_a.field,
        b: padded_b.field,
        origin_a,
        origin_b,
    })
}

/// Move a PCM peak from padded-buffer coordinates to tile coordinates.
///
/// `origin_a` and `origin_b` are where each tile's first sample sits inside
/// its padded buffer.
pub fn to_tile_coordinates<const N: usize>(
    peak: &TranslationCandidate<N>,
    origin_a: [i64; N],
    origin_b: [i64; N],
) -> TranslationCandidate<N> {
    let mut shift = peak.shift;
    for axis in 0..N {
        shift[axis] += origin_b[axis] - origin_a[axis];
    }
    TranslationCandidate {
        shift,
        pcm_value: peak.pcm_value,
    }
}

/// Copy a tile for the transform, mirror-extending and windowing it when
/// asked. Returns the copy and where the tile sits inside it.
fn prepare_tile<const N: usize>(
    tile: &DenseField<N>,
    windowing: bool,
) -> Result<(DenseField<N>, [usize; N])> {
    if tile.is_empty() {
        return Err(StitchError::Dimension("cannot register an empty tile".into()));
    }
    if !windowing {
        return Ok((tile.clone(), [0; N]));
    }
    let extended = mirror_extend(tile, extension_dims(tile.dims()))?;
    let mut field = extended.field;
    exponential_window(&mut field);
    Ok((field, extended.offset))
}
