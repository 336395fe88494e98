/// Minimum number of samples in a transform pass before lines are dealt out
/// to the worker pool. Smaller passes run on the calling thread.
pub const PARALLEL_SAMPLE_THRESHOLD: usize = 65_536;

/// Bins whose magnitude is at or below this value are zeroed during phase
/// normalization instead of being scaled to a unit phasor.
pub const PHASE_NORMALIZATION_EPSILON: f64 = 1e-5;

/// A PCM whose value range does not exceed this is considered flat and
/// yields no candidates.
pub const FLAT_PCM_EPSILON: f32 = 1e-6;

/// Standard deviation below which an overlap is treated as constant.
pub const VARIANCE_EPSILON: f64 = 1e-12;

/// Default number of PCM peaks checked per tile pair.
pub const DEFAULT_CHECK_PEAKS: usize = 5;

/// Default minimum overlap, as a fraction of the smaller tile, for a
/// candidate to receive a real correlation score.
pub const DEFAULT_MIN_OVERLAP_FRACTION: f64 = 0.01;

/// Default correlation threshold below which a registration is rejected.
pub const DEFAULT_THRESHOLD_R: f64 = 0.3;

/// Default max/avg displacement ratio used by global optimizers.
pub const DEFAULT_THRESHOLD_DISPLACEMENT_RELATIVE: f64 = 2.5;

/// Default absolute average displacement (pixels) used by global optimizers.
pub const DEFAULT_THRESHOLD_DISPLACEMENT_ABSOLUTE: f64 = 3.5;

/// Below this max error the relative displacement rule is not applied.
pub const MIN_MAX_DISPLACEMENT_ERROR: f64 = 0.75;

/// Base of the exponential edge window. Larger values give steeper edges.
pub const EXPONENTIAL_WINDOW_BASE: f64 = 1000.0;

/// Each tile dimension grows by `dim / MIRROR_EXTENSION_DIVISOR` (rounded up
/// to even) when mirror-extended before windowing.
pub const MIRROR_EXTENSION_DIVISOR: usize = 4;

/// Largest prime factor allowed in a fast transform length.
pub const FAST_LENGTH_MAX_PRIME: usize = 7;

/// Default nominal overlap between neighbouring grid tiles, as a fraction.
pub const DEFAULT_TILE_OVERLAP: f64 = 0.2;
