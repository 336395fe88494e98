use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CHECK_PEAKS, DEFAULT_MIN_OVERLAP_FRACTION, DEFAULT_THRESHOLD_DISPLACEMENT_ABSOLUTE,
    DEFAULT_THRESHOLD_DISPLACEMENT_RELATIVE, DEFAULT_THRESHOLD_R, DEFAULT_TILE_OVERLAP,
    MIN_MAX_DISPLACEMENT_ERROR,
};
use crate::error::{Result, StitchError};
use crate::pool::WorkerPool;
use crate::score::{CrossCorrelationResult, ScoringParams};

/// How overlapping tiles are blended once placed. Carried for the caller;
/// nothing in this crate fuses images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    #[default]
    LinearBlending,
    Average,
    Median,
    MaxIntensity,
    MinIntensity,
    Overlay,
    None,
}

impl fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FusionMethod::LinearBlending => "Linear Blending",
            FusionMethod::Average => "Average",
            FusionMethod::Median => "Median",
            FusionMethod::MaxIntensity => "Max. Intensity",
            FusionMethod::MinIntensity => "Min. Intensity",
            FusionMethod::Overlay => "Overlay into composite image",
            FusionMethod::None => "Do not fuse images",
        };
        f.write_str(name)
    }
}

/// Parameters of a single pairwise registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// PCM peaks examined per pair. Each expands into `2^N` wrap variants.
    pub check_peaks: usize,
    /// Mirror-extend and apply the exponential edge window before the FFT.
    pub windowing: bool,
    pub min_overlap_fraction: f64,
    /// Only accept PCM samples that are local maxima on the torus.
    pub local_maxima_only: bool,
    /// Worker threads; `None` uses the available hardware concurrency.
    pub threads: Option<usize>,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            check_peaks: DEFAULT_CHECK_PEAKS,
            windowing: true,
            min_overlap_fraction: DEFAULT_MIN_OVERLAP_FRACTION,
            local_maxima_only: false,
            threads: None,
        }
    }
}

impl RegistrationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.check_peaks == 0 {
            return Err(StitchError::Config("check_peaks must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.min_overlap_fraction) {
            return Err(StitchError::Config(format!(
                "min_overlap_fraction must be in [0, 1), got {}",
                self.min_overlap_fraction
            )));
        }
        if self.threads == Some(0) {
            return Err(StitchError::Config("threads must be at least 1".into()));
        }
        Ok(())
    }

    pub fn scoring_params(&self) -> ScoringParams {
        ScoringParams {
            min_overlap_fraction: self.min_overlap_fraction,
        }
    }

    pub fn build_pool(&self) -> Result<WorkerPool> {
        match self.threads {
            Some(n) => WorkerPool::new(n),
            None => WorkerPool::with_available_parallelism(),
        }
    }
}

/// Grid description and acceptance thresholds for a tile collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub grid_size_x: usize,
    pub grid_size_y: usize,
    /// Nominal overlap between neighbouring tiles (0.0..1.0).
    pub tile_overlap: f64,
    pub fusion_method: FusionMethod,
    /// Pairs whose best correlation falls below this are discarded.
    pub threshold_r: f64,
    /// Ratio of max to average displacement error tolerated by a global fit.
    pub threshold_displacement_relative: f64,
    /// Average displacement error (pixels) tolerated by a global fit.
    pub threshold_displacement_absolute: f64,
    pub registration: RegistrationConfig,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            grid_size_x: 1,
            grid_size_y: 1,
            tile_overlap: DEFAULT_TILE_OVERLAP,
            fusion_method: FusionMethod::default(),
            threshold_r: DEFAULT_THRESHOLD_R,
            threshold_displacement_relative: DEFAULT_THRESHOLD_DISPLACEMENT_RELATIVE,
            threshold_displacement_absolute: DEFAULT_THRESHOLD_DISPLACEMENT_ABSOLUTE,
            registration: RegistrationConfig::default(),
        }
    }
}

impl GridLayout {
    pub fn tile_count(&self) -> usize {
        self.grid_size_x * self.grid_size_y
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size_x == 0 || self.grid_size_y == 0 {
            return Err(StitchError::Config(format!(
                "grid must have at least one tile, got {}x{}",
                self.grid_size_x, self.grid_size_y
            )));
        }
        if !(0.0..1.0).contains(&self.tile_overlap) {
            return Err(StitchError::Config(format!(
                "tile_overlap must be in [0, 1), got {}",
                self.tile_overlap
            )));
        }
        self.registration.validate()
    }

    /// Whether a registration result is good enough to keep.
    pub fn accepts<const N: usize>(&self, result: &CrossCorrelationResult<N>) -> bool {
        result.overlapping_pixels > 0 && result.r >= self.threshold_r
    }

    /// Whether the displacement errors left by a global fit are tolerable.
    ///
    /// Fails when the worst error is large in absolute terms and exceeds the
    /// average by more than the relative threshold, or when the average
    /// itself exceeds the absolute threshold.
    pub fn displacement_consistent(&self, avg_error: f64, max_error: f64) -> bool {
        let outlier = avg_error * self.threshold_displacement_relative < max_error
            && max_error > MIN_MAX_DISPLACEMENT_ERROR;
        !(outlier || avg_error > self.threshold_displacement_absolute)
    }
}
