use phasestitch_core::config::{FusionMethod, GridLayout, RegistrationConfig};
use phasestitch_core::error::StitchError;
use phasestitch_core::score::CrossCorrelationResult;

fn result(r: f64, overlapping_pixels: usize) -> CrossCorrelationResult<2> {
    CrossCorrelationResult {
        shift: [0, 0],
        overlapping_pixels,
        ssq: 0.0,
        r,
        pcm_value: 0.5,
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_registration_config_defaults() {
    let c = RegistrationConfig::default();
    assert_eq!(c.check_peaks, 5);
    assert!(c.windowing);
    assert_eq!(c.min_overlap_fraction, 0.01);
    assert!(!c.local_maxima_only);
    assert_eq!(c.threads, None);
    assert!(c.validate().is_ok());
}

#[test]
fn test_grid_layout_defaults() {
    let g = GridLayout::default();
    assert_eq!(g.threshold_r, 0.3);
    assert_eq!(g.threshold_displacement_relative, 2.5);
    assert_eq!(g.threshold_displacement_absolute, 3.5);
    assert_eq!(g.fusion_method, FusionMethod::LinearBlending);
    assert_eq!(g.tile_count(), 1);
    assert!(g.validate().is_ok());
}

#[test]
fn test_fusion_method_display() {
    assert_eq!(format!("{}", FusionMethod::LinearBlending), "Linear Blending");
    assert_eq!(format!("{}", FusionMethod::MaxIntensity), "Max. Intensity");
    assert_eq!(format!("{}", FusionMethod::None), "Do not fuse images");
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[test]
fn test_grid_layout_toml_roundtrip() {
    let g = GridLayout {
        grid_size_x: 4,
        grid_size_y: 3,
        fusion_method: FusionMethod::Median,
        registration: RegistrationConfig {
            check_peaks: 8,
            threads: Some(6),
            ..Default::default()
        },
        ..Default::default()
    };
    let text = toml::to_string_pretty(&g).unwrap();
    assert!(text.contains("fusion_method = \"median\""));
    let back: GridLayout = toml::from_str(&text).unwrap();
    assert_eq!(back, g);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let text = r#"
grid_size_x = 2
threshold_r = 0.5

[registration]
windowing = false
"#;
    let g: GridLayout = toml::from_str(text).unwrap();
    assert_eq!(g.grid_size_x, 2);
    assert_eq!(g.grid_size_y, 1);
    assert_eq!(g.threshold_r, 0.5);
    assert!(!g.registration.windowing);
    assert_eq!(g.registration.check_peaks, 5);
}

#[test]
fn test_empty_toml_is_default() {
    let g: GridLayout = toml::from_str("").unwrap();
    assert_eq!(g, GridLayout::default());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_rejects_bad_values() {
    let bad = [
        RegistrationConfig {
            check_peaks: 0,
            ..Default::default()
        },
        RegistrationConfig {
            min_overlap_fraction: -0.1,
            ..Default::default()
        },
        RegistrationConfig {
            threads: Some(0),
            ..Default::default()
        },
    ];
    for c in bad {
        assert!(matches!(c.validate(), Err(StitchError::Config(_))));
    }

    let g = GridLayout {
        grid_size_y: 0,
        ..Default::default()
    };
    assert!(g.validate().is_err());
}

#[test]
fn test_scoring_params_and_pool_follow_config() {
    let c = RegistrationConfig {
        min_overlap_fraction: 0.2,
        threads: Some(3),
        ..Default::default()
    };
    assert_eq!(c.scoring_params().min_overlap_fraction, 0.2);
    assert_eq!(c.build_pool().unwrap().threads(), 3);
}

// ---------------------------------------------------------------------------
// Acceptance rules
// ---------------------------------------------------------------------------

#[test]
fn test_accepts_uses_threshold_r() {
    let g = GridLayout::default();
    assert!(g.accepts(&result(0.3, 10)));
    assert!(g.accepts(&result(0.95, 10)));
    assert!(!g.accepts(&result(0.29, 10)));
    assert!(!g.accepts(&result(0.9, 0)));
}

#[test]
fn test_displacement_consistent() {
    let g = GridLayout::default();
    assert!(g.displacement_consistent(1.0, 2.0));
    // max far above avg but small in absolute terms
    assert!(g.displacement_consistent(0.1, 0.7));
    // outlier: max > 2.5 * avg and > 0.75
    assert!(!g.displacement_consistent(0.5, 1.5));
    // average too large
    assert!(!g.displacement_consistent(4.0, 5.0));
}
