mod common;

use phasestitch_core::config::RegistrationConfig;
use phasestitch_core::error::StitchError;
use phasestitch_core::field::Field2;
use phasestitch_core::peaks::TranslationCandidate;
use phasestitch_core::registration::{
    phase_correlation_map, register_pair, to_tile_coordinates, Registration,
};

use common::{add_noise, crop, crop_nd, pool, random_field};

fn config(windowing: bool) -> RegistrationConfig {
    RegistrationConfig {
        windowing,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Overlapping tiles cut from one texture
// ---------------------------------------------------------------------------

#[test]
fn test_register_noisy_tiles_with_window() {
    let p = pool();
    let scene = random_field([300, 300], 50);
    let mut a = crop(&scene, 0, 0, 256, 256);
    let mut b = crop(&scene, 20, 5, 256, 256);
    add_noise(&mut a, 2.0, 51);
    add_noise(&mut b, 2.0, 52);

    let results = register_pair(&a, &b, &config(true), &p).unwrap();
    let best = &results[0];
    assert_eq!(best.shift, [20, 5]);
    assert!(best.r > 0.9, "r = {}", best.r);
    assert_eq!(best.overlapping_pixels, 236 * 251);
}

#[test]
fn test_register_noisy_tiles_without_window() {
    let p = pool();
    let scene = random_field([300, 300], 53);
    let mut a = crop(&scene, 0, 0, 256, 256);
    let mut b = crop(&scene, 20, 5, 256, 256);
    add_noise(&mut a, 2.0, 54);
    add_noise(&mut b, 2.0, 55);

    let results = register_pair(&a, &b, &config(false), &p).unwrap();
    assert_eq!(results[0].shift, [20, 5]);
    assert!(results[0].r > 0.9);
    assert_eq!(results[0].overlapping_pixels, 236 * 251);
    // five peaks, four wrap variants each
    assert_eq!(results.len(), 20);
}

#[test]
fn test_register_narrow_overlap_needs_wrap_variant() {
    let p = pool();
    let scene = random_field([460, 270], 56);
    let a = crop(&scene, 0, 0, 256, 256);
    let b = crop(&scene, 192, 5, 256, 256);

    for windowing in [true, false] {
        let results = register_pair(&a, &b, &config(windowing), &p).unwrap();
        assert_eq!(results[0].shift, [192, 5], "windowing = {windowing}");
        assert_eq!(results[0].overlapping_pixels, 64 * 251);
        assert!(results[0].r > 0.9);
    }
}

#[test]
fn test_register_tiles_of_different_size() {
    let p = pool();
    let scene = random_field([200, 160], 57);
    let a = crop(&scene, 0, 0, 200, 160);
    let b = crop(&scene, 30, 25, 120, 100);

    let results = register_pair(&a, &b, &config(true), &p).unwrap();
    assert_eq!(results[0].shift, [30, 25]);
    assert_eq!(results[0].overlapping_pixels, 120 * 100);
    assert!(results[0].r > 0.99);
}

#[test]
fn test_register_3d_volumes() {
    let p = pool();
    let scene = random_field([48, 40, 32], 58);
    let a = crop_nd(&scene, [0, 0, 0], [32, 24, 20]);
    let b = crop_nd(&scene, [5, 3, 2], [32, 24, 20]);

    let results = register_pair(&a, &b, &config(false), &p).unwrap();
    assert_eq!(results[0].shift, [5, 3, 2]);
    assert_eq!(results[0].overlapping_pixels, 27 * 21 * 18);
    assert!(results[0].r > 0.999);
    assert_eq!(results.len(), 5 * 8);
}

// ---------------------------------------------------------------------------
// Unrelated and degenerate tiles
// ---------------------------------------------------------------------------

#[test]
fn test_register_uncorrelated_noise_scores_low() {
    let p = pool();
    let a = random_field([256, 256], 60);
    let b = random_field([256, 256], 61);

    let results = register_pair(&a, &b, &RegistrationConfig::default(), &p).unwrap();
    assert!(!results.is_empty());
    assert!(results[0].r < 0.3, "r = {}", results[0].r);
}

#[test]
fn test_register_blank_tile_gives_empty_list() {
    let p = pool();
    let a = Field2::zeros([64, 64]).unwrap();
    let b = random_field([64, 64], 62);

    for windowing in [true, false] {
        let results = register_pair(&a, &b, &config(windowing), &p).unwrap();
        assert!(results.is_empty());
    }
}

#[test]
fn test_register_constant_tile_gives_empty_list() {
    let p = pool();
    let constant = Field2::from_vec([64, 64], vec![100.0; 64 * 64]).unwrap();
    let textured = random_field([64, 64], 64);

    for windowing in [true, false] {
        let cfg = config(windowing);
        assert!(register_pair(&constant, &textured, &cfg, &p).unwrap().is_empty());
        assert!(register_pair(&textured, &constant, &cfg, &p).unwrap().is_empty());
    }
}

#[test]
fn test_register_results_are_ranked() {
    let p = pool();
    let scene = random_field([120, 100], 63);
    let a = crop(&scene, 0, 0, 96, 80);
    let b = crop(&scene, 10, 12, 96, 80);

    let results = register_pair(&a, &b, &config(false), &p).unwrap();
    for pair in results.windows(2) {
        assert!(pair[0].r >= pair[1].r);
    }
}

// ---------------------------------------------------------------------------
// API surface
// ---------------------------------------------------------------------------

#[test]
fn test_to_tile_coordinates_applies_origin_difference() {
    let peak = TranslationCandidate {
        shift: [-10, -5],
        pcm_value: 0.3,
    };
    let mapped = to_tile_coordinates(&peak, [25, 20], [65, 50]);
    assert_eq!(mapped.shift, [30, 25]);
    assert_eq!(mapped.pcm_value, 0.3);
}

#[test]
fn test_phase_correlation_map_has_padded_dims() {
    let p = pool();
    let a = random_field([256, 100], 64);
    let b = random_field([256, 100], 65);
    let pcm = phase_correlation_map(&a, &b, &config(true), &p).unwrap();
    assert_eq!(pcm.dims(), [320, 126]);
    let pcm = phase_correlation_map(&a, &b, &config(false), &p).unwrap();
    assert_eq!(pcm.dims(), [256, 100]);
}

#[test]
fn test_registration_reuses_config_and_pool() {
    let registration = Registration::new(RegistrationConfig {
        threads: Some(2),
        windowing: false,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(registration.pool().threads(), 2);

    let scene = random_field([80, 80], 66);
    let a = crop(&scene, 0, 0, 64, 64);
    let b = crop(&scene, 4, 9, 64, 64);
    let best = registration.best(&a, &b).unwrap().unwrap();
    assert_eq!(best.shift, [4, 9]);

    let c = crop(&scene, 11, 2, 64, 64);
    let best = registration.best(&a, &c).unwrap().unwrap();
    assert_eq!(best.shift, [11, 2]);
}

#[test]
fn test_registration_rejects_invalid_config() {
    let err = Registration::new(RegistrationConfig {
        check_peaks: 0,
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, StitchError::Config(_)));

    let p = pool();
    let a = random_field([16, 16], 67);
    let bad = RegistrationConfig {
        min_overlap_fraction: 1.5,
        ..Default::default()
    };
    assert!(register_pair(&a, &a, &bad, &p).is_err());
}
