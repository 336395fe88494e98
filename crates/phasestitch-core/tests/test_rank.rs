use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use phasestitch_core::rank::{quicksort_by, rank, Ranked};
use phasestitch_core::score::CrossCorrelationResult;

fn result(shift: [i64; 2], r: f64, pcm_value: f32) -> CrossCorrelationResult<2> {
    CrossCorrelationResult {
        shift,
        overlapping_pixels: 100,
        ssq: 1.0,
        r,
        pcm_value,
    }
}

// ---------------------------------------------------------------------------
// quicksort_by
// ---------------------------------------------------------------------------

#[test]
fn test_quicksort_matches_std_sort() {
    let mut rng = StdRng::seed_from_u64(40);
    for len in [0, 1, 2, 3, 10, 257] {
        let mut data: Vec<i32> = (0..len).map(|_| rng.random_range(-50..50)).collect();
        let mut expected = data.clone();
        expected.sort();
        quicksort_by(&mut data, |a, b| a.cmp(b));
        assert_eq!(data, expected, "len {len}");
    }
}

#[test]
fn test_quicksort_sorted_and_reversed_input() {
    let mut ascending: Vec<u32> = (0..100).collect();
    quicksort_by(&mut ascending, |a, b| a.cmp(b));
    assert_eq!(ascending, (0..100).collect::<Vec<_>>());

    let mut descending: Vec<u32> = (0..100).rev().collect();
    quicksort_by(&mut descending, |a, b| a.cmp(b));
    assert_eq!(descending, (0..100).collect::<Vec<_>>());
}

#[test]
fn test_quicksort_all_equal() {
    let mut data = vec![7u8; 33];
    quicksort_by(&mut data, |a, b| a.cmp(b));
    assert!(data.iter().all(|&v| v == 7));
}

// ---------------------------------------------------------------------------
// rank
// ---------------------------------------------------------------------------

#[test]
fn test_rank_key_is_one_minus_r() {
    assert_eq!(result([0, 0], 0.75, 0.1).rank_key(), 0.25);
}

#[test]
fn test_rank_orders_by_correlation() {
    let mut results = vec![
        result([1, 0], 0.2, 0.9),
        result([2, 0], 0.95, 0.1),
        result([3, 0], -0.4, 0.5),
        result([4, 0], 0.6, 0.3),
    ];
    rank(&mut results);
    let shifts: Vec<i64> = results.iter().map(|r| r.shift[0]).collect();
    assert_eq!(shifts, vec![2, 4, 1, 3]);
}

#[test]
fn test_rank_breaks_ties_by_pcm_value() {
    let mut results = vec![
        result([1, 0], 0.0, 0.2),
        result([2, 0], 0.0, 0.8),
        result([3, 0], 0.0, 0.5),
    ];
    rank(&mut results);
    let shifts: Vec<i64> = results.iter().map(|r| r.shift[0]).collect();
    assert_eq!(shifts, vec![2, 3, 1]);
}

#[test]
fn test_rank_is_idempotent() {
    // wrap variants of one peak share the PCM value and often r = 0
    let mut results = vec![
        result([-3, 5], 0.0, 0.4),
        result([17, 5], 0.9, 0.4),
        result([-3, -11], 0.0, 0.4),
        result([17, -11], 0.0, 0.4),
        result([2, 2], 0.0, 0.1),
        result([0, 1], 0.3, 0.05),
    ];
    rank(&mut results);
    let once = results.clone();
    rank(&mut results);
    assert_eq!(results, once);
    assert_eq!(results[0].shift, [17, 5]);
    assert_eq!(results[1].shift, [0, 1]);
}
