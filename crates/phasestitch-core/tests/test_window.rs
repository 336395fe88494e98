use approx::assert_relative_eq;

use phasestitch_core::field::{Field1, Field2};
use phasestitch_core::window::{exponential_weight, exponential_window, extension_dims, mirror_extend};

#[test]
fn test_extension_dims_grows_by_even_quarter() {
    assert_eq!(extension_dims([256, 100]), [320, 126]);
    assert_eq!(extension_dims([10]), [12]);
    assert_eq!(extension_dims([3, 1, 8]), [3, 1, 10]);
}

#[test]
fn test_mirror_extend_keeps_tile_and_mirrors_border() {
    let tile = Field2::from_fn([8, 4], |[x, y]| (x + 10 * y) as f32).unwrap();
    let ext = mirror_extend(&tile, [12, 6]).unwrap();
    assert_eq!(ext.offset, [2, 1]);
    assert_eq!(ext.field.dims(), [12, 6]);

    for y in 0..4 {
        for x in 0..8 {
            assert_eq!(ext.field.get([x + 2, y + 1]), tile.get([x, y]));
        }
    }
    // left border reflects columns 2 and 1
    assert_eq!(ext.field.get([0, 1]), tile.get([2, 0]));
    assert_eq!(ext.field.get([1, 1]), tile.get([1, 0]));
    // right border reflects columns 6 and 5
    assert_eq!(ext.field.get([10, 1]), tile.get([6, 0]));
    assert_eq!(ext.field.get([11, 1]), tile.get([5, 0]));
    // top row reflects row 1
    assert_eq!(ext.field.get([2, 0]), tile.get([0, 1]));
}

#[test]
fn test_mirror_extend_rejects_smaller_target() {
    let tile = Field1::zeros([8]).unwrap();
    assert!(mirror_extend(&tile, [6]).is_err());
}

#[test]
fn test_exponential_weight_profile() {
    let n = 11;
    assert_relative_eq!(exponential_weight(0, n), 0.0);
    assert_relative_eq!(exponential_weight(10, n), 0.0);
    assert_relative_eq!(exponential_weight(5, n), 0.999, epsilon = 1e-12);
    for i in 0..n {
        assert_relative_eq!(
            exponential_weight(i, n),
            exponential_weight(n - 1 - i, n),
            epsilon = 1e-12
        );
    }
    for i in 0..5 {
        assert!(exponential_weight(i, n) < exponential_weight(i + 1, n));
    }
    assert_eq!(exponential_weight(0, 1), 1.0);
}

#[test]
fn test_exponential_window_is_separable() {
    let mut field = Field2::from_vec([9, 7], vec![2.0; 63]).unwrap();
    exponential_window(&mut field);
    for y in 0..7 {
        for x in 0..9 {
            let expected = 2.0 * exponential_weight(x, 9) * exponential_weight(y, 7);
            assert_relative_eq!(field.get([x, y]) as f64, expected, epsilon = 1e-6);
        }
    }
    assert_eq!(field.get([0, 3]), 0.0);
}
