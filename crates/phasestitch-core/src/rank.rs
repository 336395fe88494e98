use std::cmp::Ordering;

use crate::score::CrossCorrelationResult;

/// Anything that can be ordered best first by a scalar key.
pub trait Ranked {
    /// Lower is better.
    fn rank_key(&self) -> f64;
}

impl<const N: usize> Ranked for CrossCorrelationResult<N> {
    fn rank_key(&self) -> f64 {
        1.0 - self.r
    }
}

/// Order results best first: by `1 - r` ascending, then by PCM height
/// descending, then by shift. The order is total over distinct shifts, so
/// ranking an already ranked list leaves it unchanged.
pub fn rank<const N: usize>(results: &mut [CrossCorrelationResult<N>]) {
    quicksort_by(results, compare_results::<N>);
}

fn compare_results<const N: usize>(
    a: &CrossCorrelationResult<N>,
    b: &CrossCorrelationResult<N>,
) -> Ordering {
    a.rank_key()
        .total_cmp(&b.rank_key())
        .then_with(|| b.pcm_value.total_cmp(&a.pcm_value))
        .then_with(|| a.shift.cmp(&b.shift))
}

/// In-place quicksort using Hoare partitioning around the middle element.
pub fn quicksort_by<T, F>(data: &mut [T], mut compare: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if data.len() < 2 {
        return;
    }
    sort_range(data, 0, data.len() - 1, &mut compare);
}

fn sort_range<T, F>(data: &mut [T], left: usize, right: usize, compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let pivot = data[left + (right - left) / 2].clone();
    let mut i = left as isize;
    let mut j = right as isize;

    while i <= j {
        while compare(&data[i as usize], &pivot) == Ordering::Less {
            i += 1;
        }
        while compare(&pivot, &data[j as usize]) == Ordering::Less {
            j -= 1;
        }
        if i <= j {
            data.swap(i as usize, j as usize);
            i += 1;
            j -= 1;
        }
    }

    if (left as isize) < j {
        sort_range(data, left, j as usize, compare);
    }
    if i < right as isize {
        sort_range(data, i as usize, right, compare);
    }
}
