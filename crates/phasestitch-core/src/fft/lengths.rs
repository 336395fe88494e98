use crate::consts::FAST_LENGTH_MAX_PRIME;
use crate::error::{Result, StitchError};

/// Whether a complex transform of length `n` factors into primes no larger
/// than [`FAST_LENGTH_MAX_PRIME`].
pub fn is_fast_length(n: usize) -> bool {
    if n == 0 {
        return false;
    }
    let mut rest = n;
    for p in 2..=FAST_LENGTH_MAX_PRIME {
        while rest % p == 0 {
            rest /= p;
        }
    }
    rest == 1
}

/// Whether `n` is usable as the real (first) axis: fast and even.
pub fn is_fast_real_length(n: usize) -> bool {
    n >= 2 && n % 2 == 0 && is_fast_length(n)
}

/// Smallest fast complex length `>= n`.
pub fn fast_length(n: usize) -> usize {
    let mut m = n.max(1);
    while !is_fast_length(m) {
        m += 1;
    }
    m
}

/// Smallest fast real length `>= n`.
pub fn fast_real_length(n: usize) -> usize {
    let mut m = n.max(2);
    if m % 2 == 1 {
        m += 1;
    }
    while !is_fast_length(m) {
        m += 2;
    }
    m
}

/// Fast dims covering `dims`: the real length on axis 0, complex elsewhere.
pub fn fast_dims<const N: usize>(dims: [usize; N]) -> [usize; N] {
    let mut fast = dims;
    fast[0] = fast_real_length(dims[0]);
    for d in fast.iter_mut().skip(1) {
        *d = fast_length(*d);
    }
    fast
}

/// Reject dims that cannot be transformed directly.
pub fn check_transform_dims(dims: &[usize]) -> Result<()> {
    for (axis, &len) in dims.iter().enumerate() {
        let ok = if axis == 0 {
            is_fast_real_length(len)
        } else {
            is_fast_length(len)
        };
        if !ok {
            let suggestion = if axis == 0 {
                fast_real_length(len)
            } else {
                fast_length(len)
            };
            return Err(StitchError::Dimension(format!(
                "length {len} on axis {axis} is not a fast transform length (next: {suggestion})"
            )));
        }
    }
    Ok(())
}
