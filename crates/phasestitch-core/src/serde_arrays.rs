//! Serialize const-generic arrays as plain sequences.

use serde::{Serialize, Serializer};

pub fn serialize<S, T, const N: usize>(values: &[T; N], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    serializer.collect_seq(values.iter())
}
