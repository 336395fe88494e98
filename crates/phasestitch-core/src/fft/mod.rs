pub mod lengths;
mod transform;

pub use lengths::{
    check_transform_dims, fast_dims, fast_length, fast_real_length, is_fast_length,
    is_fast_real_length,
};
pub use transform::{forward, inverse};
