pub mod config;
pub mod consts;
pub mod correlate;
pub mod error;
pub mod fft;
pub mod field;
pub mod io;
pub mod pad;
pub mod peaks;
pub mod pool;
pub mod rank;
pub mod registration;
pub mod score;
pub mod spectrum;
pub mod window;

mod serde_arrays;
