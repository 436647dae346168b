//! Data structures and CSV loading

pub mod dataset;
pub mod frame;
pub mod loader;

pub use dataset::Dataset;
pub use frame::{Column, DataFrame, FrameError};
pub use loader::read_csv;
