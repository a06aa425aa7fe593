pub mod matrix;
pub mod svd;

pub use matrix::{Matrix, MatrixOps, Vector};
pub use svd::{svd, Svd};
