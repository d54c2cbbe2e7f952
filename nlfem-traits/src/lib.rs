//! Core traits shared by the `nlfem` crates.
use nalgebra::RealField;

pub use nalgebra;

/// Scalar type used throughout nonlocal assembly.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

pub mod allocators;
