//! Adaptive quadrature for nonlocal finite element operators.
//!
//! A nonlocal operator couples every point to all points inside a neighborhood of size `delta`.
//! The neighborhood is truncated with a smooth step over a thin band, and source elements are
//! subdivided recursively until the band is resolved, so that the assembled quantities stay
//! smooth functions of the geometry and converge at the rate of the underlying quadrature.
use nalgebra::{DimMin, DimName};

pub mod allocators;
pub mod assembly;
pub mod element;
pub mod error;
pub mod interaction;
pub mod io;
pub mod mesh;
pub mod quadrature;
pub mod refinement;
pub mod region;
pub mod settings;

pub mod geometry {
    pub use nlfem_geometry::*;
}

#[cfg(feature = "proptest-support")]
pub mod proptest;

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;

pub use nlfem_traits::Real;

/// A small, fixed-size dimension.
///
/// Used as a trait alias for various traits frequently needed by generic `nlfem` routines.
pub trait SmallDim: DimName + DimMin<Self, Output = Self> {}

impl<D> SmallDim for D where D: DimName + DimMin<Self, Output = Self> {}
