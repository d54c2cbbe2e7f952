//! Configuration of nonlocal assembly.
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::interaction::InteractionKernel;
use crate::Real;

/// The deepest refinement level accepted for `level_max`.
///
/// Octree paths are stored as flat indices, which for hexahedra need `3 * level` bits.
pub const MAX_REFINEMENT_LEVEL: usize = 16;

/// Parameters of the nonlocal operator and of the adaptive quadrature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonlocalSettings<T> {
    #[serde(default)]
    pub kernel: InteractionKernel,
    /// Kernel intensity.
    pub kappa: T,
    /// Interaction range: radius or half-width of the neighborhood.
    pub delta: T,
    /// Nodes shallower than this are always refined.
    #[serde(default)]
    pub level_min: usize,
    /// Leaves live at level `level_max - 1`.
    pub level_max: usize,
    /// Half-width of the mollification band at the root level. It halves with every level.
    pub smoothing_width: T,
    /// Constant source term `f` of `-L u = f`.
    pub forcing: T,
    /// Append every integrated sub-element to the debug mesh sink.
    #[serde(default)]
    pub print_debug_mesh: bool,
}

impl<T: Real> NonlocalSettings<T> {
    /// Settings with the given kernel parameters, no refinement beyond the root and no forcing.
    ///
    /// The root smoothing width defaults to `delta / 4`.
    pub fn new(kernel: InteractionKernel, kappa: T, delta: T) -> Self {
        let four = T::from_f64(4.0).expect("Literal must fit in T");
        Self {
            kernel,
            kappa,
            delta,
            level_min: 0,
            level_max: 1,
            smoothing_width: delta / four,
            forcing: T::zero(),
            print_debug_mesh: false,
        }
    }

    pub fn with_levels(self, level_min: usize, level_max: usize) -> Self {
        Self {
            level_min,
            level_max,
            ..self
        }
    }

    pub fn with_smoothing_width(self, smoothing_width: T) -> Self {
        Self { smoothing_width, ..self }
    }

    pub fn with_forcing(self, forcing: T) -> Self {
        Self { forcing, ..self }
    }

    pub fn with_debug_mesh(self, print_debug_mesh: bool) -> Self {
        Self {
            print_debug_mesh,
            ..self
        }
    }

    /// Checks every bound, reporting the first violation.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.delta > T::zero() && self.delta.is_finite()) {
            return Err(SettingsError::InvalidInteractionRange);
        }
        if !(self.smoothing_width > T::zero() && self.smoothing_width.is_finite()) {
            return Err(SettingsError::InvalidSmoothingWidth);
        }
        if !self.kappa.is_finite() {
            return Err(SettingsError::NonFiniteParameter { name: "kappa" });
        }
        if !self.forcing.is_finite() {
            return Err(SettingsError::NonFiniteParameter { name: "forcing" });
        }
        if self.level_max <= self.level_min {
            return Err(SettingsError::InvalidLevelBounds {
                level_min: self.level_min,
                level_max: self.level_max,
            });
        }
        if self.level_max > MAX_REFINEMENT_LEVEL {
            return Err(SettingsError::LevelTooDeep {
                level_max: self.level_max,
                limit: MAX_REFINEMENT_LEVEL,
            });
        }
        Ok(())
    }
}
