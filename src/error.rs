//! Error types for configuration, region setup and assembly.
use std::fmt;
use std::fmt::{Display, Formatter};

/// A configuration bound was violated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    /// The interaction range `delta` must be positive and finite.
    InvalidInteractionRange,
    /// The smoothing width must be positive and finite.
    InvalidSmoothingWidth,
    /// A scalar parameter was NaN or infinite.
    NonFiniteParameter { name: &'static str },
    /// `level_max` must exceed `level_min`.
    InvalidLevelBounds { level_min: usize, level_max: usize },
    /// `level_max` exceeds the supported refinement depth.
    LevelTooDeep { level_max: usize, limit: usize },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInteractionRange => write!(f, "interaction range (delta) must be positive and finite"),
            Self::InvalidSmoothingWidth => write!(f, "smoothing width must be positive and finite"),
            Self::NonFiniteParameter { name } => write!(f, "parameter `{name}` must be finite"),
            Self::InvalidLevelBounds { level_min, level_max } => write!(
                f,
                "level_max ({level_max}) must be greater than level_min ({level_min})"
            ),
            Self::LevelTooDeep { level_max, limit } => {
                write!(f, "level_max ({level_max}) exceeds the refinement depth limit ({limit})")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Inconsistent data handed to a [`Region`](crate::region::Region).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegionError {
    /// The number of global dofs or solution values does not match the number of nodes.
    NodeCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An element has zero diameter.
    DegenerateElement { element_index: usize },
    /// Connectivity refers to a vertex that does not exist.
    VertexOutOfBounds { element_index: usize, vertex_index: usize },
    /// The global solution vector is shorter than the number of vertices.
    SolutionTooShort { expected: usize, actual: usize },
}

impl Display for RegionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeCountMismatch { what, expected, actual } => {
                write!(f, "expected {expected} {what} (one per node), got {actual}")
            }
            Self::DegenerateElement { element_index } => {
                write!(f, "element {element_index} is degenerate (zero diameter)")
            }
            Self::VertexOutOfBounds {
                element_index,
                vertex_index,
            } => write!(f, "element {element_index} refers to missing vertex {vertex_index}"),
            Self::SolutionTooShort { expected, actual } => {
                write!(f, "solution vector has {actual} entries but the mesh has {expected} vertices")
            }
        }
    }
}

impl std::error::Error for RegionError {}

/// Failures while assembling a single source element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssemblyError {
    /// The source element has zero diameter.
    DegenerateSourceElement,
    /// The number of source dofs or coefficients does not match the element.
    SourceNodeCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// The debug mesh was requested but no sink was attached.
    MissingDebugSink,
    /// The debug mesh was requested for elements that are not planar polygons.
    UnsupportedDebugMeshDimension { dim: usize },
}

impl Display for AssemblyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateSourceElement => write!(f, "source element is degenerate (zero diameter)"),
            Self::SourceNodeCountMismatch { what, expected, actual } => {
                write!(f, "expected {expected} source {what} (one per node), got {actual}")
            }
            Self::MissingDebugSink => write!(f, "print_debug_mesh is set but no debug mesh sink was provided"),
            Self::UnsupportedDebugMeshDimension { dim } => {
                write!(f, "the debug mesh holds 2D polygons, but elements are {dim}-dimensional")
            }
        }
    }
}

impl std::error::Error for AssemblyError {}
