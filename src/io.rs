//! Output of diagnostic data.
pub mod debug_mesh;

pub use debug_mesh::{DebugMeshSink, DebugMeshWriter};
