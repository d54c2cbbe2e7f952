//! Nonlocal assembly: local blocks per source element and their global accumulation.
pub mod buffers;
pub mod global;
pub mod local;

pub use buffers::{NonlocalLocalBlocks, TargetBlocks};
pub use global::{scatter_local_blocks, NonlocalSystem, NonlocalSystemAssembler};
pub use local::{classify_node, NodeClass, NonlocalAssembler, RefinementStatistics};
