//! Helper traits for allocator trait bounds.
pub use nlfem_traits::allocators::*;
