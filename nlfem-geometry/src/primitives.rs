mod ball;
mod cube;

pub use ball::*;
pub use cube::*;
