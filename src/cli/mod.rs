//! CLI command handling

pub mod capabilities;
pub mod replay;

pub use capabilities::*;
pub use replay::*;
