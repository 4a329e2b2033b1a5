//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check;
mod registry;
mod simulate;

pub use check::Check;
pub use registry::Registry;
pub use simulate::Simulate;
