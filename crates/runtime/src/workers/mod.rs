//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the engine and executes every command.

mod observer;
mod simulation;

pub(crate) use observer::BufferedObserver;
pub(crate) use simulation::{Command, SimulationWorker};
