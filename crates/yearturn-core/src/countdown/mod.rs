mod engine;
mod remaining;

pub use engine::{CountdownEngine, CountdownPhase, Tick};
pub use remaining::{Deadline, RemainingTime};
