//! Logic modules

pub mod evaluation;
pub mod model;
pub mod pool;
pub mod simulation;
pub mod threat;
