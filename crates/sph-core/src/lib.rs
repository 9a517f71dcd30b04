//! Smoothed Particle Hydrodynamics in 2D.
//!
//! Every [`Simulation::tick`](solver::Simulation::tick) predicts positions,
//! rebuilds a counting-sort spatial hash over them, computes densities in
//! parallel and then integrates pressure, viscosity and gravity in parallel,
//! with a full barrier between the two passes.

pub mod boundary;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod math;
pub mod particle;
pub mod solver;

pub use config::SimulationConfig;
pub use error::SimulationError;
pub use particle::Particle;
pub use solver::Simulation;
