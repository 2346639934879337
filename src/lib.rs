//! # Evodrive - Neuro-evolved self-driving cars
//!
//! Cars drive around a raster track steered by small neural networks. Each
//! generation the whole population drives at once until every car has
//! crashed; the distance they covered becomes their fitness and a genetic
//! algorithm breeds the next generation.
//!
//! ## Core Modules
//!
//! - [`simulation::track`] - Track raster used for collisions and sensing
//! - [`simulation::vehicle`] - Car pose, corners, sensor rays, crash state
//! - [`simulation::controller`] - Steering decisions and the controller trait
//! - [`simulation::evaluator`] - Per-generation evaluation loop
//! - [`simulation::evolution`] - Genetic algorithm driver
//! - [`graphics`] - macroquad rendering

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network brains used as controllers.
    pub mod brain;
    /// Controller trait, steering decisions and argmax tie-break.
    pub mod controller;
    /// Error type for asset loading and settings.
    pub mod error;
    /// Generation evaluator and the presenter seam.
    pub mod evaluator;
    /// Genetic algorithm over brains.
    pub mod evolution;
    /// Point translation on the pixel grid.
    pub mod geometric_utils;
    /// Simulation parameters.
    pub mod params;
    /// Track raster.
    pub mod track;
    /// Simulated cars.
    pub mod vehicle;
}

/// Rendering of simulation frames.
pub mod graphics;
