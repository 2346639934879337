use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::SimError;

/// Simulation and optimizer parameters.
///
/// Loaded from a human-edited JSON settings file; every field falls back to
/// its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Track raster image. Opaque white pixels are off-track.
    pub track_path: String,
    /// Car sprite image, used for display only.
    pub car_sprite_path: String,
    /// Car footprint as `[width, height]` in pixels.
    pub car_size: [f64; 2],
    /// Starting center of every car at the beginning of a generation.
    pub start_position: [i32; 2],
    /// Distance a car moves each tick.
    pub step_distance: f64,
    /// Heading change in degrees for a single turn decision.
    pub turn_angle: f64,
    /// Simulation ticks per second in the visual front end.
    pub tick_rate: f64,
    /// Number of controllers evaluated per generation.
    pub population_size: usize,
    /// Number of generations the optimizer runs.
    pub generations: u32,
    /// Hidden layer sizes of each brain. Input and output layers are fixed at 3.
    pub hidden_layers: Vec<usize>,
    /// Range of the uniform distribution for initial weights.
    pub weight_scale: f32,
    /// Range of the uniform noise added to weights on mutation.
    pub mutation_scale: f32,
    /// Probability that an offspring is produced by crossover instead of cloning.
    pub crossover_rate: f32,
    /// Number of best genomes copied unchanged into the next generation.
    pub elitism: usize,
    /// Fraction of the ranked population eligible as parents.
    pub survival_threshold: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            track_path: "track.png".to_string(),
            car_sprite_path: "car.png".to_string(),
            car_size: [30.0, 51.0],
            start_position: [195, 290],
            step_distance: 30.0,
            turn_angle: 10.0,
            tick_rate: 10.0,
            population_size: 30,
            generations: 500,
            hidden_layers: vec![4],
            weight_scale: 1.0,
            mutation_scale: 0.5,
            crossover_rate: 0.5,
            elitism: 2,
            survival_threshold: 0.2,
        }
    }
}

impl Params {
    /// Half of the car's diagonal, the distance from its center to each corner.
    pub fn half_diagonal(&self) -> f64 {
        let [width, height] = self.car_size;
        (width * width + height * height).sqrt() / 2.0
    }

    /// Full layer layout of a brain: 3 sensor inputs, hidden layers, 3 decision outputs.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(3);
        sizes.extend(self.hidden_layers.iter().copied());
        sizes.push(3);
        sizes
    }

    /// Checks values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.population_size == 0 {
            return Err(SimError::InvalidParams("population_size must be at least 1"));
        }
        if !(self.step_distance > 0.0) {
            return Err(SimError::InvalidParams("step_distance must be positive"));
        }
        if !(self.car_size[0] > 0.0 && self.car_size[1] > 0.0) {
            return Err(SimError::InvalidParams("car_size must be positive"));
        }
        if !(self.weight_scale > 0.0) {
            return Err(SimError::InvalidParams("weight_scale must be positive"));
        }
        if !(self.tick_rate > 0.0) {
            return Err(SimError::InvalidParams("tick_rate must be positive"));
        }
        if self.hidden_layers.contains(&0) {
            return Err(SimError::InvalidParams("hidden layers cannot be empty"));
        }
        if self.elitism > self.population_size {
            return Err(SimError::InvalidParams(
                "elitism cannot exceed population_size",
            ));
        }
        if !(self.survival_threshold > 0.0 && self.survival_threshold <= 1.0) {
            return Err(SimError::InvalidParams(
                "survival_threshold must be in (0, 1]",
            ));
        }
        Ok(())
    }

    /// Loads parameters from a JSON settings file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_json::from_str(&json).map_err(|source| SimError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Loads the settings file if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        if path.exists() {
            let params = Self::load_from_file(path)?;
            log::info!("Loaded settings from {}", path.display());
            Ok(params)
        } else {
            log::warn!(
                "Settings file {} not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Saves parameters as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SimError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
