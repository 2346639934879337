//! Neural network brains that steer the cars.
//!
//! A brain is a stack of fully connected tanh layers mapping the three
//! sensor distances to three decision scores. It supports the mutation and
//! crossover operations the optimizer needs.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::controller::{Controller, Decision, SENSOR_COUNT};

pub mod layer;

pub use layer::DenseLayer;

/// Feed-forward neural network used as a car controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<DenseLayer>,
}

impl Brain {
    /// Creates a new brain with random weights.
    ///
    /// # Arguments
    ///
    /// * `layer_sizes` - Neuron count per layer, input first
    /// * `scale` - Weights and biases are drawn from `[-scale, scale)`
    pub fn new(layer_sizes: &[usize], scale: f32) -> Self {
        let layers = layer_sizes
            .windows(2)
            .map(|pair| DenseLayer::random(pair[0], pair[1], scale))
            .collect();

        Self { layers }
    }

    /// Builds a brain from explicit layers.
    pub fn from_layers(layers: Vec<DenseLayer>) -> Self {
        Self { layers }
    }

    /// Runs a forward pass through the brain.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        self.layers
            .iter()
            .fold(inputs.clone(), |signal, layer| layer.activate(&signal))
    }

    /// Creates a new brain by averaging two parent brains.
    pub fn crossover(parent1: &Brain, parent2: &Brain) -> Self {
        Self::crossover_weighted(parent1, parent2, 0.5)
    }

    /// Creates a new brain by weighted averaging two parent brains.
    /// weight1 is the weight for parent1, weight2 = 1.0 - weight1 for parent2.
    ///
    /// Parents with different layouts yield a clone of parent1.
    pub fn crossover_weighted(parent1: &Brain, parent2: &Brain, weight1: f32) -> Self {
        if !parent1.same_layout(parent2) {
            return parent1.clone();
        }
        let layers = parent1
            .layers
            .iter()
            .zip(&parent2.layers)
            .map(|(layer1, layer2)| layer1.blend(layer2, weight1))
            .collect();
        Self { layers }
    }

    /// Mutates all parameters in the brain.
    pub fn mutate(&mut self, mutation_scale: f32) {
        for layer in &mut self.layers {
            layer.perturb(mutation_scale);
        }
    }

    /// Returns `true` if both brains have identical layer shapes.
    pub fn same_layout(&self, other: &Brain) -> bool {
        self.layers.len() == other.layers.len()
            && self
                .layers
                .iter()
                .zip(&other.layers)
                .all(|(a, b)| a.inputs() == b.inputs() && a.outputs() == b.outputs())
    }
}

impl Controller for Brain {
    fn decide(&self, sensors: &[f64; SENSOR_COUNT]) -> Decision {
        let inputs: Array1<f32> = sensors.iter().map(|&d| d as f32).collect();
        let outputs = self.think(&inputs);
        Decision::from_outputs(outputs.as_slice().unwrap_or(&[]))
    }
}
