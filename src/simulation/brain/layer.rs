//! Dense tanh layer, the building block of a [`Brain`](super::Brain).

use ndarray::linalg::general_mat_vec_mul;
use ndarray::{Array, Array1, Array2, Dimension, ShapeBuilder, Zip};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

/// Fully connected layer computing `tanh(weights · x + biases)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// One row per output neuron, one column per input.
    pub weights: Array2<f32>,
    /// One bias per output neuron.
    pub biases: Array1<f32>,
}

/// Uniform samples in `[-spread, spread)` shaped like `shape`.
fn noise<Sh, D>(shape: Sh, spread: f32) -> Array<f32, D>
where
    Sh: ShapeBuilder<Dim = D>,
    D: Dimension,
{
    Array::random(shape, Uniform::new(-spread, spread))
}

impl DenseLayer {
    /// Layer of `inputs` → `outputs` neurons with parameters drawn from `[-scale, scale)`.
    pub fn random(inputs: usize, outputs: usize, scale: f32) -> Self {
        Self {
            weights: noise((outputs, inputs), scale),
            biases: noise(outputs, scale),
        }
    }

    /// Number of values the layer consumes.
    pub fn inputs(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of values the layer produces.
    pub fn outputs(&self) -> usize {
        self.weights.nrows()
    }

    /// Feeds `x` through the layer.
    pub fn activate(&self, x: &Array1<f32>) -> Array1<f32> {
        let mut y = self.biases.clone();
        general_mat_vec_mul(1.0, &self.weights, x, 1.0, &mut y);
        y.mapv_into(f32::tanh)
    }

    /// Shifts every parameter by uniform noise in `[-spread, spread)`.
    ///
    /// A non-positive spread leaves the layer untouched.
    pub fn perturb(&mut self, spread: f32) {
        if spread <= 0.0 {
            return;
        }
        self.weights += &noise(self.weights.raw_dim(), spread);
        self.biases += &noise(self.biases.raw_dim(), spread);
    }

    /// Mix of two equally shaped layers, `share` of `self` and the rest of `other`.
    pub fn blend(&self, other: &DenseLayer, share: f32) -> Self {
        let mix = |&a: &f32, &b: &f32| a * share + b * (1.0 - share);
        Self {
            weights: Zip::from(&self.weights).and(&other.weights).map_collect(mix),
            biases: Zip::from(&self.biases).and(&other.biases).map_collect(mix),
        }
    }
}
