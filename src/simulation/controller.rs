//! Controller capability and the mapping from network outputs to steering.

use serde::{Deserialize, Serialize};

/// Number of sensor readings a controller receives.
pub const SENSOR_COUNT: usize = 3;

/// Discrete steering choice applied to a vehicle each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Increase heading by the turn angle.
    TurnLeft,
    /// Decrease heading by the turn angle.
    TurnRight,
    /// Keep the current heading.
    GoStraight,
}

impl Decision {
    /// Maps an output index to a decision: 0 turns left, 1 turns right, anything else goes straight.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Decision::TurnLeft,
            1 => Decision::TurnRight,
            _ => Decision::GoStraight,
        }
    }

    /// Picks the decision for a raw output vector via [`argmax`].
    ///
    /// An empty output vector goes straight.
    pub fn from_outputs(outputs: &[f32]) -> Self {
        argmax(outputs).map_or(Decision::GoStraight, Decision::from_index)
    }
}

/// Index of the largest value, taking the lowest index among ties.
///
/// NaN entries never win. Returns `None` if there is no comparable value.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Anything that can steer a vehicle from its sensor distances.
///
/// Implemented by [`super::brain::Brain`] and by plain closures.
pub trait Controller {
    /// Chooses a steering decision from the right, forward and left ray distances.
    fn decide(&self, sensors: &[f64; SENSOR_COUNT]) -> Decision;
}

impl<F> Controller for F
where
    F: Fn(&[f64; SENSOR_COUNT]) -> Decision,
{
    fn decide(&self, sensors: &[f64; SENSOR_COUNT]) -> Decision {
        self(sensors)
    }
}
