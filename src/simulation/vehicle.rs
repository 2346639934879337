//! Vehicle pose, collision and ray-cast sensing.
//!
//! A vehicle is alive until one of its corners lands on a boundary pixel.
//! Crashing is terminal: a crashed vehicle ignores every further tick.

use super::controller::{Decision, SENSOR_COUNT};
use super::geometric_utils::{Pixel, translate_point, wrap_degrees};
use super::params::Params;
use super::track::Track;

/// Sensor ray offsets, as `offset - heading`: right, forward, left.
const SENSOR_ANGLES: [f64; SENSOR_COUNT] = [360.0, 90.0, 180.0];

/// Corner directions, as `offset - heading`, placing the corners on the footprint's diagonals.
const CORNER_ANGLES: [f64; 4] = [60.0, 120.0, 240.0, 300.0];

/// One distance probe from the vehicle center to the nearest boundary pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorRay {
    /// Absolute ray direction in degrees.
    pub angle: f64,
    /// First boundary pixel hit by the ray.
    pub edge: Pixel,
    /// Number of samples taken before the ray stopped.
    pub distance: u32,
}

/// A simulated car.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Center of the car in track pixels.
    pub center: Pixel,
    /// Heading in degrees, kept in `[0, 360)`.
    pub heading: f64,
    /// Corners of the car footprint, recomputed on every move.
    pub corners: [Pixel; 4],
    /// Right, forward and left sensor rays.
    pub sensors: [SensorRay; SENSOR_COUNT],
    /// Set once a corner touches the boundary; never cleared.
    pub crashed: bool,
    /// Total distance moved while alive.
    pub distance_traveled: f64,
    step_distance: f64,
    turn_angle: f64,
    half_diagonal: f64,
}

impl Vehicle {
    /// Creates a vehicle at the starting pose with fresh sensor data.
    ///
    /// Sensors are cast immediately so the first decision already has valid input.
    pub fn new(params: &Params, track: &Track) -> Self {
        let [x, y] = params.start_position;
        let center = Pixel::new(x, y);
        let mut vehicle = Self {
            center,
            heading: 0.0,
            corners: [center; 4],
            sensors: [SensorRay {
                angle: 0.0,
                edge: center,
                distance: 0,
            }; SENSOR_COUNT],
            crashed: false,
            distance_traveled: 0.0,
            step_distance: params.step_distance,
            turn_angle: params.turn_angle,
            half_diagonal: params.half_diagonal(),
        };
        vehicle.update_corners();
        vehicle.update_sensor_data(track);
        vehicle
    }

    /// Returns `true` while the vehicle has not crashed.
    pub fn is_alive(&self) -> bool {
        !self.crashed
    }

    /// Distances of the right, forward and left rays, as fed to a controller.
    pub fn sensor_distances(&self) -> [f64; SENSOR_COUNT] {
        self.sensors.map(|ray| f64::from(ray.distance))
    }

    /// Steers according to `decision`.
    pub fn apply_decision(&mut self, decision: Decision) {
        match decision {
            Decision::TurnLeft => self.heading = wrap_degrees(self.heading + self.turn_angle),
            Decision::TurnRight => self.heading = wrap_degrees(self.heading - self.turn_angle),
            Decision::GoStraight => {}
        }
    }

    /// Moves the car one step forward and recomputes its corners.
    pub fn update_position(&mut self) {
        self.center = translate_point(self.center, 90.0 - self.heading, self.step_distance);
        self.distance_traveled += self.step_distance;
        self.update_corners();
    }

    fn update_corners(&mut self) {
        let (center, heading, reach) = (self.center, self.heading, self.half_diagonal);
        self.corners = CORNER_ANGLES.map(|offset| translate_point(center, offset - heading, reach));
    }

    /// Returns `true` if any corner sits on a boundary pixel.
    pub fn crash_check(&self, track: &Track) -> bool {
        self.corners.iter().any(|&corner| track.is_boundary(corner))
    }

    /// Casts the three sensor rays against the track.
    ///
    /// Each ray samples the track one pixel further out per step, starting at
    /// the center, and stops at the first boundary pixel. A center that is
    /// already on the boundary reads 0.
    pub fn update_sensor_data(&mut self, track: &Track) {
        let (center, heading) = (self.center, self.heading);
        self.sensors = SENSOR_ANGLES.map(|offset| cast_ray(track, center, offset - heading));
    }

    /// Runs one simulation tick for this vehicle.
    ///
    /// Does nothing once the vehicle has crashed.
    pub fn tick(&mut self, decision: Decision, track: &Track) {
        if self.crashed {
            return;
        }
        self.apply_decision(decision);
        self.update_position();
        self.crashed = self.crash_check(track);
        self.update_sensor_data(track);
    }
}

fn cast_ray(track: &Track, center: Pixel, angle: f64) -> SensorRay {
    let mut distance = 0u32;
    let mut edge = center;
    while !track.is_boundary(edge) {
        edge = translate_point(center, angle, f64::from(distance));
        distance += 1;
    }
    SensorRay {
        angle,
        edge,
        distance,
    }
}
