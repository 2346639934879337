//! Drawing of the track, cars, sensor rays and status line with macroquad.
//!
//! Nothing here touches the track raster: the track is uploaded once as a
//! texture and overlays go to the frame buffer only.

use macroquad::prelude::*;

use crate::simulation::evaluator::FrameView;
use crate::simulation::params::Params;
use crate::simulation::track::Track;
use crate::simulation::vehicle::Vehicle;

/// Width of the display surface in pixels.
pub const DISPLAY_WIDTH: i32 = 1280;
/// Height of the display surface in pixels.
pub const DISPLAY_HEIGHT: i32 = 720;

const SENSOR_COLOR: Color = Color::new(0.0, 1.0, 0.0, 1.0);
const SENSOR_DOT_RADIUS: f32 = 5.0;
const STATUS_FONT_SIZE: f32 = 25.0;

/// Status line shown at the top of every frame.
pub fn status_line(generation: u32, running: usize) -> String {
    format!("Generation: {}, Running Cars: {}", generation, running)
}

/// Textures needed to draw a frame.
pub struct Scene {
    track: Texture2D,
    car: Texture2D,
    car_size: Vec2,
}

impl Scene {
    /// Uploads the track raster and takes the car sprite.
    ///
    /// Needs a live graphics context.
    pub fn new(track: &Track, car: Texture2D, params: &Params) -> Self {
        let [width, height] = params.car_size;
        Self {
            track: Texture2D::from_image(track.image()),
            car,
            car_size: vec2(width as f32, height as f32),
        }
    }

    /// Draws one tick: track, then the cars that took part in it with their
    /// sensor rays, then the status line.
    pub fn draw(&self, frame: &FrameView<'_>) {
        clear_background(WHITE);
        draw_texture(&self.track, 0.0, 0.0, WHITE);

        for vehicle in frame.active_vehicles() {
            self.draw_car(vehicle);
            draw_sensors(vehicle);
        }

        draw_text(
            &status_line(frame.generation, frame.alive),
            4.0,
            STATUS_FONT_SIZE,
            STATUS_FONT_SIZE,
            BLACK,
        );
    }

    fn draw_car(&self, vehicle: &Vehicle) {
        let center = vec2(vehicle.center.x() as f32, vehicle.center.y() as f32);
        let top_left = center - self.car_size / 2.0;
        // macroquad rotates clockwise on screen, headings grow counter-clockwise
        draw_texture_ex(
            &self.car,
            top_left.x,
            top_left.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(self.car_size),
                rotation: -(vehicle.heading as f32).to_radians(),
                ..Default::default()
            },
        );
    }
}

fn draw_sensors(vehicle: &Vehicle) {
    let (cx, cy) = (vehicle.center.x() as f32, vehicle.center.y() as f32);
    for ray in &vehicle.sensors {
        let (ex, ey) = (ray.edge.x() as f32, ray.edge.y() as f32);
        draw_line(cx, cy, ex, ey, 1.0, SENSOR_COLOR);
        draw_circle(ex, ey, SENSOR_DOT_RADIUS, SENSOR_COLOR);
    }
}

/// Converts frame time into simulation ticks at a fixed rate.
#[derive(Debug, Clone, Copy)]
pub struct TickPacer {
    interval: f32,
    accumulated: f32,
}

impl TickPacer {
    /// Pacer releasing `tick_rate` ticks per second.
    pub fn new(tick_rate: f64) -> Self {
        Self {
            interval: (1.0 / tick_rate) as f32,
            // the first frame ticks right away
            accumulated: (1.0 / tick_rate) as f32,
        }
    }

    /// Adds elapsed frame time and returns `true` if a tick is due.
    ///
    /// At most one tick is released per call.
    pub fn ready(&mut self, frame_time: f32) -> bool {
        self.accumulated += frame_time;
        if self.accumulated >= self.interval {
            self.accumulated = (self.accumulated - self.interval).min(self.interval);
            true
        } else {
            false
        }
    }
}
