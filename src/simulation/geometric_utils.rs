//! Geometric utility functions for moving points across the track raster.

use geo::Point;

/// Integer pixel coordinate on the track raster (screen coordinates, y down).
pub type Pixel = Point<i32>;

/// Translates a point by `distance` along `angle_degrees`.
///
/// The angle is measured from the positive x axis with the y axis pointing
/// down the image, so 90 degrees moves towards larger `y`. Both coordinates
/// are truncated toward zero after the move. Every position, corner and
/// sensor ray in the simulation goes through this function so that sensing
/// and rendering sample the same pixels.
///
/// # Arguments
///
/// * `point` - Starting pixel
/// * `angle_degrees` - Direction of travel in degrees
/// * `distance` - Length of the move in pixels
///
/// # Returns
///
/// The translated pixel.
pub fn translate_point(point: Pixel, angle_degrees: f64, distance: f64) -> Pixel {
    let radians = angle_degrees.to_radians();
    Point::new(
        (f64::from(point.x()) + distance * radians.cos()) as i32,
        (f64::from(point.y()) + distance * radians.sin()) as i32,
    )
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}
