// src/geometry.rs
//
// Pure planar geometry shared by the counters. No state, no I/O.

use crate::types::Point2D;

/// Angle in degrees at vertex `b`, formed by the rays `b→a` and `b→c`.
/// Always in [0, 180].
///
/// Coincident points yield 0° or 180° depending on the direction
/// vectors. Undefined but finite, never a fault.
pub fn angle(a: Point2D, b: Point2D, c: Point2D) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut degrees = radians.abs().to_degrees();
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }
    degrees
}

/// Euclidean distance between two points.
pub fn distance(a: Point2D, b: Point2D) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}
