//! Closed centripetal Catmull-Rom spline with arc-length parametrisation.
//!
//! Lap timing and zone placement assume that equal steps of the track
//! parameter cover equal distance, so [`TrackCurve::position`] and
//! [`TrackCurve::tangent`] take an arc-length parameter `u` and map it to the
//! raw spline parameter through a cumulative length table.

use crate::wrap::wrap_unit;
use bevy::prelude::*;

/// Minimum squared length for a direction vector to be trusted.
const DEGENERATE_LENGTH_SQ: f32 = 1e-6;

/// Step used for the central difference in [`TrackCurve::tangent`].
const TANGENT_STEP: f32 = 1e-4;

/// Local orthonormal frame at one point of the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackFrame {
    /// Centreline point.
    pub point: Vec3,
    /// Unit direction of travel.
    pub forward: Vec3,
    /// Unit vector across the track; positive lateral offsets point this way.
    pub right: Vec3,
    /// Unit track normal.
    pub up: Vec3,
}

impl TrackFrame {
    /// World position of something `lateral` units off the centreline at `height`.
    #[inline]
    pub fn offset(&self, lateral: f32, height: f32) -> Vec3 {
        self.point + self.right * lateral + self.up * height
    }
}

/// A closed spline through a ring of control points.
#[derive(Debug, Clone)]
pub struct TrackCurve {
    points: Vec<Vec3>,
    /// Cumulative arc length at `i / divisions` of the raw parameter.
    lengths: Vec<f32>,
}

impl TrackCurve {
    /// Build the spline and its arc-length table.
    ///
    /// An empty point list degrades to a single point at the origin.
    pub fn new(mut points: Vec<Vec3>, divisions: usize) -> Self {
        if points.is_empty() {
            points.push(Vec3::ZERO);
        }
        let divisions = divisions.max(1);
        let mut curve = Self {
            points,
            lengths: Vec::with_capacity(divisions + 1),
        };

        let mut total = 0.0;
        let mut last = curve.raw_point(0.0);
        curve.lengths.push(0.0);
        for i in 1..=divisions {
            let current = curve.raw_point(i as f32 / divisions as f32);
            total += current.distance(last);
            curve.lengths.push(total);
            last = current;
        }
        curve
    }

    /// Total centreline length in track units.
    #[inline]
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Control points the spline passes through.
    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Centreline point at arc-length parameter `u` (wrapped into `[0, 1)`).
    pub fn position(&self, u: f32) -> Vec3 {
        self.raw_point(self.arc_to_raw(wrap_unit(u)))
    }

    /// Unit forward direction at arc-length parameter `u`.
    ///
    /// Falls back to `+Z` where the curve is degenerate.
    pub fn tangent(&self, u: f32) -> Vec3 {
        let ahead = self.position(u + TANGENT_STEP);
        let behind = self.position(u - TANGENT_STEP);
        safe_direction(ahead - behind, Vec3::Z)
    }

    /// Orthonormal frame at `u`, with forward taken towards `u + lookahead`.
    pub fn frame(&self, u: f32, lookahead: f32) -> TrackFrame {
        let point = self.position(u);
        let next = self.position(u + lookahead);
        let forward = safe_direction(next - point, self.tangent(u));
        let right = safe_direction(Vec3::Y.cross(forward), Vec3::X);
        let up = safe_direction(forward.cross(right), Vec3::Y);
        TrackFrame {
            point,
            forward,
            right,
            up,
        }
    }

    /// Map an arc-length fraction to the raw spline parameter.
    fn arc_to_raw(&self, u: f32) -> f32 {
        let total = self.length();
        let divisions = self.lengths.len() - 1;
        if total <= f32::EPSILON || divisions == 0 {
            return u;
        }
        let target = u * total;
        // Index of the last sample whose cumulative length does not exceed the target.
        let i = match self
            .lengths
            .binary_search_by(|len| len.total_cmp(&target))
        {
            Ok(exact) => return exact as f32 / divisions as f32,
            Err(insert) => insert.saturating_sub(1).min(divisions - 1),
        };
        let before = self.lengths[i];
        let segment = self.lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        (i as f32 + fraction) / divisions as f32
    }

    /// Evaluate the closed centripetal Catmull-Rom spline at raw parameter `t`.
    fn raw_point(&self, t: f32) -> Vec3 {
        let count = self.points.len();
        if count == 1 {
            return self.points[0];
        }
        let scaled = wrap_unit(t) * count as f32;
        let index = (scaled.floor() as usize).min(count - 1);
        let weight = scaled - index as f32;

        let p0 = self.points[(index + count - 1) % count];
        let p1 = self.points[index];
        let p2 = self.points[(index + 1) % count];
        let p3 = self.points[(index + 2) % count];

        // Centripetal knot spacing: |Δp|^0.5.
        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let m1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let m2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

        // Cubic Hermite between p1 and p2.
        let c0 = p1;
        let c1 = m1;
        let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2;
        let c3 = 2.0 * p1 - 2.0 * p2 + m1 + m2;
        let w = weight;
        c0 + c1 * w + c2 * (w * w) + c3 * (w * w * w)
    }
}

/// Normalise `v`, substituting `fallback` for zero-length or non-finite input.
#[inline]
pub fn safe_direction(v: Vec3, fallback: Vec3) -> Vec3 {
    if v.length_squared() < DEGENERATE_LENGTH_SQ || !v.is_finite() {
        return fallback;
    }
    v.try_normalize().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn circle(radius: f32, segments: usize) -> TrackCurve {
        let points = (0..segments)
            .map(|i| {
                let a = i as f32 / segments as f32 * TAU;
                Vec3::new(a.cos() * radius, 0.0, a.sin() * radius)
            })
            .collect();
        TrackCurve::new(points, 1024)
    }

    #[test]
    fn circle_length_matches_circumference() {
        let curve = circle(20.0, 64);
        let expected = TAU * 20.0;
        assert!((curve.length() - expected).abs() / expected < 0.01);
    }

    #[test]
    fn curve_is_closed_and_periodic() {
        let curve = circle(20.0, 64);
        assert!(curve.position(0.0).distance(curve.position(1.0)) < 1e-3);
        assert!(curve.position(0.25).distance(curve.position(1.25)) < 1e-3);
        assert!(curve.position(0.999_9).distance(curve.position(0.0)) < 0.1);
    }

    #[test]
    fn arc_length_sampling_is_uniform() {
        // A stretched ellipse has non-uniform raw parametrisation.
        let points = (0..48)
            .map(|i| {
                let a = i as f32 / 48.0 * TAU;
                Vec3::new(a.cos() * 40.0, 0.0, a.sin() * 10.0)
            })
            .collect();
        let curve = TrackCurve::new(points, 1024);
        let steps = 100;
        let expected = curve.length() / steps as f32;
        for i in 0..steps {
            let a = curve.position(i as f32 / steps as f32);
            let b = curve.position((i + 1) as f32 / steps as f32);
            let chord = a.distance(b);
            assert!(
                (chord - expected).abs() < expected * 0.05,
                "step {i}: chord {chord} vs {expected}"
            );
        }
    }

    #[test]
    fn tangent_is_unit_and_follows_travel_direction() {
        let curve = circle(20.0, 64);
        for i in 0..16 {
            let u = i as f32 / 16.0;
            let tangent = curve.tangent(u);
            assert!((tangent.length() - 1.0).abs() < 1e-3);
            let step = curve.position(u + 0.001) - curve.position(u);
            assert!(tangent.dot(step) > 0.0);
        }
    }

    #[test]
    fn frame_is_orthonormal() {
        let curve = circle(20.0, 64);
        let frame = curve.frame(0.3, 0.01);
        assert!(frame.forward.dot(frame.right).abs() < 1e-3);
        assert!(frame.forward.dot(frame.up).abs() < 1e-3);
        assert!((frame.right.length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_curve_uses_safe_axes() {
        let curve = TrackCurve::new(vec![Vec3::ONE; 8], 64);
        assert_eq!(curve.length(), 0.0);
        assert_eq!(curve.tangent(0.5), Vec3::Z);
        let frame = curve.frame(0.5, 0.01);
        assert_eq!(frame.forward, Vec3::Z);
        assert_eq!(frame.right, Vec3::X);
    }

    #[test]
    fn safe_direction_rejects_zero_vectors() {
        assert_eq!(safe_direction(Vec3::ZERO, Vec3::Y), Vec3::Y);
        assert_eq!(safe_direction(Vec3::new(0.0, 0.0, 5.0), Vec3::Y), Vec3::Z);
    }
}
