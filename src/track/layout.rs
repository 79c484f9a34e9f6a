//! Named track layout generators.
//!
//! Each layout emits a ring of control points that [`super::curve::TrackCurve`]
//! interpolates.  Layouts are keyed by track id; unknown ids fall back to a
//! plain circle so a bad catalog entry still produces a drivable track.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Shape family and parameters for one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackLayout {
    Ellipse { radius_x: f32, radius_z: f32, wobble: f32 },
    FigureEight { radius: f32 },
    Spiral { radius: f32, turns: f32 },
    Cliff { radius: f32 },
}

impl Default for TrackLayout {
    fn default() -> Self {
        TrackLayout::Ellipse {
            radius_x: 22.0,
            radius_z: 22.0,
            wobble: 0.0,
        }
    }
}

impl TrackLayout {
    /// Layout registered for `track_id`, if any.
    pub fn for_track_id(track_id: &str) -> Option<Self> {
        let layout = match track_id {
            "aurora-pulse" => TrackLayout::Ellipse {
                radius_x: 24.0,
                radius_z: 18.0,
                wobble: 3.0,
            },
            "aurora-tidal" => TrackLayout::FigureEight { radius: 22.0 },
            "aurora-tidal-surge" => TrackLayout::Spiral {
                radius: 16.0,
                turns: 1.5,
            },
            "aurora-tidal-deep" => TrackLayout::Spiral {
                radius: 18.0,
                turns: 1.2,
            },
            "zephyr-cloudspire" => TrackLayout::Cliff { radius: 23.0 },
            "zephyr-cloudspire-tempest" => TrackLayout::Cliff { radius: 20.0 },
            _ => return None,
        };
        Some(layout)
    }

    /// Layout for an optional track id, falling back to the default circle.
    pub fn resolve(track_id: Option<&str>) -> Self {
        match track_id {
            Some(id) => Self::for_track_id(id).unwrap_or_else(|| {
                warn!("No layout registered for track '{id}'; using default circuit");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Generate `segments` control points evenly spaced in the layout parameter.
    pub fn control_points(&self, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(4);
        (0..segments)
            .map(|i| self.sample(i as f32 / segments as f32))
            .collect()
    }

    fn sample(&self, t: f32) -> Vec3 {
        match *self {
            TrackLayout::Ellipse {
                radius_x,
                radius_z,
                wobble,
            } => {
                let angle = t * TAU;
                let w = (angle * 4.0).sin() * wobble;
                Vec3::new(
                    angle.cos() * (radius_x + w),
                    (angle * 2.0).sin() * 0.4 * wobble,
                    angle.sin() * (radius_z - w),
                )
            }
            TrackLayout::FigureEight { radius } => {
                let a = t * TAU;
                Vec3::new(
                    a.sin() * radius,
                    (a * 2.0).cos() * 1.2,
                    a.sin() * a.cos() * radius * 0.9,
                )
            }
            TrackLayout::Spiral { radius, turns } => {
                let angle = t * TAU * turns;
                let current = radius * (0.6 + 0.4 * (t * PI).sin());
                Vec3::new(
                    angle.cos() * current,
                    (t * PI * 3.0).sin() * 1.5,
                    angle.sin() * current,
                )
            }
            TrackLayout::Cliff { radius } => {
                let angle = t * TAU;
                let switchback = (t * PI * 4.0).sin() * 6.0;
                Vec3::new(
                    angle.cos() * (radius + switchback),
                    (t * TAU).cos() * 3.0,
                    angle.sin() * (radius * 0.6 + (angle * 3.0).sin() * 5.0),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_resolve_to_their_layout() {
        assert_eq!(
            TrackLayout::resolve(Some("aurora-tidal")),
            TrackLayout::FigureEight { radius: 22.0 }
        );
        assert!(matches!(
            TrackLayout::resolve(Some("zephyr-cloudspire")),
            TrackLayout::Cliff { .. }
        ));
    }

    #[test]
    fn unknown_or_missing_id_falls_back_to_default() {
        assert_eq!(TrackLayout::resolve(Some("no-such-track")), TrackLayout::default());
        assert_eq!(TrackLayout::resolve(None), TrackLayout::default());
    }

    #[test]
    fn control_point_count_matches_segments() {
        let points = TrackLayout::default().control_points(96);
        assert_eq!(points.len(), 96);
        // Default circle has radius 22 everywhere.
        for p in points {
            assert!((Vec2::new(p.x, p.z).length() - 22.0).abs() < 1e-3);
        }
    }

    #[test]
    fn every_layout_produces_distinct_neighbouring_points() {
        let ids = [
            "aurora-pulse",
            "aurora-tidal",
            "aurora-tidal-surge",
            "aurora-tidal-deep",
            "zephyr-cloudspire",
            "zephyr-cloudspire-tempest",
        ];
        for id in ids {
            let points = TrackLayout::resolve(Some(id)).control_points(96);
            for pair in points.windows(2) {
                assert!(pair[0].distance(pair[1]) > 1e-3, "{id} has a repeated point");
            }
        }
    }
}
