//! Track parametrisation: geometry, zones and lap count for one race.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`curve`] | Closed spline, arc-length lookup, local frames |
//! | [`layout`] | Named control-point generators keyed by track id |
//! | [`zone`] | Wrap-aware recharge / repair arcs |

pub mod curve;
pub mod layout;
pub mod zone;

pub use curve::{safe_direction, TrackCurve, TrackFrame};
pub use layout::TrackLayout;
pub use zone::{any_contains, zones_around, Zone};

use crate::config::RaceConfig;
use bevy::math::Vec3;

/// What the catalog knows about a track.  Every field is optional; gaps are
/// filled from [`RaceConfig`] defaults when the [`Track`] is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackDescriptor {
    pub id: Option<String>,
    pub laps: Option<u32>,
    pub recharge_points: Vec<f32>,
    pub repair_points: Vec<f32>,
    pub zone_span: Option<f32>,
}

/// Immutable per-race track.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: Option<String>,
    pub layout: TrackLayout,
    pub curve: TrackCurve,
    pub total_laps: u32,
    pub recharge_zones: Vec<Zone>,
    pub repair_zones: Vec<Zone>,
    lookahead: f32,
}

impl Track {
    /// Resolve the layout and zones for `descriptor`, falling back to defaults
    /// for anything missing.
    pub fn build(descriptor: &TrackDescriptor, config: &RaceConfig) -> Self {
        let layout = TrackLayout::resolve(descriptor.id.as_deref());
        let curve = TrackCurve::new(
            layout.control_points(config.track_segments),
            config.arc_length_divisions,
        );
        let span = descriptor.zone_span.unwrap_or(config.zone_span);
        let recharge_points = if descriptor.recharge_points.is_empty() {
            &config.default_recharge_points
        } else {
            &descriptor.recharge_points
        };
        let repair_points = if descriptor.repair_points.is_empty() {
            &config.default_repair_points
        } else {
            &descriptor.repair_points
        };

        Self {
            id: descriptor.id.clone(),
            layout,
            curve,
            total_laps: descriptor.laps.unwrap_or(config.default_laps).max(1),
            recharge_zones: zones_around(recharge_points, span),
            repair_zones: zones_around(repair_points, span),
            lookahead: config.forward_lookahead,
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.curve.length()
    }

    #[inline]
    pub fn position(&self, t: f32) -> Vec3 {
        self.curve.position(t)
    }

    #[inline]
    pub fn tangent(&self, t: f32) -> Vec3 {
        self.curve.tangent(t)
    }

    /// Frame used to place cars, with forward from the configured lookahead.
    #[inline]
    pub fn frame(&self, t: f32) -> TrackFrame {
        self.curve.frame(t, self.lookahead)
    }

    pub fn in_recharge_zone(&self, t: f32) -> bool {
        any_contains(&self.recharge_zones, t)
    }

    pub fn in_repair_zone(&self, t: f32) -> bool {
        any_contains(&self.repair_zones, t)
    }
}
