//! Recharge / repair zones on the closed track parameter.

use crate::wrap::{arc_contains, wrap_unit};

/// Widest half-span a zone may have; just short of half a lap.
pub const MAX_HALF_SPAN: f32 = 0.499;

/// An arc `[start, end]` of the track parameter.  `start > end` means the arc
/// crosses the start line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub start: f32,
    pub end: f32,
}

impl Zone {
    /// Zone of total width `span` centred on `center`.
    ///
    /// The half-width is clamped to `[0.001, MAX_HALF_SPAN]` so a zone is never
    /// empty and a full-lap span never collapses to `start == end`.
    pub fn around(center: f32, span: f32) -> Self {
        let half = (span / 2.0).clamp(0.001, MAX_HALF_SPAN);
        let center = wrap_unit(center);
        Self {
            start: wrap_unit(center - half),
            end: wrap_unit(center + half),
        }
    }

    /// Centre of the arc, wrap-aware.
    pub fn center(&self) -> f32 {
        let width = wrap_unit(self.end - self.start);
        wrap_unit(self.start + width / 2.0)
    }

    #[inline]
    pub fn contains(&self, t: f32) -> bool {
        arc_contains(t, self.start, self.end)
    }
}

/// Build one zone per centre point.
pub fn zones_around(points: &[f32], span: f32) -> Vec<Zone> {
    points.iter().map(|&p| Zone::around(p, span)).collect()
}

/// True when `t` lies in any of `zones`.
pub fn any_contains(zones: &[Zone], t: f32) -> bool {
    zones.iter().any(|zone| zone.contains(t))
}
