//! Circular arithmetic on the track parameter.
//!
//! Every place that compares or advances progress goes through these helpers:
//! lap detection, zone containment, collision windowing and AI advancement.

/// Wrap any finite value into `[0, 1)`.
///
/// Non-finite input maps to `0.0` so a single bad frame cannot poison the race.
#[inline]
pub fn wrap_unit(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid of a tiny negative number can round up to exactly 1.0.
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Advance `progress` by `delta` and wrap the result.
#[inline]
pub fn advance(progress: f32, delta: f32) -> f32 {
    wrap_unit(progress + delta)
}

/// Distance travelling forward from `from` to `to`, in `[0, 1)`.
#[inline]
pub fn forward_distance(from: f32, to: f32) -> f32 {
    wrap_unit(to - from)
}

/// Shortest signed distance from `from` to `to`, in `[-0.5, 0.5)`.
///
/// Positive when `to` is ahead of `from`.
#[inline]
pub fn signed_distance(from: f32, to: f32) -> f32 {
    let forward = forward_distance(from, to);
    if forward >= 0.5 {
        forward - 1.0
    } else {
        forward
    }
}

/// True when progress moved across the start line in the forward direction
/// during one step: from above `high` to below `low`.
#[inline]
pub fn crossed_start_line(previous: f32, current: f32, high: f32, low: f32) -> bool {
    previous > high && current < low
}

/// Inclusive containment of `t` in the arc `[start, end]`, wrap-aware.
#[inline]
pub fn arc_contains(t: f32, start: f32, end: f32) -> bool {
    if start <= end {
        t >= start && t <= end
    } else {
        t >= start || t <= end
    }
}
