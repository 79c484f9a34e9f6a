//! Per-tick vehicle integrator.
//!
//! [`integrate`] is a pure function of the previous kinematic state, the
//! control input, the frame time and the race conditions, so it can be tested
//! without a Bevy world or a rendered track.

use super::profile::ProfileScales;
use crate::config::RaceConfig;
use crate::controls::ControlState;
use crate::wrap;

/// Longitudinal and lateral state of one car.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kinematics {
    /// Signed speed along the track (negative is reverse).
    pub velocity: f32,
    /// Track parameter in `[0, 1)`.
    pub progress: f32,
    /// Unwrapped signed distance travelled, in laps.  Goes negative when
    /// reversing off the grid.
    pub distance: f32,
    /// Signed distance from the centreline.
    pub lateral_offset: f32,
    pub lateral_velocity: f32,
}

/// Race-state inputs that gate the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveConditions {
    /// The start lights have gone green.
    pub started: bool,
    /// The lap target has been reached; the car coasts to a stop.
    pub finished: bool,
    /// Current armor over capacity, `[0, 1]`.
    pub armor_fraction: f32,
    /// Current fuel level (absolute).
    pub fuel: f32,
}

impl DriveConditions {
    /// Input only steers the car between the green light and the finish.
    #[inline]
    pub fn controls_live(&self) -> bool {
        self.started && !self.finished
    }
}

/// Armor-derived multiplier on top speed, clamped to `[0.4, 1.2]`.
#[inline]
pub fn damage_factor(armor_fraction: f32, scales: &ProfileScales) -> f32 {
    (0.5 + armor_fraction * scales.durability).clamp(0.4, 1.2)
}

/// Speed ceiling for this tick after boost, damage and the limp cap.
pub fn effective_top_speed(
    boost: bool,
    conditions: &DriveConditions,
    scales: &ProfileScales,
    config: &RaceConfig,
) -> f32 {
    let boost_multiplier = if boost { 1.0 + scales.boost_power } else { 1.0 };
    let base = scales.top_speed * boost_multiplier;
    // Damage only ever slows the car; the upper clamp of the factor is not a bonus.
    let top = base * damage_factor(conditions.armor_fraction, scales).min(1.0);
    if conditions.fuel <= config.low_fuel_threshold {
        top.min(config.limp_speed)
    } else {
        top
    }
}

/// Advance one car by `dt` seconds.
pub fn integrate(
    state: Kinematics,
    controls: &ControlState,
    dt: f32,
    conditions: &DriveConditions,
    scales: &ProfileScales,
    config: &RaceConfig,
) -> Kinematics {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let controls = controls.sanitized();
    let live = conditions.controls_live();
    let mut next = state;

    // ── Longitudinal ──────────────────────────────────────────────────────────
    if conditions.finished {
        next.velocity = (next.velocity - config.finish_deceleration * dt).max(0.0);
    } else if live {
        let accel_input = controls.accelerate.max(0.0);
        let brake_input = controls.brake.max(0.0);
        let accel_signal = accel_input - brake_input;
        let base_accel = if controls.boost {
            config.boost_acceleration
        } else {
            config.base_acceleration
        };
        let max_accel =
            base_accel * scales.acceleration * (0.55 + conditions.armor_fraction * 0.6);
        let friction = config.friction_base / scales.acceleration;
        let top = effective_top_speed(controls.boost, conditions, scales, config);

        next.velocity += accel_signal * max_accel * dt;
        next.velocity -= sign(next.velocity) * friction * dt;
        next.velocity = next.velocity.min(top).max(-config.reverse_speed_limit);
        if accel_input <= 0.0 && next.velocity > 0.0 {
            next.velocity = (next.velocity - config.coast_deceleration * dt).max(0.0);
        }
    } else {
        next.velocity = (next.velocity - config.pre_start_deceleration * dt).max(0.0);
    }

    if conditions.started || conditions.finished {
        let step = next.velocity * dt * config.distance_to_progress;
        next.progress = wrap::advance(next.progress, step);
        next.distance += step;
    } else {
        next.progress = wrap::wrap_unit(next.progress);
    }

    // ── Lateral ───────────────────────────────────────────────────────────────
    if live {
        next.lateral_velocity += -controls.steer * config.steer_gain * scales.handling * dt;
        let damping =
            config.lateral_damping_base + scales.handling * config.lateral_damping_per_handling;
        next.lateral_velocity -= next.lateral_velocity * (damping * dt).min(1.0);
        next.lateral_offset += next.lateral_velocity * dt * config.lateral_response;
    } else {
        next.lateral_velocity = lerp_to_zero(
            next.lateral_velocity,
            config.lateral_velocity_relax * dt,
        );
        next.lateral_offset = lerp_to_zero(next.lateral_offset, config.lateral_offset_relax * dt);
    }

    let limit = scales.lateral_limit(config);
    next.lateral_offset = next.lateral_offset.clamp(-limit, limit);
    next
}

/// Like `signum`, but zero for zero so a parked car stays parked.
#[inline]
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[inline]
fn lerp_to_zero(value: f32, amount: f32) -> f32 {
    value * (1.0 - amount.min(1.0))
}
