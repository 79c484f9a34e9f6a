//! Runtime race configuration loaded from `assets/race.toml`.
//!
//! [`RaceConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_race_config`] reads
//! `assets/race.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! The simulation itself never reads the resource directly: [`crate::session::RaceSession`]
//! takes a copy at construction so a race in progress is not affected by a
//! reload.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `RaceConfig::default()`.

use crate::constants::*;
use crate::error::{RaceError, RaceResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Path of the optional override file, relative to the working directory.
pub const RACE_CONFIG_PATH: &str = "assets/race.toml";

/// Runtime-tunable race configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    // ── Track ─────────────────────────────────────────────────────────────────
    pub track_segments: usize,
    pub arc_length_divisions: usize,
    pub forward_lookahead: f32,

    // ── Zones ─────────────────────────────────────────────────────────────────
    pub zone_span: f32,
    pub default_recharge_points: Vec<f32>,
    pub default_repair_points: Vec<f32>,
    pub recharge_fraction: f32,
    pub repair_fraction: f32,

    // ── Race ──────────────────────────────────────────────────────────────────
    pub default_laps: u32,
    pub distance_to_progress: f32,
    pub lap_wrap_high: f32,
    pub lap_wrap_low: f32,
    pub finish_deceleration: f32,
    pub finish_speed_threshold: f32,

    // ── Start sequence ────────────────────────────────────────────────────────
    pub start_red1_delay: f32,
    pub start_red2_delay: f32,
    pub start_red3_delay: f32,
    pub start_green_delay: f32,
    pub start_lights_off_delay: f32,

    // ── Vehicle: Longitudinal ─────────────────────────────────────────────────
    pub top_speed_floor: f32,
    pub base_acceleration: f32,
    pub boost_acceleration: f32,
    pub friction_base: f32,
    pub coast_deceleration: f32,
    pub pre_start_deceleration: f32,
    pub reverse_speed_limit: f32,
    pub low_fuel_threshold: f32,
    pub limp_speed: f32,

    // ── Vehicle: Lateral ──────────────────────────────────────────────────────
    pub steer_gain: f32,
    pub lateral_damping_base: f32,
    pub lateral_damping_per_handling: f32,
    pub lateral_response: f32,
    pub lateral_limit_base: f32,
    pub lateral_limit_per_handling: f32,
    pub lateral_velocity_relax: f32,
    pub lateral_offset_relax: f32,
    pub player_ride_height: f32,

    // ── Fuel ──────────────────────────────────────────────────────────────────
    pub moving_speed_threshold: f32,
    pub fuel_base_drain: f32,
    pub fuel_speed_drain: f32,
    pub fuel_boost_surcharge: f32,

    // ── Guard rail ────────────────────────────────────────────────────────────
    pub guard_rail_margin: f32,
    pub rail_damage_base: f32,
    pub rail_damage_per_speed: f32,
    pub rail_speed_penalty: f32,
    pub rail_rebound_min: f32,
    pub rail_rebound_bonus: f32,
    pub collision_cooldown: f32,

    // ── Racer collisions ──────────────────────────────────────────────────────
    pub contact_min_speed: f32,
    pub contact_window: f32,
    pub contact_radius: f32,
    pub impact_speed_cap: f32,
    pub impact_ai_boost_time: f32,
    pub impact_ai_speed_bump: f32,
    pub impact_speed_loss: f32,
    pub impact_speed_floor: f32,
    pub impact_lateral_kick: f32,
    pub impact_armor_damage: f32,

    // ── AI racers ─────────────────────────────────────────────────────────────
    pub ai_racer_count: usize,
    pub ai_grid_start: f32,
    pub ai_grid_spacing: f32,
    pub ai_base_speed_min: f32,
    pub ai_base_speed_jitter: f32,
    pub ai_lane_offset_min: f32,
    pub ai_lane_offset_jitter: f32,
    pub ai_launch_delay_min: f32,
    pub ai_launch_delay_jitter: f32,
    pub ai_boost_cap: f32,
    pub ai_boost_rise: f32,
    pub ai_boost_fall: f32,
    pub ai_progress_scale: f32,
    pub ai_ride_height: f32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            // Track
            track_segments: TRACK_SEGMENTS,
            arc_length_divisions: ARC_LENGTH_DIVISIONS,
            forward_lookahead: FORWARD_LOOKAHEAD,
            // Zones
            zone_span: DEFAULT_ZONE_SPAN,
            default_recharge_points: DEFAULT_RECHARGE_POINTS.to_vec(),
            default_repair_points: DEFAULT_REPAIR_POINTS.to_vec(),
            recharge_fraction: RECHARGE_FRACTION,
            repair_fraction: REPAIR_FRACTION,
            // Race
            default_laps: DEFAULT_LAPS,
            distance_to_progress: DISTANCE_TO_PROGRESS,
            lap_wrap_high: LAP_WRAP_HIGH,
            lap_wrap_low: LAP_WRAP_LOW,
            finish_deceleration: FINISH_DECELERATION,
            finish_speed_threshold: FINISH_SPEED_THRESHOLD,
            // Start sequence
            start_red1_delay: START_RED1_DELAY,
            start_red2_delay: START_RED2_DELAY,
            start_red3_delay: START_RED3_DELAY,
            start_green_delay: START_GREEN_DELAY,
            start_lights_off_delay: START_LIGHTS_OFF_DELAY,
            // Vehicle: Longitudinal
            top_speed_floor: TOP_SPEED_FLOOR,
            base_acceleration: BASE_ACCELERATION,
            boost_acceleration: BOOST_ACCELERATION,
            friction_base: FRICTION_BASE,
            coast_deceleration: COAST_DECELERATION,
            pre_start_deceleration: PRE_START_DECELERATION,
            reverse_speed_limit: REVERSE_SPEED_LIMIT,
            low_fuel_threshold: LOW_FUEL_THRESHOLD,
            limp_speed: LIMP_SPEED,
            // Vehicle: Lateral
            steer_gain: STEER_GAIN,
            lateral_damping_base: LATERAL_DAMPING_BASE,
            lateral_damping_per_handling: LATERAL_DAMPING_PER_HANDLING,
            lateral_response: LATERAL_RESPONSE,
            lateral_limit_base: LATERAL_LIMIT_BASE,
            lateral_limit_per_handling: LATERAL_LIMIT_PER_HANDLING,
            lateral_velocity_relax: LATERAL_VELOCITY_RELAX,
            lateral_offset_relax: LATERAL_OFFSET_RELAX,
            player_ride_height: PLAYER_RIDE_HEIGHT,
            // Fuel
            moving_speed_threshold: MOVING_SPEED_THRESHOLD,
            fuel_base_drain: FUEL_BASE_DRAIN,
            fuel_speed_drain: FUEL_SPEED_DRAIN,
            fuel_boost_surcharge: FUEL_BOOST_SURCHARGE,
            // Guard rail
            guard_rail_margin: GUARD_RAIL_MARGIN,
            rail_damage_base: RAIL_DAMAGE_BASE,
            rail_damage_per_speed: RAIL_DAMAGE_PER_SPEED,
            rail_speed_penalty: RAIL_SPEED_PENALTY,
            rail_rebound_min: RAIL_REBOUND_MIN,
            rail_rebound_bonus: RAIL_REBOUND_BONUS,
            collision_cooldown: COLLISION_COOLDOWN,
            // Racer collisions
            contact_min_speed: CONTACT_MIN_SPEED,
            contact_window: CONTACT_WINDOW,
            contact_radius: CONTACT_RADIUS,
            impact_speed_cap: IMPACT_SPEED_CAP,
            impact_ai_boost_time: IMPACT_AI_BOOST_TIME,
            impact_ai_speed_bump: IMPACT_AI_SPEED_BUMP,
            impact_speed_loss: IMPACT_SPEED_LOSS,
            impact_speed_floor: IMPACT_SPEED_FLOOR,
            impact_lateral_kick: IMPACT_LATERAL_KICK,
            impact_armor_damage: IMPACT_ARMOR_DAMAGE,
            // AI racers
            ai_racer_count: AI_RACER_COUNT,
            ai_grid_start: AI_GRID_START,
            ai_grid_spacing: AI_GRID_SPACING,
            ai_base_speed_min: AI_BASE_SPEED_MIN,
            ai_base_speed_jitter: AI_BASE_SPEED_JITTER,
            ai_lane_offset_min: AI_LANE_OFFSET_MIN,
            ai_lane_offset_jitter: AI_LANE_OFFSET_JITTER,
            ai_launch_delay_min: AI_LAUNCH_DELAY_MIN,
            ai_launch_delay_jitter: AI_LAUNCH_DELAY_JITTER,
            ai_boost_cap: AI_BOOST_CAP,
            ai_boost_rise: AI_BOOST_RISE,
            ai_boost_fall: AI_BOOST_FALL,
            ai_progress_scale: AI_PROGRESS_SCALE,
            ai_ride_height: AI_RIDE_HEIGHT,
        }
    }
}

impl RaceConfig {
    /// Parse a (possibly partial) TOML document and validate the result.
    pub fn from_toml_str(contents: &str) -> RaceResult<Self> {
        let config: RaceConfig =
            toml::from_str(contents).map_err(|e| RaceError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the wraparound or countdown logic.
    pub fn validate(&self) -> RaceResult<()> {
        check_range("zone_span", self.zone_span, 0.0, 1.0, "(0.0, 1.0)")?;
        check_range(
            "lap_wrap_high",
            self.lap_wrap_high,
            0.5,
            1.0,
            "(0.5, 1.0)",
        )?;
        check_range("lap_wrap_low", self.lap_wrap_low, 0.0, 0.5, "(0.0, 0.5)")?;
        check_range(
            "distance_to_progress",
            self.distance_to_progress,
            0.0,
            0.1,
            "(0.0, 0.1)",
        )?;
        check_range(
            "contact_window",
            self.contact_window,
            0.0,
            0.5,
            "(0.0, 0.5)",
        )?;
        if self.limp_speed < 0.0 {
            return Err(RaceError::InvalidConfig {
                name: "limp_speed",
                value: self.limp_speed,
                safe_range: "[0.0, ∞)",
            });
        }
        if self.collision_cooldown < 0.0 {
            return Err(RaceError::InvalidConfig {
                name: "collision_cooldown",
                value: self.collision_cooldown,
                safe_range: "[0.0, ∞)",
            });
        }
        let delays = [
            self.start_red1_delay,
            self.start_red2_delay,
            self.start_red3_delay,
            self.start_green_delay,
            self.start_lights_off_delay,
        ];
        if delays.windows(2).any(|w| w[1] < w[0]) || delays[0] < 0.0 {
            return Err(RaceError::InvalidConfig {
                name: "start_*_delay",
                value: self.start_green_delay,
                safe_range: "non-negative and non-decreasing",
            });
        }
        if self.track_segments < 4 || self.arc_length_divisions < 8 {
            return Err(RaceError::InvalidConfig {
                name: "track_segments",
                value: self.track_segments as f32,
                safe_range: "≥ 4 segments, ≥ 8 arc-length divisions",
            });
        }
        Ok(())
    }
}

fn check_range(
    name: &'static str,
    value: f32,
    min_exclusive: f32,
    max_exclusive: f32,
    safe_range: &'static str,
) -> RaceResult<()> {
    if value > min_exclusive && value < max_exclusive {
        Ok(())
    } else {
        Err(RaceError::InvalidConfig {
            name,
            value,
            safe_range,
        })
    }
}

/// Startup system: attempt to load `assets/race.toml` and overwrite the
/// `RaceConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are logged but do not abort the game.  A missing file is not an error.
pub fn load_race_config(mut config: ResMut<RaceConfig>) {
    match std::fs::read_to_string(RACE_CONFIG_PATH) {
        Ok(contents) => match RaceConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded race config from {RACE_CONFIG_PATH}");
            }
            Err(e) => {
                warn!("Rejected {RACE_CONFIG_PATH}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {RACE_CONFIG_PATH} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RaceConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = RaceConfig::from_toml_str("limp_speed = 45.0\nai_racer_count = 3\n")
            .expect("partial config must parse");
        assert_eq!(config.limp_speed, 45.0);
        assert_eq!(config.ai_racer_count, 3);
        assert_eq!(config.collision_cooldown, COLLISION_COOLDOWN);
        assert_eq!(config.default_recharge_points, DEFAULT_RECHARGE_POINTS.to_vec());
    }

    #[test]
    fn zone_points_can_be_overridden() {
        let config = RaceConfig::from_toml_str("default_repair_points = [0.5]\n").unwrap();
        assert_eq!(config.default_repair_points, vec![0.5]);
    }

    #[test]
    fn out_of_range_wrap_threshold_is_rejected() {
        let err = RaceConfig::from_toml_str("lap_wrap_high = 0.3\n").unwrap_err();
        assert!(matches!(
            err,
            RaceError::InvalidConfig {
                name: "lap_wrap_high",
                ..
            }
        ));
    }

    #[test]
    fn decreasing_start_delays_are_rejected() {
        let err = RaceConfig::from_toml_str("start_green_delay = 1.0\n").unwrap_err();
        assert!(matches!(err, RaceError::InvalidConfig { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = RaceConfig::from_toml_str("limp_speed = \"fast\"").unwrap_err();
        assert!(matches!(err, RaceError::ConfigParse(_)));
    }
}
