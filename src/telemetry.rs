//! Per-tick race telemetry.
//!
//! Republished wholesale every tick; it is the only thing a HUD or camera
//! reads from the simulation.

use crate::ai::AiRacer;
use bevy::prelude::*;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RaceTelemetry {
    /// Forward speed, never negative.
    pub speed: f32,
    pub progress: f32,
    /// 1-based, capped at `total_laps`.
    pub lap: u32,
    pub total_laps: u32,
    pub lap_time: f32,
    pub best_lap: Option<f32>,
    /// 1-based finishing position.
    pub position: u32,
    pub fuel_percent: f32,
    pub armor_percent: f32,
    pub car_position: Vec3,
    pub car_direction: Vec3,
}

impl Default for RaceTelemetry {
    fn default() -> Self {
        Self {
            speed: 0.0,
            progress: 0.0,
            lap: 1,
            total_laps: 1,
            lap_time: 0.0,
            best_lap: None,
            position: 1,
            fuel_percent: 100.0,
            armor_percent: 100.0,
            car_position: Vec3::ZERO,
            car_direction: Vec3::Z,
        }
    }
}

/// 1 + the number of AI racers further along than `player_distance`, the
/// player's unwrapped distance in laps from the start line.
pub fn standing(player_distance: f32, racers: &[AiRacer]) -> u32 {
    let ahead = racers
        .iter()
        .filter(|racer| racer.race_distance() > player_distance)
        .count();
    1 + ahead as u32
}
