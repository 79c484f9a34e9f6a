//! Vehicle performance profile and the scales derived from it.

use crate::catalog::{CarBaseStats, GameCatalog, StatBonus, VehicleUpgrade};
use crate::config::RaceConfig;

/// Per-race performance stats: base car plus owned upgrades.
///
/// Immutable while a race runs; rebuilt by the career layer after a purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleProfile {
    pub id: String,
    pub name: String,
    pub top_speed: f32,
    pub acceleration: f32,
    pub handling: f32,
    pub durability: f32,
    pub energy: f32,
    pub boost_power: f32,
    pub boost_duration: f32,
}

impl VehicleProfile {
    /// Combine a base car with its upgrades.
    ///
    /// Upgrade slots missing from the catalog are a data bug: they trip a
    /// debug assertion and are otherwise skipped.
    pub fn build(catalog: &GameCatalog, base: &CarBaseStats, upgrades: &[VehicleUpgrade]) -> Self {
        let mut bonus = StatBonus::default();
        for owned in upgrades {
            match catalog.upgrade(owned.slot) {
                Ok(definition) => bonus += definition.effect(owned.level),
                Err(e) => debug_assert!(false, "{e}"),
            }
        }

        let base_acceleration = 10.0 / base.accel_0_to_100.max(0.1);
        let acceleration = round2(base_acceleration + bonus.acceleration).max(0.3);

        Self {
            id: base.id.clone(),
            name: base.name.clone(),
            top_speed: base.max_speed + bonus.top_speed,
            acceleration,
            handling: (base.handling_grip + bonus.handling).min(1.6),
            durability: (base.damage_max / 200.0 + bonus.durability).min(1.5),
            energy: (base.fuel_capacity / 220.0 + bonus.energy).min(1.6),
            boost_power: (0.18 + bonus.boost_power).max(0.15),
            boost_duration: (1.8 + bonus.boost_duration).max(1.6),
        }
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Multipliers and capacities the simulation derives once per race.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileScales {
    /// Top speed stat after the floor.
    pub top_speed: f32,
    pub acceleration: f32,
    pub handling: f32,
    pub durability: f32,
    pub boost_power: f32,
    pub fuel_capacity: f32,
    pub armor_capacity: f32,
    /// Multiplier on fuel drain; lower is more efficient.
    pub fuel_modifier: f32,
    /// Multiplier on rail damage; lower is tougher.
    pub armor_mitigation: f32,
}

impl ProfileScales {
    pub fn derive(profile: &VehicleProfile, config: &RaceConfig) -> Self {
        let energy = profile.energy.max(0.2);
        let durability = profile.durability.max(0.2);
        Self {
            top_speed: profile.top_speed.max(config.top_speed_floor),
            acceleration: (profile.acceleration / 2.2).clamp(0.7, 1.8),
            handling: (0.6 + profile.handling * 0.5).clamp(0.7, 2.0),
            durability: (0.5 + profile.durability * 0.6).clamp(0.6, 1.8),
            boost_power: profile.boost_power,
            fuel_capacity: 110.0 + energy * 80.0,
            armor_capacity: 110.0 + durability * 90.0,
            fuel_modifier: (1.0 - energy * 0.4).max(0.45),
            armor_mitigation: (1.0 - durability * 0.6).max(0.4),
        }
    }

    /// Lateral offset beyond which the car is clamped.
    #[inline]
    pub fn lateral_limit(&self, config: &RaceConfig) -> f32 {
        config.lateral_limit_base + self.handling * config.lateral_limit_per_handling
    }

    /// Lateral offset beyond which the car scrapes the rail.
    #[inline]
    pub fn guard_threshold(&self, config: &RaceConfig) -> f32 {
        self.lateral_limit(config) - config.guard_rail_margin
    }
}
