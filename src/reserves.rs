//! Fuel and armor for the player's car.
//!
//! Both reserves start full, refill on zone *entry* (edge-triggered), and are
//! clamped to `[0, capacity]` after every mutation.

use crate::config::RaceConfig;
use crate::vehicle::{Kinematics, ProfileScales};

/// Which reserves a zone update refilled this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneRefill {
    pub fuel: bool,
    pub armor: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reserves {
    pub fuel: f32,
    pub armor: f32,
    pub fuel_capacity: f32,
    pub armor_capacity: f32,
    fuel_modifier: f32,
    armor_mitigation: f32,
    boost_power: f32,
    in_recharge_zone: bool,
    in_repair_zone: bool,
    /// Seconds until the guard rail can damage the car again.
    pub collision_cooldown: f32,
}

impl Reserves {
    pub fn new(
        fuel_capacity: f32,
        armor_capacity: f32,
        fuel_modifier: f32,
        armor_mitigation: f32,
        boost_power: f32,
    ) -> Self {
        let fuel_capacity = fuel_capacity.max(0.0);
        let armor_capacity = armor_capacity.max(0.0);
        Self {
            fuel: fuel_capacity,
            armor: armor_capacity,
            fuel_capacity,
            armor_capacity,
            fuel_modifier,
            armor_mitigation,
            boost_power,
            in_recharge_zone: false,
            in_repair_zone: false,
            collision_cooldown: 0.0,
        }
    }

    /// Full tanks sized from the car's derived scales.
    pub fn full(scales: &ProfileScales) -> Self {
        Self::new(
            scales.fuel_capacity,
            scales.armor_capacity,
            scales.fuel_modifier,
            scales.armor_mitigation,
            scales.boost_power,
        )
    }

    pub fn fuel_fraction(&self) -> f32 {
        fraction(self.fuel, self.fuel_capacity)
    }

    pub fn armor_fraction(&self) -> f32 {
        fraction(self.armor, self.armor_capacity)
    }

    /// Refill on the tick the car enters a zone.
    ///
    /// The membership flags are tracked even before the start so a car parked
    /// inside a zone at the green light does not get a free refill.
    pub fn update_zones(
        &mut self,
        in_recharge: bool,
        in_repair: bool,
        started: bool,
        config: &RaceConfig,
    ) -> ZoneRefill {
        let mut refill = ZoneRefill::default();
        if in_recharge && !self.in_recharge_zone && started {
            self.fuel += self.fuel_capacity * config.recharge_fraction;
            refill.fuel = true;
        }
        if in_repair && !self.in_repair_zone && started {
            self.armor += self.armor_capacity * config.repair_fraction;
            refill.armor = true;
        }
        self.in_recharge_zone = in_recharge;
        self.in_repair_zone = in_repair;
        self.clamp();
        refill
    }

    /// Drain fuel while the car is moving under race conditions.
    pub fn consume_fuel(
        &mut self,
        speed: f32,
        boost: bool,
        started: bool,
        dt: f32,
        config: &RaceConfig,
    ) {
        let speed = speed.abs();
        if !started || speed <= config.moving_speed_threshold || self.fuel <= 0.0 {
            return;
        }
        let surcharge = if boost {
            self.boost_power * config.fuel_boost_surcharge
        } else {
            0.0
        };
        let rate = config.fuel_base_drain + speed * config.fuel_speed_drain + surcharge;
        self.fuel -= rate * self.fuel_modifier * dt.max(0.0);
        self.clamp();
    }

    /// Count the rail cooldown down by `dt`.
    pub fn tick_cooldown(&mut self, dt: f32) {
        self.collision_cooldown = (self.collision_cooldown - dt.max(0.0)).max(0.0);
    }

    /// Scrape the guard rail when the car is past `threshold`.
    ///
    /// Returns the armor damage dealt, if any.  Slows the car and reflects its
    /// lateral velocity back towards the centreline.
    pub fn guard_rail_contact(
        &mut self,
        kinematics: &mut Kinematics,
        threshold: f32,
        finished: bool,
        config: &RaceConfig,
    ) -> Option<f32> {
        if finished
            || kinematics.lateral_offset.abs() <= threshold
            || kinematics.velocity.abs() <= config.moving_speed_threshold
            || self.collision_cooldown > 0.0
        {
            return None;
        }

        let damage = (config.rail_damage_base
            + kinematics.velocity.abs() * config.rail_damage_per_speed)
            * self.armor_mitigation;
        self.armor -= damage;
        self.clamp();

        kinematics.velocity *= config.rail_speed_penalty;
        let away = -kinematics.lateral_offset.signum();
        kinematics.lateral_velocity = away
            * config
                .rail_rebound_min
                .max(kinematics.lateral_velocity.abs() + config.rail_rebound_bonus);
        self.collision_cooldown = config.collision_cooldown;
        Some(damage)
    }

    /// Armor loss from a racer-vs-racer impact.
    pub fn apply_impact_damage(&mut self, amount: f32) {
        self.armor -= amount.max(0.0);
        self.clamp();
    }

    fn clamp(&mut self) {
        self.fuel = clamp_level(self.fuel, self.fuel_capacity);
        self.armor = clamp_level(self.armor, self.armor_capacity);
    }
}

fn clamp_level(value: f32, capacity: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, capacity)
    } else {
        0.0
    }
}

fn fraction(value: f32, capacity: f32) -> f32 {
    if capacity > 0.0 {
        (value / capacity).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
