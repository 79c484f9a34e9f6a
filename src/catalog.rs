//! Read-only game data: base cars, upgrades, tracks and campaign events.
//!
//! [`GameCatalog`] plays the role of the data provider for both the race core
//! (track descriptors, vehicle stats) and the career layer (rewards, costs).
//! The catalog is expected to be internally consistent; [`GameCatalog::validate`]
//! checks that, and callers `debug_assert!` on it so a broken table is caught
//! in development builds.

use crate::error::{RaceError, RaceResult};
use crate::track::TrackDescriptor;
use bevy::prelude::*;
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

/// Cost growth per owned level.
const UPGRADE_COST_GROWTH: f32 = 1.35;

// ── Cars ──────────────────────────────────────────────────────────────────────

/// Factory stats of a chassis before upgrades.
#[derive(Debug, Clone, PartialEq)]
pub struct CarBaseStats {
    pub id: String,
    pub name: String,
    /// Top speed (km/h).
    pub max_speed: f32,
    /// Seconds from 0 to 100 km/h.
    pub accel_0_to_100: f32,
    /// Tyre grip, 0..1.
    pub handling_grip: f32,
    pub damage_max: f32,
    pub fuel_capacity: f32,
}

// ── Upgrades ──────────────────────────────────────────────────────────────────

/// Upgrade slots available in the garage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeSlot {
    Engine,
    Transmission,
    Aero,
    Tires,
    Brakes,
    Armor,
    Energy,
    Prototype,
}

impl UpgradeSlot {
    pub const ALL: [UpgradeSlot; 8] = [
        UpgradeSlot::Engine,
        UpgradeSlot::Transmission,
        UpgradeSlot::Aero,
        UpgradeSlot::Tires,
        UpgradeSlot::Brakes,
        UpgradeSlot::Armor,
        UpgradeSlot::Energy,
        UpgradeSlot::Prototype,
    ];

    #[inline]
    pub fn id(self) -> &'static str {
        match self {
            UpgradeSlot::Engine => "engine",
            UpgradeSlot::Transmission => "transmission",
            UpgradeSlot::Aero => "aero",
            UpgradeSlot::Tires => "tires",
            UpgradeSlot::Brakes => "brakes",
            UpgradeSlot::Armor => "armor",
            UpgradeSlot::Energy => "energy",
            UpgradeSlot::Prototype => "prototype",
        }
    }
}

impl fmt::Display for UpgradeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for UpgradeSlot {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpgradeSlot::ALL
            .into_iter()
            .find(|slot| slot.id() == s)
            .ok_or_else(|| RaceError::UnknownUpgradeSlot { name: s.to_string() })
    }
}

/// Additive stat changes granted by upgrades.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatBonus {
    pub top_speed: f32,
    pub acceleration: f32,
    pub handling: f32,
    pub durability: f32,
    pub energy: f32,
    pub boost_power: f32,
    pub boost_duration: f32,
}

impl StatBonus {
    fn scaled(self, factor: f32) -> Self {
        Self {
            top_speed: self.top_speed * factor,
            acceleration: self.acceleration * factor,
            handling: self.handling * factor,
            durability: self.durability * factor,
            energy: self.energy * factor,
            boost_power: self.boost_power * factor,
            boost_duration: self.boost_duration * factor,
        }
    }
}

impl AddAssign for StatBonus {
    fn add_assign(&mut self, rhs: Self) {
        self.top_speed += rhs.top_speed;
        self.acceleration += rhs.acceleration;
        self.handling += rhs.handling;
        self.durability += rhs.durability;
        self.energy += rhs.energy;
        self.boost_power += rhs.boost_power;
        self.boost_duration += rhs.boost_duration;
    }
}

/// One garage upgrade line.  Effects grow linearly with level.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeDefinition {
    pub slot: UpgradeSlot,
    pub name: String,
    pub max_level: u32,
    pub base_cost: u32,
    pub per_level: StatBonus,
}

impl UpgradeDefinition {
    /// Stat bonus at `level`, capped at `max_level`.
    pub fn effect(&self, level: u32) -> StatBonus {
        self.per_level.scaled(level.min(self.max_level) as f32)
    }

    /// Price of buying the level after `current_level`.
    pub fn cost(&self, current_level: u32) -> u32 {
        let level = current_level.min(self.max_level) as i32;
        (self.base_cost as f32 * UPGRADE_COST_GROWTH.powi(level)).floor() as u32
    }
}

/// An owned upgrade level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleUpgrade {
    pub slot: UpgradeSlot,
    pub level: u32,
}

// ── Tracks and events ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    pub id: String,
    pub name: String,
    pub laps: u32,
    pub recharge_zones: Vec<f32>,
    pub repair_zones: Vec<f32>,
}

impl TrackEntry {
    pub fn descriptor(&self) -> TrackDescriptor {
        TrackDescriptor {
            id: Some(self.id.clone()),
            laps: Some(self.laps),
            recharge_points: self.recharge_zones.clone(),
            repair_points: self.repair_zones.clone(),
            zone_span: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRewards {
    /// Credits by finishing position; positions past the end get the last entry.
    pub position_credits: Vec<u32>,
    pub completion_bonus: u32,
}

impl EventRewards {
    /// Total payout for finishing at `position` (1-based).
    pub fn payout(&self, position: u32) -> u32 {
        let index = (position.max(1) - 1) as usize;
        let position_reward = match self.position_credits.len() {
            0 => 0,
            len => self.position_credits[index.min(len - 1)],
        };
        position_reward + self.completion_bonus
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    pub id: String,
    pub name: String,
    pub track_id: String,
    pub rewards: EventRewards,
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// All static game data.  Events are stored in campaign order.
#[derive(Resource, Debug, Clone)]
pub struct GameCatalog {
    pub cars: Vec<CarBaseStats>,
    pub upgrades: Vec<UpgradeDefinition>,
    pub tracks: Vec<TrackEntry>,
    pub events: Vec<EventEntry>,
}

impl GameCatalog {
    pub fn car(&self, id: &str) -> RaceResult<&CarBaseStats> {
        self.cars
            .iter()
            .find(|car| car.id == id)
            .ok_or_else(|| RaceError::UnknownCar { id: id.to_string() })
    }

    pub fn default_car(&self) -> RaceResult<&CarBaseStats> {
        self.cars.first().ok_or_else(|| RaceError::UnknownCar {
            id: "<default>".to_string(),
        })
    }

    pub fn upgrade(&self, slot: UpgradeSlot) -> RaceResult<&UpgradeDefinition> {
        self.upgrades
            .iter()
            .find(|u| u.slot == slot)
            .ok_or_else(|| RaceError::UnknownUpgradeSlot {
                name: slot.id().to_string(),
            })
    }

    pub fn track(&self, id: &str) -> Option<&TrackEntry> {
        self.tracks.iter().find(|t| t.id == id)
    }

    #[inline]
    pub fn campaign_length(&self) -> usize {
        self.events.len()
    }

    /// Event at campaign `order`; orders wrap around the campaign length.
    pub fn event_by_order(&self, order: i64) -> RaceResult<&EventEntry> {
        let len = self.events.len() as i64;
        if len == 0 {
            return Err(RaceError::UnknownEvent { order });
        }
        Ok(&self.events[order.rem_euclid(len) as usize])
    }

    /// Check cross-references between tables.
    pub fn validate(&self) -> RaceResult<()> {
        self.default_car()?;
        for slot in UpgradeSlot::ALL {
            self.upgrade(slot)?;
        }
        if self.events.is_empty() {
            return Err(RaceError::UnknownEvent { order: 0 });
        }
        Ok(())
    }
}

impl Default for GameCatalog {
    fn default() -> Self {
        let upgrade = |slot, name: &str, max_level, base_cost, per_level| UpgradeDefinition {
            slot,
            name: name.to_string(),
            max_level,
            base_cost,
            per_level,
        };
        let none = StatBonus::default();

        Self {
            cars: vec![
                CarBaseStats {
                    id: "vx-orion".into(),
                    name: "VX Orion".into(),
                    max_speed: 260.0,
                    accel_0_to_100: 5.2,
                    handling_grip: 0.62,
                    damage_max: 110.0,
                    fuel_capacity: 110.0,
                },
                CarBaseStats {
                    id: "nova-stride".into(),
                    name: "Nova Stride".into(),
                    max_speed: 248.0,
                    accel_0_to_100: 4.8,
                    handling_grip: 0.58,
                    damage_max: 100.0,
                    fuel_capacity: 130.0,
                },
                CarBaseStats {
                    id: "quantum-flare".into(),
                    name: "Quantum Flare".into(),
                    max_speed: 280.0,
                    accel_0_to_100: 5.8,
                    handling_grip: 0.54,
                    damage_max: 105.0,
                    fuel_capacity: 100.0,
                },
            ],
            upgrades: vec![
                upgrade(
                    UpgradeSlot::Engine,
                    "Turbo Quantum",
                    5,
                    1200,
                    StatBonus { top_speed: 20.0, acceleration: 0.06, ..none },
                ),
                upgrade(
                    UpgradeSlot::Transmission,
                    "Flux Gate Transmission",
                    5,
                    900,
                    StatBonus { acceleration: 0.05, handling: 0.03, ..none },
                ),
                upgrade(
                    UpgradeSlot::Aero,
                    "Grav Aero Kit",
                    5,
                    950,
                    StatBonus { handling: 0.07, top_speed: 5.0, ..none },
                ),
                upgrade(
                    UpgradeSlot::Tires,
                    "Grip Vector",
                    5,
                    800,
                    StatBonus { handling: 0.08, ..none },
                ),
                upgrade(
                    UpgradeSlot::Brakes,
                    "Hexa Flux Brakes",
                    4,
                    700,
                    StatBonus { handling: 0.05, energy: 0.04, ..none },
                ),
                upgrade(
                    UpgradeSlot::Armor,
                    "Phase Shield Plating",
                    4,
                    1100,
                    StatBonus { durability: 0.1, ..none },
                ),
                upgrade(
                    UpgradeSlot::Energy,
                    "Flux Drive Core",
                    4,
                    1000,
                    StatBonus { energy: 0.1, ..none },
                ),
                upgrade(
                    UpgradeSlot::Prototype,
                    "Experimental Slot",
                    3,
                    2500,
                    StatBonus { top_speed: 15.0, acceleration: 0.08, handling: 0.04, ..none },
                ),
            ],
            tracks: vec![
                TrackEntry {
                    id: "aurora-pulse".into(),
                    name: "Pulse Fields".into(),
                    laps: 3,
                    recharge_zones: vec![0.18, 0.62, 0.88],
                    repair_zones: vec![0.32, 0.74],
                },
                TrackEntry {
                    id: "aurora-tidal".into(),
                    name: "Tidal Rush".into(),
                    laps: 3,
                    recharge_zones: vec![0.22, 0.58, 0.84],
                    repair_zones: vec![0.16, 0.46, 0.72],
                },
                TrackEntry {
                    id: "zephyr-cloudspire".into(),
                    name: "Cloudspire".into(),
                    laps: 3,
                    recharge_zones: vec![0.2, 0.66, 0.9],
                    repair_zones: vec![0.4, 0.78],
                },
            ],
            events: vec![
                EventEntry {
                    id: "helios-01".into(),
                    name: "Aurora Opening Run".into(),
                    track_id: "aurora-pulse".into(),
                    rewards: EventRewards {
                        position_credits: vec![3500, 2500, 1800, 1200, 900],
                        completion_bonus: 600,
                    },
                },
                EventEntry {
                    id: "helios-02".into(),
                    name: "Tidal Rush Circuit".into(),
                    track_id: "aurora-tidal".into(),
                    rewards: EventRewards {
                        position_credits: vec![4200, 3100, 2200, 1500, 1000],
                        completion_bonus: 900,
                    },
                },
                EventEntry {
                    id: "cyclone-01".into(),
                    name: "Cloudspire Challenge".into(),
                    track_id: "zephyr-cloudspire".into(),
                    rewards: EventRewards {
                        position_credits: vec![5200, 3800, 2600, 1800, 1200],
                        completion_bonus: 1100,
                    },
                },
            ],
        }
    }
}
