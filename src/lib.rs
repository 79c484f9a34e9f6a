//! Hyperlap race core
//!
//! The simulation behind an arcade anti-gravity racer: a closed spline track,
//! the player's car with fuel and armor, a field of AI opponents, lap timing
//! and a start-light countdown.  Everything advances in one fixed per-tick
//! order inside [`session::RaceSession`]; [`plugin::RacePlugin`] runs it
//! inside a Bevy app.
//!
//! Progression (credits, unlocks, upgrades) lives in [`career`] and only ever
//! consumes the race's results.

pub mod ai;
pub mod career;
pub mod catalog;
pub mod collision;
pub mod config;
pub mod constants;
pub mod controls;
pub mod error;
pub mod lap;
pub mod plugin;
pub mod reserves;
pub mod session;
pub mod start;
pub mod telemetry;
pub mod track;
pub mod vehicle;
pub mod wrap;
