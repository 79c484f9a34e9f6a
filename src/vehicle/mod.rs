//! The player's car: performance profile and per-tick dynamics.

pub mod dynamics;
pub mod profile;

pub use dynamics::{damage_factor, effective_top_speed, integrate, DriveConditions, Kinematics};
pub use profile::{ProfileScales, VehicleProfile};
