//! Centralised race simulation constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::RaceConfig`] mirrors every value below and can override
//! any subset from `assets/race.toml`.
//!
//! ## Units
//!
//! Speeds are in "track units" per second.  Progress is the normalised track
//! parameter in `[0, 1)`; `DISTANCE_TO_PROGRESS` converts one to the other.

// ── Track ─────────────────────────────────────────────────────────────────────

/// Number of control points each layout generator emits.
pub const TRACK_SEGMENTS: usize = 96;

/// Number of arc-length samples used to re-parametrise the spline.
///
/// Higher values make `position(t)` closer to uniform-speed traversal.
/// 1024 keeps the per-sample error well under a track unit on every layout.
pub const ARC_LENGTH_DIVISIONS: usize = 1024;

/// Parameter offset used to derive the forward direction from two curve samples.
pub const FORWARD_LOOKAHEAD: f32 = 0.01;

// ── Zones ─────────────────────────────────────────────────────────────────────

/// Full width of a recharge / repair zone in track-parameter units.
pub const DEFAULT_ZONE_SPAN: f32 = 0.06;

/// Recharge zone centres used when a track supplies none.
pub const DEFAULT_RECHARGE_POINTS: [f32; 2] = [0.15, 0.67];

/// Repair zone centres used when a track supplies none.
pub const DEFAULT_REPAIR_POINTS: [f32; 2] = [0.34, 0.84];

/// Fraction of fuel capacity restored on entering a recharge zone.
pub const RECHARGE_FRACTION: f32 = 0.35;

/// Fraction of armor capacity restored on entering a repair zone.
pub const REPAIR_FRACTION: f32 = 0.30;

// ── Race ──────────────────────────────────────────────────────────────────────

/// Laps used when neither the event nor the track specifies a count.
pub const DEFAULT_LAPS: u32 = 3;

/// Converts travelled track units into track-parameter progress.
pub const DISTANCE_TO_PROGRESS: f32 = 0.0008;

/// A lap is counted when progress moves from above this value...
pub const LAP_WRAP_HIGH: f32 = 0.95;

/// ...to below this value within one tick.
pub const LAP_WRAP_LOW: f32 = 0.05;

/// Passive deceleration applied once the lap target is reached (u/s²).
pub const FINISH_DECELERATION: f32 = 40.0;

/// The race-complete event fires once speed drops below this value.
pub const FINISH_SPEED_THRESHOLD: f32 = 5.0;

// ── Start sequence ────────────────────────────────────────────────────────────

/// Real-time delays (seconds since the race was staged) of each start light.
pub const START_RED1_DELAY: f32 = 0.6;
pub const START_RED2_DELAY: f32 = 1.4;
pub const START_RED3_DELAY: f32 = 2.2;
pub const START_GREEN_DELAY: f32 = 3.0;
pub const START_LIGHTS_OFF_DELAY: f32 = 4.5;

// ── Vehicle: Longitudinal ─────────────────────────────────────────────────────

/// Lower bound applied to the profile's top speed stat.
pub const TOP_SPEED_FLOOR: f32 = 200.0;

/// Base acceleration (u/s²) without boost, before acceleration/armor scaling.
pub const BASE_ACCELERATION: f32 = 48.0;

/// Base acceleration (u/s²) while boost is held.
pub const BOOST_ACCELERATION: f32 = 70.0;

/// Rolling friction numerator; divided by the acceleration scale.
pub const FRICTION_BASE: f32 = 14.0;

/// Extra coast-down (u/s²) applied when accelerate is released.
pub const COAST_DECELERATION: f32 = 28.0;

/// Deceleration (u/s²) applied while controls are not live.
pub const PRE_START_DECELERATION: f32 = 36.0;

/// Most negative velocity allowed (reverse).
pub const REVERSE_SPEED_LIMIT: f32 = 60.0;

/// At or below this fuel level the car is "limping".
pub const LOW_FUEL_THRESHOLD: f32 = 0.5;

/// Top speed cap while limping on an empty tank.
pub const LIMP_SPEED: f32 = 60.0;

// ── Vehicle: Lateral ──────────────────────────────────────────────────────────

/// Steering gain (u/s²) scaled by the handling scale.
pub const STEER_GAIN: f32 = 22.0;

/// Lateral damping: `LATERAL_DAMPING_BASE + handling × LATERAL_DAMPING_PER_HANDLING` per second.
pub const LATERAL_DAMPING_BASE: f32 = 4.0;
pub const LATERAL_DAMPING_PER_HANDLING: f32 = 3.4;

/// Multiplier from lateral velocity to lateral offset change.
pub const LATERAL_RESPONSE: f32 = 3.0;

/// Lateral limit: `LATERAL_LIMIT_BASE + handling × LATERAL_LIMIT_PER_HANDLING`.
pub const LATERAL_LIMIT_BASE: f32 = 3.6;
pub const LATERAL_LIMIT_PER_HANDLING: f32 = 0.4;

/// Rates at which lateral velocity / offset relax to zero while controls are not live.
pub const LATERAL_VELOCITY_RELAX: f32 = 8.0;
pub const LATERAL_OFFSET_RELAX: f32 = 10.0;

/// Height of the player car above the centreline.
pub const PLAYER_RIDE_HEIGHT: f32 = 0.7;

// ── Fuel ──────────────────────────────────────────────────────────────────────

/// Speeds at or below this are considered stationary for fuel and rail checks.
pub const MOVING_SPEED_THRESHOLD: f32 = 1.0;

/// Fuel drain per second independent of speed.
pub const FUEL_BASE_DRAIN: f32 = 3.5;

/// Fuel drain per second per unit of speed.
pub const FUEL_SPEED_DRAIN: f32 = 0.016;

/// Fuel surcharge per second per unit of boost power while boosting.
pub const FUEL_BOOST_SURCHARGE: f32 = 25.0;

// ── Guard rail ────────────────────────────────────────────────────────────────

/// Distance inside the lateral limit at which the rail is touched.
pub const GUARD_RAIL_MARGIN: f32 = 0.2;

/// Armor damage per rail hit before mitigation: base + speed term.
pub const RAIL_DAMAGE_BASE: f32 = 6.0;
pub const RAIL_DAMAGE_PER_SPEED: f32 = 0.028;

/// Velocity multiplier applied on a rail hit.
pub const RAIL_SPEED_PENALTY: f32 = 0.65;

/// Minimum lateral rebound speed away from the rail, and the bonus added on top.
pub const RAIL_REBOUND_MIN: f32 = 8.0;
pub const RAIL_REBOUND_BONUS: f32 = 4.0;

/// Seconds during which further contacts are ignored.
pub const COLLISION_COOLDOWN: f32 = 0.8;

// ── Racer collisions ──────────────────────────────────────────────────────────

/// The player must be faster than this for racer contacts to be tested.
pub const CONTACT_MIN_SPEED: f32 = 20.0;

/// Only racers up to this far ahead (track parameter) are tested.
pub const CONTACT_WINDOW: f32 = 0.01;

/// World-space contact radius between centreline points.
pub const CONTACT_RADIUS: f32 = 1.6;

/// Player speed at which impact scale saturates at 1.
pub const IMPACT_SPEED_CAP: f32 = 260.0;

/// AI boost seconds granted at full impact.
pub const IMPACT_AI_BOOST_TIME: f32 = 1.4;

/// AI speed bump at full impact.
pub const IMPACT_AI_SPEED_BUMP: f32 = 0.08;

/// Player velocity loss at full impact, and the floor of the multiplier.
pub const IMPACT_SPEED_LOSS: f32 = 0.65;
pub const IMPACT_SPEED_FLOOR: f32 = 0.35;

/// Maximum magnitude of the random lateral kick is half this value.
pub const IMPACT_LATERAL_KICK: f32 = 6.0;

/// Armor damage at full impact.
pub const IMPACT_ARMOR_DAMAGE: f32 = 8.0;

// ── AI racers ─────────────────────────────────────────────────────────────────

/// Opponents on the grid.
pub const AI_RACER_COUNT: usize = 19;

/// Grid slot of the first opponent and spacing to the next.
pub const AI_GRID_START: f32 = 0.015;
pub const AI_GRID_SPACING: f32 = 0.02;

/// Cruise speed band: `AI_BASE_SPEED_MIN + rand × AI_BASE_SPEED_JITTER`.
pub const AI_BASE_SPEED_MIN: f32 = 0.16;
pub const AI_BASE_SPEED_JITTER: f32 = 0.05;

/// Lane offset magnitude band.
pub const AI_LANE_OFFSET_MIN: f32 = 0.28;
pub const AI_LANE_OFFSET_JITTER: f32 = 0.28;

/// Launch delay band in seconds.
pub const AI_LAUNCH_DELAY_MIN: f32 = 0.2;
pub const AI_LAUNCH_DELAY_JITTER: f32 = 0.6;

/// Speed headroom above base while boosting, and the rise / fall rates.
pub const AI_BOOST_CAP: f32 = 0.12;
pub const AI_BOOST_RISE: f32 = 0.3;
pub const AI_BOOST_FALL: f32 = 0.2;

/// Converts AI speed into progress per second.
pub const AI_PROGRESS_SCALE: f32 = 0.02;

/// Height of AI cars above the centreline.
pub const AI_RIDE_HEIGHT: f32 = 0.8;
