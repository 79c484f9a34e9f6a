//! Player-vs-AI contact.
//!
//! Only racers a short way *ahead* of the player are tested, so a pair is
//! never resolved twice from both sides.  At most one impact is resolved per
//! tick, and a racer that was just hit is skipped until its contact cooldown
//! runs out.

use crate::ai::AiRacer;
use crate::config::RaceConfig;
use crate::reserves::Reserves;
use crate::track::Track;
use crate::vehicle::Kinematics;
use crate::wrap;
use bevy::prelude::*;
use rand::Rng;

/// One resolved impact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Index into the AI field.
    pub racer: usize,
    /// Player speed over the impact cap, in `[0, 1]`.
    pub scale: f32,
    pub armor_damage: f32,
}

/// Index of the first AI racer in contact with a player at `progress`.
///
/// Only racers ahead of the player count; the window is measured forward.
pub fn find_contact(
    progress: f32,
    racers: &[AiRacer],
    track: &Track,
    config: &RaceConfig,
) -> Option<usize> {
    let player_point = track.position(progress);
    racers.iter().position(|racer| {
        let ahead = wrap::forward_distance(progress, racer.progress);
        racer.contact_cooldown <= 0.0
            && ahead < config.contact_window
            && track.position(racer.progress).distance(player_point) < config.contact_radius
    })
}

/// Apply an impact between the player and `racer`.
pub fn resolve_impact<R: Rng>(
    kinematics: &mut Kinematics,
    reserves: &mut Reserves,
    racer: &mut AiRacer,
    rng: &mut R,
    config: &RaceConfig,
) -> (f32, f32) {
    let scale = (kinematics.velocity.abs() / config.impact_speed_cap).min(1.0);

    racer.boost_timer = config.impact_ai_boost_time * scale;
    racer.speed += config.impact_ai_speed_bump * scale;
    racer.contact_cooldown = config.collision_cooldown;

    kinematics.velocity *= config
        .impact_speed_floor
        .max(1.0 - scale * config.impact_speed_loss);
    kinematics.lateral_velocity += (rng.gen::<f32>() - 0.5) * config.impact_lateral_kick;

    let damage = config.impact_armor_damage * scale;
    reserves.apply_impact_damage(damage);
    (scale, damage)
}

/// Scan the field and resolve at most one impact.
///
/// `racing` is true between the green light and the lap target.
pub fn scan<R: Rng>(
    kinematics: &mut Kinematics,
    reserves: &mut Reserves,
    racers: &mut [AiRacer],
    racing: bool,
    track: &Track,
    rng: &mut R,
    config: &RaceConfig,
) -> Option<Impact> {
    if !racing || kinematics.velocity <= config.contact_min_speed {
        return None;
    }
    let index = find_contact(kinematics.progress, racers, track, config)?;
    let racer = racers.get_mut(index)?;
    let (scale, armor_damage) = resolve_impact(kinematics, reserves, racer, rng, config);
    debug!(
        "[collision] Hit racer {index} at scale {scale:.2}, armor -{armor_damage:.1}"
    );
    Some(Impact {
        racer: index,
        scale,
        armor_damage,
    })
}
