//! AI opponents.
//!
//! Each racer cruises at its own base speed after a staggered launch.  A hit
//! from the player sets a boost timer that lifts it towards
//! `base + ai_boost_cap` until the timer runs out, after which it eases back.
//! AI racers never detect collisions themselves.

use crate::config::RaceConfig;
use crate::track::Track;
use crate::wrap;
use bevy::math::Vec3;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct AiRacer {
    pub progress: f32,
    pub speed: f32,
    pub base_speed: f32,
    pub boost_timer: f32,
    /// Signed lateral lane, visual only.
    pub lane_offset: f32,
    /// Seconds after the green before this racer moves.
    pub launch_delay: f32,
    pub laps: u32,
    /// Seconds before the player can hit this racer again.
    pub contact_cooldown: f32,
    grid_slot: usize,
}

/// Grid slot `index` on the track parameter.
pub fn grid_position(index: usize, config: &RaceConfig) -> f32 {
    wrap::wrap_unit(config.ai_grid_start + index as f32 * config.ai_grid_spacing)
}

/// Spawn `count` racers on consecutive grid slots.
pub fn spawn_field<R: Rng>(count: usize, rng: &mut R, config: &RaceConfig) -> Vec<AiRacer> {
    (0..count).map(|i| AiRacer::spawn(i, rng, config)).collect()
}

impl AiRacer {
    pub fn spawn<R: Rng>(index: usize, rng: &mut R, config: &RaceConfig) -> Self {
        let base_speed = config.ai_base_speed_min + rng.gen::<f32>() * config.ai_base_speed_jitter;
        let side = if index % 2 == 0 { -1.0 } else { 1.0 };
        let lane_offset =
            side * (config.ai_lane_offset_min + rng.gen::<f32>() * config.ai_lane_offset_jitter);
        Self {
            progress: grid_position(index, config),
            speed: base_speed,
            base_speed,
            boost_timer: 0.0,
            lane_offset,
            launch_delay: launch_delay(rng, config),
            laps: 0,
            contact_cooldown: 0.0,
            grid_slot: index,
        }
    }

    /// Back to the grid with a fresh launch delay.  Cruise speed and lane are
    /// kept.
    pub fn reset<R: Rng>(&mut self, rng: &mut R, config: &RaceConfig) {
        self.progress = grid_position(self.grid_slot, config);
        self.speed = self.base_speed;
        self.boost_timer = 0.0;
        self.launch_delay = launch_delay(rng, config);
        self.laps = 0;
        self.contact_cooldown = 0.0;
    }

    pub fn launched(&self) -> bool {
        self.launch_delay <= 0.0
    }

    /// Unwrapped distance in laps from the start line, on the same basis as
    /// the player's [`Kinematics::distance`](crate::vehicle::Kinematics::distance).
    pub fn race_distance(&self) -> f32 {
        self.laps as f32 + self.progress
    }

    pub fn update(&mut self, dt: f32, started: bool, config: &RaceConfig) {
        let dt = dt.max(0.0);
        self.contact_cooldown = (self.contact_cooldown - dt).max(0.0);
        if !started {
            self.speed = self.base_speed;
            return;
        }
        if self.launch_delay > 0.0 {
            self.launch_delay = (self.launch_delay - dt).max(0.0);
            return;
        }

        if self.boost_timer > 0.0 {
            self.boost_timer = (self.boost_timer - dt).max(0.0);
            self.speed = (self.speed + dt * config.ai_boost_rise)
                .min(self.base_speed + config.ai_boost_cap);
        } else {
            self.speed = (self.speed - dt * config.ai_boost_fall).max(self.base_speed);
        }

        let previous = self.progress;
        self.progress = wrap::advance(self.progress, self.speed * dt * config.ai_progress_scale);
        if wrap::crossed_start_line(previous, self.progress, config.lap_wrap_high, config.lap_wrap_low)
        {
            self.laps += 1;
        }
    }

    /// World position and forward direction for drawing.
    pub fn pose(&self, track: &Track, config: &RaceConfig) -> (Vec3, Vec3) {
        let frame = track.frame(self.progress);
        (frame.offset(self.lane_offset, config.ai_ride_height), frame.forward)
    }
}

fn launch_delay<R: Rng>(rng: &mut R, config: &RaceConfig) -> f32 {
    config.ai_launch_delay_min + rng.gen::<f32>() * config.ai_launch_delay_jitter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackDescriptor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn field_is_seeded_and_reproducible() {
        let config = RaceConfig::default();
        let a = spawn_field(5, &mut StdRng::seed_from_u64(7), &config);
        let b = spawn_field(5, &mut StdRng::seed_from_u64(7), &config);
        assert_eq!(a, b);
    }

    #[test]
    fn spawn_respects_bands_and_alternates_lanes() {
        let config = RaceConfig::default();
        let field = spawn_field(6, &mut StdRng::seed_from_u64(1), &config);
        for (i, racer) in field.iter().enumerate() {
            assert!((racer.progress - (0.015 + i as f32 * 0.02)).abs() < 1e-5);
            assert!((0.16..=0.21).contains(&racer.base_speed));
            assert!((0.2..=0.8).contains(&racer.launch_delay));
            assert!((0.28..=0.56).contains(&racer.lane_offset.abs()));
            assert_eq!(racer.lane_offset < 0.0, i % 2 == 0);
        }
    }

    #[test]
    fn holds_until_green_and_launch_delay() {
        let config = RaceConfig::default();
        let mut racer = AiRacer::spawn(0, &mut StdRng::seed_from_u64(3), &config);
        let grid = racer.progress;
        racer.update(1.0, false, &config);
        assert_eq!(racer.progress, grid);

        racer.launch_delay = 0.5;
        racer.update(0.3, true, &config);
        assert_eq!(racer.progress, grid);
        racer.update(0.3, true, &config);
        assert!(racer.launched());
        racer.update(0.1, true, &config);
        assert!(racer.progress > grid);
    }

    #[test]
    fn boost_rises_to_cap_then_falls_back() {
        let config = RaceConfig::default();
        let mut racer = AiRacer::spawn(0, &mut StdRng::seed_from_u64(3), &config);
        racer.launch_delay = 0.0;
        racer.boost_timer = 1.4;
        for _ in 0..60 {
            racer.update(1.0 / 60.0, true, &config);
        }
        assert!(racer.speed > racer.base_speed);
        assert!(racer.speed <= racer.base_speed + config.ai_boost_cap + 1e-6);
        for _ in 0..600 {
            racer.update(1.0 / 60.0, true, &config);
        }
        assert_eq!(racer.boost_timer, 0.0);
        assert_eq!(racer.speed, racer.base_speed);
    }

    #[test]
    fn counts_laps_over_the_line() {
        let config = RaceConfig::default();
        let mut racer = AiRacer::spawn(0, &mut StdRng::seed_from_u64(3), &config);
        racer.launch_delay = 0.0;
        racer.progress = 0.999;
        racer.update(1.0, true, &config);
        assert_eq!(racer.laps, 1);
        assert!(racer.race_distance() > 1.0);

        racer.reset(&mut StdRng::seed_from_u64(4), &config);
        assert_eq!(racer.laps, 0);
        assert!((racer.progress - 0.015).abs() < 1e-6);
    }

    #[test]
    fn pose_sits_beside_the_centreline() {
        let config = RaceConfig::default();
        let track = Track::build(&TrackDescriptor::default(), &config);
        let racer = AiRacer::spawn(1, &mut StdRng::seed_from_u64(3), &config);
        let (position, forward) = racer.pose(&track, &config);
        let centre = track.position(racer.progress);
        let expected = (racer.lane_offset.powi(2) + config.ai_ride_height.powi(2)).sqrt();
        assert!((position.distance(centre) - expected).abs() < 1e-3);
        assert!((forward.length() - 1.0).abs() < 1e-4);
    }
}
