//! One race: the track, the player's car and the AI field, advanced together.
//!
//! ## Tick order
//!
//! Every [`RaceSession::tick`] runs the same fixed sequence:
//!
//! 1. Player dynamics ([`crate::vehicle::integrate`])
//! 2. Lap and resource checks (laps, zone refills, fuel, guard rail)
//! 3. Collision scan against the AI field
//! 4. Finish check and telemetry publish
//! 5. AI dynamics
//!
//! The session never touches career state.  It hands back a [`TickReport`]
//! and, once per race, a [`RaceComplete`] for the caller to apply.

use crate::ai::{spawn_field, AiRacer};
use crate::collision::{self, Impact};
use crate::config::RaceConfig;
use crate::controls::ControlState;
use crate::lap::{LapCompleted, LapTracker, RacePhase};
use crate::reserves::{Reserves, ZoneRefill};
use crate::telemetry::{standing, RaceTelemetry};
use crate::track::{Track, TrackDescriptor};
use crate::vehicle::{integrate, DriveConditions, Kinematics, ProfileScales, VehicleProfile};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Everything a race needs from outside: which event, which track, which car.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceContext {
    pub event_id: Option<String>,
    pub track: TrackDescriptor,
    pub vehicle: VehicleProfile,
}

/// Fired once per race when the player has finished and slowed down.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct RaceComplete {
    pub event_id: Option<String>,
    /// 1-based finishing position.
    pub position: u32,
    pub best_lap: Option<f32>,
    pub total_time: f32,
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub telemetry: RaceTelemetry,
    pub lap: Option<LapCompleted>,
    pub refill: ZoneRefill,
    pub rail_damage: Option<f32>,
    pub impact: Option<Impact>,
    pub completed: Option<RaceComplete>,
}

pub struct RaceSession {
    context: RaceContext,
    config: RaceConfig,
    track: Track,
    scales: ProfileScales,
    kinematics: Kinematics,
    reserves: Reserves,
    laps: LapTracker,
    ai: Vec<AiRacer>,
    rng: StdRng,
    started: bool,
    race_time: f32,
    telemetry: RaceTelemetry,
}

impl RaceSession {
    /// Build a race on the grid.  `seed` drives every random choice (AI field,
    /// impact kicks), so equal seeds and inputs replay identically.
    pub fn new(context: RaceContext, config: &RaceConfig, seed: u64) -> Self {
        let track = Track::build(&context.track, config);
        let scales = ProfileScales::derive(&context.vehicle, config);
        let mut rng = StdRng::seed_from_u64(seed);
        let ai = spawn_field(config.ai_racer_count, &mut rng, config);
        let laps = LapTracker::new(track.total_laps);

        let mut session = Self {
            reserves: Reserves::full(&scales),
            context,
            config: config.clone(),
            track,
            scales,
            kinematics: Kinematics::default(),
            laps,
            ai,
            rng,
            started: false,
            race_time: 0.0,
            telemetry: RaceTelemetry::default(),
        };
        session.telemetry = session.snapshot();
        info!(
            "[race] Grid formed: track {:?}, {} laps, {} AI racers",
            session.track.id,
            session.track.total_laps,
            session.ai.len()
        );
        session
    }

    /// Green light: controls and progress go live.
    pub fn launch(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.laps.start();
        info!("[race] Green light");
    }

    /// Put everyone back on the grid for another attempt.
    pub fn restart(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.kinematics = Kinematics::default();
        self.reserves = Reserves::full(&self.scales);
        self.laps.reset();
        for racer in &mut self.ai {
            racer.reset(&mut self.rng, &self.config);
        }
        self.started = false;
        self.race_time = 0.0;
        self.telemetry = self.snapshot();
        info!("[race] Restarted");
    }

    /// Advance the whole race by `dt` seconds of simulation time.
    pub fn tick(&mut self, controls: &ControlState, dt: f32) -> TickReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let config = &self.config;
        let finished = self.laps.phase().is_finished();

        // 1. Player dynamics
        let conditions = DriveConditions {
            started: self.started,
            finished,
            armor_fraction: self.reserves.armor_fraction(),
            fuel: self.reserves.fuel,
        };
        self.kinematics = integrate(
            self.kinematics,
            controls,
            dt,
            &conditions,
            &self.scales,
            config,
        );
        if self.laps.phase() == RacePhase::Racing {
            self.race_time += dt;
        }

        // 2. Laps and resources
        let lap = self.laps.observe(self.kinematics.progress, dt, config);
        if let Some(lap) = lap {
            info!(
                "[race] Lap {} in {:.2}s (best {:.2}s)",
                lap.lap, lap.time, lap.best
            );
        }
        let progress = self.kinematics.progress;
        let refill = self.reserves.update_zones(
            self.track.in_recharge_zone(progress),
            self.track.in_repair_zone(progress),
            self.started,
            config,
        );
        self.reserves.consume_fuel(
            self.kinematics.velocity,
            controls.sanitized().boost,
            self.started,
            dt,
            config,
        );
        self.reserves.tick_cooldown(dt);
        let racing = self.laps.phase() == RacePhase::Racing;
        let rail_damage = self.reserves.guard_rail_contact(
            &mut self.kinematics,
            self.scales.guard_threshold(config),
            !racing,
            config,
        );

        // 3. Collision scan
        let impact = collision::scan(
            &mut self.kinematics,
            &mut self.reserves,
            &mut self.ai,
            racing,
            &self.track,
            &mut self.rng,
            config,
        );

        // 4. Finish check and telemetry
        self.telemetry = self.snapshot();
        let completed = if self.laps.check_finish(self.kinematics.velocity, &self.config) {
            let complete = RaceComplete {
                event_id: self.context.event_id.clone(),
                position: self.telemetry.position,
                best_lap: self.laps.best_lap(),
                total_time: self.race_time,
            };
            info!(
                "[race] Finished P{} in {:.2}s",
                complete.position, complete.total_time
            );
            Some(complete)
        } else {
            None
        };

        // 5. AI dynamics
        for racer in &mut self.ai {
            racer.update(dt, self.started, &self.config);
        }

        TickReport {
            telemetry: self.telemetry.clone(),
            lap,
            refill,
            rail_damage,
            impact,
            completed,
        }
    }

    fn snapshot(&self) -> RaceTelemetry {
        let frame = self.track.frame(self.kinematics.progress);
        RaceTelemetry {
            speed: self.kinematics.velocity.max(0.0),
            progress: self.kinematics.progress,
            lap: self.laps.current_lap(),
            total_laps: self.laps.total_laps(),
            lap_time: self.laps.lap_time(),
            best_lap: self.laps.best_lap(),
            position: standing(self.kinematics.distance, &self.ai),
            fuel_percent: self.reserves.fuel_fraction() * 100.0,
            armor_percent: self.reserves.armor_fraction() * 100.0,
            car_position: frame.offset(
                self.kinematics.lateral_offset,
                self.config.player_ride_height,
            ),
            car_direction: frame.forward,
        }
    }

    pub fn context(&self) -> &RaceContext {
        &self.context
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn scales(&self) -> &ProfileScales {
        &self.scales
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn reserves(&self) -> &Reserves {
        &self.reserves
    }

    pub fn laps(&self) -> &LapTracker {
        &self.laps
    }

    pub fn phase(&self) -> RacePhase {
        self.laps.phase()
    }

    pub fn ai(&self) -> &[AiRacer] {
        &self.ai
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Telemetry from the most recent tick.
    pub fn telemetry(&self) -> &RaceTelemetry {
        &self.telemetry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GameCatalog;
    use crate::vehicle::effective_top_speed;

    const DT: f32 = 1.0 / 60.0;

    fn stock_vehicle() -> VehicleProfile {
        let catalog = GameCatalog::default();
        VehicleProfile::build(&catalog, catalog.car("vx-orion").unwrap(), &[])
    }

    fn context(laps: u32) -> RaceContext {
        RaceContext {
            event_id: Some("test-event".into()),
            track: TrackDescriptor {
                laps: Some(laps),
                ..Default::default()
            },
            vehicle: stock_vehicle(),
        }
    }

    fn solo_config() -> RaceConfig {
        RaceConfig {
            ai_racer_count: 0,
            ..RaceConfig::default()
        }
    }

    fn throttle() -> ControlState {
        ControlState {
            accelerate: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn car_is_held_until_launch() {
        let mut session = RaceSession::new(context(3), &RaceConfig::default(), 1);
        for _ in 0..120 {
            session.tick(&throttle(), DT);
        }
        assert_eq!(session.kinematics().progress, 0.0);
        assert_eq!(session.phase(), RacePhase::PreStart);
        assert_eq!(session.telemetry().position, 20);
    }

    #[test]
    fn single_lap_race_completes_exactly_once() {
        let mut session = RaceSession::new(context(1), &solo_config(), 1);
        session.launch();

        let mut laps = Vec::new();
        let mut completions = Vec::new();
        let mut saw_finishing = false;
        for _ in 0..60 * 60 {
            let report = session.tick(&throttle(), DT);
            laps.extend(report.lap);
            completions.extend(report.completed);
            saw_finishing |= session.phase() == RacePhase::Finishing;
        }

        assert_eq!(laps.len(), 1);
        assert!(saw_finishing);
        assert_eq!(session.phase(), RacePhase::Finished);
        assert_eq!(completions.len(), 1);
        let complete = &completions[0];
        assert_eq!(complete.position, 1);
        assert_eq!(complete.event_id.as_deref(), Some("test-event"));
        assert_eq!(complete.best_lap, Some(laps[0].time));
        assert_eq!(session.telemetry().lap, 1);
        assert!(session.kinematics().velocity < session.scales().top_speed * 0.1);
    }

    #[test]
    fn same_seed_same_race() {
        let config = RaceConfig::default();
        let mut a = RaceSession::new(context(2), &config, 42);
        let mut b = RaceSession::new(context(2), &config, 42);
        a.launch();
        b.launch();
        for _ in 0..600 {
            let ra = a.tick(&throttle(), DT);
            let rb = b.tick(&throttle(), DT);
            assert_eq!(ra, rb);
        }
    }

    #[test]
    fn restart_returns_everyone_to_the_grid() {
        let mut session = RaceSession::new(context(3), &RaceConfig::default(), 5);
        session.launch();
        for _ in 0..600 {
            session.tick(&throttle(), DT);
        }
        assert!(session.kinematics().progress > 0.0);

        session.restart(6);
        assert!(!session.started());
        assert_eq!(session.phase(), RacePhase::PreStart);
        assert_eq!(session.kinematics(), &Kinematics::default());
        assert_eq!(session.reserves().fuel, session.reserves().fuel_capacity);
        for (i, racer) in session.ai().iter().enumerate() {
            assert!((racer.progress - crate::ai::grid_position(i, &RaceConfig::default())).abs() < 1e-6);
            assert_eq!(racer.boost_timer, 0.0);
        }
    }

    #[test]
    fn passing_the_field_improves_position() {
        let mut session = RaceSession::new(context(3), &RaceConfig::default(), 3);
        session.launch();
        let start = session.tick(&throttle(), DT).telemetry.position;
        for _ in 0..60 * 4 {
            session.tick(&throttle(), DT);
        }
        assert!(session.telemetry().position < start);
    }

    #[test]
    fn reversing_over_the_line_stays_last() {
        let mut session = RaceSession::new(context(3), &RaceConfig::default(), 11);
        session.launch();
        let brake = ControlState {
            brake: 1.0,
            ..Default::default()
        };
        let mut crossed = false;
        for _ in 0..60 * 3 {
            let report = session.tick(&brake, DT);
            crossed |= report.telemetry.progress > 0.9;
            assert_eq!(report.telemetry.position, 20);
        }
        assert!(crossed);
        assert!(session.kinematics().velocity < 0.0);
        assert!(session.kinematics().distance < 0.0);
    }

    #[test]
    fn telemetry_stays_in_range() {
        let mut session = RaceSession::new(context(2), &RaceConfig::default(), 8);
        session.launch();
        let wild = ControlState {
            accelerate: 1.0,
            steer: 1.0,
            boost: true,
            ..Default::default()
        };
        for _ in 0..60 * 20 {
            let t = session.tick(&wild, DT).telemetry;
            assert!((0.0..1.0).contains(&t.progress));
            assert!((0.0..=100.0).contains(&t.fuel_percent));
            assert!((0.0..=100.0).contains(&t.armor_percent));
            assert!(t.speed >= 0.0);
            assert!(t.lap >= 1 && t.lap <= t.total_laps);
            assert!((1..=20).contains(&t.position));
        }
    }

    #[test]
    fn boosting_off_zone_drains_to_empty_then_limps() {
        let config = RaceConfig::default();
        let scales = ProfileScales::derive(&stock_vehicle(), &config);
        let mut reserves = Reserves::new(100.0, scales.armor_capacity, 1.0, 1.0, scales.boost_power);
        let boost = ControlState {
            accelerate: 1.0,
            boost: true,
            ..Default::default()
        };
        let mut kinematics = Kinematics {
            velocity: 100.0,
            ..Default::default()
        };

        let mut emptied_at = None;
        for tick in 0..60 * 120 {
            let before = reserves.fuel;
            let conditions = DriveConditions {
                started: true,
                finished: false,
                armor_fraction: reserves.armor_fraction(),
                fuel: reserves.fuel,
            };
            kinematics = integrate(kinematics, &boost, DT, &conditions, &scales, &config);
            reserves.consume_fuel(kinematics.velocity, true, true, DT, &config);

            match emptied_at {
                None => {
                    assert!(reserves.fuel < before, "tick {tick}");
                    if reserves.fuel == 0.0 {
                        emptied_at = Some(tick);
                    }
                }
                Some(_) => {
                    assert_eq!(reserves.fuel, 0.0);
                    assert!(kinematics.velocity <= config.limp_speed + 1e-4);
                    let cap = effective_top_speed(true, &conditions, &scales, &config);
                    assert!(cap <= config.limp_speed);
                }
            }
        }
        assert!(emptied_at.is_some());
    }
}
