//! Bevy wiring for the race core.
//!
//! ## Update pipeline (chained, in order)
//!
//! 1. [`keyboard_to_controls_system`]: only when an input plugin is present
//! 2. [`start_request_system`]: replaces the active race on [`StartRaceRequest`]
//! 3. [`race_control_system`]: handles [`RestartRace`] and [`EndRace`]
//! 4. [`start_sequence_system`]: advances the start lights on real time
//! 5. [`race_tick_system`]: steps the active [`RaceSession`] on virtual time
//!
//! Hosts talk to the core only through messages and resources: they write
//! [`StartRaceRequest`], [`RestartRace`] and [`EndRace`], drive
//! [`ControlState`], and read [`RaceTelemetry`],
//! [`StartStageChanged`] and [`RaceComplete`].

use crate::config::RaceConfig;
use crate::controls::{keyboard_to_controls_system, ControlState};
use crate::session::{RaceComplete, RaceContext, RaceSession};
use crate::start::{StartSequence, StartStage};
use crate::telemetry::RaceTelemetry;
use bevy::prelude::*;

/// Ask for a new race.  Replaces any race in progress.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct StartRaceRequest {
    pub context: RaceContext,
    pub seed: u64,
}

/// Put the loaded race back on the grid and run the lights again.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartRace {
    pub seed: u64,
}

/// Unload the current race.  Pending start lights are dropped.
#[derive(Message, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndRace;

/// A start light changed.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartStageChanged {
    pub stage: StartStage,
}

/// The race currently loaded, if any.
#[derive(Resource, Default)]
pub struct ActiveRace(pub Option<RaceSession>);

pub struct RacePlugin;

impl Plugin for RacePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RaceConfig>()
            .init_resource::<ControlState>()
            .init_resource::<RaceTelemetry>()
            .init_resource::<StartSequence>()
            .init_resource::<ActiveRace>()
            .add_message::<StartRaceRequest>()
            .add_message::<RestartRace>()
            .add_message::<EndRace>()
            .add_message::<StartStageChanged>()
            .add_message::<RaceComplete>()
            .add_systems(
                Update,
                (
                    keyboard_to_controls_system.run_if(resource_exists::<ButtonInput<KeyCode>>),
                    start_request_system,
                    race_control_system,
                    start_sequence_system,
                    race_tick_system,
                )
                    .chain(),
            );
    }
}

/// Build a session for the latest [`StartRaceRequest`] and restart the lights.
///
/// Restarting the sequence drops every pending light from the previous race.
pub fn start_request_system(
    mut requests: MessageReader<StartRaceRequest>,
    config: Res<RaceConfig>,
    mut active: ResMut<ActiveRace>,
    mut sequence: ResMut<StartSequence>,
    mut telemetry: ResMut<RaceTelemetry>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };
    let session = RaceSession::new(request.context.clone(), &config, request.seed);
    *telemetry = session.telemetry().clone();
    active.0 = Some(session);

    *sequence = StartSequence::from_config(&config);
    sequence.restart();
    info!("[race] Start requested (seed {})", request.seed);
}

/// Restart or tear down the loaded race.  An [`EndRace`] in the same frame
/// wins over any [`RestartRace`].
pub fn race_control_system(
    mut restarts: MessageReader<RestartRace>,
    mut ends: MessageReader<EndRace>,
    mut active: ResMut<ActiveRace>,
    mut sequence: ResMut<StartSequence>,
    mut telemetry: ResMut<RaceTelemetry>,
) {
    let restart = restarts.read().last().copied();
    if ends.read().count() > 0 {
        sequence.cancel();
        if active.0.take().is_some() {
            info!("[race] Race unloaded");
        }
        *telemetry = RaceTelemetry::default();
        return;
    }
    let Some(RestartRace { seed }) = restart else {
        return;
    };
    let Some(session) = active.0.as_mut() else {
        warn!("[race] Restart requested with no race loaded");
        return;
    };
    session.restart(seed);
    *telemetry = session.telemetry().clone();
    sequence.restart();
}

/// Advance the start lights by real elapsed time and launch on green.
pub fn start_sequence_system(
    time: Res<Time<Real>>,
    mut sequence: ResMut<StartSequence>,
    mut active: ResMut<ActiveRace>,
    mut stages: MessageWriter<StartStageChanged>,
) {
    for stage in sequence.advance(time.delta_secs()) {
        debug!("[race] Start stage {:?}", stage);
        if stage == StartStage::Green {
            if let Some(session) = active.0.as_mut() {
                session.launch();
            }
        }
        stages.write(StartStageChanged { stage });
    }
}

/// Step the active race and publish its telemetry.
pub fn race_tick_system(
    time: Res<Time>,
    controls: Res<ControlState>,
    mut active: ResMut<ActiveRace>,
    mut telemetry: ResMut<RaceTelemetry>,
    mut completed: MessageWriter<RaceComplete>,
) {
    let Some(session) = active.0.as_mut() else {
        return;
    };
    let report = session.tick(&controls, time.delta_secs());
    *telemetry = report.telemetry;
    if let Some(result) = report.completed {
        completed.write(result);
    }
}
