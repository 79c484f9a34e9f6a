use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use hyperlap::career::Career;
use hyperlap::catalog::GameCatalog;
use hyperlap::config;
use hyperlap::controls::ControlState;
use hyperlap::plugin::{race_tick_system, ActiveRace, RacePlugin, StartRaceRequest};
use hyperlap::session::RaceComplete;
use std::env;
use std::time::Duration;

/// Give up on a race that has not finished after this long.
const RACE_TIMEOUT_SECS: f32 = 600.0;

/// Which campaign event to run and with which seed.
#[derive(Resource, Debug, Clone, Copy)]
struct DemoSettings {
    event_order: i64,
    seed: u64,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn request_race(
    catalog: Res<GameCatalog>,
    settings: Res<DemoSettings>,
    mut career: ResMut<Career>,
    mut requests: MessageWriter<StartRaceRequest>,
) {
    match career.start_event(&catalog, settings.event_order) {
        Ok(context) => {
            requests.write(StartRaceRequest {
                context,
                seed: settings.seed,
            });
        }
        Err(e) => error!("[demo] Cannot start event {}: {e}", settings.event_order),
    }
}

/// Full throttle, hold the centreline, boost while the tank is healthy.
fn autopilot_system(active: Res<ActiveRace>, mut controls: ResMut<ControlState>) {
    let Some(session) = active.0.as_ref() else {
        return;
    };
    let kinematics = session.kinematics();
    let telemetry = session.telemetry();
    *controls = ControlState {
        accelerate: 1.0,
        brake: 0.0,
        steer: (kinematics.lateral_offset * 0.8).clamp(-1.0, 1.0),
        boost: telemetry.fuel_percent > 40.0,
    };
}

fn apply_result_system(
    mut results: MessageReader<RaceComplete>,
    catalog: Res<GameCatalog>,
    mut career: ResMut<Career>,
    mut exit: MessageWriter<AppExit>,
) {
    for result in results.read() {
        match career.apply_result(&catalog, result) {
            Ok(reward) => info!(
                "[demo] P{} best lap {:?} → {} credits (balance {})",
                result.position, result.best_lap, reward, career.credits
            ),
            Err(e) => error!("[demo] Could not apply result: {e}"),
        }
        exit.write(AppExit::Success);
    }
}

fn timeout_system(time: Res<Time>, mut exit: MessageWriter<AppExit>) {
    if time.elapsed_secs() > RACE_TIMEOUT_SECS {
        warn!("[demo] Race did not finish within {RACE_TIMEOUT_SECS}s");
        exit.write(AppExit::error());
    }
}

fn main() {
    let settings = DemoSettings {
        event_order: env_or("RACE_EVENT", 0),
        seed: env_or("RACE_SEED", 2024),
    };

    let catalog = GameCatalog::default();
    let career = match catalog.validate().and_then(|()| Career::new(&catalog)) {
        Ok(career) => career,
        Err(e) => {
            eprintln!("hyperlap: invalid catalog: {e}");
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(RacePlugin)
        .insert_resource(catalog)
        .insert_resource(career)
        .insert_resource(settings)
        .add_systems(
            Startup,
            (
                // Load config first so the race is built with the final values.
                config::load_race_config,
                request_race.after(config::load_race_config),
            ),
        )
        .add_systems(
            Update,
            (
                autopilot_system.before(race_tick_system),
                apply_result_system.after(race_tick_system),
                timeout_system,
            ),
        )
        .run();
}
