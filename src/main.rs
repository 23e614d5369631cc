use std::time::Duration;

use anyhow::Result;
use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use idle_economy::{
    FileSaveStore, SystemClock, load_definition_from_path, load_sample_definition,
};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let options = resources::HostOptions::from_args(&args);

    let definition = match &options.definition {
        Some(path) => load_definition_from_path(path)?,
        None => load_sample_definition()?,
    };
    let tick = Duration::from_millis(definition.config.tick_interval_ms.max(1));
    let engine = definition.into_engine(SystemClock, FileSaveStore::new(&options.save_dir));

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick)))
        .add_plugins(LogPlugin::default())
        .insert_resource(resources::EconomySession::new(engine, &options))
        .add_plugins(host::EconomyHostPlugin)
        .run();
    Ok(())
}

mod resources {
    use std::path::PathBuf;

    use bevy::prelude::*;
    use idle_economy::Engine;

    const DEFAULT_SAVE_DIR: &str = "saves";

    #[derive(Debug, Clone)]
    pub struct HostOptions {
        pub definition: Option<PathBuf>,
        pub save_dir: PathBuf,
        pub run_seconds: Option<f32>,
        pub autopilot: bool,
    }

    impl HostOptions {
        pub fn from_args(args: &[String]) -> Self {
            Self {
                definition: arg_value(args, "--definition").map(PathBuf::from),
                save_dir: arg_value(args, "--save-dir")
                    .map_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR), PathBuf::from),
                run_seconds: arg_value(args, "--run-seconds").and_then(|raw| raw.parse().ok()),
                autopilot: args.iter().any(|arg| arg == "--autopilot"),
            }
        }
    }

    fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.windows(2)
            .find(|w| w[0] == flag)
            .map(|w| w[1].as_str())
    }

    #[derive(Resource)]
    pub struct EconomySession {
        pub engine: Engine,
        pub run_timer: Option<Timer>,
        pub autopilot: bool,
    }

    impl EconomySession {
        pub fn new(engine: Engine, options: &HostOptions) -> Self {
            Self {
                engine,
                run_timer: options
                    .run_seconds
                    .map(|seconds| Timer::from_seconds(seconds.max(0.0), TimerMode::Once)),
                autopilot: options.autopilot,
            }
        }
    }
}

mod host {
    use bevy::prelude::*;
    use idle_economy::{EconomyError, Engine, format_amount};

    use crate::resources::EconomySession;

    pub struct EconomyHostPlugin;

    impl Plugin for EconomyHostPlugin {
        fn build(&self, app: &mut App) {
            app.add_systems(Startup, resume_session).add_systems(
                Update,
                (pump_engine, run_autopilot, finish_run).chain(),
            );
        }
    }

    fn resume_session(mut session: ResMut<EconomySession>) {
        match session.engine.load() {
            Ok(report) => {
                for produced in &report.produced {
                    info!(
                        "offline: +{} {} over {:.0}s",
                        format_amount(produced.amount, 1),
                        produced.resource,
                        report.applied_seconds
                    );
                }
            }
            Err(EconomyError::NoSave { key }) => info!("no save '{key}', starting fresh"),
            Err(err) => warn!("could not load save, starting fresh: {err}"),
        }
        session.engine.start();
    }

    fn pump_engine(mut session: ResMut<EconomySession>) {
        let Some(report) = session.engine.pump() else {
            return;
        };
        for id in &report.unlocked {
            let name = session
                .engine
                .achievement(id)
                .map_or(id.as_str(), |achievement| achievement.name.as_str());
            info!("achievement unlocked: {name}");
        }
    }

    fn run_autopilot(mut session: ResMut<EconomySession>) {
        if !session.autopilot || !session.engine.is_running() {
            return;
        }
        let engine = &mut session.engine;
        let Some(resource) = engine.resources().iter().next().map(|r| r.id.clone()) else {
            return;
        };
        engine.click(&resource, 1.0);

        if let Some(generator) = cheapest_affordable_generator(engine) {
            engine.purchase_generator(&generator, 1);
        }
        let affordable: Vec<String> = engine
            .visible_upgrades()
            .into_iter()
            .filter(|upgrade| upgrade.can_purchase(engine.resources()))
            .map(|upgrade| upgrade.id.clone())
            .collect();
        for upgrade in affordable {
            if engine.purchase_upgrade(&upgrade) {
                info!("autopilot bought upgrade {upgrade}");
            }
        }
    }

    fn finish_run(
        time: Res<Time>,
        mut session: ResMut<EconomySession>,
        mut exit: EventWriter<AppExit>,
    ) {
        let Some(timer) = session.run_timer.as_mut() else {
            return;
        };
        if !timer.tick(time.delta()).just_finished() {
            return;
        }

        let engine = &mut session.engine;
        engine.stop();
        if let Err(err) = engine.save() {
            error!("final save failed: {err}");
        }
        for resource in engine.resources() {
            info!(
                "{}: {} (+{}/s)",
                resource.name,
                resource.formatted(),
                format_amount(engine.production_per_second(&resource.id), 1)
            );
        }
        exit.send(AppExit::Success);
    }

    fn cheapest_affordable_generator(engine: &Engine) -> Option<String> {
        engine
            .generators()
            .iter()
            .filter(|generator| generator.can_purchase(engine.resources(), 1))
            .map(|generator| {
                let price: f64 = generator.current_costs().iter().map(|cost| cost.amount).sum();
                (generator.id.clone(), price)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}
