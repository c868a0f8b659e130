use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::{Fixed, TimeUpdateStrategy};
use clap::Parser;
use wg_core::{WgCorePlugin, WorldConfig, WorldPos};
use wg_noise::WgNoisePlugin;
use wg_player::{NavigateTo, NavigationFailed, Navigator, Player, WgPlayerPlugin, WorldPosition};
use wg_world::{WgWorldPlugin, WorldManager};

/// Headless world runner: spawns the player, walks it toward a goal and
/// reports what happened.
#[derive(Debug, Parser)]
#[command(name = "wildgrove", version, about = "Headless Wildgrove world runner")]
struct Args {
    /// RON world config. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the world seed from the config.
    #[arg(long)]
    seed: Option<u32>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Goal offset from the spawn point, in world units.
    #[arg(long = "goal-dx", default_value_t = 400.0)]
    goal_dx: f64,
    #[arg(long = "goal-dy", default_value_t = 300.0)]
    goal_dy: f64,
    /// Fixed timestep in seconds.
    #[arg(long = "fixed-dt", default_value_t = 1.0 / 30.0)]
    fixed_dt: f64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match WorldConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("failed to load {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut app = App::new();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        args.fixed_dt,
    )));
    app.insert_resource(Time::<Fixed>::from_seconds(args.fixed_dt));
    app.add_plugins((MinimalPlugins, LogPlugin::default()))
        .add_plugins((
            WgCorePlugin {
                config: config.clone(),
            },
            WgNoisePlugin { seed: config.seed },
            WgWorldPlugin,
            WgPlayerPlugin,
        ));

    // Startup spawns the player.
    app.update();

    let mut players = app
        .world_mut()
        .query_filtered::<(Entity, &WorldPosition), With<Player>>();
    let Ok((player, start)) = players.get_single(app.world()).map(|(e, p)| (e, p.0)) else {
        error!("Player was not spawned");
        return ExitCode::FAILURE;
    };

    let goal = WorldPos::new(start.x + args.goal_dx, start.y + args.goal_dy);
    info!(
        "Walking from ({:.1}, {:.1}) toward ({:.1}, {:.1})",
        start.x, start.y, goal.x, goal.y
    );
    app.world_mut().send_event(NavigateTo {
        entity: player,
        target: goal,
    });

    let mut failed = false;
    for tick in 0..args.ticks {
        app.update();

        let events = app.world().resource::<Events<NavigationFailed>>();
        if !events.is_empty() {
            failed = true;
        }
        let idle = app
            .world()
            .get::<Navigator>(player)
            .map_or(true, Navigator::is_idle);
        if idle && tick > 0 {
            break;
        }
    }

    let end = app
        .world()
        .get::<WorldPosition>(player)
        .map_or(start, |p| p.0);
    let stats = app.world().resource::<WorldManager>().cache_stats();
    info!(
        "Finished at ({:.1}, {:.1}), {:.1} from goal; {} chunks cached, {} generated, {} evicted",
        end.x,
        end.y,
        end.distance(goal),
        stats.cached,
        stats.generated,
        stats.evicted
    );

    if failed {
        warn!("Navigation did not complete");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
