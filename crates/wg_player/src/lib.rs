use std::collections::VecDeque;

use bevy::prelude::*;
use wg_core::{WorldConfig, WorldPos};
use wg_world::{Pathfinder, ViewFocus, WorldManager};

/// Player marker component.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Position of an actor in world units.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPosition(pub WorldPos);

/// Waypoints an actor is walking along.
#[derive(Component, Debug, Default)]
pub struct Navigator {
    pub waypoints: VecDeque<WorldPos>,
    /// Where the current route was requested to end.
    pub target: Option<WorldPos>,
}

impl Navigator {
    pub fn is_idle(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.target = None;
    }
}

/// Request to walk `entity` to `target`.
#[derive(Event, Clone, Copy, Debug)]
pub struct NavigateTo {
    pub entity: Entity,
    pub target: WorldPos,
}

/// Sent when a navigation request or an active route cannot be completed.
#[derive(Event, Clone, Copy, Debug)]
pub struct NavigationFailed {
    pub entity: Entity,
    pub target: WorldPos,
}

/// Player plugin for Wildgrove.
/// Spawns the player at a safe point and walks it along planned routes.
pub struct WgPlayerPlugin;

impl Plugin for WgPlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NavigateTo>()
            .add_event::<NavigationFailed>()
            .add_systems(Startup, spawn_player)
            .add_systems(Update, (plan_routes, follow_view))
            .add_systems(FixedUpdate, follow_routes);
    }
}

/// Move `from` toward `to` by at most `max_step`, stopping on the target.
pub fn step_toward(from: WorldPos, to: WorldPos, max_step: f64) -> WorldPos {
    let distance = from.distance(to);
    if distance <= max_step || distance == 0.0 {
        return to;
    }
    let t = max_step.max(0.0) / distance;
    WorldPos::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}

fn spawn_player(
    mut commands: Commands,
    mut world: ResMut<WorldManager>,
    mut focus: ResMut<ViewFocus>,
) {
    let pos = world.find_safe_spawn_position();
    focus.center = pos;
    commands.spawn((Player, WorldPosition(pos), Navigator::default()));
    info!("Player spawned at ({:.1}, {:.1})", pos.x, pos.y);
}

/// Plan a route for each request. The latest request for an actor wins.
fn plan_routes(
    mut requests: EventReader<NavigateTo>,
    mut failures: EventWriter<NavigationFailed>,
    pathfinder: Res<Pathfinder>,
    mut world: ResMut<WorldManager>,
    mut actors: Query<(&WorldPosition, &mut Navigator)>,
) {
    for request in requests.read() {
        let Ok((position, mut navigator)) = actors.get_mut(request.entity) else {
            warn!("Navigation request for unknown entity {:?}", request.entity);
            continue;
        };

        navigator.clear();
        match pathfinder.find_path(&mut *world, position.0, request.target) {
            Some(path) => {
                debug!(
                    "Route to ({:.1}, {:.1}) has {} waypoints",
                    request.target.x,
                    request.target.y,
                    path.len()
                );
                navigator.waypoints = path.into();
                navigator.target = Some(request.target);
            }
            None => {
                info!("No route to ({:.1}, {:.1})", request.target.x, request.target.y);
                failures.send(NavigationFailed {
                    entity: request.entity,
                    target: request.target,
                });
            }
        }
    }
}

/// Advance every actor along its route.
///
/// A step is committed only when the destination allows movement. A blocked
/// step abandons the route.
fn follow_routes(
    time: Res<Time>,
    config: Res<WorldConfig>,
    mut world: ResMut<WorldManager>,
    mut failures: EventWriter<NavigationFailed>,
    mut actors: Query<(Entity, &mut WorldPosition, &mut Navigator)>,
) {
    let dt = f64::from(time.delta_secs());
    for (entity, mut position, mut navigator) in &mut actors {
        while navigator
            .waypoints
            .front()
            .is_some_and(|wp| wp.distance(position.0) < config.waypoint_reach)
        {
            navigator.waypoints.pop_front();
        }
        let Some(&waypoint) = navigator.waypoints.front() else {
            if navigator.target.take().is_some() {
                debug!("{:?} reached its destination", entity);
            }
            continue;
        };

        let here = world.query_movement(position.0);
        let speed = config.walk_speed * here.speed_factor.max(0.1);
        let next = step_toward(position.0, waypoint, speed * dt);
        if world.query_movement(next).allowed {
            position.0 = next;
        } else {
            debug!("{:?} blocked at ({:.1}, {:.1})", entity, next.x, next.y);
            if let Some(target) = navigator.target {
                failures.send(NavigationFailed { entity, target });
            }
            navigator.clear();
        }
    }
}

/// Keep chunks streaming around the player when it changes chunk.
fn follow_view(
    players: Query<&WorldPosition, (With<Player>, Changed<WorldPosition>)>,
    mut focus: ResMut<ViewFocus>,
) {
    for position in &players {
        if position.0.chunk() != focus.center.chunk() {
            focus.center = position.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bevy::time::{Fixed, TimeUpdateStrategy};
    use wg_core::{TerrainKind, WgCorePlugin};
    use wg_entity_spawn::{RockGenerator, RockSize};
    use wg_tilemap::ObjectKind;
    use wg_world::{FlatChunkGenerator, WgWorldPlugin};

    const DT: f64 = 1.0 / 30.0;

    fn flat_app(terrain: TerrainKind) -> App {
        flat_app_with(terrain, |_| {})
    }

    fn flat_app_with(terrain: TerrainKind, setup: impl FnOnce(&mut WorldManager)) -> App {
        let mut app = App::new();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(DT)));
        app.insert_resource(Time::<Fixed>::from_seconds(DT));
        app.add_plugins((MinimalPlugins, WgCorePlugin::default(), WgWorldPlugin, WgPlayerPlugin));
        let config = WorldConfig {
            spawn_max_iterations: 100,
            ..WorldConfig::default()
        };
        let mut world = WorldManager::with_generator(config, FlatChunkGenerator::new(terrain));
        setup(&mut world);
        app.insert_resource(world);
        app.update();
        app
    }

    fn player(app: &mut App) -> Entity {
        let mut query = app.world_mut().query_filtered::<Entity, With<Player>>();
        query.single(app.world())
    }

    #[test]
    fn step_toward_clamps_to_target() {
        let from = WorldPos::new(0.0, 0.0);
        let to = WorldPos::new(30.0, 40.0);
        assert_eq!(step_toward(from, to, 100.0), to);
        let mid = step_toward(from, to, 5.0);
        assert!((mid.x - 3.0).abs() < 1e-9 && (mid.y - 4.0).abs() < 1e-9);
        assert_eq!(step_toward(to, to, 1.0), to);
    }

    #[test]
    fn player_spawns_on_flat_land() {
        let mut app = flat_app(TerrainKind::Plains);
        let entity = player(&mut app);
        let pos = app.world().get::<WorldPosition>(entity).copied();
        assert_eq!(pos, Some(WorldPosition(WorldPos::ORIGIN)));
    }

    #[test]
    fn player_walks_to_target() {
        let mut app = flat_app(TerrainKind::Plains);
        let entity = player(&mut app);
        let target = WorldPos::new(525.0, 25.0);
        app.world_mut().send_event(NavigateTo { entity, target });

        for _ in 0..300 {
            app.update();
        }

        let pos = app.world().get::<WorldPosition>(entity).map(|p| p.0);
        let pos = pos.expect("player has a position");
        assert!(pos.distance(target) < 25.0, "player stopped at {:?}", pos);
        assert!(app.world().get::<Navigator>(entity).is_some_and(Navigator::is_idle));
    }

    #[test]
    fn player_beside_boulder_walks_away_from_it() {
        let mut app = flat_app_with(TerrainKind::Plains, |world| {
            let mut rock = RockGenerator::generate(RockSize::Boulder, 0, 0);
            rock.radius = 40.0;
            world.spawn_object(WorldPos::new(60.0, 25.0), ObjectKind::Rock(rock));
        });
        let entity = player(&mut app);
        let start = app.world().get::<WorldPosition>(entity).map(|p| p.0);
        assert_eq!(start, Some(WorldPos::ORIGIN));

        let target = WorldPos::new(-275.0, 25.0);
        app.world_mut().send_event(NavigateTo { entity, target });
        for _ in 0..300 {
            app.update();
        }

        let pos = app.world().get::<WorldPosition>(entity).map(|p| p.0);
        let pos = pos.expect("player has a position");
        assert!(pos.distance(target) < 25.0, "player stopped at {:?}", pos);
        let failures = app.world().resource::<Events<NavigationFailed>>();
        assert!(failures.is_empty());
    }

    #[test]
    fn shallow_water_slows_walking() {
        let mut dry = flat_app(TerrainKind::Plains);
        let mut wet = flat_app(TerrainKind::ShallowWater);
        let target = WorldPos::new(325.0, 25.0);
        for app in [&mut dry, &mut wet] {
            let entity = player(app);
            app.world_mut().send_event(NavigateTo { entity, target });
            for _ in 0..20 {
                app.update();
            }
        }

        let x = |app: &mut App| {
            let entity = player(app);
            app.world().get::<WorldPosition>(entity).map_or(0.0, |p| p.0.x)
        };
        let (dry_x, wet_x) = (x(&mut dry), x(&mut wet));
        assert!(wet_x > 0.0, "wading route should be planned");
        assert!(wet_x < dry_x, "wading {} should trail walking {}", wet_x, dry_x);
    }

    #[test]
    fn unreachable_target_reports_failure() {
        let mut app = flat_app(TerrainKind::Plains);
        let entity = player(&mut app);
        app.world_mut().send_event(NavigateTo {
            entity,
            target: WorldPos::new(f64::NAN, 0.0),
        });
        app.update();

        let failures = app.world().resource::<Events<NavigationFailed>>();
        assert_eq!(failures.len(), 1);
    }
}
