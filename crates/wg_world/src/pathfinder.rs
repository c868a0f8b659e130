//! Grid A* over the world's traversability oracle.
//!
//! The world is overlaid with a square grid of `grid_size` world units. A
//! cell is open when the oracle allows movement at its centre. Searches are
//! bounded by a node-expansion budget so that unreachable goals fail fast
//! instead of flooding an unbounded world.

use std::cell::Cell;
use std::collections::HashMap;

use bevy::prelude::*;
use pathfinding::prelude::astar;
use wg_core::{Traversability, WorldConfig, WorldPos};

/// Pathfinding grid cell.
pub type GridCell = (i64, i64);

/// Cost of an orthogonal step. Diagonals cost `DIAGONAL_COST`, about √2 times more.
const STRAIGHT_COST: u64 = 10;
const DIAGONAL_COST: u64 = 14;

const NEIGHBORS: [(i64, i64); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Plans multi-waypoint routes for an actor.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct Pathfinder {
    grid_size: f64,
    max_iterations: usize,
    slow_cost: u64,
}

impl Pathfinder {
    pub fn new(grid_size: f64, max_iterations: usize, slow_cost: u32) -> Self {
        Self {
            grid_size,
            max_iterations,
            slow_cost: u64::from(slow_cost.max(1)),
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(
            config.path_grid_size,
            config.path_max_iterations,
            config.slow_terrain_cost,
        )
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Grid cell containing `pos`.
    pub fn cell_of(&self, pos: WorldPos) -> GridCell {
        (
            (pos.x / self.grid_size).floor() as i64,
            (pos.y / self.grid_size).floor() as i64,
        )
    }

    /// World-space centre of a grid cell.
    pub fn cell_center(&self, cell: GridCell) -> WorldPos {
        WorldPos::new(
            cell.0 as f64 * self.grid_size + self.grid_size * 0.5,
            cell.1 as f64 * self.grid_size + self.grid_size * 0.5,
        )
    }

    /// Find a route from `start` to `end`.
    ///
    /// Returns cell centres from the start cell to the goal cell. The start
    /// cell is left out when its centre is blocked, so every waypoint is open.
    /// A blocked goal is replaced by its first open neighbour.
    /// Returns `None` when no route exists within the expansion budget.
    pub fn find_path<T: Traversability + ?Sized>(
        &self,
        world: &mut T,
        start: WorldPos,
        end: WorldPos,
    ) -> Option<Vec<WorldPos>> {
        let finite = [start.x, start.y, end.x, end.y].iter().all(|v| v.is_finite());
        if !finite || !(self.grid_size > 0.0) {
            return None;
        }

        let mut cells = CellCosts {
            pathfinder: self,
            world,
            memo: HashMap::new(),
        };

        let start_cell = self.cell_of(start);
        let mut goal = self.cell_of(end);
        if cells.cost(goal).is_none() {
            let Some(open) = NEIGHBORS
                .iter()
                .map(|&(dx, dy)| step(goal, dx, dy))
                .find(|cell| cells.cost(*cell).is_some())
            else {
                debug!("Path goal ({:.1}, {:.1}) is enclosed", end.x, end.y);
                return None;
            };
            goal = open;
        }

        if start_cell == goal {
            return Some(vec![self.cell_center(goal)]);
        }

        let expansions = Cell::new(0usize);
        let budget = self.max_iterations;

        let result = astar(
            &start_cell,
            |&cell| {
                expansions.set(expansions.get() + 1);
                if expansions.get() > budget {
                    return Vec::new();
                }
                let mut successors = Vec::with_capacity(8);
                for &(dx, dy) in &NEIGHBORS {
                    let next = step(cell, dx, dy);
                    let Some(cost) = cells.cost(next) else {
                        continue;
                    };
                    let diagonal = dx != 0 && dy != 0;
                    if diagonal
                        && (cells.cost(step(cell, dx, 0)).is_none()
                            || cells.cost(step(cell, 0, dy)).is_none())
                    {
                        continue;
                    }
                    let base = if diagonal { DIAGONAL_COST } else { STRAIGHT_COST };
                    successors.push((next, base * cost));
                }
                successors
            },
            |&cell| octile(cell, goal),
            |&cell| cell == goal && expansions.get() <= budget,
        );

        match result {
            Some((route, cost)) => {
                debug!(
                    "Path found: {} waypoints, cost {}, {} expansions",
                    route.len(),
                    cost,
                    expansions.get()
                );
                let skip = usize::from(cells.cost(start_cell).is_none());
                Some(
                    route
                        .into_iter()
                        .skip(skip)
                        .map(|cell| self.cell_center(cell))
                        .collect(),
                )
            }
            None => {
                debug!(
                    "No path from ({:.1}, {:.1}) to ({:.1}, {:.1}) after {} expansions",
                    start.x,
                    start.y,
                    end.x,
                    end.y,
                    expansions.get()
                );
                None
            }
        }
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

/// Memoized per-search cell costs. `None` means blocked.
struct CellCosts<'a, T: ?Sized> {
    pathfinder: &'a Pathfinder,
    world: &'a mut T,
    memo: HashMap<GridCell, Option<u64>>,
}

impl<T: Traversability + ?Sized> CellCosts<'_, T> {
    fn cost(&mut self, cell: GridCell) -> Option<u64> {
        if let Some(cost) = self.memo.get(&cell) {
            return *cost;
        }
        let info = self.world.movement_at(self.pathfinder.cell_center(cell));
        let cost = if !info.allowed {
            None
        } else if info.speed_factor < 1.0 {
            Some(self.pathfinder.slow_cost)
        } else {
            Some(1)
        };
        self.memo.insert(cell, cost);
        cost
    }
}

fn step(cell: GridCell, dx: i64, dy: i64) -> GridCell {
    (cell.0.saturating_add(dx), cell.1.saturating_add(dy))
}

/// Octile distance, admissible for the step costs above.
fn octile(a: GridCell, b: GridCell) -> u64 {
    let dx = a.0.abs_diff(b.0);
    let dy = a.1.abs_diff(b.1);
    let (long, short) = if dx > dy { (dx, dy) } else { (dy, dx) };
    STRAIGHT_COST
        .saturating_mul(long)
        .saturating_add((DIAGONAL_COST - STRAIGHT_COST).saturating_mul(short))
}
