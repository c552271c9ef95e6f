#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that steers pursuers toward their strategy targets.
//!
//! Targets are recomputed every frame from the player's position and heading.
//! Headings change only at tile centres, where the pursuer greedily takes the
//! open neighbour closest to its target, never reversing unless it reached a
//! dead end.

mod pursuer;
mod strategy;

use std::time::Duration;

use maze_chase_core::{BodyKind, Direction, Layout, PursuitPhase, Tile};
use maze_chase_system_movement::{is_traversable, Movement};
use tracing::trace;

pub use pursuer::Pursuer;
pub use strategy::{compute_target, home_corner, Behaviour, Profile, Strategy, TargetContext};

const DEFAULT_DIRECTION_CHANGE_COOLDOWN: Duration = Duration::from_millis(100);
const DEFAULT_SHY_RADIUS: f32 = 8.0;

/// Configuration parameters required to construct the targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    direction_change_cooldown: Duration,
    shy_radius: f32,
}

impl Config {
    /// Creates a new configuration.
    #[must_use]
    pub const fn new(direction_change_cooldown: Duration, shy_radius: f32) -> Self {
        Self {
            direction_change_cooldown,
            shy_radius,
        }
    }

    /// Minimum time between two direction evaluations of the same pursuer.
    #[must_use]
    pub const fn direction_change_cooldown(&self) -> Duration {
        self.direction_change_cooldown
    }

    /// Distance in tiles below which the shy strategy retreats.
    #[must_use]
    pub const fn shy_radius(&self) -> f32 {
        self.shy_radius
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTION_CHANGE_COOLDOWN, DEFAULT_SHY_RADIUS)
    }
}

/// Shared positions read by every strategy during one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Tile the player occupies.
    pub player_tile: Tile,
    /// Heading of the player.
    pub player_direction: Direction,
    /// Tile occupied by the direct-strategy pursuer.
    pub leader_tile: Tile,
    /// Active scatter/chase phase.
    pub phase: PursuitPhase,
}

/// Targeting system applying strategies and greedy direction selection.
#[derive(Clone, Debug, Default)]
pub struct Targeting {
    config: Config,
}

impl Targeting {
    /// Creates a new targeting system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration the system was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Recomputes and stores the pursuer's target tile.
    pub fn retarget(&self, pursuer: &mut Pursuer, scene: &Scene) -> Tile {
        let context = TargetContext {
            behaviour: pursuer.behaviour(scene.phase),
            own_tile: pursuer.body().tile(),
            home_corner: pursuer.profile().home_corner(),
            player_tile: scene.player_tile,
            player_direction: scene.player_direction,
            leader_tile: scene.leader_tile,
            shy_radius: self.config.shy_radius,
        };
        let target = compute_target(pursuer.profile().strategy(), &context);
        pursuer.set_target(target);
        target
    }

    /// Greedily picks the pursuer's next heading toward its target.
    ///
    /// Evaluations are rate limited by the direction-change cooldown and only
    /// happen within the turn margin of a tile centre. Candidates are visited
    /// in [`Direction::ALL`] order, skipping the reverse of the current
    /// heading and blocked neighbours; the closest destination wins and ties
    /// keep the earlier candidate. With no candidate the pursuer reverses,
    /// except on ghost-only tiles and tunnel endpoints. Returns the new
    /// heading when it changed.
    pub fn select_direction(
        &self,
        movement: &Movement,
        pursuer: &mut Pursuer,
        layout: &Layout,
        now: Duration,
    ) -> Option<Direction> {
        if let Some(last) = pursuer.last_evaluation() {
            if now.saturating_sub(last) < self.config.direction_change_cooldown {
                return None;
            }
        }
        if !movement.at_turn_point(pursuer.body()) {
            return None;
        }
        pursuer.mark_evaluation(now);

        let tile = pursuer.body().tile();
        let current = pursuer.body().direction();
        let target = pursuer.target();
        let best = best_direction(layout, tile, current, target);

        match best {
            Some(direction) => {
                let changed = movement.try_turn(pursuer.body_mut(), layout, direction);
                changed.then_some(direction)
            }
            None if layout.is_ghost_only(tile) || layout.is_tunnel_endpoint(tile) => None,
            None => {
                let reverse = current.opposite();
                pursuer.body_mut().reverse();
                let _ = movement.try_turn(pursuer.body_mut(), layout, reverse);
                trace!(pursuer = ?pursuer.id(), ?tile, "pursuer reversed at dead end");
                Some(reverse)
            }
        }
    }
}

fn best_direction(
    layout: &Layout,
    tile: Tile,
    current: Direction,
    target: Tile,
) -> Option<Direction> {
    let mut best: Option<(Direction, f32)> = None;
    for direction in Direction::ALL {
        if direction == current.opposite() {
            continue;
        }
        let destination = tile.step(direction);
        if !is_traversable(layout, BodyKind::Pursuer, tile, destination) {
            continue;
        }

        let distance = destination.euclidean_distance(target);
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((direction, distance)),
        }
    }
    best.map(|(direction, _)| direction)
}
