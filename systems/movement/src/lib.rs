#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that advances bodies along the tile grid.
//!
//! Bodies move continuously but may only change heading close to the centre
//! of their tile, which keeps them aligned with the corridors. The same rules
//! apply to the player and to the pursuers; the only difference is that
//! pursuers may walk the ghost-only corridor while they are already inside it.

use std::time::Duration;

use maze_chase_core::{Body, BodyKind, Direction, Layout, Tile};
use tracing::trace;

const DEFAULT_TILE_LENGTH: f32 = 16.0;
const DEFAULT_TURN_MARGIN_RATIO: f32 = 0.1;
const DEFAULT_TELEPORT_COOLDOWN: Duration = Duration::from_millis(500);

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    tile_length: f32,
    turn_margin_ratio: f32,
    teleport_cooldown: Duration,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `turn_margin_ratio` is the fraction of a tile a body may be away from
    /// its tile centre, on both axes, and still turn.
    #[must_use]
    pub const fn new(
        tile_length: f32,
        turn_margin_ratio: f32,
        teleport_cooldown: Duration,
    ) -> Self {
        Self {
            tile_length,
            turn_margin_ratio,
            teleport_cooldown,
        }
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Maximum distance from the tile centre at which a turn is accepted.
    #[must_use]
    pub fn turn_margin(&self) -> f32 {
        self.tile_length * self.turn_margin_ratio
    }

    /// Minimum time between two tunnel crossings of the same body.
    #[must_use]
    pub const fn teleport_cooldown(&self) -> Duration {
        self.teleport_cooldown
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_TILE_LENGTH,
            DEFAULT_TURN_MARGIN_RATIO,
            DEFAULT_TELEPORT_COOLDOWN,
        )
    }
}

/// Tunnel crossing performed during [`Movement::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Teleport {
    /// Tunnel entry the body stood on.
    pub from: Tile,
    /// Tile the body was moved to.
    pub to: Tile,
}

/// Pure system that applies the movement rules to individual bodies.
#[derive(Clone, Debug, Default)]
pub struct Movement {
    config: Config,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration the system was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Reports whether the body is close enough to its tile centre to turn.
    #[must_use]
    pub fn at_turn_point(&self, body: &Body) -> bool {
        let offset = (body.tile_center() - body.position()).abs();
        let margin = self.config.turn_margin();
        offset.x < margin && offset.y < margin
    }

    /// Attempts to point the body toward `direction`.
    ///
    /// The request succeeds only when the neighbouring tile in that direction
    /// is traversable and the body sits within the turn margin of its tile
    /// centre. A successful turn aligns the body with the new corridor and
    /// starts it moving. Returns whether the body's heading or running state
    /// changed.
    pub fn try_turn(&self, body: &mut Body, layout: &Layout, direction: Direction) -> bool {
        if body.is_running() && body.direction() == direction {
            return false;
        }

        let from = body.tile();
        if !is_traversable(layout, body.kind(), from, from.step(direction)) {
            return false;
        }
        if !self.at_turn_point(body) {
            return false;
        }

        align_for(body, direction);
        body.set_direction(direction);
        body.set_running(true);
        true
    }

    /// Advances a running body by `dt`.
    ///
    /// Bodies standing on a tunnel entry are moved to the paired tile once
    /// their teleport cooldown elapsed. Otherwise the body moves along its
    /// heading, halting on its tile centre for the rest of the step when it
    /// reaches it. A body whose next tile is blocked stops at the centre.
    pub fn advance(
        &self,
        body: &mut Body,
        layout: &Layout,
        dt: Duration,
        now: Duration,
    ) -> Option<Teleport> {
        if !body.is_running() {
            return None;
        }

        let tile = body.tile();
        if let Some(exit) = layout.tunnel_exit(tile) {
            if self.teleport_ready(body, now) {
                body.center_on(exit);
                body.mark_teleport(now);
                body.set_running(true);
                trace!(?tile, ?exit, "body crossed tunnel");
                return Some(Teleport {
                    from: tile,
                    to: exit,
                });
            }
        }

        let direction = body.direction();
        let distance = body.speed() * dt.as_secs_f32();
        let remaining = distance_to_center(body);
        let open_ahead = is_traversable(layout, body.kind(), tile, tile.step(direction));
        if remaining > 0.0 && distance >= remaining {
            // Steps end on the tile centre so every junction passes through
            // the turn window.
            let center = body.tile_center();
            body.set_position(center);
        } else if remaining > 0.0 || open_ahead {
            body.translate(direction.unit() * distance);
        } else if layout.tunnel_exit(tile).is_none() {
            body.set_running(false);
        }
        None
    }

    fn teleport_ready(&self, body: &Body, now: Duration) -> bool {
        body.last_teleport().map_or(true, |last| {
            now.saturating_sub(last) >= self.config.teleport_cooldown
        })
    }
}

/// Reports whether a body of `kind` standing on `from` may enter `to`.
///
/// Accessible tiles and tunnel endpoints are open to everyone. Ghost-only
/// tiles are open to pursuers, but only while they are already inside the
/// ghost-only area.
#[must_use]
pub fn is_traversable(layout: &Layout, kind: BodyKind, from: Tile, to: Tile) -> bool {
    if layout.is_accessible(to) || layout.is_tunnel_endpoint(to) {
        return true;
    }

    kind == BodyKind::Pursuer && layout.is_ghost_only(from) && layout.is_ghost_only(to)
}

/// Signed distance left until the body reaches its tile centre along its
/// heading. Non-positive once the centre was reached or passed.
fn distance_to_center(body: &Body) -> f32 {
    let center = body.tile_center();
    let position = body.position();
    match body.direction() {
        Direction::Right => center.x - position.x,
        Direction::Left => position.x - center.x,
        Direction::Down => center.y - position.y,
        Direction::Up => position.y - center.y,
    }
}

/// Snaps the axis perpendicular to `direction` onto the tile centre.
fn align_for(body: &mut Body, direction: Direction) {
    let center = body.tile_center();
    let mut position = body.position();
    if direction.is_horizontal() {
        position.y = center.y;
    } else {
        position.x = center.x;
    }
    body.set_position(position);
}
