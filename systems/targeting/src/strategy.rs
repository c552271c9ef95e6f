//! Target-tile strategies of the four pursuers.

use maze_chase_core::{Direction, PursuerId, Tile};

/// Tiles Pinky looks ahead of the player.
const AMBUSH_LEAD: i32 = 4;
/// Tiles ahead of the player that Inky pivots around.
const PINCER_LEAD: i32 = 2;

/// Targeting behaviour attached to a pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Targets the player's tile.
    Direct,
    /// Targets four tiles ahead of the player.
    Ambush,
    /// Doubles the vector from the leader to two tiles ahead of the player.
    Pincer,
    /// Targets the player from afar and its home corner when close.
    Shy,
}

impl Strategy {
    /// Strategy the pursuer follows on every board.
    #[must_use]
    pub const fn for_pursuer(id: PursuerId) -> Self {
        match id {
            PursuerId::Blinky => Self::Direct,
            PursuerId::Pinky => Self::Ambush,
            PursuerId::Inky => Self::Pincer,
            PursuerId::Clyde => Self::Shy,
        }
    }
}

/// Retreat tile of a pursuer on a board of the provided size.
#[must_use]
pub const fn home_corner(id: PursuerId, width: i32, height: i32) -> Tile {
    match id {
        PursuerId::Blinky => Tile::new(width - 1, 0),
        PursuerId::Pinky => Tile::new(0, 0),
        PursuerId::Inky => Tile::new(width - 1, height - 1),
        PursuerId::Clyde => Tile::new(0, height - 1),
    }
}

/// Fixed-size description of how a pursuer picks its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    id: PursuerId,
    strategy: Strategy,
    home_corner: Tile,
}

impl Profile {
    /// Builds the canonical profile of `id` for a board of `width × height` tiles.
    #[must_use]
    pub const fn new(id: PursuerId, width: i32, height: i32) -> Self {
        Self {
            id,
            strategy: Strategy::for_pursuer(id),
            home_corner: home_corner(id, width, height),
        }
    }

    /// Identifier of the pursuer.
    #[must_use]
    pub const fn id(&self) -> PursuerId {
        self.id
    }

    /// Strategy used while hunting.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Tile targeted while scattering or fleeing.
    #[must_use]
    pub const fn home_corner(&self) -> Tile {
        self.home_corner
    }
}

/// What a pursuer is currently trying to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behaviour {
    /// Following its strategy toward the player.
    Hunting,
    /// Retreating to its home corner during a scatter phase.
    Scattering,
    /// Vulnerable and running to its home corner.
    Fleeing,
}

/// Everything a strategy may read when choosing a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetContext {
    /// Current behaviour of the pursuer.
    pub behaviour: Behaviour,
    /// Tile the pursuer occupies.
    pub own_tile: Tile,
    /// Retreat tile of the pursuer.
    pub home_corner: Tile,
    /// Tile the player occupies.
    pub player_tile: Tile,
    /// Heading of the player.
    pub player_direction: Direction,
    /// Tile occupied by the direct-strategy pursuer.
    pub leader_tile: Tile,
    /// Distance in tiles below which the shy strategy retreats.
    pub shy_radius: f32,
}

/// Computes the tile a pursuer following `strategy` steers toward.
#[must_use]
pub fn compute_target(strategy: Strategy, context: &TargetContext) -> Tile {
    if context.behaviour != Behaviour::Hunting {
        return context.home_corner;
    }

    let player = context.player_tile;
    match strategy {
        Strategy::Direct => player,
        Strategy::Ambush => player.offset(context.player_direction, AMBUSH_LEAD),
        Strategy::Pincer => {
            let bait = player.offset(context.player_direction, PINCER_LEAD);
            let leader = context.leader_tile;
            let columns = bait.column() - leader.column();
            let rows = bait.row() - leader.row();
            leader.translate(2 * columns, 2 * rows)
        }
        Strategy::Shy => {
            if context.own_tile.euclidean_distance(player) < context.shy_radius {
                context.home_corner
            } else {
                player
            }
        }
    }
}
