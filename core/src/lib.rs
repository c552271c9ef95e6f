#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened during the frame. Systems operate on the shared value types
//! defined here ([`Tile`], [`Body`], [`Layout`]) and never reach into the
//! world directly.

pub mod clock;
pub mod layout;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use clock::{Clock, ManualClock, SystemClock};
pub use layout::{Layout, LayoutError};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Number of pursuers that hunt the player on every board.
pub const PURSUER_COUNT: usize = 4;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Sets the direction the player is holding. The world attempts the turn
    /// on every tick until the request changes.
    Steer {
        /// Requested heading, or `None` when no direction is held.
        direction: Option<Direction>,
    },
    /// Advances the simulation by one frame.
    Tick {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Freezes the simulation; paused time is excluded from every timer.
    Pause,
    /// Resumes a paused simulation.
    Resume,
    /// Starts the next level after the current one was cleared.
    AdvanceLevel,
    /// Restarts the session from level one with full lives and zero score.
    NewGame,
    /// Switches the maze source and restarts the current level on a fresh board.
    SelectMaze {
        /// Source used to build this and subsequent boards.
        kind: MazeKind,
    },
    /// Installs a caller-provided layout for this and subsequent levels.
    LoadLayout {
        /// Layout to play on.
        layout: Box<Layout>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced while playing.
    TimeAdvanced {
        /// Duration of simulated time consumed by the frame.
        dt: Duration,
    },
    /// Announces that a fresh board was installed.
    LevelStarted {
        /// One-based level number.
        level: u32,
        /// Source the board was built from.
        maze: MazeKind,
    },
    /// Confirms that the player changed heading.
    PlayerTurned {
        /// Heading after the turn.
        direction: Direction,
    },
    /// Reports that a body crossed a tunnel.
    Teleported {
        /// Body that was teleported.
        actor: Actor,
        /// Tunnel entry tile.
        from: Tile,
        /// Tile the body was moved to.
        to: Tile,
    },
    /// Confirms that the player consumed a pellet.
    PelletEaten {
        /// Tile the pellet occupied.
        tile: Tile,
        /// Size of the pellet.
        kind: PelletKind,
        /// Points awarded.
        points: u32,
    },
    /// Announces that the player became empowered.
    PlayerEmpowered,
    /// Announces that the empowerment window closed.
    EmpowermentExpired,
    /// Announces that the pursuers switched between scatter and chase.
    PursuitPhaseChanged {
        /// Phase that became active.
        phase: PursuitPhase,
    },
    /// Confirms that the player captured a vulnerable pursuer.
    PursuerCaptured {
        /// Pursuer that was sent back to its spawn.
        pursuer: PursuerId,
        /// Points awarded for the capture.
        points: u32,
        /// Consecutive-capture multiplier applied to the base award.
        multiplier: u32,
    },
    /// Reports that a pursuer caught the player.
    LifeLost {
        /// Pursuer responsible for the loss.
        pursuer: PursuerId,
        /// Lives left after the loss.
        lives_remaining: u32,
    },
    /// Reports that every pellet on the board was consumed.
    LevelCleared {
        /// Level that was cleared.
        level: u32,
    },
    /// Reports that the player ran out of lives.
    GameOver {
        /// Final score of the session.
        score: u64,
    },
    /// Confirms that the session was paused.
    Paused,
    /// Confirms that the session resumed.
    Resumed,
}

/// Body that an [`Event`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    /// The player-controlled body.
    Player,
    /// One of the pursuers.
    Pursuer(PursuerId),
}

/// Sources the world can build boards from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MazeKind {
    /// The hand-authored classic layout.
    Classic,
    /// Randomized spanning-growth (Prim-like) generator.
    SpanningGrowth,
    /// Randomized wall-growth generator.
    WallGrowth,
    /// A layout supplied through [`Command::LoadLayout`].
    Custom,
}

/// Size of a pellet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PelletKind {
    /// Ordinary pellet.
    Small,
    /// Pellet that empowers the player.
    Big,
}

/// Whether the pursuers are hunting or the player is hunting them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Pursuers hunt the player.
    Normal,
    /// The player ate a big pellet and may capture vulnerable pursuers.
    PlayerEmpowered,
}

/// Alternating pursuit phase followed by non-vulnerable pursuers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuitPhase {
    /// Pursuers retreat toward their home corners.
    Scatter,
    /// Pursuers follow their targeting strategies.
    Chase,
}

/// Lifecycle of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Frames advance the simulation.
    Playing,
    /// Frames are ignored until the session resumes.
    Paused,
    /// The board is empty; waiting for [`Command::AdvanceLevel`].
    LevelCleared,
    /// The player has no lives left; waiting for [`Command::NewGame`].
    GameOver,
}

/// Identifies one of the four pursuers.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PursuerId {
    /// Heads straight for the player.
    Blinky,
    /// Ambushes ahead of the player.
    Pinky,
    /// Pincers the player together with Blinky.
    Inky,
    /// Chases from afar and retreats when close.
    Clyde,
}

impl PursuerId {
    /// Every pursuer in update order.
    pub const ALL: [PursuerId; PURSUER_COUNT] =
        [Self::Blinky, Self::Pinky, Self::Inky, Self::Clyde];
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the order used to break ties between equally good
    /// candidates.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step expressed as `(columns, rows)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Unit vector in world space.
    #[must_use]
    pub fn unit(self) -> Vec2 {
        let (column, row) = self.delta();
        Vec2::new(column as f32, row as f32)
    }

    /// Reports whether the direction moves along the horizontal axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Location of a single maze tile expressed as column and row.
///
/// Coordinates are signed because tunnel endpoints sit just outside the board.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tile {
    column: i32,
    row: i32,
}

impl Tile {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Tile that contains the provided world-space position.
    #[must_use]
    pub fn containing(position: Vec2, tile_length: f32) -> Self {
        Self::new(
            (position.x / tile_length).floor() as i32,
            (position.y / tile_length).floor() as i32,
        )
    }

    /// World-space centre of the tile.
    #[must_use]
    pub fn center(self, tile_length: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * tile_length,
            (self.row as f32 + 0.5) * tile_length,
        )
    }

    /// Shifts the tile by the provided column and row offsets.
    #[must_use]
    pub const fn translate(self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }

    /// Tile reached after `distance` steps toward `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction, distance: i32) -> Self {
        let (column, row) = direction.delta();
        self.translate(column * distance, row * distance)
    }

    /// Neighbouring tile toward `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }

    /// Reports whether the tiles differ by one unit along exactly one axis.
    #[must_use]
    pub fn is_adjacent(self, other: Tile) -> bool {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row) == 1
    }

    /// Straight-line distance between the tiles measured in tiles.
    #[must_use]
    pub fn euclidean_distance(self, other: Tile) -> f32 {
        let columns = (self.column - other.column) as f32;
        let rows = (self.row - other.row) as f32;
        (columns * columns + rows * rows).sqrt()
    }
}

/// Distinguishes the player from pursuers when applying accessibility rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// The player-controlled body.
    Player,
    /// A pursuer that may use the ghost-only corridor.
    Pursuer,
}

/// Continuous kinematic state shared by the player and the pursuers.
///
/// The position can only change through methods that also recompute the
/// tile, so `tile == floor(position / tile_length)` always holds.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    kind: BodyKind,
    tile_length: f32,
    position: Vec2,
    tile: Tile,
    direction: Direction,
    speed: f32,
    running: bool,
    last_teleport: Option<Duration>,
}

impl Body {
    /// Places a stationary body at the centre of `tile`.
    #[must_use]
    pub fn spawn(
        kind: BodyKind,
        tile: Tile,
        direction: Direction,
        speed: f32,
        tile_length: f32,
    ) -> Self {
        Self {
            kind,
            tile_length,
            position: tile.center(tile_length),
            tile,
            direction,
            speed,
            running: false,
            last_teleport: None,
        }
    }

    /// Kind of body, used by accessibility rules.
    #[must_use]
    pub const fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Continuous world-space position of the body's centre.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Tile containing the body's centre.
    #[must_use]
    pub const fn tile(&self) -> Tile {
        self.tile
    }

    /// Current heading.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Reports whether the body is moving.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Timestamp of the most recent tunnel crossing.
    #[must_use]
    pub const fn last_teleport(&self) -> Option<Duration> {
        self.last_teleport
    }

    /// Centre of the tile the body currently occupies.
    #[must_use]
    pub fn tile_center(&self) -> Vec2 {
        self.tile.center(self.tile_length)
    }

    /// Changes the heading without moving.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Turns the body around.
    pub fn reverse(&mut self) {
        self.direction = self.direction.opposite();
    }

    /// Starts or stops the body.
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Overrides the body's speed.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Moves the body to an absolute position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.tile = Tile::containing(position, self.tile_length);
    }

    /// Moves the body by the provided world-space offset.
    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    /// Snaps the body to the centre of `tile`.
    pub fn center_on(&mut self, tile: Tile) {
        self.set_position(tile.center(self.tile_length));
    }

    /// Records a tunnel crossing at `now`.
    pub fn mark_teleport(&mut self, now: Duration) {
        self.last_teleport = Some(now);
    }

    /// Captures the externally visible state of the body.
    #[must_use]
    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            tile: self.tile,
            position: self.position,
            direction: self.direction,
            running: self.running,
        }
    }
}

/// Immutable representation of a body used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    /// Tile containing the body's centre.
    pub tile: Tile,
    /// Continuous world-space position.
    pub position: Vec2,
    /// Current heading.
    pub direction: Direction,
    /// Indicates whether the body is moving.
    pub running: bool,
}

/// Immutable representation of the player's state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Kinematic state.
    pub body: BodySnapshot,
    /// Indicates whether the player may capture pursuers.
    pub empowered: bool,
}

/// Immutable representation of a pursuer's state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PursuerSnapshot {
    /// Identifier of the pursuer.
    pub id: PursuerId,
    /// Kinematic state.
    pub body: BodySnapshot,
    /// Tile the pursuer is currently steering toward.
    pub target: Tile,
    /// Indicates whether the player may capture the pursuer.
    pub vulnerable: bool,
}

/// Per-frame output consumed by renderers and HUDs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Player state.
    pub player: PlayerSnapshot,
    /// Pursuer states in [`PursuerId::ALL`] order.
    pub pursuers: Vec<PursuerSnapshot>,
    /// Small pellets left on the board.
    pub small_pellets: usize,
    /// Big pellets left on the board.
    pub big_pellets: usize,
    /// Accumulated score.
    pub score: u64,
    /// Lives left.
    pub lives: u32,
    /// One-based level number.
    pub level: u32,
    /// Source of the current board.
    pub maze: MazeKind,
    /// Hunter/prey mode.
    pub mode: GameMode,
    /// Scatter/chase phase followed by non-vulnerable pursuers.
    pub pursuit: PursuitPhase,
    /// Session lifecycle phase.
    pub phase: SessionPhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_requires_single_axis_unit_step() {
        let origin = Tile::new(4, 4);
        assert!(origin.is_adjacent(Tile::new(4, 3)));
        assert!(origin.is_adjacent(Tile::new(5, 4)));
        assert!(!origin.is_adjacent(Tile::new(5, 5)));
        assert!(!origin.is_adjacent(Tile::new(6, 4)));
        assert!(!origin.is_adjacent(origin));
    }

    #[test]
    fn containing_floors_negative_positions() {
        assert_eq!(Tile::containing(Vec2::new(-0.5, 7.9), 8.0), Tile::new(-1, 0));
        assert_eq!(Tile::containing(Vec2::new(16.0, 8.0), 8.0), Tile::new(2, 1));
    }

    #[test]
    fn offset_scales_direction() {
        let tile = Tile::new(10, 10);
        assert_eq!(tile.offset(Direction::Right, 4), Tile::new(14, 10));
        assert_eq!(tile.offset(Direction::Up, 2), Tile::new(10, 8));
    }

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn body_translation_keeps_tile_in_sync() {
        let mut body = Body::spawn(BodyKind::Player, Tile::new(2, 2), Direction::Left, 10.0, 8.0);
        body.translate(Vec2::new(-5.0, 0.0));
        assert_eq!(body.tile(), Tile::new(1, 2));
        body.translate(Vec2::new(0.0, 6.0));
        assert_eq!(body.tile(), Tile::containing(body.position(), 8.0));
    }
}
