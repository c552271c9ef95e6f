//! Static description of a maze board.
//!
//! A [`Layout`] partitions every cell of the board into walls, accessible
//! tiles, ghost-house tiles, and ghost-path tiles. It is built once per level,
//! either by parsing the authored character format or from a generated wall
//! grid, and is never mutated afterwards.
//!
//! The authored format uses one character per tile:
//!
//! | Char | Meaning |
//! |------|---------|
//! | `#` | wall |
//! | `.` | small pellet |
//! | `o` | big pellet |
//! | ` ` | empty accessible tile |
//! | `P` | player spawn |
//! | `-` | ghost path (house door) |
//! | `_` | ghost house interior |
//! | `1`-`4` | ghost house spawn of Blinky, Pinky, Inky, Clyde |
//! | `5`-`8` | accessible spawn of Blinky, Pinky, Inky, Clyde |
//!
//! Tunnels are derived from the border: a row whose first and last tiles are
//! both open connects the off-board tiles on either side, and likewise for
//! columns.

use std::{
    collections::{BTreeMap, HashSet},
    str::FromStr,
};

use thiserror::Error;

use crate::{PursuerId, Tile};

const WALL: char = '#';
const SMALL_PELLET: char = '.';
const BIG_PELLET: char = 'o';
const EMPTY: char = ' ';
const PLAYER_SPAWN: char = 'P';
const GHOST_PATH: char = '-';
const GHOST_HOUSE: char = '_';
const HOUSE_SPAWNS: [char; 4] = ['1', '2', '3', '4'];
const OPEN_SPAWNS: [char; 4] = ['5', '6', '7', '8'];

const CLASSIC_ROWS: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###--### ##.######",
    "######.## #______# ##.######",
    "      .   #_1234_#   .      ",
    "######.## #______# ##.######",
    "######.## ######## ##.######",
    "######.##    P     ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Errors raised while constructing a [`Layout`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The map contained no rows or no columns.
    #[error("layout contains no tiles")]
    Empty,
    /// A row's width differs from the first row.
    #[error("row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character outside the authored alphabet was encountered.
    #[error("unknown tile character {character:?} at column {column}, row {row}")]
    UnknownCharacter {
        /// The offending character.
        character: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
    /// No player spawn was declared.
    #[error("layout does not declare a player spawn")]
    MissingPlayerSpawn,
    /// More than one player spawn was declared.
    #[error("layout declares a second player spawn at {second:?} (first at {first:?})")]
    DuplicatePlayerSpawn {
        /// First declared spawn.
        first: Tile,
        /// Second declared spawn.
        second: Tile,
    },
    /// A pursuer has no spawn tile.
    #[error("layout does not declare a spawn for {pursuer:?}")]
    MissingPursuerSpawn {
        /// Pursuer without a spawn.
        pursuer: PursuerId,
    },
    /// A pursuer was given more than one spawn tile.
    #[error("layout declares more than one spawn for {pursuer:?}")]
    DuplicatePursuerSpawn {
        /// Pursuer with several spawns.
        pursuer: PursuerId,
    },
    /// A spawn or pellet was placed on a tile that is not open.
    #[error("tile {tile:?} must be open")]
    ClosedTile {
        /// The offending tile.
        tile: Tile,
    },
    /// The wall grid does not match the requested dimensions.
    #[error("wall grid holds {found} cells, expected {expected}")]
    DimensionMismatch {
        /// Cells required by the dimensions.
        expected: usize,
        /// Cells supplied.
        found: usize,
    },
}

/// Immutable description of a maze board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    width: i32,
    height: i32,
    walls: HashSet<Tile>,
    accessible: HashSet<Tile>,
    ghost_house: HashSet<Tile>,
    ghost_path: HashSet<Tile>,
    pursuer_spawns: BTreeMap<PursuerId, Tile>,
    player_spawn: Tile,
    tunnels: Vec<(Tile, Tile)>,
    pellets: HashSet<Tile>,
    big_pellets: HashSet<Tile>,
}

impl Layout {
    /// The hand-authored 28×31 classic board.
    #[must_use]
    pub fn classic() -> Self {
        match Self::parse(&CLASSIC_ROWS) {
            Ok(layout) => layout,
            Err(error) => unreachable!("classic layout is malformed: {error}"),
        }
    }

    /// Parses the authored character format, one string per row.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if height == 0 || width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut layout = Self::empty(width as i32, height as i32);
        let mut player_spawn: Option<Tile> = None;

        for (row_index, row) in rows.iter().enumerate() {
            let found = row.as_ref().chars().count();
            if found != width {
                return Err(LayoutError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found,
                });
            }

            for (column_index, character) in row.as_ref().chars().enumerate() {
                let tile = Tile::new(column_index as i32, row_index as i32);
                match character {
                    WALL => {
                        let _ = layout.walls.insert(tile);
                    }
                    SMALL_PELLET => {
                        let _ = layout.accessible.insert(tile);
                        let _ = layout.pellets.insert(tile);
                    }
                    BIG_PELLET => {
                        let _ = layout.accessible.insert(tile);
                        let _ = layout.big_pellets.insert(tile);
                    }
                    EMPTY => {
                        let _ = layout.accessible.insert(tile);
                    }
                    PLAYER_SPAWN => {
                        if let Some(first) = player_spawn {
                            return Err(LayoutError::DuplicatePlayerSpawn {
                                first,
                                second: tile,
                            });
                        }
                        player_spawn = Some(tile);
                        let _ = layout.accessible.insert(tile);
                    }
                    GHOST_PATH => {
                        let _ = layout.ghost_path.insert(tile);
                    }
                    GHOST_HOUSE => {
                        let _ = layout.ghost_house.insert(tile);
                    }
                    other => {
                        if let Some(pursuer) = spawn_for(&HOUSE_SPAWNS, other) {
                            let _ = layout.ghost_house.insert(tile);
                            layout.declare_spawn(pursuer, tile)?;
                        } else if let Some(pursuer) = spawn_for(&OPEN_SPAWNS, other) {
                            let _ = layout.accessible.insert(tile);
                            layout.declare_spawn(pursuer, tile)?;
                        } else {
                            return Err(LayoutError::UnknownCharacter {
                                character: other,
                                column: column_index,
                                row: row_index,
                            });
                        }
                    }
                }
            }
        }

        layout.player_spawn = player_spawn.ok_or(LayoutError::MissingPlayerSpawn)?;
        layout.finish()
    }

    /// Builds a layout from a row-major wall grid produced by a generator.
    ///
    /// Every open cell becomes accessible and carries a small pellet unless it
    /// hosts a spawn or a big pellet. Generated boards have no ghost house.
    pub fn from_wall_grid(
        width: u32,
        height: u32,
        walls: &[bool],
        player_spawn: Tile,
        pursuer_spawns: BTreeMap<PursuerId, Tile>,
        big_pellets: HashSet<Tile>,
    ) -> Result<Self, LayoutError> {
        let expected = width as usize * height as usize;
        if expected == 0 {
            return Err(LayoutError::Empty);
        }
        if walls.len() != expected {
            return Err(LayoutError::DimensionMismatch {
                expected,
                found: walls.len(),
            });
        }

        let mut layout = Self::empty(width as i32, height as i32);
        for (index, is_wall) in walls.iter().enumerate() {
            let tile = Tile::new(
                (index % width as usize) as i32,
                (index / width as usize) as i32,
            );
            if *is_wall {
                let _ = layout.walls.insert(tile);
            } else {
                let _ = layout.accessible.insert(tile);
            }
        }

        let spawns: Vec<Tile> = std::iter::once(player_spawn)
            .chain(pursuer_spawns.values().copied())
            .collect();
        for tile in spawns.iter().chain(big_pellets.iter()) {
            if !layout.accessible.contains(tile) {
                return Err(LayoutError::ClosedTile { tile: *tile });
            }
        }

        layout.pellets = layout
            .accessible
            .iter()
            .copied()
            .filter(|tile| !spawns.contains(tile) && !big_pellets.contains(tile))
            .collect();
        layout.big_pellets = big_pellets;
        layout.player_spawn = player_spawn;
        layout.pursuer_spawns = pursuer_spawns;
        layout.finish()
    }

    fn empty(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            walls: HashSet::new(),
            accessible: HashSet::new(),
            ghost_house: HashSet::new(),
            ghost_path: HashSet::new(),
            pursuer_spawns: BTreeMap::new(),
            player_spawn: Tile::new(0, 0),
            tunnels: Vec::new(),
            pellets: HashSet::new(),
            big_pellets: HashSet::new(),
        }
    }

    fn declare_spawn(&mut self, pursuer: PursuerId, tile: Tile) -> Result<(), LayoutError> {
        if self.pursuer_spawns.insert(pursuer, tile).is_some() {
            return Err(LayoutError::DuplicatePursuerSpawn { pursuer });
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Self, LayoutError> {
        for pursuer in PursuerId::ALL {
            if !self.pursuer_spawns.contains_key(&pursuer) {
                return Err(LayoutError::MissingPursuerSpawn { pursuer });
            }
        }
        self.tunnels = self.derive_tunnels();
        Ok(self)
    }

    fn derive_tunnels(&self) -> Vec<(Tile, Tile)> {
        let mut tunnels = Vec::new();
        for row in 0..self.height {
            if self.is_open(Tile::new(0, row)) && self.is_open(Tile::new(self.width - 1, row)) {
                let west = Tile::new(-1, row);
                let east = Tile::new(self.width, row);
                tunnels.push((west, east));
                tunnels.push((east, west));
            }
        }
        for column in 0..self.width {
            let south_edge = Tile::new(column, self.height - 1);
            if self.is_open(Tile::new(column, 0)) && self.is_open(south_edge) {
                let north = Tile::new(column, -1);
                let south = Tile::new(column, self.height);
                tunnels.push((north, south));
                tunnels.push((south, north));
            }
        }
        tunnels
    }

    fn is_open(&self, tile: Tile) -> bool {
        self.accessible.contains(&tile)
    }

    /// Board dimensions as `(width, height)` in tiles.
    #[must_use]
    pub const fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Board width in tiles.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Board height in tiles.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Reports whether the tile lies within the board.
    #[must_use]
    pub const fn contains(&self, tile: Tile) -> bool {
        tile.column() >= 0
            && tile.row() >= 0
            && tile.column() < self.width
            && tile.row() < self.height
    }

    /// Reports whether the tile is a wall.
    #[must_use]
    pub fn is_wall(&self, tile: Tile) -> bool {
        self.walls.contains(&tile)
    }

    /// Reports whether any body may normally occupy the tile.
    #[must_use]
    pub fn is_accessible(&self, tile: Tile) -> bool {
        self.accessible.contains(&tile)
    }

    /// Reports whether the tile lies inside the ghost house.
    #[must_use]
    pub fn is_ghost_house(&self, tile: Tile) -> bool {
        self.ghost_house.contains(&tile)
    }

    /// Reports whether the tile belongs to the ghost path corridor.
    #[must_use]
    pub fn is_ghost_path(&self, tile: Tile) -> bool {
        self.ghost_path.contains(&tile)
    }

    /// Reports whether only pursuers may occupy the tile.
    #[must_use]
    pub fn is_ghost_only(&self, tile: Tile) -> bool {
        self.is_ghost_house(tile) || self.is_ghost_path(tile)
    }

    /// Reports whether the tile is either end of a tunnel.
    #[must_use]
    pub fn is_tunnel_endpoint(&self, tile: Tile) -> bool {
        self.tunnels.iter().any(|(entry, _)| *entry == tile)
    }

    /// Tile a body entering `tile` is teleported to, if `tile` is a tunnel entry.
    #[must_use]
    pub fn tunnel_exit(&self, tile: Tile) -> Option<Tile> {
        self.tunnels
            .iter()
            .find(|(entry, _)| *entry == tile)
            .map(|(_, exit)| *exit)
    }

    /// Ordered tunnel pairs; entering the first tile teleports to the second.
    #[must_use]
    pub fn tunnels(&self) -> &[(Tile, Tile)] {
        &self.tunnels
    }

    /// Wall tiles.
    #[must_use]
    pub fn walls(&self) -> &HashSet<Tile> {
        &self.walls
    }

    /// Tiles any body may normally occupy.
    #[must_use]
    pub fn accessible(&self) -> &HashSet<Tile> {
        &self.accessible
    }

    /// Tiles holding a small pellet at level start.
    #[must_use]
    pub fn pellets(&self) -> &HashSet<Tile> {
        &self.pellets
    }

    /// Tiles holding a big pellet at level start.
    #[must_use]
    pub fn big_pellets(&self) -> &HashSet<Tile> {
        &self.big_pellets
    }

    /// Tile the player starts on.
    #[must_use]
    pub const fn player_spawn(&self) -> Tile {
        self.player_spawn
    }

    /// Tile the pursuer starts on.
    #[must_use]
    pub fn pursuer_spawn(&self, pursuer: PursuerId) -> Option<Tile> {
        self.pursuer_spawns.get(&pursuer).copied()
    }

    /// Renders the layout back into the authored character format.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|column| self.character_at(Tile::new(column, row)))
                    .collect()
            })
            .collect()
    }

    fn character_at(&self, tile: Tile) -> char {
        if let Some((index, _)) = PursuerId::ALL
            .iter()
            .enumerate()
            .find(|(_, pursuer)| self.pursuer_spawn(**pursuer) == Some(tile))
        {
            return if self.is_ghost_house(tile) {
                HOUSE_SPAWNS[index]
            } else {
                OPEN_SPAWNS[index]
            };
        }

        if self.is_wall(tile) {
            WALL
        } else if tile == self.player_spawn {
            PLAYER_SPAWN
        } else if self.big_pellets.contains(&tile) {
            BIG_PELLET
        } else if self.pellets.contains(&tile) {
            SMALL_PELLET
        } else if self.is_ghost_house(tile) {
            GHOST_HOUSE
        } else if self.is_ghost_path(tile) {
            GHOST_PATH
        } else {
            EMPTY
        }
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = value.lines().collect();
        Self::parse(&rows)
    }
}

fn spawn_for(alphabet: &[char; 4], character: char) -> Option<PursuerId> {
    alphabet
        .iter()
        .position(|candidate| *candidate == character)
        .map(|index| PursuerId::ALL[index])
}
