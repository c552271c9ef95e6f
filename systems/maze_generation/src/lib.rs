#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural maze generation producing alternative board layouts.
//!
//! Two generators are provided: [`spanning_growth`] carves a spanning tree
//! through a lattice of cells, and [`wall_growth`] grows wall segments inside
//! an open board. Both guarantee that every open tile is reachable from every
//! other open tile. [`build_layout`] turns either result into a playable
//! [`Layout`] by choosing spawns and big pellets with the supplied generator.

mod grid;
mod spanning;
mod wall_growth;

use std::collections::{BTreeMap, HashSet};

use maze_chase_core::{Layout, LayoutError, MazeKind, PursuerId, PURSUER_COUNT};
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;
use tracing::debug;

pub use grid::WallGrid;
pub use spanning::spanning_growth;
pub use wall_growth::wall_growth;

/// Width of generated boards, matching the classic board.
pub const DEFAULT_WIDTH: u32 = 28;
/// Height of generated boards, matching the classic board.
pub const DEFAULT_HEIGHT: u32 = 31;
const DEFAULT_BIG_PELLETS: usize = 4;

/// Errors raised while generating a maze.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// The board is too small to hold a single open cell.
    #[error("a {width}x{height} board has no room for open cells")]
    NoCandidates {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Spanning growth ran out of frontier walls before joining every cell.
    #[error("frontier exhausted with {connected} of {candidates} cells connected")]
    FrontierExhausted {
        /// Cells joined to the spanning tree.
        connected: usize,
        /// Cells that had to be joined.
        candidates: usize,
    },
    /// The generated maze has too few open tiles for spawns and big pellets.
    #[error("{available} open tiles cannot hold {required} spawns and big pellets")]
    NotEnoughRoom {
        /// Open tiles needed.
        required: usize,
        /// Open tiles generated.
        available: usize,
    },
    /// A layout kind that cannot be generated was requested.
    #[error("{kind:?} layouts are supplied by the caller, not generated")]
    NotGenerated {
        /// Requested kind.
        kind: MazeKind,
    },
    /// The generated grid was rejected by the layout builder.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Dimensions and furnishing of generated boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    width: u32,
    height: u32,
    big_pellets: usize,
}

impl GeneratorConfig {
    /// Creates a new configuration.
    #[must_use]
    pub const fn new(width: u32, height: u32, big_pellets: usize) -> Self {
        Self {
            width,
            height,
            big_pellets,
        }
    }

    /// Board width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Board height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of big pellets scattered over the board.
    #[must_use]
    pub const fn big_pellets(&self) -> usize {
        self.big_pellets
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_BIG_PELLETS)
    }
}

/// Returns a fresh layout of the requested kind.
///
/// [`MazeKind::Classic`] ignores the configuration and the generator.
pub fn build_layout<R: Rng + ?Sized>(
    kind: MazeKind,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Layout, MazeError> {
    let grid = match kind {
        MazeKind::Classic => return Ok(Layout::classic()),
        MazeKind::SpanningGrowth => spanning_growth(config.width, config.height, rng)?,
        MazeKind::WallGrowth => wall_growth(config.width, config.height, rng)?,
        MazeKind::Custom => return Err(MazeError::NotGenerated { kind }),
    };
    furnish(&grid, config.big_pellets, rng)
}

/// Chooses spawns and big pellets among the open tiles of `grid`.
///
/// Pursuer spawns, the player spawn and big pellets all land on distinct
/// tiles; every other open tile receives a small pellet.
pub fn furnish<R: Rng + ?Sized>(
    grid: &WallGrid,
    big_pellets: usize,
    rng: &mut R,
) -> Result<Layout, MazeError> {
    let mut open = grid.open_tiles();
    let required = PURSUER_COUNT + 1 + big_pellets;
    if open.len() < required {
        return Err(MazeError::NotEnoughRoom {
            required,
            available: open.len(),
        });
    }

    let (picked, _) = open.partial_shuffle(rng, required);
    let pursuer_spawns: BTreeMap<PursuerId, _> = PursuerId::ALL
        .iter()
        .copied()
        .zip(picked.iter().copied())
        .collect();
    let player_spawn = picked[PURSUER_COUNT];
    let big: HashSet<_> = picked[PURSUER_COUNT + 1..].iter().copied().collect();

    debug!(?player_spawn, big_pellets = big.len(), "furnished generated maze");
    Ok(Layout::from_wall_grid(
        grid.width(),
        grid.height(),
        grid.walls(),
        player_spawn,
        pursuer_spawns,
        big,
    )?)
}
