//! Randomized wall growth inside an open board.

use maze_chase_core::{Direction, Tile};
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, trace};

use crate::{grid::WallGrid, MazeError};

/// Offsets of the eight tiles surrounding a tile, in ring order.
const RING: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Grows wall segments from sprouts until no open 3×3 block remains.
///
/// The board starts open inside a border wall, with one sprout in its centre
/// when the centre is surrounded by open tiles.
/// A wall extends into an orthogonally adjacent open tile only when that tile
/// touches exactly one wall orthogonally and its open orthogonal neighbours
/// stay connected through the surrounding ring of eight tiles, so the open
/// region is never split. Once no growth is possible a new sprout is planted
/// in the centre of a random fully open 3×3 block.
pub fn wall_growth<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    rng: &mut R,
) -> Result<WallGrid, MazeError> {
    if width < 3 || height < 3 {
        return Err(MazeError::NoCandidates { width, height });
    }

    let mut grid = WallGrid::filled(width, height, false);
    let border: Vec<Tile> = grid.tiles().filter(|tile| grid.is_border(*tile)).collect();
    for tile in border {
        grid.set_wall(tile, true);
    }

    let mut frontier = Vec::new();
    let center = Tile::new(width as i32 / 2, height as i32 / 2);
    let mut sprout = if is_open_block(&grid, center) {
        Some(center)
    } else {
        open_blocks(&grid).choose(rng).copied()
    };
    let mut sprouts = 0_usize;
    while let Some(seed) = sprout {
        if grid.is_open(seed) {
            grid.set_wall(seed, true);
            sprouts += 1;
            trace!(?seed, "planted wall sprout");
            push_open_neighbours(&grid, seed, &mut frontier);
        }

        while !frontier.is_empty() {
            let candidate = frontier.swap_remove(rng.gen_range(0..frontier.len()));
            if grid.is_open(candidate) && can_grow(&grid, candidate) {
                grid.set_wall(candidate, true);
                push_open_neighbours(&grid, candidate, &mut frontier);
            }
        }

        sprout = open_blocks(&grid).choose(rng).copied();
    }

    debug!(width, height, sprouts, "wall growth finished");
    Ok(grid)
}

fn push_open_neighbours(grid: &WallGrid, tile: Tile, frontier: &mut Vec<Tile>) {
    for direction in Direction::ALL {
        let next = tile.step(direction);
        if grid.is_open(next) && !grid.is_border(next) {
            frontier.push(next);
        }
    }
}

fn can_grow(grid: &WallGrid, candidate: Tile) -> bool {
    let walls = Direction::ALL
        .iter()
        .filter(|direction| grid.is_wall(candidate.step(**direction)))
        .count();
    walls == 1 && ring_keeps_neighbours_connected(grid, candidate)
}

/// Reports whether the open orthogonal neighbours of `center` reach each
/// other through open tiles of the surrounding ring.
fn ring_keeps_neighbours_connected(grid: &WallGrid, center: Tile) -> bool {
    let open: Vec<bool> = RING
        .iter()
        .map(|(columns, rows)| grid.is_open(center.translate(*columns, *rows)))
        .collect();
    let orthogonal = |index: usize| index % 2 == 1;

    let start = match (0..RING.len()).find(|index| orthogonal(*index) && open[*index]) {
        Some(start) => start,
        None => return true,
    };

    let mut reached = [false; 8];
    reached[start] = true;
    let mut stack = vec![start];
    while let Some(index) = stack.pop() {
        for next in [(index + 1) % 8, (index + 7) % 8] {
            if open[next] && !reached[next] {
                reached[next] = true;
                stack.push(next);
            }
        }
    }

    (0..RING.len()).all(|index| !orthogonal(index) || !open[index] || reached[index])
}

/// Centres of every fully open 3×3 block, in row-major order.
fn open_blocks(grid: &WallGrid) -> Vec<Tile> {
    grid.tiles().filter(|tile| is_open_block(grid, *tile)).collect()
}

fn is_open_block(grid: &WallGrid, center: Tile) -> bool {
    grid.is_open(center)
        && RING
            .iter()
            .all(|(columns, rows)| grid.is_open(center.translate(*columns, *rows)))
}
