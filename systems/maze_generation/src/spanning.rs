//! Randomized spanning growth over the odd-coordinate cell lattice.

use std::collections::HashSet;

use maze_chase_core::{Direction, Tile};
use rand::Rng;
use tracing::debug;

use crate::{grid::WallGrid, MazeError};

/// Carves a spanning tree connecting every candidate cell.
///
/// Candidate cells are the non-border tiles with odd column and odd row; all
/// other tiles start as walls. Growth starts at a random candidate and keeps a
/// frontier of wall tiles bordering the connected region. A random frontier
/// wall is opened when it joins a candidate that is not yet connected and
/// discarded otherwise.
pub fn spanning_growth<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    rng: &mut R,
) -> Result<WallGrid, MazeError> {
    let mut grid = WallGrid::filled(width, height, true);
    let candidates: Vec<Tile> = grid.tiles().filter(|tile| is_candidate(&grid, *tile)).collect();
    for candidate in &candidates {
        grid.set_wall(*candidate, false);
    }

    let start = match candidates.len() {
        0 => return Err(MazeError::NoCandidates { width, height }),
        len => candidates[rng.gen_range(0..len)],
    };

    let mut connected = HashSet::from([start]);
    let mut frontier = Vec::new();
    push_edges(&grid, start, &mut frontier);

    while connected.len() < candidates.len() {
        if frontier.is_empty() {
            return Err(MazeError::FrontierExhausted {
                connected: connected.len(),
                candidates: candidates.len(),
            });
        }

        let edge = frontier.swap_remove(rng.gen_range(0..frontier.len()));
        let fresh: Vec<Tile> = Direction::ALL
            .iter()
            .map(|direction| edge.step(*direction))
            .filter(|tile| is_candidate(&grid, *tile) && !connected.contains(tile))
            .collect();
        if fresh.is_empty() {
            continue;
        }

        grid.set_wall(edge, false);
        for cell in fresh {
            let _ = connected.insert(cell);
            push_edges(&grid, cell, &mut frontier);
        }
    }

    debug!(width, height, cells = candidates.len(), "spanning growth finished");
    Ok(grid)
}

fn is_candidate(grid: &WallGrid, tile: Tile) -> bool {
    grid.contains(tile) && !grid.is_border(tile) && tile.column() % 2 == 1 && tile.row() % 2 == 1
}

fn push_edges(grid: &WallGrid, cell: Tile, frontier: &mut Vec<Tile>) {
    for direction in Direction::ALL {
        let edge = cell.step(direction);
        if grid.is_wall(edge)
            && grid.contains(edge)
            && !grid.is_border(edge)
            && !frontier.contains(&edge)
        {
            frontier.push(edge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn carves_exactly_a_spanning_tree() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = spanning_growth(11, 9, &mut rng).expect("maze grows");

        // 5 × 4 cells joined by cells - 1 carved edges
        assert_eq!(grid.open_tiles().len(), 20 + 19);
        assert!(grid.is_connected());
    }

    #[test]
    fn boards_without_cells_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(
            spanning_growth(2, 2, &mut rng),
            Err(MazeError::NoCandidates {
                width: 2,
                height: 2
            })
        );
    }
}
