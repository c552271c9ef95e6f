//! Mutable boolean wall grid the generators carve into.

use std::collections::{HashSet, VecDeque};

use maze_chase_core::{Direction, Tile};

/// Row-major grid of wall flags.
///
/// Tiles outside the grid read as walls, so neighbourhood inspections near the
/// border never need bounds checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallGrid {
    width: u32,
    height: u32,
    walls: Vec<bool>,
}

impl WallGrid {
    /// Creates a grid where every tile is a wall, or every tile is open.
    #[must_use]
    pub fn filled(width: u32, height: u32, wall: bool) -> Self {
        Self {
            width,
            height,
            walls: vec![wall; width as usize * height as usize],
        }
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major wall flags.
    #[must_use]
    pub fn walls(&self) -> &[bool] {
        &self.walls
    }

    /// Reports whether the tile lies within the grid.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.index(tile).is_some()
    }

    /// Reports whether the tile sits on the outermost ring of the grid.
    #[must_use]
    pub fn is_border(&self, tile: Tile) -> bool {
        self.contains(tile)
            && (tile.column() == 0
                || tile.row() == 0
                || tile.column() == self.width as i32 - 1
                || tile.row() == self.height as i32 - 1)
    }

    /// Reports whether the tile is a wall. Off-grid tiles are walls.
    #[must_use]
    pub fn is_wall(&self, tile: Tile) -> bool {
        self.index(tile).map_or(true, |index| self.walls[index])
    }

    /// Reports whether the tile is open.
    #[must_use]
    pub fn is_open(&self, tile: Tile) -> bool {
        !self.is_wall(tile)
    }

    /// Turns the tile into a wall or opens it. Off-grid tiles are ignored.
    pub fn set_wall(&mut self, tile: Tile, wall: bool) {
        if let Some(index) = self.index(tile) {
            self.walls[index] = wall;
        }
    }

    /// Open tiles in row-major order.
    #[must_use]
    pub fn open_tiles(&self) -> Vec<Tile> {
        self.tiles().filter(|tile| self.is_open(*tile)).collect()
    }

    /// Every tile of the grid in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |row| (0..width).map(move |column| Tile::new(column, row)))
    }

    /// Open tiles reachable from `start` through orthogonal steps.
    #[must_use]
    pub fn open_region(&self, start: Tile) -> HashSet<Tile> {
        let mut region = HashSet::new();
        if self.is_wall(start) {
            return region;
        }

        let mut queue = VecDeque::from([start]);
        let _ = region.insert(start);
        while let Some(tile) = queue.pop_front() {
            for direction in Direction::ALL {
                let next = tile.step(direction);
                if self.is_open(next) && region.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        region
    }

    /// Reports whether every open tile is reachable from every other one.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let open = self.open_tiles();
        match open.first() {
            Some(first) => self.open_region(*first).len() == open.len(),
            None => true,
        }
    }

    fn index(&self, tile: Tile) -> Option<usize> {
        let column = u32::try_from(tile.column()).ok()?;
        let row = u32::try_from(tile.row()).ok()?;
        (column < self.width && row < self.height)
            .then(|| row as usize * self.width as usize + column as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_grid_tiles_read_as_walls() {
        let grid = WallGrid::filled(3, 3, false);
        assert!(grid.is_open(Tile::new(0, 0)));
        assert!(grid.is_wall(Tile::new(-1, 0)));
        assert!(grid.is_wall(Tile::new(3, 1)));
    }

    #[test]
    fn open_region_stops_at_walls() {
        let mut grid = WallGrid::filled(5, 1, false);
        grid.set_wall(Tile::new(2, 0), true);

        let region = grid.open_region(Tile::new(0, 0));

        assert_eq!(region.len(), 2);
        assert!(!grid.is_connected());
    }

    #[test]
    fn border_is_the_outer_ring() {
        let grid = WallGrid::filled(4, 4, true);
        assert!(grid.is_border(Tile::new(0, 2)));
        assert!(grid.is_border(Tile::new(3, 3)));
        assert!(!grid.is_border(Tile::new(1, 2)));
        assert!(!grid.is_border(Tile::new(4, 2)));
    }
}
