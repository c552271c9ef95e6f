use std::collections::HashSet;

use maze_chase_core::{Layout, PelletKind, Tile};

/// Pellets still on the board.
///
/// Populated from the layout at level start and only ever shrinks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PelletSet {
    small: HashSet<Tile>,
    big: HashSet<Tile>,
}

impl PelletSet {
    /// Fills the set with every pellet of the layout.
    #[must_use]
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            small: layout.pellets().clone(),
            big: layout.big_pellets().clone(),
        }
    }

    /// Removes the pellet on `tile`, if any, and reports its kind.
    pub fn eat(&mut self, tile: Tile) -> Option<PelletKind> {
        if self.big.remove(&tile) {
            Some(PelletKind::Big)
        } else if self.small.remove(&tile) {
            Some(PelletKind::Small)
        } else {
            None
        }
    }

    /// Remaining small pellets.
    #[must_use]
    pub fn small(&self) -> &HashSet<Tile> {
        &self.small
    }

    /// Remaining big pellets.
    #[must_use]
    pub fn big(&self) -> &HashSet<Tile> {
        &self.big
    }

    /// Reports whether every pellet was eaten.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.small.is_empty() && self.big.is_empty()
    }
}
