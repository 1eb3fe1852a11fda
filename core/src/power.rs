use ndarray::Array2;

use crate::traverse::{traverse, TraversalVisitor};
use crate::types::{CellCount, Coord2, Direction, ToNdIndex};
use crate::{Board, Tile};

/// Recomputes every powered bit from scratch and returns how many cells the
/// energized network reaches from the board's start. The puzzle is solved
/// exactly when the returned count equals the board's total cell count.
///
/// A stub carries power only when its neighbor reciprocates with a stub in
/// the opposite direction; a single-sided stub never transmits. Repeated
/// calls without intervening rotations return the same count and bits.
pub fn propagate_power(board: &mut Board) -> CellCount {
    let start = board.start();

    for tile in board.tiles_mut().iter_mut() {
        *tile = tile.unpowered();
    }

    let mut visitor = Energize { energized: 0 };
    traverse(board.tiles_mut(), start, &mut visitor);

    log::trace!(
        "propagation from {:?} energized {} of {} cells",
        start,
        visitor.energized,
        board.total_cells()
    );
    visitor.energized
}

struct Energize {
    energized: CellCount,
}

impl TraversalVisitor for Energize {
    fn already_visited(&self, tiles: &Array2<Tile>, coords: Coord2) -> bool {
        tiles[coords.to_nd_index()].is_energized()
    }

    fn visit_node(&mut self, _tiles: &mut Array2<Tile>, _coords: Coord2) {
        self.energized += 1;
    }

    fn visit_edge(&mut self, tiles: &mut Array2<Tile>, coords: Coord2, dir: Direction) {
        tiles[coords.to_nd_index()] |= Tile::powered(dir);
    }
}
