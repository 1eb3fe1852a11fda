use ndarray::Array2;

use crate::tile::Tile;
use crate::types::{step, Coord2, Direction, ToNdIndex, DIRECTIONS};

/// Callbacks driving one traversal. Implementors carry whatever context the
/// walk updates (group labels, counters), keeping the grid borrow and the
/// context borrow separate.
pub trait TraversalVisitor {
    /// Whether the walk should treat this cell as already explored.
    fn already_visited(&self, tiles: &Array2<Tile>, coords: Coord2) -> bool;

    /// Invoked exactly once per reachable cell.
    fn visit_node(&mut self, tiles: &mut Array2<Tile>, coords: Coord2);

    /// Invoked for every mutually connected edge leaving a visited cell.
    fn visit_edge(&mut self, _tiles: &mut Array2<Tile>, _coords: Coord2, _dir: Direction) {}
}

/// Explores the connected component reachable from `start`, depth first.
///
/// A direction only counts as an edge when the neighbor reciprocates with a
/// stub in the opposite direction; a single-sided stub is not traversable.
/// The visited predicate is consulted both when queuing a neighbor and when
/// popping it, so a cell that enters the worklist twice through a cycle is
/// still visited exactly once.
pub fn traverse<V>(tiles: &mut Array2<Tile>, start: Coord2, visitor: &mut V)
where
    V: TraversalVisitor + ?Sized,
{
    let dim = tiles.dim();
    let bounds: Coord2 = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
    assert!(
        start.0 < bounds.0 && start.1 < bounds.1,
        "traversal start {start:?} outside {bounds:?}"
    );

    let mut stack = vec![start];

    while let Some(coords) = stack.pop() {
        if visitor.already_visited(tiles, coords) {
            continue;
        }

        visitor.visit_node(tiles, coords);
        let tile = tiles[coords.to_nd_index()];

        for dir in DIRECTIONS {
            if !tile.has_stub(dir) {
                continue;
            }

            let Some(neighbor) = step(coords, dir, bounds) else {
                continue;
            };

            if !tiles[neighbor.to_nd_index()].has_stub(dir.opposite()) {
                continue;
            }

            visitor.visit_edge(tiles, coords, dir);

            if !visitor.already_visited(tiles, neighbor) {
                stack.push(neighbor);
            }
        }
    }
}
