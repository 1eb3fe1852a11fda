use ndarray::Array2;
use rand::prelude::*;
use smallvec::SmallVec;

use super::*;
use crate::traverse::TraversalVisitor;
use crate::types::step;

/// Generation strategy that grows a uniform random spanning tree over the
/// grid, then scrambles every tile's orientation independently. The tree
/// guarantees the unscrambled board is fully connected and cycle free, so the
/// scrambled puzzle is always solvable.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanningTreeGenerator {
    seed: u64,
}

impl SpanningTreeGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for SpanningTreeGenerator {
    fn generate(self, config: GameConfig) -> Board {
        let config = GameConfig::new(config.size);
        let mut rng = SmallRng::seed_from_u64(self.seed);

        let (mut tiles, start) = build_spanning_tree(config, &mut rng);
        scramble(&mut tiles, &mut rng);

        Board::from_tiles(tiles, start).expect("generated start is in bounds")
    }
}

/// Relabels every cell reachable over already-placed edges into `group`.
struct RelabelGroups<'a> {
    groups: &'a mut Array2<CellCount>,
    group: CellCount,
}

impl TraversalVisitor for RelabelGroups<'_> {
    fn already_visited(&self, _tiles: &Array2<Tile>, coords: Coord2) -> bool {
        self.groups[coords.to_nd_index()] == self.group
    }

    fn visit_node(&mut self, _tiles: &mut Array2<Tile>, coords: Coord2) {
        self.groups[coords.to_nd_index()] = self.group;
    }
}

fn build_spanning_tree(config: GameConfig, rng: &mut SmallRng) -> (Array2<Tile>, Coord2) {
    let (width, height) = config.size;
    let start = pick_start(config.size, rng);

    let mut tiles: Array2<Tile> = Array2::default(config.size.to_nd_index());
    // Distinct group id per cell; edges may only join cells whose groups
    // still differ, which is exactly the acyclicity condition.
    let mut groups: Array2<CellCount> = Array2::from_shape_fn(config.size.to_nd_index(), |(x, y)| {
        y as CellCount + x as CellCount * height as CellCount
    });

    let want = config.total_cells().saturating_sub(1);
    let mut edges: CellCount = 0;

    while edges < want {
        let coords: Coord2 = (rng.random_range(0..width), rng.random_range(0..height));
        let tile = tiles[coords.to_nd_index()];

        let mut open: SmallVec<[Direction; 4]> = DIRECTIONS
            .iter()
            .copied()
            .filter(|&dir| !tile.has_stub(dir))
            .collect();
        if open.is_empty() {
            continue;
        }
        open.shuffle(rng);

        let group = groups[coords.to_nd_index()];

        for dir in open {
            let Some(neighbor) = step(coords, dir, config.size) else {
                continue;
            };

            if groups[neighbor.to_nd_index()] == group {
                // joining would close a cycle
                continue;
            }

            // Fold the neighbor's whole component into this cell's group
            // before the new edge exists, so the walk cannot cross it.
            traverse(
                &mut tiles,
                neighbor,
                &mut RelabelGroups {
                    groups: &mut groups,
                    group,
                },
            );

            tiles[coords.to_nd_index()] |= Tile::stub(dir);
            tiles[neighbor.to_nd_index()] |= Tile::stub(dir.opposite());
            edges += 1;
            break;
        }
    }

    log::debug!(
        "spanning tree complete: {} edges over {}x{}, start {:?}",
        edges,
        width,
        height,
        start
    );
    (tiles, start)
}

/// Every tile gets an independent random number of quarter turns, breaking
/// the mutual alignment the tree established.
fn scramble(tiles: &mut Array2<Tile>, rng: &mut SmallRng) {
    for tile in tiles.iter_mut() {
        for _ in 0..rng.random_range(0..4u8) {
            *tile = tile.rotated();
        }
    }
}

fn pick_start(size: Coord2, rng: &mut SmallRng) -> Coord2 {
    let (width, height) = size;
    if width >= 3 && height >= 3 {
        (
            rng.random_range(1..width - 1),
            rng.random_range(1..height - 1),
        )
    } else {
        log::warn!("board {}x{} has no interior, start may sit on the border", width, height);
        (rng.random_range(0..width), rng.random_range(0..height))
    }
}
