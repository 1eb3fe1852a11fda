use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use power::*;
pub use tile::*;
pub use traverse::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod power;
mod tile;
mod traverse;
mod types;

/// Board dimensions requested for a new puzzle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2) -> Self {
        Self { size }
    }

    pub fn new((size_x, size_y): Coord2) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        Self::new_unchecked((size_x, size_y))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// A puzzle instance: the tile grid plus the fixed start coordinate that
/// power flows out from. Created by a [`BoardGenerator`], mutated in place by
/// player rotations, discarded on a new-puzzle request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    tiles: Array2<Tile>,
    start: Coord2,
}

impl Board {
    pub fn from_tiles(tiles: Array2<Tile>, start: Coord2) -> Result<Self> {
        let dim = tiles.dim();
        if usize::from(start.0) >= dim.0 || usize::from(start.1) >= dim.1 {
            return Err(GameError::InvalidCoords);
        }
        Ok(Self { tiles, start })
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.tiles.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.tiles.len().try_into().unwrap()
    }

    /// Root of the spanning tree and of every power propagation.
    pub fn start(&self) -> Coord2 {
        self.start
    }

    pub fn tile_at(&self, coords: Coord2) -> Tile {
        self.tiles[coords.to_nd_index()]
    }

    pub fn tiles(&self) -> &Array2<Tile> {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut Array2<Tile> {
        &mut self.tiles
    }

    /// The player move: one quarter turn of the tile at `coords`. Callers are
    /// expected to re-run [`propagate_power`] afterwards.
    pub fn rotate_tile(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        let tile = &mut self.tiles[coords.to_nd_index()];
        *tile = tile.rotated();
        log::debug!("rotated tile at {:?}", coords);
        Ok(())
    }
}

impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.tiles[(x as usize, y as usize)]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, (x, y): Coord2) -> &mut Self::Output {
        &mut self.tiles[(x as usize, y as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_to_at_least_one_cell() {
        let config = GameConfig::new((0, 7));
        assert_eq!(config.size, (1, 7));
        assert_eq!(config.total_cells(), 7);
    }

    #[test]
    fn board_rejects_out_of_bounds_start() {
        let tiles: Array2<Tile> = Array2::default((2, 2));
        assert_eq!(
            Board::from_tiles(tiles, (2, 0)).unwrap_err(),
            GameError::InvalidCoords
        );
    }

    #[test]
    fn rotate_tile_validates_coordinates() {
        let tiles: Array2<Tile> = Array2::default((2, 2));
        let mut board = Board::from_tiles(tiles, (0, 0)).unwrap();

        assert_eq!(
            board.rotate_tile((5, 5)).unwrap_err(),
            GameError::InvalidCoords
        );
        assert!(board.rotate_tile((1, 1)).is_ok());
    }

    #[test]
    fn rotate_tile_turns_exactly_one_cell() {
        let mut tiles: Array2<Tile> = Array2::default((2, 1));
        tiles[[0, 0]] = Tile::UP;
        tiles[[1, 0]] = Tile::UP;
        let mut board = Board::from_tiles(tiles, (0, 0)).unwrap();

        board.rotate_tile((0, 0)).unwrap();

        assert_eq!(board[(0, 0)], Tile::RIGHT);
        assert_eq!(board[(1, 0)], Tile::UP);
    }

    #[test]
    fn board_round_trips_through_json() {
        let mut tiles: Array2<Tile> = Array2::default((2, 2));
        tiles[[0, 1]] = Tile::UP | Tile::UP_POWERED;
        let board = Board::from_tiles(tiles, (1, 1)).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(back, board);
    }
}
