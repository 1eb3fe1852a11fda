use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Board size limits enforced while the player is choosing dimensions. The
/// core itself tolerates anything down to 1x1.
pub const MIN_WIDTH: Coord = 3;
pub const MAX_WIDTH: Coord = 10;
pub const MIN_HEIGHT: Coord = 3;
pub const MAX_HEIGHT: Coord = 5;

/// Valid transitions:
/// - Setup -> Playing (size confirmed)
/// - Playing -> Won (every cell energized)
/// - Won -> Setup (new puzzle requested)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// The player is choosing board dimensions.
    Setup,
    /// The board is live and rotations count.
    Playing,
    /// Every cell is energized.
    Won,
}

impl Phase {
    pub const fn is_setup(self) -> bool {
        matches!(self, Self::Setup)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Setup
    }
}

/// One discrete player action, as reported by the host input layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Move(Direction),
    Select,
}

/// What a handled input did, so the host knows whether to redraw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputOutcome {
    NoChange,
    Updated,
    PhaseChanged(Phase),
}

impl InputOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Drives a full puzzle session from discrete inputs: dimension setup, play,
/// and the win state. The host loop feeds every player action through
/// [`GameEngine::handle_input`] and redraws from the accessors.
#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    board: Board,
    cursor: Coord2,
    phase: Phase,
    energized: CellCount,
    rng: SmallRng,
}

impl GameEngine {
    /// Starts a session in the setup phase with a freshly generated board.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let config = GameConfig::new(config.size);
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = SpanningTreeGenerator::new(rng.random()).generate(config);
        Self {
            config,
            cursor: board.start(),
            board,
            phase: Phase::Setup,
            energized: 0,
            rng,
        }
    }

    /// Adopts a pre-built board and goes straight to playing, for hosts that
    /// source boards elsewhere. A board the scramble left solved transitions
    /// to [`Phase::Won`] immediately.
    pub fn from_board(board: Board) -> Self {
        let mut engine = Self {
            config: GameConfig::new_unchecked(board.size()),
            cursor: board.start(),
            board,
            phase: Phase::Playing,
            energized: 0,
            rng: SmallRng::seed_from_u64(0),
        };
        engine.refresh_power();
        engine
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The currently selected tile.
    pub fn cursor(&self) -> Coord2 {
        self.cursor
    }

    /// Cells reached by the most recent propagation.
    pub fn energized_count(&self) -> CellCount {
        self.energized
    }

    pub fn is_solved(&self) -> bool {
        self.energized == self.board.total_cells()
    }

    /// Feeds one player action into the session state machine.
    pub fn handle_input(&mut self, input: Input) -> InputOutcome {
        match self.phase {
            Phase::Setup => self.handle_setup(input),
            Phase::Playing => self.handle_playing(input),
            Phase::Won => self.restart(),
        }
    }

    fn handle_setup(&mut self, input: Input) -> InputOutcome {
        match input {
            Input::Move(dir) => {
                let (width, height) = self.config.size;
                self.config.size = match dir {
                    Direction::Right => ((width + 1).min(MAX_WIDTH), height),
                    Direction::Left => (width.saturating_sub(1).max(MIN_WIDTH), height),
                    Direction::Up => (width, (height + 1).min(MAX_HEIGHT)),
                    Direction::Down => (width, height.saturating_sub(1).max(MIN_HEIGHT)),
                };
                // every setup adjustment presents a fresh board
                self.regenerate();
                InputOutcome::Updated
            }
            Input::Select => {
                self.cursor = self.board.start();
                self.phase = Phase::Playing;
                self.refresh_power();
                if self.is_solved() {
                    // the scramble can leave a board aligned by chance, and a
                    // 1x1 board is always solved
                    self.phase = Phase::Won;
                }
                InputOutcome::PhaseChanged(self.phase)
            }
        }
    }

    fn handle_playing(&mut self, input: Input) -> InputOutcome {
        match input {
            Input::Move(dir) => {
                let next = wrap_step(self.cursor, dir, self.board.size());
                if next == self.cursor {
                    // wrapping on a one-cell axis lands where it started
                    return InputOutcome::NoChange;
                }
                self.cursor = next;
                InputOutcome::Updated
            }
            Input::Select => {
                self.board
                    .rotate_tile(self.cursor)
                    .expect("cursor stays in bounds");
                self.refresh_power();
                if self.is_solved() {
                    self.phase = Phase::Won;
                    log::debug!("puzzle solved, {} cells energized", self.energized);
                    return InputOutcome::PhaseChanged(Phase::Won);
                }
                InputOutcome::Updated
            }
        }
    }

    fn restart(&mut self) -> InputOutcome {
        self.regenerate();
        self.phase = Phase::Setup;
        InputOutcome::PhaseChanged(Phase::Setup)
    }

    fn regenerate(&mut self) {
        self.board = SpanningTreeGenerator::new(self.rng.random()).generate(self.config);
        self.cursor = self.board.start();
        self.energized = 0;
    }

    fn refresh_power(&mut self) {
        self.energized = propagate_power(&mut self.board);
    }
}

/// Moves one step with wrap-around at the board edges.
fn wrap_step((x, y): Coord2, dir: Direction, (width, height): Coord2) -> Coord2 {
    let (dx, dy) = dir.delta();
    (
        (x as i16 + dx as i16).rem_euclid(width as i16) as Coord,
        (y as i16 + dy as i16).rem_euclid(height as i16) as Coord,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn ring_2x2_board(zero_tile: Tile) -> Board {
        let mut tiles: Array2<Tile> = Array2::default((2, 2));
        tiles[[0, 0]] = zero_tile;
        tiles[[1, 0]] = Tile::LEFT | Tile::DOWN;
        tiles[[1, 1]] = Tile::LEFT | Tile::UP;
        tiles[[0, 1]] = Tile::UP | Tile::RIGHT;
        Board::from_tiles(tiles, (0, 0)).unwrap()
    }

    #[test]
    fn setup_resize_clamps_to_limits() {
        let mut engine = GameEngine::new(GameConfig::new((4, 4)), 1);

        for _ in 0..12 {
            engine.handle_input(Input::Move(Direction::Right));
        }
        assert_eq!(engine.config().size, (MAX_WIDTH, 4));

        for _ in 0..12 {
            engine.handle_input(Input::Move(Direction::Down));
        }
        assert_eq!(engine.config().size, (MAX_WIDTH, MIN_HEIGHT));
        assert!(engine.phase().is_setup());
    }

    #[test]
    fn setup_resize_regenerates_the_board() {
        let mut engine = GameEngine::new(GameConfig::new((4, 4)), 2);

        engine.handle_input(Input::Move(Direction::Right));

        assert_eq!(engine.board().size(), (5, 4));
        assert_eq!(engine.cursor(), engine.board().start());
    }

    #[test]
    fn select_confirms_the_size_and_enters_play() {
        let mut engine = GameEngine::new(GameConfig::new((4, 4)), 3);

        let outcome = engine.handle_input(Input::Select);

        assert_eq!(outcome, InputOutcome::PhaseChanged(engine.phase()));
        assert!(!engine.phase().is_setup());
        assert!(engine.energized_count() >= 1);
    }

    #[test]
    fn cursor_wraps_around_the_edges() {
        let mut engine = GameEngine::from_board(ring_2x2_board(Tile::UP | Tile::LEFT));
        assert!(engine.phase().is_playing());

        let start = engine.cursor();
        engine.handle_input(Input::Move(Direction::Left));
        engine.handle_input(Input::Move(Direction::Left));
        assert_eq!(engine.cursor(), start);

        engine.handle_input(Input::Move(Direction::Up));
        assert_eq!(engine.cursor(), (start.0, 1));
    }

    #[test]
    fn adopting_a_solved_board_wins_immediately() {
        let engine = GameEngine::from_board(ring_2x2_board(Tile::RIGHT | Tile::DOWN));

        assert!(engine.phase().is_won());
        assert_eq!(engine.energized_count(), 4);
        assert!(engine.is_solved());
    }

    #[test]
    fn rotating_the_last_misaligned_tile_wins() {
        // the ring with (0,0) turned half way; power reaches only the start
        let mut engine = GameEngine::from_board(ring_2x2_board(Tile::UP | Tile::LEFT));
        assert!(engine.phase().is_playing());
        assert_eq!(engine.energized_count(), 1);
        assert_eq!(engine.cursor(), (0, 0));

        let outcome = engine.handle_input(Input::Select);

        assert_eq!(outcome, InputOutcome::PhaseChanged(Phase::Won));
        assert_eq!(engine.energized_count(), 4);
    }

    #[test]
    fn any_input_after_a_win_starts_a_new_setup() {
        let mut engine = GameEngine::from_board(ring_2x2_board(Tile::RIGHT | Tile::DOWN));
        assert!(engine.phase().is_won());

        let outcome = engine.handle_input(Input::Select);

        assert_eq!(outcome, InputOutcome::PhaseChanged(Phase::Setup));
        assert!(engine.phase().is_setup());
        assert_eq!(engine.energized_count(), 0);
    }

    #[test]
    fn moving_along_a_one_cell_axis_is_a_no_op() {
        // 2x1 board: vertical moves wrap onto the same cell
        let mut tiles: Array2<Tile> = Array2::default((2, 1));
        tiles[[0, 0]] = Tile::RIGHT;
        let mut engine = GameEngine::from_board(Board::from_tiles(tiles, (0, 0)).unwrap());
        assert!(engine.phase().is_playing());

        assert_eq!(
            engine.handle_input(Input::Move(Direction::Up)),
            InputOutcome::NoChange
        );
        assert_eq!(
            engine.handle_input(Input::Move(Direction::Right)),
            InputOutcome::Updated
        );
        assert_eq!(engine.cursor(), (1, 0));
    }

    #[test]
    fn outcome_reports_updates_for_redraw() {
        assert!(!InputOutcome::NoChange.has_update());
        assert!(InputOutcome::Updated.has_update());
        assert!(InputOutcome::PhaseChanged(Phase::Won).has_update());
    }
}
