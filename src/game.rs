//! Interactive N-Queens board backed by a BDD.
//!
//! A [`QueensGame`] owns its [`Bdd`] manager and the live rule. Every placement
//! restricts the rule by the placed cell, then probes each empty cell: a cell
//! whose restriction is unsatisfiable can never hold a queen again and is
//! marked [`Cell::Dead`].
//!
//! ```
//! use queens_bdd::board::Cell;
//! use queens_bdd::game::QueensGame;
//!
//! let mut game = QueensGame::new();
//! game.initialize_game(4).unwrap();
//! game.insert_queen(0, 1).unwrap();
//!
//! let board = game.game_board().unwrap();
//! assert_eq!(board.get(0, 1), Cell::Queen);
//! assert_eq!(board.get(1, 3), Cell::Empty);
//! assert_eq!(board.get(1, 2), Cell::Dead);
//! ```

use log::{debug, info};
use num_bigint::BigUint;

use crate::bdd::{Bdd, BddConfig};
use crate::board::{Board, Cell};
use crate::error::QueensError;
use crate::reference::Ref;
use crate::rules::{build_rules, cell_var};
use crate::types::Var;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GameConfig {
    /// Sizing of the manager created by each `initialize_game`.
    pub bdd: BddConfig,
    /// Reclaim unreachable nodes after building the rules and after each placement.
    pub collect_garbage: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bdd: BddConfig::default(),
            collect_garbage: true,
        }
    }
}

impl GameConfig {
    pub fn with_bdd_config(mut self, bdd: BddConfig) -> Self {
        self.bdd = bdd;
        self
    }

    pub fn with_garbage_collection(mut self, collect_garbage: bool) -> Self {
        self.collect_garbage = collect_garbage;
        self
    }
}

/// Outcome of [`QueensGame::insert_queen`].
///
/// Both variants are successful calls: placing onto a cell that already holds a
/// queen or is dead leaves the board untouched.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Placement {
    Placed,
    Ignored(Cell),
}

impl Placement {
    /// Always `true`: no move on an initialized board is rejected.
    pub fn is_accepted(self) -> bool {
        true
    }

    pub fn is_placed(self) -> bool {
        self == Placement::Placed
    }
}

struct Session {
    bdd: Bdd,
    rules: Ref,
    board: Board,
}

impl Session {
    fn var(&self, row: usize, column: usize) -> Var {
        cell_var(self.board.size(), row, column)
    }

    fn place(&mut self, row: usize, column: usize, gc: bool) -> Result<(), QueensError> {
        self.board.set(row, column, Cell::Queen);
        self.rules = self.bdd.restrict(self.rules, self.var(row, column), true)?;

        let empty: Vec<(usize, usize)> = self
            .board
            .iter()
            .filter(|&(_, _, cell)| cell.is_empty())
            .map(|(r, c, _)| (r, c))
            .collect();

        let mut dead = 0;
        for (r, c) in empty {
            // Probe on a copy: the live rule only changes on real placements.
            let probe = self.bdd.restrict(self.rules, self.var(r, c), true)?;
            if self.bdd.is_zero(probe) {
                debug!("Cell ({}, {}) is dead", r, c);
                self.board.set(r, c, Cell::Dead);
                dead += 1;
            }
        }

        if gc {
            self.bdd.collect_garbage(&[self.rules]);
        }
        info!(
            "Placed queen at ({}, {}), {} cells marked dead, rule size {}",
            row,
            column,
            dead,
            self.bdd.size(self.rules)
        );
        Ok(())
    }
}

/// One game of interactive N-Queens.
///
/// The game starts uninitialized; call [`initialize_game`][Self::initialize_game]
/// before anything else.
pub struct QueensGame {
    config: GameConfig,
    session: Option<Session>,
}

impl Default for QueensGame {
    fn default() -> Self {
        Self::new()
    }
}

impl QueensGame {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn session(&self) -> Result<&Session, QueensError> {
        self.session.as_ref().ok_or(QueensError::NotInitialized)
    }

    /// Start a new game on a `size`×`size` board, discarding any previous state.
    ///
    /// On failure the game is left uninitialized.
    pub fn initialize_game(&mut self, size: usize) -> Result<(), QueensError> {
        self.session = None;
        if size == 0 {
            return Err(QueensError::InvalidSize(size));
        }

        let bdd = Bdd::with_config(self.config.bdd);
        for _ in 0..size * size {
            bdd.new_var()?;
        }
        let rules = build_rules(&bdd, size)?;
        if self.config.collect_garbage {
            bdd.collect_garbage(&[rules]);
        }
        info!("Initialized {}x{} game: {}", size, size, bdd.stats());

        self.session = Some(Session {
            bdd,
            rules,
            board: Board::new(size),
        });
        Ok(())
    }

    /// Place a queen on `(row, column)` and mark every cell that became impossible.
    ///
    /// A cell that already holds a queen or is dead is left alone and reported as
    /// [`Placement::Ignored`]. If the engine fails, the game is dropped back to
    /// the uninitialized state.
    pub fn insert_queen(&mut self, row: usize, column: usize) -> Result<Placement, QueensError> {
        let gc = self.config.collect_garbage;
        let session = self.session.as_mut().ok_or(QueensError::NotInitialized)?;

        let size = session.board.size();
        if !session.board.contains(row, column) {
            return Err(QueensError::OutOfBounds { row, column, size });
        }

        let cell = session.board.get(row, column);
        if cell != Cell::Empty {
            debug!("Ignoring placement at ({}, {}): cell is {:?}", row, column, cell);
            return Ok(Placement::Ignored(cell));
        }

        if let Err(e) = session.place(row, column, gc) {
            self.session = None;
            return Err(e);
        }
        Ok(Placement::Placed)
    }

    pub fn game_board(&self) -> Result<&Board, QueensError> {
        Ok(&self.session()?.board)
    }

    pub fn size(&self) -> Result<usize, QueensError> {
        Ok(self.session()?.board.size())
    }

    /// Whether some solution extends the current placements.
    pub fn is_satisfiable(&self) -> Result<bool, QueensError> {
        let session = self.session()?;
        Ok(!session.bdd.is_zero(session.rules))
    }

    /// Whether all `n` queens are on the board.
    pub fn is_solved(&self) -> Result<bool, QueensError> {
        let board = &self.session()?.board;
        Ok(board.count(Cell::Queen) == board.size())
    }

    /// Number of full solutions extending the current placements.
    pub fn solution_count(&self) -> Result<BigUint, QueensError> {
        let session = self.session()?;
        let n = session.board.size();
        // The live rule no longer mentions the placed cells, so each of them
        // doubles the count over all `n * n` variables.
        let placed = session.board.count(Cell::Queen);
        Ok(session.bdd.sat_count(session.rules, n * n) >> placed)
    }

    /// One full solution extending the current placements, as sorted queen cells.
    pub fn suggest_completion(&self) -> Result<Option<Vec<(usize, usize)>>, QueensError> {
        let session = self.session()?;
        let n = session.board.size();
        let path = match session.bdd.one_sat(session.rules) {
            Some(path) => path,
            None => return Ok(None),
        };

        let mut cells = session.board.queens();
        cells.extend(
            path.into_iter()
                .filter(|&lit| lit > 0)
                .map(|lit| {
                    let index = (lit - 1) as usize;
                    (index / n, index % n)
                }),
        );
        cells.sort();
        Ok(Some(cells))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::error::BddError;

    #[test]
    fn test_not_initialized() {
        let mut game = QueensGame::new();
        assert_eq!(game.insert_queen(0, 0), Err(QueensError::NotInitialized));
        assert_eq!(game.game_board().err(), Some(QueensError::NotInitialized));
        assert_eq!(game.solution_count().err(), Some(QueensError::NotInitialized));
    }

    #[test]
    fn test_invalid_size() {
        let mut game = QueensGame::new();
        assert_eq!(game.initialize_game(0), Err(QueensError::InvalidSize(0)));
        assert!(game.game_board().is_err());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut game = QueensGame::new();
        game.initialize_game(3).unwrap();
        assert_eq!(
            game.insert_queen(3, 0),
            Err(QueensError::OutOfBounds {
                row: 3,
                column: 0,
                size: 3
            })
        );
        assert_eq!(game.game_board().unwrap().count(Cell::Empty), 9);
    }

    #[test]
    fn test_single_cell_board() {
        let mut game = QueensGame::new();
        game.initialize_game(1).unwrap();
        assert!(game.is_satisfiable().unwrap());
        assert_eq!(game.solution_count().unwrap(), BigUint::from(1u32));

        let placement = game.insert_queen(0, 0).unwrap();
        assert!(placement.is_accepted() && placement.is_placed());
        assert!(game.is_solved().unwrap());
        let again = game.insert_queen(0, 0).unwrap();
        assert!(again.is_accepted() && !again.is_placed());
        assert_eq!(game.game_board().unwrap().to_codes(), vec![vec![1]]);
    }

    #[test]
    fn test_unsolvable_board() {
        let mut game = QueensGame::new();
        game.initialize_game(3).unwrap();
        assert!(!game.is_satisfiable().unwrap());
        // Nothing is probed before the first placement.
        assert_eq!(game.game_board().unwrap().count(Cell::Empty), 9);

        game.insert_queen(1, 1).unwrap();
        let board = game.game_board().unwrap();
        assert_eq!(board.count(Cell::Queen), 1);
        assert_eq!(board.count(Cell::Dead), 8);
        assert_eq!(game.suggest_completion(), Ok(None));
    }

    #[test]
    fn test_solution_count_after_placement() {
        let mut game = QueensGame::new();
        game.initialize_game(6).unwrap();
        assert_eq!(game.solution_count().unwrap(), BigUint::from(4u32));

        // (0, 1) appears in exactly one of the four 6-queens solutions.
        game.insert_queen(0, 1).unwrap();
        assert_eq!(game.solution_count().unwrap(), BigUint::from(1u32));
        assert_eq!(
            game.suggest_completion().unwrap(),
            Some(vec![(0, 1), (1, 3), (2, 5), (3, 0), (4, 2), (5, 4)])
        );
    }

    #[test]
    fn test_without_garbage_collection() {
        let config = GameConfig::default().with_garbage_collection(false);
        let mut game = QueensGame::with_config(config);
        game.initialize_game(5).unwrap();
        game.insert_queen(0, 0).unwrap();
        assert!(game.is_satisfiable().unwrap());
        assert_eq!(game.solution_count().unwrap(), BigUint::from(2u32));
    }

    #[test]
    fn test_capacity_error_aborts_initialization() {
        let config =
            GameConfig::default().with_bdd_config(BddConfig::default().with_storage_bits(6));
        let mut game = QueensGame::with_config(config);
        let err = game.initialize_game(8).unwrap_err();
        assert_eq!(err, QueensError::Bdd(BddError::StorageFull { capacity: 64 }));
        assert_eq!(game.insert_queen(0, 0), Err(QueensError::NotInitialized));
    }

    #[test]
    fn test_engine_error_during_placement_drops_game() {
        // 2x2 board in an 8-cell table: sentinel, terminal, four literals,
        // and the two nodes of x1 & x2 & x3 fill it up.
        let bdd = Bdd::new(3);
        for _ in 0..4 {
            bdd.new_var().unwrap();
        }
        let rules = bdd.cube([1, 2, 3]).unwrap();
        assert_eq!(bdd.stats().live_nodes, 7);

        let mut game = QueensGame::new();
        game.session = Some(Session {
            bdd,
            rules,
            board: Board::new(2),
        });

        // Restricting by x2 needs the fresh node x1 & x3.
        assert_eq!(
            game.insert_queen(0, 1),
            Err(QueensError::Bdd(BddError::StorageFull { capacity: 8 }))
        );
        assert_eq!(game.insert_queen(0, 1), Err(QueensError::NotInitialized));
        assert_eq!(game.game_board().err(), Some(QueensError::NotInitialized));

        game.initialize_game(4).unwrap();
        assert_eq!(game.insert_queen(0, 1), Ok(Placement::Placed));
    }

    #[test]
    fn test_reinitialize() {
        let mut game = QueensGame::new();
        game.initialize_game(4).unwrap();
        game.insert_queen(0, 1).unwrap();

        game.initialize_game(5).unwrap();
        let board = game.game_board().unwrap();
        assert_eq!(board.size(), 5);
        assert_eq!(board.count(Cell::Empty), 25);
        assert_eq!(game.solution_count().unwrap(), BigUint::from(10u32));
    }
}
