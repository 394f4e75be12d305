//! Board geometry: where each player's track runs.
//!
//! The rules only need the length of every player's path and whether two
//! `(player, index)` pairs land on the same cell. Coordinates are opaque to them.

use std::{fmt::Debug, hash::Hash};

use hashbrown::HashSet;

use crate::ludo::{EngineError, PLAYER_COUNT, Player, TOKENS_PER_PLAYER};

/// Longest path a geometry may declare; keeps `index + die` inside `u8`.
pub const MAX_PATH_LENGTH: usize = 240;

/// Provides the waypoints of the board. Positions are only compared for equality:
/// tokens of different players meet on a cell exactly when their waypoints are equal.
pub trait BoardGeometry {
    type Position: Copy + Eq + Hash + Debug;

    /// Index of the finish cell on `player`'s path.
    fn path_length(&self, player: Player) -> usize;

    /// Waypoint of `track_index` (0..=path_length) on `player`'s path.
    fn waypoint(&self, player: Player, track_index: u8) -> Self::Position;

    /// Where token `slot` of `player` waits at home.
    fn home_waypoint(&self, player: Player, slot: u8) -> Self::Position;

    /// Launch pad of token `slot` of `player`.
    fn launch_waypoint(&self, player: Player, slot: u8) -> Self::Position;
}

/// Checks a geometry once at startup and returns the per-player path lengths.
///
/// Rejects empty or oversized paths, paths of unequal length, paths that revisit a
/// cell, and players whose home or launch waypoints coincide.
pub fn validate<G: BoardGeometry>(geometry: &G) -> Result<[u8; PLAYER_COUNT], EngineError> {
    let mut lengths = [0u8; PLAYER_COUNT];

    for player in Player::ALL {
        let length = geometry.path_length(player);
        if length == 0 {
            return Err(EngineError::InvalidConfiguration(format!("{player} has a zero-length path")));
        }
        if length > MAX_PATH_LENGTH {
            return Err(EngineError::InvalidConfiguration(format!(
                "{player} path length {length} exceeds {MAX_PATH_LENGTH}"
            )));
        }
        lengths[player.index()] = length as u8;

        let mut seen = HashSet::with_capacity(length + 1);
        for index in 0..=length as u8 {
            if !seen.insert(geometry.waypoint(player, index)) {
                return Err(EngineError::InvalidConfiguration(format!(
                    "{player} path revisits a cell at index {index}"
                )));
            }
        }

        let slots = 0..TOKENS_PER_PLAYER as u8;
        let homes: HashSet<_> = slots.clone().map(|slot| geometry.home_waypoint(player, slot)).collect();
        let launches: HashSet<_> = slots.map(|slot| geometry.launch_waypoint(player, slot)).collect();
        if homes.len() != TOKENS_PER_PLAYER || launches.len() != TOKENS_PER_PLAYER {
            return Err(EngineError::InvalidConfiguration(format!(
                "{player} needs {TOKENS_PER_PLAYER} distinct home and launch waypoints"
            )));
        }
    }

    if lengths.iter().any(|&length| length != lengths[0]) {
        return Err(EngineError::InvalidConfiguration(format!("inconsistent path lengths {lengths:?}")));
    }

    Ok(lengths)
}

/// Side of the square board in cells.
pub const BOARD_CELLS: u8 = 15;

/// A cell of the 15x15 grid, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub col: u8,
    pub row: u8,
}

impl Cell {
    pub const fn new(col: u8, row: u8) -> Self {
        Cell { col, row }
    }

    /// Quarter turn clockwise around the centre cell.
    pub const fn rotate(self) -> Self {
        Cell { col: BOARD_CELLS - 1 - self.row, row: self.col }
    }

    fn rotated(self, quarter_turns: usize) -> Self {
        (0..quarter_turns).fold(self, |cell, _| cell.rotate())
    }
}

/// Straight runs of the public loop, walked clockwise from Green's entry cell:
/// `(start col, start row, dcol, drow, cells)`.
const LOOP_RUNS: [(u8, u8, i8, i8, u8); 12] = [
    (1, 6, 1, 0, 5),
    (6, 5, 0, -1, 6),
    (7, 0, 1, 0, 2),
    (8, 1, 0, 1, 5),
    (9, 6, 1, 0, 6),
    (14, 7, 0, 1, 2),
    (13, 8, -1, 0, 5),
    (8, 9, 0, 1, 6),
    (7, 14, -1, 0, 2),
    (6, 13, 0, -1, 5),
    (5, 8, -1, 0, 6),
    (0, 7, 0, -1, 2),
];

/// Cells of the shared loop.
pub const LOOP_CELLS: usize = 52;

/// Cells of the loop a token walks before turning into its home column.
const LOOP_STEPS: usize = LOOP_CELLS - 1;

/// Private cells between the loop and the finish.
const HOME_COLUMN_CELLS: u8 = 5;

/// Green's layout; every other seat is the same layout turned a quarter further.
const GREEN_HOME_COLUMN_START: Cell = Cell::new(1, 7);
const GREEN_FINISH: Cell = Cell::new(6, 7);
const GREEN_HOMES: [Cell; TOKENS_PER_PLAYER] = [Cell::new(1, 1), Cell::new(4, 1), Cell::new(1, 4), Cell::new(4, 4)];
const GREEN_LAUNCHES: [Cell; TOKENS_PER_PLAYER] = [Cell::new(2, 2), Cell::new(3, 2), Cell::new(2, 3), Cell::new(3, 3)];

/// The classic cross-and-circle board.
///
/// Each path is 51 loop cells, 5 home column cells and the finish cell: 57
/// waypoints, path length 56. Only loop cells are shared between players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardBoard {
    paths: [Vec<Cell>; PLAYER_COUNT],
    homes: [[Cell; TOKENS_PER_PLAYER]; PLAYER_COUNT],
    launches: [[Cell; TOKENS_PER_PLAYER]; PLAYER_COUNT],
}

impl StandardBoard {
    pub fn new() -> Self {
        let green_path: Vec<Cell> = Self::loop_cells()
            .take(LOOP_STEPS)
            .chain((0..HOME_COLUMN_CELLS).map(|i| Cell::new(GREEN_HOME_COLUMN_START.col + i, GREEN_HOME_COLUMN_START.row)))
            .chain(std::iter::once(GREEN_FINISH))
            .collect();

        let paths = std::array::from_fn(|turns| green_path.iter().map(|cell| cell.rotated(turns)).collect());
        let homes = std::array::from_fn(|turns| GREEN_HOMES.map(|cell| cell.rotated(turns)));
        let launches = std::array::from_fn(|turns| GREEN_LAUNCHES.map(|cell| cell.rotated(turns)));

        StandardBoard { paths, homes, launches }
    }

    /// The shared loop, clockwise from Green's entry cell.
    pub fn loop_cells() -> impl Iterator<Item = Cell> {
        LOOP_RUNS.into_iter().flat_map(|(col, row, dcol, drow, cells)| {
            (0..cells as i8).map(move |i| Cell::new((col as i8 + dcol * i) as u8, (row as i8 + drow * i) as u8))
        })
    }

    /// All waypoints of `player`'s path, entry cell first.
    pub fn path(&self, player: Player) -> &[Cell] {
        &self.paths[player.index()]
    }
}

impl Default for StandardBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardGeometry for StandardBoard {
    type Position = Cell;

    fn path_length(&self, player: Player) -> usize {
        self.paths[player.index()].len() - 1
    }

    fn waypoint(&self, player: Player, track_index: u8) -> Cell {
        self.paths[player.index()][track_index as usize]
    }

    fn home_waypoint(&self, player: Player, slot: u8) -> Cell {
        self.homes[player.index()][slot as usize]
    }

    fn launch_waypoint(&self, player: Player, slot: u8) -> Cell {
        self.launches[player.index()][slot as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_on_path(board: &StandardBoard, player: Player, cell: Cell) -> Option<u8> {
        board.path(player).iter().position(|&c| c == cell).map(|i| i as u8)
    }

    #[test]
    fn test_loop_is_a_closed_ring() {
        let cells: Vec<Cell> = StandardBoard::loop_cells().collect();
        assert_eq!(cells.len(), LOOP_CELLS);
        assert_eq!(cells.iter().collect::<HashSet<_>>().len(), LOOP_CELLS);
        for (i, a) in cells.iter().enumerate() {
            let b = cells[(i + 1) % cells.len()];
            let distance = a.col.abs_diff(b.col) + a.row.abs_diff(b.row);
            // Corners of the cross step diagonally.
            assert!(distance == 1 || distance == 2, "{a:?} -> {b:?}");
            assert!(a.col < BOARD_CELLS && a.row < BOARD_CELLS);
        }
    }

    #[test]
    fn test_standard_board_is_valid() {
        let board = StandardBoard::new();
        assert_eq!(validate(&board), Ok([56; PLAYER_COUNT]));
        for player in Player::ALL {
            assert_eq!(board.path(player).len(), 57);
        }
    }

    #[test]
    fn test_entries_are_a_quarter_loop_apart() {
        let board = StandardBoard::new();
        let ring: Vec<Cell> = StandardBoard::loop_cells().collect();
        for player in Player::ALL {
            assert_eq!(board.waypoint(player, 0), ring[13 * player.index()]);
        }
    }

    #[test]
    fn test_home_columns_are_private() {
        let board = StandardBoard::new();
        let ring: HashSet<Cell> = StandardBoard::loop_cells().collect();
        for player in Player::ALL {
            for index in LOOP_STEPS as u8..=56 {
                let cell = board.waypoint(player, index);
                assert!(!ring.contains(&cell));
                for other in Player::ALL.into_iter().filter(|&o| o != player) {
                    assert_eq!(index_on_path(&board, other, cell), None);
                }
            }
        }
    }

    #[test]
    fn test_shared_cells_map_between_players() {
        let board = StandardBoard::new();
        // Yellow enters 13 cells further round, so Green's index 14 is Yellow's index 1.
        let cell = board.waypoint(Player::Green, 14);
        assert_eq!(index_on_path(&board, Player::Yellow, cell), Some(1));
        assert_eq!(board.waypoint(Player::Yellow, 1), cell);
    }

    struct Broken {
        lengths: [usize; PLAYER_COUNT],
        shared_home: bool,
    }

    impl BoardGeometry for Broken {
        type Position = (u8, u8);

        fn path_length(&self, player: Player) -> usize {
            self.lengths[player.index()]
        }

        fn waypoint(&self, player: Player, track_index: u8) -> (u8, u8) {
            (player as u8, track_index)
        }

        fn home_waypoint(&self, player: Player, slot: u8) -> (u8, u8) {
            if self.shared_home { (100 + player as u8, 0) } else { (100 + player as u8, slot) }
        }

        fn launch_waypoint(&self, player: Player, slot: u8) -> (u8, u8) {
            (200 + player as u8, slot)
        }
    }

    #[test]
    fn test_invalid_geometries_are_rejected() {
        let zero = Broken { lengths: [56, 0, 56, 56], shared_home: false };
        assert!(matches!(validate(&zero), Err(EngineError::InvalidConfiguration(_))));

        let uneven = Broken { lengths: [56, 55, 56, 56], shared_home: false };
        assert!(matches!(validate(&uneven), Err(EngineError::InvalidConfiguration(_))));

        let huge = Broken { lengths: [MAX_PATH_LENGTH + 1; PLAYER_COUNT], shared_home: false };
        assert!(matches!(validate(&huge), Err(EngineError::InvalidConfiguration(_))));

        let shared = Broken { lengths: [56; PLAYER_COUNT], shared_home: true };
        assert!(matches!(validate(&shared), Err(EngineError::InvalidConfiguration(_))));

        let fine = Broken { lengths: [10; PLAYER_COUNT], shared_home: false };
        assert_eq!(validate(&fine), Ok([10; PLAYER_COUNT]));
    }
}
