//! Board geometry defaults and search parameters.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const BOARD_SIZE: usize = 10;

/// Number of identical stones in a line needed to win.
pub const WIN_LENGTH: usize = 5;

/// Offsets (row, col) to the 8 king-move neighbours of a cell.
/// Order: N, S, W, E, NW, NE, SW, SE
pub const NEIGHBORS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// The four line axes checked for a win: horizontal, vertical and both diagonals.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of search iterations per move.
pub const N_ITERATIONS: usize = 10_000;

/// UCT exploration constant.
pub const EXPLORATION_WEIGHT: f64 = 1.4;

/// Progress report period (number of iterations between debug reports).
pub const REPORT_PERIOD: usize = 1_000;
