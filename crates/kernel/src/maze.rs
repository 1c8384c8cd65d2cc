use serde::{Deserialize, Serialize};
use tilemaze_common::{Direction, TileCoord};

/// Rows in the reference maze.
pub const REFERENCE_ROWS: usize = 6;
/// Columns in the reference maze.
pub const REFERENCE_COLS: usize = 5;
/// Tile the player starts on.
pub const REFERENCE_START: TileCoord = TileCoord::new(3, 2);

const O: bool = false;
const X: bool = true;

/// Legal moves per tile in row-major order, columns are (up, left, down, right).
#[rustfmt::skip]
pub const REFERENCE_PASSABILITY: [[bool; 4]; REFERENCE_ROWS * REFERENCE_COLS] = [
    [O, O, O, X], [O, X, X, X], [O, X, X, X], [O, X, X, O], [O, O, X, O],
    [O, O, X, O], [X, O, O, O], [X, O, X, X], [X, X, X, O], [X, O, X, O],
    [X, O, O, X], [O, X, O, X], [X, X, X, O], [X, O, O, X], [X, X, O, O],
    [O, O, X, O], [O, O, X, X], [X, X, O, X], [O, X, X, X], [O, X, X, O],
    [X, O, X, O], [X, O, X, O], [O, O, X, O], [X, O, X, O], [X, O, O, O],
    [X, O, O, X], [X, X, O, X], [X, X, O, X], [X, X, O, X], [O, X, O, O],
];

/// Errors from building a maze out of a passability table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze must have at least one row and one column, got {rows}x{cols}")]
    Empty { rows: usize, cols: usize },
    #[error("passability table has {got} rows, expected {expected} for a {rows}x{cols} grid")]
    TableSize {
        rows: usize,
        cols: usize,
        expected: usize,
        got: usize,
    },
    #[error("tile {tile} declares a {dir:?} edge that leaves the grid")]
    EdgeLeavesGrid { tile: TileCoord, dir: Direction },
    #[error("start tile {0} is outside the grid")]
    StartOutOfBounds(TileCoord),
}

/// Fixed tile graph. Edges are stored per tile per direction; nothing forces
/// an edge A→B to imply B→A.
///
/// Deserialization goes through [`Maze::from_table`], so a loaded maze upholds
/// the same invariants as a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MazeTable")]
pub struct Maze {
    rows: usize,
    cols: usize,
    passable: Vec<[bool; 4]>,
    start: TileCoord,
}

/// Unchecked wire form of a [`Maze`].
#[derive(Deserialize)]
struct MazeTable {
    rows: usize,
    cols: usize,
    passable: Vec<[bool; 4]>,
    start: TileCoord,
}

impl TryFrom<MazeTable> for Maze {
    type Error = MazeError;

    fn try_from(table: MazeTable) -> Result<Self, Self::Error> {
        Self::from_table(table.rows, table.cols, table.passable, table.start)
    }
}

impl Maze {
    /// The compiled-in 6x5 maze. Its boundary invariant is checked by tests.
    pub fn reference() -> Self {
        Self {
            rows: REFERENCE_ROWS,
            cols: REFERENCE_COLS,
            passable: REFERENCE_PASSABILITY.to_vec(),
            start: REFERENCE_START,
        }
    }

    /// Build a maze from a row-major passability table.
    ///
    /// Rejects tables in which a boundary tile declares an edge leading off
    /// the grid: navigation never bounds-checks a move, so this is the only
    /// place that guarantee is established.
    pub fn from_table(
        rows: usize,
        cols: usize,
        passable: Vec<[bool; 4]>,
        start: TileCoord,
    ) -> Result<Self, MazeError> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::Empty { rows, cols });
        }
        if passable.len() != rows * cols {
            return Err(MazeError::TableSize {
                rows,
                cols,
                expected: rows * cols,
                got: passable.len(),
            });
        }
        if start.row >= rows || start.col >= cols {
            return Err(MazeError::StartOutOfBounds(start));
        }
        let maze = Self {
            rows,
            cols,
            passable,
            start,
        };
        if let Some((tile, dir)) = maze.outward_edges().next() {
            return Err(MazeError::EdgeLeavesGrid { tile, dir });
        }
        Ok(maze)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn start(&self) -> TileCoord {
        self.start
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.row < self.rows && tile.col < self.cols
    }

    /// Row-major index of `tile`.
    pub fn index_of(&self, tile: TileCoord) -> usize {
        tile.index(self.cols)
    }

    /// Whether the table allows leaving `tile` in `dir`.
    pub fn is_passable(&self, tile: TileCoord, dir: Direction) -> bool {
        self.passable[self.index_of(tile)][dir.slot()]
    }

    /// The raw table row for `tile`.
    pub fn edges(&self, tile: TileCoord) -> [bool; 4] {
        self.passable[self.index_of(tile)]
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| TileCoord::new(row, col)))
    }

    /// Passable edges whose far end is not a grid tile.
    pub fn outward_edges(&self) -> impl Iterator<Item = (TileCoord, Direction)> + '_ {
        self.tiles().flat_map(move |tile| {
            Direction::ALL.into_iter().filter_map(move |dir| {
                let leaves = self.is_passable(tile, dir)
                    && !tile.step(dir).is_some_and(|n| self.contains(n));
                leaves.then_some((tile, dir))
            })
        })
    }

    /// Passable edges A→B where B does not declare the way back.
    pub fn one_way_edges(&self) -> Vec<(TileCoord, Direction)> {
        self.tiles()
            .flat_map(|tile| Direction::ALL.into_iter().map(move |dir| (tile, dir)))
            .filter(|&(tile, dir)| {
                self.is_passable(tile, dir)
                    && tile
                        .step(dir)
                        .filter(|n| self.contains(*n))
                        .is_some_and(|n| !self.is_passable(n, dir.opposite()))
            })
            .collect()
    }
}
