use crate::maze::Maze;
use serde::Serialize;
use std::collections::BTreeSet;
use tilemaze_common::{Direction, TileCoord};

/// Player position and visitation record over a fixed [`Maze`].
///
/// The only mutation is [`NavigationState::apply_move`]. Moves the table does
/// not allow are silently ignored; they are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    maze: Maze,
    position: TileCoord,
    /// BTreeSet for deterministic iteration when listing visited tiles.
    visited: BTreeSet<TileCoord>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(Maze::reference())
    }
}

impl NavigationState {
    /// Start on the maze's start tile, which counts as visited.
    pub fn new(maze: Maze) -> Self {
        let position = maze.start();
        Self {
            maze,
            position,
            visited: BTreeSet::from([position]),
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn current_position(&self) -> TileCoord {
        self.position
    }

    pub fn is_visited(&self, tile: TileCoord) -> bool {
        self.visited.contains(&tile)
    }

    pub fn visited(&self) -> &BTreeSet<TileCoord> {
        &self.visited
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Tiles not yet entered, in row-major order.
    pub fn unvisited(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.maze.tiles().filter(|t| !self.visited.contains(t))
    }

    /// Step one tile in `dir` if the current tile has a passable edge that
    /// way, marking the destination visited. Returns whether the player moved.
    pub fn apply_move(&mut self, dir: Direction) -> bool {
        let from = self.position;
        if !self.maze.is_passable(from, dir) {
            tracing::debug!(%from, ?dir, "move blocked");
            return false;
        }
        // Not a bounds check: `Maze` construction rejects outward edges, so a
        // passable edge always lands on a grid tile and this branch is
        // unreachable. `step` only catches Up/Left underflow anyway.
        let Some(to) = from.step(dir) else {
            return false;
        };
        self.position = to;
        let first_visit = self.visited.insert(to);
        tracing::debug!(%from, %to, first_visit, "moved");
        true
    }

    /// Apply a sequence of moves, returning how many actually happened.
    pub fn apply_moves(&mut self, moves: impl IntoIterator<Item = Direction>) -> usize {
        moves
            .into_iter()
            .map(|dir| self.apply_move(dir))
            .filter(|moved| *moved)
            .count()
    }
}
