use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tile in the maze grid, addressed by row (top to bottom) and column
/// (left to right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub row: usize,
    pub col: usize,
}

impl TileCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index of this tile in a grid `cols` wide.
    pub const fn index(self, cols: usize) -> usize {
        self.row * cols + self.col
    }

    /// The neighbouring tile one step in `dir`, or `None` if that step would
    /// leave the non-negative quadrant.
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dr, dc) = dir.delta();
        Some(Self {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four grid moves. The discriminant order (up, left, down, right)
/// matches the column order of the passability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Left, Self::Down, Self::Right];

    /// Column of this direction in a `[bool; 4]` passability row.
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// (row, col) delta of one step.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Left => (0, -1),
            Self::Down => (1, 0),
            Self::Right => (0, 1),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Down => Self::Up,
            Self::Right => Self::Left,
        }
    }

    /// Single-letter code used by the move-string format (`U`, `L`, `D`, `R`).
    pub const fn code(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Left => 'L',
            Self::Down => 'D',
            Self::Right => 'R',
        }
    }

    /// Parse a move string such as `"UULR"`. Whitespace is ignored.
    pub fn parse_sequence(s: &str) -> Result<Vec<Self>, ParseDirectionError> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(Self::try_from)
            .collect()
    }
}

/// Errors from parsing move codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDirectionError {
    #[error("unknown direction code {0:?} (expected one of U, L, D, R)")]
    UnknownCode(char),
    #[error("expected a single direction code, got {0:?}")]
    NotSingle(String),
}

impl TryFrom<char> for Direction {
    type Error = ParseDirectionError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'U' => Ok(Self::Up),
            'L' => Ok(Self::Left),
            'D' => Ok(Self::Down),
            'R' => Ok(Self::Right),
            _ => Err(ParseDirectionError::UnknownCode(c)),
        }
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => return Ok(Self::Up),
            "left" => return Ok(Self::Left),
            "down" => return Ok(Self::Down),
            "right" => return Ok(Self::Right),
            _ => {}
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(ParseDirectionError::NotSingle(s.to_string())),
        }
    }
}

/// The six textures the scene draws with, in draw order. Draw order doubles as
/// z-order: later slots composite over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextureSlot {
    Background,
    Player,
    FindBanner,
    MineBanner,
    FoundBanner,
    Cover,
}

impl TextureSlot {
    pub const COUNT: usize = 6;

    pub const ALL: [TextureSlot; Self::COUNT] = [
        Self::Background,
        Self::Player,
        Self::FindBanner,
        Self::MineBanner,
        Self::FoundBanner,
        Self::Cover,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Image file backing this slot, relative to the asset directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Background => "background.png",
            Self::Player => "char.png",
            Self::FindBanner => "find_message.png",
            Self::MineBanner => "mine_message.png",
            Self::FoundBanner => "found_message.png",
            Self::Cover => "black_cover.png",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Player => "player",
            Self::FindBanner => "find_banner",
            Self::MineBanner => "mine_banner",
            Self::FoundBanner => "found_banner",
            Self::Cover => "cover",
        }
    }
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_by_delta() {
        let t = TileCoord::new(3, 2);
        assert_eq!(t.step(Direction::Up), Some(TileCoord::new(2, 2)));
        assert_eq!(t.step(Direction::Left), Some(TileCoord::new(3, 1)));
        assert_eq!(t.step(Direction::Down), Some(TileCoord::new(4, 2)));
        assert_eq!(t.step(Direction::Right), Some(TileCoord::new(3, 3)));
    }

    #[test]
    fn step_off_origin_is_none() {
        let t = TileCoord::new(0, 0);
        assert_eq!(t.step(Direction::Up), None);
        assert_eq!(t.step(Direction::Left), None);
    }

    #[test]
    fn direction_slots_follow_table_order() {
        let slots: Vec<usize> = Direction::ALL.iter().map(|d| d.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn parse_move_sequence() {
        let moves = Direction::parse_sequence("uU l\nDr").unwrap();
        assert_eq!(
            moves,
            vec![
                Direction::Up,
                Direction::Up,
                Direction::Left,
                Direction::Down,
                Direction::Right
            ]
        );
        assert_eq!(
            Direction::parse_sequence("UX"),
            Err(ParseDirectionError::UnknownCode('X'))
        );
    }

    #[test]
    fn unknown_code_reports_original_char() {
        assert_eq!(
            Direction::try_from('x'),
            Err(ParseDirectionError::UnknownCode('x'))
        );
        assert_eq!(Direction::try_from('d'), Ok(Direction::Down));
    }

    #[test]
    fn parse_direction_words() {
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!("R".parse::<Direction>(), Ok(Direction::Right));
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn texture_slots_in_draw_order() {
        for (i, slot) in TextureSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
        assert_eq!(TextureSlot::Player.file_name(), "char.png");
        assert_eq!(TextureSlot::Cover.file_name(), "black_cover.png");
    }
}
