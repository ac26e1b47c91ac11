//! Shared board encoding.
//!
//! Both the hidden and the visible grid store one `i8` per cell:
//! `0..=8` is an adjacent-mine count (hidden) or a revealed count (visible),
//! `-1` a mine (hidden only), `-2` an unknown cell (visible only) and `-3` a
//! flag (visible only).

/// Raw encoding of a mine on the hidden grid.
pub const MINE: i8 = -1;
/// Raw encoding of a not-yet-revealed cell on the visible grid.
pub const UNKNOWN: i8 = -2;
/// Raw encoding of a flagged cell on the visible grid.
pub const FLAGGED: i8 = -3;

/// Typed view of a single grid entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Revealed (visible grid) or computed (hidden grid) adjacent-mine count.
    Count(u8),
    Mine,
    Unknown,
    Flagged,
}

impl Tile {
    pub fn from_raw(value: i8) -> Option<Tile> {
        match value {
            0..=8 => Some(Tile::Count(value as u8)),
            MINE => Some(Tile::Mine),
            UNKNOWN => Some(Tile::Unknown),
            FLAGGED => Some(Tile::Flagged),
            _ => None,
        }
    }

    pub fn raw(self) -> i8 {
        match self {
            Tile::Count(n) => n as i8,
            Tile::Mine => MINE,
            Tile::Unknown => UNKNOWN,
            Tile::Flagged => FLAGGED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        for raw in [-3, -2, -1, 0, 1, 5, 8] {
            assert_eq!(Tile::from_raw(raw).unwrap().raw(), raw);
        }
    }

    #[test]
    fn test_invalid_raw_values() {
        assert_eq!(Tile::from_raw(9), None);
        assert_eq!(Tile::from_raw(-4), None);
        assert_eq!(Tile::from_raw(i8::MIN), None);
    }
}
