//! Gem colours and gem counts.
//!
//! ## Colour order
//!
//! Every fixed-size array in the engine uses the same index order:
//! `white(0), blue(1), green(2), red(3), black(4), gold(5)`.
//! Gold is the joker: it is only gained by reserving and pays for any colour.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of regular gem colours (gold excluded).
pub const GEM_COLORS: usize = 5;

/// Number of token kinds including gold.
pub const TOKEN_KINDS: usize = 6;

/// Gem colour, including the gold joker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Green,
    Red,
    Black,
    Gold,
}

impl Color {
    /// The five regular colours, in index order.
    pub const GEMS: [Color; GEM_COLORS] = [
        Color::White,
        Color::Blue,
        Color::Green,
        Color::Red,
        Color::Black,
    ];

    /// All six token kinds, in index order.
    pub const ALL: [Color; TOKEN_KINDS] = [
        Color::White,
        Color::Blue,
        Color::Green,
        Color::Red,
        Color::Black,
        Color::Gold,
    ];

    /// Array index of this colour.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Colour for an array index, if in range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Color> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase colour name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Red => "red",
            Color::Black => "black",
            Color::Gold => "gold",
        }
    }

    /// One-letter abbreviation used in compact board output.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Blue => 'u',
            Color::Green => 'g',
            Color::Red => 'r',
            Color::Black => 'k',
            Color::Gold => '*',
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Token counts for all six kinds (five colours plus gold).
///
/// Used for the bank and for each player's holdings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gems(pub [u8; TOKEN_KINDS]);

impl Gems {
    /// No tokens at all.
    pub const EMPTY: Gems = Gems([0; TOKEN_KINDS]);

    /// Build from five colour counts plus a gold count.
    #[must_use]
    pub const fn new(colors: [u8; GEM_COLORS], gold: u8) -> Self {
        Gems([colors[0], colors[1], colors[2], colors[3], colors[4], gold])
    }

    /// Total number of tokens, gold included.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&n| u32::from(n)).sum()
    }

    /// The five regular colour counts.
    #[must_use]
    pub fn colors(&self) -> [u8; GEM_COLORS] {
        [self.0[0], self.0[1], self.0[2], self.0[3], self.0[4]]
    }

    /// Number of regular colours with at least one token.
    #[must_use]
    pub fn colors_in_stock(&self) -> usize {
        self.0[..GEM_COLORS].iter().filter(|&&n| n > 0).count()
    }

    /// Add a five-colour delta.
    pub fn add_colors(&mut self, delta: &[u8; GEM_COLORS]) {
        for (slot, &d) in self.0.iter_mut().zip(delta.iter()) {
            *slot += d;
        }
    }

    /// Subtract a five-colour delta; saturates at zero.
    pub fn remove_colors(&mut self, delta: &[u8; GEM_COLORS]) {
        for (slot, &d) in self.0.iter_mut().zip(delta.iter()) {
            *slot = slot.saturating_sub(d);
        }
    }

    /// Whether every colour count covers the given five-colour delta.
    #[must_use]
    pub fn covers(&self, delta: &[u8; GEM_COLORS]) -> bool {
        self.0.iter().zip(delta.iter()).all(|(&have, &need)| have >= need)
    }

    /// Colour with the largest pile (lowest index on ties); `None` when empty.
    #[must_use]
    pub fn largest_pile(&self) -> Option<Color> {
        let mut best: Option<Color> = None;
        for color in Color::ALL {
            let n = self[color];
            if n > 0 && best.map_or(true, |b| n > self[b]) {
                best = Some(color);
            }
        }
        best
    }
}

impl Index<Color> for Gems {
    type Output = u8;

    fn index(&self, color: Color) -> &u8 {
        &self.0[color.index()]
    }
}

impl IndexMut<Color> for Gems {
    fn index_mut(&mut self, color: Color) -> &mut u8 {
        &mut self.0[color.index()]
    }
}

impl std::fmt::Display for Gems {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for color in Color::ALL {
            if self[color] == 0 {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", self[color], color.letter())?;
            first = false;
        }
        if first {
            f.write_str("-")?;
        }
        Ok(())
    }
}
