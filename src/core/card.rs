//! Development cards and noble tiles.

use serde::{Deserialize, Serialize};

use super::gems::{Color, GEM_COLORS};
use super::player::PlayerId;

/// Prestige awarded by every noble.
pub const NOBLE_POINTS: u32 = 3;

/// A development card.
///
/// `cost` lists the five regular colours; the card's `bonus` colour is the
/// permanent discount it grants once owned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Tier (0, 1 or 2).
    pub tier: u8,
    /// Gems required, per regular colour.
    pub cost: [u8; GEM_COLORS],
    /// Bonus colour produced on ownership (never gold).
    pub bonus: Color,
    /// Prestige points.
    pub points: u8,
}

impl Card {
    /// Earning as a six-slot vector: one-hot bonus colour plus points.
    ///
    /// Order: five colours, an unused slot, then points.
    #[must_use]
    pub fn earning(&self) -> [u8; 7] {
        let mut earning = [0; 7];
        earning[self.bonus.index()] = 1;
        earning[6] = self.points;
        earning
    }

    /// Total gem cost before discounts.
    #[must_use]
    pub fn total_cost(&self) -> u32 {
        self.cost.iter().map(|&n| u32::from(n)).sum()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        let mut first = true;
        for color in Color::GEMS {
            let n = self.cost[color.index()];
            if n == 0 {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", n, color.letter())?;
            first = false;
        }
        write!(f, "] +{}", self.bonus.letter())?;
        if self.points > 0 {
            write!(f, " {}pt", self.points)?;
        }
        Ok(())
    }
}

/// A noble requirement: bonus-card counts per colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Noble {
    pub requirement: [u8; GEM_COLORS],
}

impl Noble {
    /// Whether a bonus profile meets this noble's requirement.
    #[must_use]
    pub fn is_met_by(&self, bonuses: &[u8; GEM_COLORS]) -> bool {
        self.requirement
            .iter()
            .zip(bonuses.iter())
            .all(|(&need, &have)| have >= need)
    }
}

/// A noble in play, possibly claimed.
///
/// Once `owner` is set it never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NobleTile {
    pub noble: Noble,
    pub owner: Option<PlayerId>,
}

impl NobleTile {
    /// An unclaimed tile.
    #[must_use]
    pub fn unclaimed(noble: Noble) -> Self {
        Self { noble, owner: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_earning() {
        let card = Card { tier: 1, cost: [0, 0, 3, 2, 2], bonus: Color::Red, points: 2 };
        assert_eq!(card.earning(), [0, 0, 0, 1, 0, 0, 2]);
        assert_eq!(card.total_cost(), 7);
    }

    #[test]
    fn test_card_display() {
        let card = Card { tier: 0, cost: [0, 1, 2, 0, 0], bonus: Color::White, points: 0 };
        assert_eq!(card.to_string(), "[1u 2g] +w");
    }

    #[test]
    fn test_noble_requirement() {
        let noble = Noble { requirement: [3, 3, 3, 0, 0] };
        assert!(noble.is_met_by(&[3, 4, 3, 0, 1]));
        assert!(!noble.is_met_by(&[3, 2, 3, 5, 5]));
    }
}
