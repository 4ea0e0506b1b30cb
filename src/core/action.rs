//! The 80-way action encoding.
//!
//! Every move is an index in `[0, 80)`. The partition is fixed and shared
//! with every agent:
//!
//! | Range | Meaning |
//! |---|---|
//! | 0–11 | buy a face-up card (tier × 4 + slot) |
//! | 12–23 | reserve a face-up card |
//! | 24–26 | reserve blind from a tier's deck |
//! | 27–29 | buy a reserved card |
//! | 30–34 | take 1 gem of one colour |
//! | 35–44 | take 1 gem each of two colours |
//! | 45–54 | take 1 gem each of three colours |
//! | 55–59 | take 2 gems of one colour |
//! | 60–64 | return 1 gem of one colour |
//! | 65–74 | return 1 gem each of two colours |
//! | 75–79 | return 2 gems of one colour |
//!
//! Pairs and triples follow lexicographic colour order. Index 60 doubles
//! as the pass ([`NOOP`]) whenever the mover is not over the gem limit.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::gems::{Color, GEM_COLORS};
use super::player::PlayerId;

/// An encoded action.
pub type ActionIndex = usize;

/// Size of the action space.
pub const ACTION_SIZE: usize = 80;

/// The pass / decline action.
pub const NOOP: ActionIndex = 60;

pub const BUY: Range<usize> = 0..12;
pub const RESERVE: Range<usize> = 12..24;
pub const RESERVE_BLIND: Range<usize> = 24..27;
pub const BUY_RESERVED: Range<usize> = 27..30;
pub const TAKE_ONE: Range<usize> = 30..35;
pub const TAKE_TWO: Range<usize> = 35..45;
pub const TAKE_THREE: Range<usize> = 45..55;
pub const TAKE_DOUBLE: Range<usize> = 55..60;
pub const TAKE: Range<usize> = 30..60;
pub const RETURN: Range<usize> = 60..80;
pub const RETURN_ONE: Range<usize> = 60..65;
pub const RETURN_TWO: Range<usize> = 65..75;
pub const RETURN_DOUBLE: Range<usize> = 75..80;

/// Unordered colour pairs, lexicographic.
pub const PAIRS: [[usize; 2]; 10] = [
    [0, 1], [0, 2], [0, 3], [0, 4],
    [1, 2], [1, 3], [1, 4],
    [2, 3], [2, 4],
    [3, 4],
];

/// Unordered colour triples, lexicographic.
pub const TRIPLES: [[usize; 3]; 10] = [
    [0, 1, 2], [0, 1, 3], [0, 1, 4], [0, 2, 3], [0, 2, 4],
    [0, 3, 4], [1, 2, 3], [1, 2, 4], [1, 3, 4], [2, 3, 4],
];

/// A decoded action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Buy { tier: usize, slot: usize },
    Reserve { tier: usize, slot: usize },
    ReserveBlind { tier: usize },
    BuyReserved { slot: usize },
    TakeOne(Color),
    TakeTwo(Color, Color),
    TakeThree(Color, Color, Color),
    TakeDouble(Color),
    ReturnOne(Color),
    ReturnTwo(Color, Color),
    ReturnDouble(Color),
}

fn gem(index: usize) -> Color {
    Color::GEMS[index]
}

fn pair_index(a: Color, b: Color) -> usize {
    let key = [a.index().min(b.index()), a.index().max(b.index())];
    PAIRS.iter().position(|p| *p == key).unwrap_or(0)
}

fn triple_index(a: Color, b: Color, c: Color) -> usize {
    let mut key = [a.index(), b.index(), c.index()];
    key.sort_unstable();
    TRIPLES.iter().position(|t| *t == key).unwrap_or(0)
}

impl Action {
    /// Decode an index; `None` when out of range.
    ///
    /// ```
    /// use splendor_arena::core::{Action, Color};
    ///
    /// assert_eq!(Action::decode(5), Some(Action::Buy { tier: 1, slot: 1 }));
    /// assert_eq!(Action::decode(35), Some(Action::TakeTwo(Color::White, Color::Blue)));
    /// assert_eq!(Action::decode(80), None);
    /// ```
    #[must_use]
    pub fn decode(index: ActionIndex) -> Option<Action> {
        let action = match index {
            0..=11 => Action::Buy { tier: index / 4, slot: index % 4 },
            12..=23 => Action::Reserve { tier: (index - 12) / 4, slot: (index - 12) % 4 },
            24..=26 => Action::ReserveBlind { tier: index - 24 },
            27..=29 => Action::BuyReserved { slot: index - 27 },
            30..=34 => Action::TakeOne(gem(index - 30)),
            35..=44 => {
                let [a, b] = PAIRS[index - 35];
                Action::TakeTwo(gem(a), gem(b))
            }
            45..=54 => {
                let [a, b, c] = TRIPLES[index - 45];
                Action::TakeThree(gem(a), gem(b), gem(c))
            }
            55..=59 => Action::TakeDouble(gem(index - 55)),
            60..=64 => Action::ReturnOne(gem(index - 60)),
            65..=74 => {
                let [a, b] = PAIRS[index - 65];
                Action::ReturnTwo(gem(a), gem(b))
            }
            75..=79 => Action::ReturnDouble(gem(index - 75)),
            _ => return None,
        };
        Some(action)
    }

    /// Encode back to an index. Colours inside pairs and triples may come in
    /// any order.
    #[must_use]
    pub fn encode(self) -> ActionIndex {
        match self {
            Action::Buy { tier, slot } => tier * 4 + slot,
            Action::Reserve { tier, slot } => 12 + tier * 4 + slot,
            Action::ReserveBlind { tier } => 24 + tier,
            Action::BuyReserved { slot } => 27 + slot,
            Action::TakeOne(c) => 30 + c.index(),
            Action::TakeTwo(a, b) => 35 + pair_index(a, b),
            Action::TakeThree(a, b, c) => 45 + triple_index(a, b, c),
            Action::TakeDouble(c) => 55 + c.index(),
            Action::ReturnOne(c) => 60 + c.index(),
            Action::ReturnTwo(a, b) => 65 + pair_index(a, b),
            Action::ReturnDouble(c) => 75 + c.index(),
        }
    }

    /// Gem delta for take and return actions, zero otherwise.
    #[must_use]
    pub fn gem_delta(self) -> [u8; GEM_COLORS] {
        let mut delta = [0u8; GEM_COLORS];
        match self {
            Action::TakeOne(c) | Action::ReturnOne(c) => delta[c.index()] = 1,
            Action::TakeTwo(a, b) | Action::ReturnTwo(a, b) => {
                delta[a.index()] = 1;
                delta[b.index()] = 1;
            }
            Action::TakeThree(a, b, c) => {
                delta[a.index()] = 1;
                delta[b.index()] = 1;
                delta[c.index()] = 1;
            }
            Action::TakeDouble(c) | Action::ReturnDouble(c) => delta[c.index()] = 2,
            _ => {}
        }
        delta
    }

    /// Whether this is a purchase (face-up or reserved).
    #[must_use]
    pub fn is_purchase(self) -> bool {
        matches!(self, Action::Buy { .. } | Action::BuyReserved { .. })
    }
}

fn join_colors(colors: &[Color]) -> String {
    colors.iter().map(|c| c.name()).collect::<Vec<_>>().join("+")
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Action::Buy { tier, slot } => write!(f, "buy tier {} card {}", tier + 1, slot + 1),
            Action::Reserve { tier, slot } => {
                write!(f, "reserve tier {} card {}", tier + 1, slot + 1)
            }
            Action::ReserveBlind { tier } => write!(f, "reserve from tier {} deck", tier + 1),
            Action::BuyReserved { slot } => write!(f, "buy reserved card {}", slot + 1),
            Action::TakeOne(c) => write!(f, "take {}", c),
            Action::TakeTwo(a, b) => write!(f, "take {}", join_colors(&[a, b])),
            Action::TakeThree(a, b, c) => write!(f, "take {}", join_colors(&[a, b, c])),
            Action::TakeDouble(c) => write!(f, "take 2 {}", c),
            Action::ReturnOne(c) => write!(f, "return {}", c),
            Action::ReturnTwo(a, b) => write!(f, "return {}", join_colors(&[a, b])),
            Action::ReturnDouble(c) => write!(f, "return 2 {}", c),
        }
    }
}

/// Human-readable form of an action index.
#[must_use]
pub fn move_to_string(index: ActionIndex) -> String {
    match Action::decode(index) {
        Some(_) if index == NOOP => "pass (or return white)".to_string(),
        Some(action) => action.to_string(),
        None => format!("invalid action {}", index),
    }
}

/// Legal-action set over the 80 indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionMask(u128);

impl ActionMask {
    pub const EMPTY: ActionMask = ActionMask(0);

    /// A mask with a single action.
    #[must_use]
    pub fn only(index: ActionIndex) -> Self {
        let mut mask = Self::EMPTY;
        mask.insert(index);
        mask
    }

    /// Mark an action legal. Out-of-range indices are ignored.
    pub fn insert(&mut self, index: ActionIndex) {
        if index < ACTION_SIZE {
            self.0 |= 1u128 << index;
        }
    }

    pub fn remove(&mut self, index: ActionIndex) {
        if index < ACTION_SIZE {
            self.0 &= !(1u128 << index);
        }
    }

    #[must_use]
    pub fn contains(&self, index: ActionIndex) -> bool {
        index < ACTION_SIZE && self.0 & (1u128 << index) != 0
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether any action in `range` is legal.
    #[must_use]
    pub fn any_in(&self, range: Range<usize>) -> bool {
        range.into_iter().any(|i| self.contains(i))
    }

    /// Lowest legal index.
    #[must_use]
    pub fn first(&self) -> Option<ActionIndex> {
        (self.0 != 0).then(|| self.0.trailing_zeros() as usize)
    }

    /// Legal indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ActionIndex> + '_ {
        (0..ACTION_SIZE).filter(move |&i| self.contains(i))
    }

    /// Legal indices as a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ActionIndex> {
        self.iter().collect()
    }

    /// One flag per action index.
    #[must_use]
    pub fn to_flags(&self) -> [bool; ACTION_SIZE] {
        let mut flags = [false; ACTION_SIZE];
        for i in self.iter() {
            flags[i] = true;
        }
        flags
    }
}

impl FromIterator<ActionIndex> for ActionMask {
    fn from_iter<I: IntoIterator<Item = ActionIndex>>(iter: I) -> Self {
        let mut mask = ActionMask::EMPTY;
        for i in iter {
            mask.insert(i);
        }
        mask
    }
}

/// One applied action, as recorded by the arena.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: ActionIndex,
    /// Value of the round counter before the action was applied.
    pub round: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_boundaries() {
        assert_eq!(Action::decode(0), Some(Action::Buy { tier: 0, slot: 0 }));
        assert_eq!(Action::decode(11), Some(Action::Buy { tier: 2, slot: 3 }));
        assert_eq!(Action::decode(12), Some(Action::Reserve { tier: 0, slot: 0 }));
        assert_eq!(Action::decode(26), Some(Action::ReserveBlind { tier: 2 }));
        assert_eq!(Action::decode(29), Some(Action::BuyReserved { slot: 2 }));
        assert_eq!(Action::decode(34), Some(Action::TakeOne(Color::Black)));
        assert_eq!(Action::decode(44), Some(Action::TakeTwo(Color::Red, Color::Black)));
        assert_eq!(
            Action::decode(45),
            Some(Action::TakeThree(Color::White, Color::Blue, Color::Green))
        );
        assert_eq!(
            Action::decode(54),
            Some(Action::TakeThree(Color::Green, Color::Red, Color::Black))
        );
        assert_eq!(Action::decode(55), Some(Action::TakeDouble(Color::White)));
        assert_eq!(Action::decode(NOOP), Some(Action::ReturnOne(Color::White)));
        assert_eq!(Action::decode(65), Some(Action::ReturnTwo(Color::White, Color::Blue)));
        assert_eq!(Action::decode(79), Some(Action::ReturnDouble(Color::Black)));
        assert_eq!(Action::decode(ACTION_SIZE), None);
    }

    #[test]
    fn test_encode_inverts_decode() {
        for i in 0..ACTION_SIZE {
            let action = Action::decode(i).unwrap();
            assert_eq!(action.encode(), i, "{action:?}");
        }
        // Colour order inside a combination does not matter.
        assert_eq!(Action::TakeTwo(Color::Black, Color::Red).encode(), 44);
    }

    #[test]
    fn test_gem_delta() {
        assert_eq!(Action::decode(47).unwrap().gem_delta(), [1, 1, 0, 0, 1]);
        assert_eq!(Action::decode(57).unwrap().gem_delta(), [0, 0, 2, 0, 0]);
        assert_eq!(Action::decode(3).unwrap().gem_delta(), [0; GEM_COLORS]);
    }

    #[test]
    fn test_move_to_string() {
        assert_eq!(move_to_string(0), "buy tier 1 card 1");
        assert_eq!(move_to_string(24), "reserve from tier 1 deck");
        assert_eq!(move_to_string(58), "take 2 red");
        assert_eq!(move_to_string(NOOP), "pass (or return white)");
        assert_eq!(move_to_string(99), "invalid action 99");
    }

    #[test]
    fn test_mask() {
        let mut mask = ActionMask::EMPTY;
        assert!(mask.is_empty());
        mask.insert(3);
        mask.insert(79);
        mask.insert(80);
        assert_eq!(mask.count(), 2);
        assert!(mask.contains(79));
        assert!(!mask.contains(80));
        assert!(mask.any_in(BUY));
        assert!(!mask.any_in(TAKE));
        assert_eq!(mask.first(), Some(3));
        assert_eq!(mask.to_vec(), vec![3, 79]);
        mask.remove(3);
        assert_eq!(mask.first(), Some(79));
        assert_eq!(ActionMask::only(NOOP).to_vec(), vec![NOOP]);
    }
}
