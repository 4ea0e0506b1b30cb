//! The fixed card and noble catalogue.
//!
//! Cards are generated from cost templates written relative to the card's
//! bonus colour: offset 0 is the bonus colour itself, offset 1 the next colour
//! in index order, and so on (wrapping). Every colour therefore gets the same
//! set of shapes, rotated onto its neighbours.

use super::card::{Card, Noble};
use super::gems::{Color, GEM_COLORS};

/// Number of card tiers.
pub const TIERS: usize = 3;

type Template = ([u8; GEM_COLORS], u8);

const TIER_0: [Template; 8] = [
    ([0, 1, 1, 1, 1], 0),
    ([0, 1, 2, 1, 1], 0),
    ([0, 2, 2, 0, 1], 0),
    ([3, 1, 0, 0, 1], 0),
    ([0, 0, 0, 2, 1], 0),
    ([0, 2, 0, 0, 2], 0),
    ([0, 3, 0, 0, 0], 0),
    ([0, 0, 4, 0, 0], 1),
];

const TIER_1: [Template; 6] = [
    ([0, 0, 3, 2, 2], 1),
    ([2, 3, 0, 3, 0], 1),
    ([0, 0, 1, 4, 2], 2),
    ([0, 0, 0, 5, 3], 2),
    ([0, 0, 0, 5, 0], 2),
    ([6, 0, 0, 0, 0], 3),
];

const TIER_2: [Template; 4] = [
    ([0, 3, 3, 5, 3], 3),
    ([0, 0, 0, 0, 7], 4),
    ([3, 0, 0, 3, 6], 4),
    ([3, 0, 0, 0, 7], 5),
];

const NOBLES: [[u8; GEM_COLORS]; 10] = [
    [4, 4, 0, 0, 0],
    [0, 4, 4, 0, 0],
    [0, 0, 4, 4, 0],
    [0, 0, 0, 4, 4],
    [4, 0, 0, 0, 4],
    [3, 3, 3, 0, 0],
    [0, 3, 3, 3, 0],
    [0, 0, 3, 3, 3],
    [3, 0, 0, 3, 3],
    [3, 3, 0, 0, 3],
];

fn templates(tier: usize) -> &'static [Template] {
    match tier {
        0 => &TIER_0,
        1 => &TIER_1,
        _ => &TIER_2,
    }
}

/// Every card of a tier, in catalogue order (by bonus colour, then template).
#[must_use]
pub fn tier_cards(tier: usize) -> Vec<Card> {
    let templates = templates(tier);
    let mut cards = Vec::with_capacity(templates.len() * GEM_COLORS);
    for bonus in Color::GEMS {
        for (shape, points) in templates {
            let mut cost = [0u8; GEM_COLORS];
            for (offset, &n) in shape.iter().enumerate() {
                cost[(bonus.index() + offset) % GEM_COLORS] = n;
            }
            cards.push(Card {
                tier: tier as u8,
                cost,
                bonus,
                points: *points,
            });
        }
    }
    cards
}

/// All nobles, in catalogue order.
#[must_use]
pub fn nobles() -> Vec<Noble> {
    NOBLES.iter().map(|&requirement| Noble { requirement }).collect()
}
