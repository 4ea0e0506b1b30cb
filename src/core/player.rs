//! Seats at the table.
//!
//! A [`PlayerId`] is a position in turn order for one trial, not an agent:
//! the arena rotates agents across seats between trials, so the same agent
//! sits at a different `PlayerId` each time.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::MAX_PLAYERS;

/// Seat index in turn order, starting at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Seat on turn after this one at a table of `seats`.
    #[must_use]
    pub fn next(self, seats: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % seats) as u8)
    }

    /// Every seat at a table of `seats`, in turn order.
    ///
    /// ```
    /// use splendor_arena::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(seats: usize) -> impl Iterator<Item = PlayerId> {
        (0..seats as u8).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// One value per seat, indexed by [`PlayerId`].
///
/// Tables never exceed four seats, so the values live inline.
///
/// ```
/// use splendor_arena::core::{PlayerId, PlayerMap};
///
/// let mut strikes: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// strikes[PlayerId::new(1)] += 1;
/// assert_eq!(strikes.as_slice(), &[0, 1]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: SmallVec<[T; MAX_PLAYERS]>,
}

impl<T> PlayerMap<T> {
    pub fn new(seats: usize, mut value: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            seats: PlayerId::all(seats).map(&mut value).collect(),
        }
    }

    pub fn with_value(seats: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(seats, |_| value.clone())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.seats
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.seats.into_vec()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, seat: PlayerId) -> &T {
        &self.seats[seat.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, seat: PlayerId) -> &mut T {
        &mut self.seats[seat.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_order_wraps() {
        assert_eq!(PlayerId::new(0).next(2), PlayerId::new(1));
        assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
        assert_eq!(PlayerId::new(3).next(4), PlayerId::new(0));
        assert_eq!(PlayerId::new(2).to_string(), "P2");
    }

    #[test]
    fn test_map_by_seat() {
        let map = PlayerMap::new(4, |p| p.index() * 10);
        assert_eq!(map[PlayerId::new(3)], 30);
        assert_eq!(map.player_count(), 4);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[2], (PlayerId::new(2), &20));
        assert_eq!(map.into_vec(), vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_map_round_trips_through_json() {
        let map = PlayerMap::new(3, |p| p.index() as f32 + 0.5);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"seats":[0.5,1.5,2.5]}"#);
        let back: PlayerMap<f32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
