use std::fmt::Display;

/// Number of seats at the table.
pub const PLAYER_COUNT: usize = 4;

/// One of the four fixed seats. The colour is only a display label; the rules
/// work on the seat index.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Player {
    #[default]
    Green = 0,
    Yellow = 1,
    Blue = 2,
    Red = 3,
}

impl Player {
    /// Seats in turn order.
    pub const ALL: [Player; PLAYER_COUNT] = [Player::Green, Player::Yellow, Player::Blue, Player::Red];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The seat that plays after this one.
    pub fn next(&self) -> Player {
        Self::ALL[(self.index() + 1) % PLAYER_COUNT]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Player::Green => "Green",
            Player::Yellow => "Yellow",
            Player::Blue => "Blue",
            Player::Red => "Red",
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_order_wraps() {
        assert_eq!(Player::Green.next(), Player::Yellow);
        assert_eq!(Player::Yellow.next(), Player::Blue);
        assert_eq!(Player::Blue.next(), Player::Red);
        assert_eq!(Player::Red.next(), Player::Green);
    }

    #[test]
    fn test_index_matches_turn_order() {
        for (i, player) in Player::ALL.into_iter().enumerate() {
            assert_eq!(player.index(), i);
        }
    }
}
