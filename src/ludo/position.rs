use std::fmt::{Debug, Display};

use crate::ludo::{PLAYER_COUNT, Player};

/// Tokens each player owns.
pub const TOKENS_PER_PLAYER: usize = 4;

/// Total number of tokens on the table.
pub const TOKEN_COUNT: usize = PLAYER_COUNT * TOKENS_PER_PLAYER;

/// Addresses one token. Packs owner and slot into one byte: `owner * 4 + slot`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TokenId {
    data: u8,
}

impl TokenId {
    /// Every token, in packed order: Green's four first, then Yellow, Blue, Red.
    pub const ALL: [TokenId; TOKEN_COUNT] = {
        let mut ids = [TokenId { data: 0 }; TOKEN_COUNT];
        let mut i = 0;
        while i < TOKEN_COUNT {
            ids[i] = TokenId { data: i as u8 };
            i += 1;
        }
        ids
    };

    pub fn new(owner: Player, slot: u8) -> Option<Self> {
        if (slot as usize) < TOKENS_PER_PLAYER {
            Some(TokenId { data: owner as u8 * TOKENS_PER_PLAYER as u8 + slot })
        } else {
            None
        }
    }

    pub fn index(&self) -> usize {
        self.data as usize
    }

    pub fn owner(&self) -> Player {
        Player::ALL[self.index() / TOKENS_PER_PLAYER]
    }

    pub fn slot(&self) -> u8 {
        self.data % TOKENS_PER_PLAYER as u8
    }

    pub fn of_player(owner: Player) -> impl Iterator<Item = TokenId> {
        let first = owner as u8 * TOKENS_PER_PLAYER as u8;
        (first..first + TOKENS_PER_PLAYER as u8).map(|data| TokenId { data })
    }
}

impl Debug for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.owner(), self.slot())
    }
}

impl Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationState {
    Inactive,
    Active,
    Finished,
}

/// Where a token is, as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Home,
    Track(u8),
    Finished,
}

/// A single token. `track_index` is -1 while at home and equals the owner's
/// path length once finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    id: TokenId,
    state: ActivationState,
    track_index: i16,
}

impl Token {
    pub fn new(id: TokenId) -> Self {
        Token { id, state: ActivationState::Inactive, track_index: -1 }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn owner(&self) -> Player {
        self.id.owner()
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn track_index(&self) -> i16 {
        self.track_index
    }

    pub fn position(&self) -> Position {
        match self.state {
            ActivationState::Inactive => Position::Home,
            ActivationState::Active => Position::Track(self.track_index as u8),
            ActivationState::Finished => Position::Finished,
        }
    }

    pub(crate) fn send_home(&mut self) {
        self.state = ActivationState::Inactive;
        self.track_index = -1;
    }

    pub(crate) fn place(&mut self, index: u8) {
        self.state = ActivationState::Active;
        self.track_index = index as i16;
    }

    pub(crate) fn finish(&mut self, path_length: u8) {
        self.state = ActivationState::Finished;
        self.track_index = path_length as i16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_id_packing() {
        for owner in Player::ALL {
            for slot in 0..TOKENS_PER_PLAYER as u8 {
                let id = TokenId::new(owner, slot).unwrap();
                assert_eq!(id.owner(), owner);
                assert_eq!(id.slot(), slot);
                assert_eq!(TokenId::ALL[id.index()], id);
            }
        }
        assert_eq!(TokenId::new(Player::Red, 4), None);
        assert!(TokenId::of_player(Player::Blue).all(|id| id.owner() == Player::Blue));
    }

    #[test]
    fn test_token_lifecycle_keeps_index_consistent() {
        let mut token = Token::new(TokenId::new(Player::Yellow, 2).unwrap());
        assert_eq!(token.position(), Position::Home);
        assert_eq!(token.track_index(), -1);

        token.place(0);
        assert_eq!(token.state(), ActivationState::Active);
        assert_eq!(token.position(), Position::Track(0));

        token.finish(56);
        assert_eq!(token.state(), ActivationState::Finished);
        assert_eq!(token.track_index(), 56);
        assert_eq!(token.position(), Position::Finished);

        token.send_home();
        assert_eq!(token.state(), ActivationState::Inactive);
        assert_eq!(token.track_index(), -1);
    }
}
