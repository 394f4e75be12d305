use tracing::debug;

use crate::{
    ludo::{
        ActivationState, BoardGeometry, EngineError, PLAYER_COUNT, Player, Rejection, SIX, TOKEN_COUNT,
        TOKENS_PER_PLAYER, Token, TokenId, geometry,
    },
    misc::TinyVec,
};

/// A single move can at most send every opposing token home.
pub const MAX_CAPTURES: usize = TOKEN_COUNT - TOKENS_PER_PLAYER;

pub type Captured = TinyVec<TokenId, MAX_CAPTURES>;

pub type Movable = TinyVec<TokenId, TOKENS_PER_PLAYER>;

/// Per-player token bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerProgress {
    /// Tokens not yet finished.
    pub available: u8,
    /// Tokens currently on the track.
    pub active: u8,
}

impl PlayerProgress {
    const START: Self = PlayerProgress { available: TOKENS_PER_PLAYER as u8, active: 0 };
}

/// What an [`TokenSet::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub token: TokenId,
    pub from: u8,
    pub new_index: u8,
    pub finished: bool,
    /// The roll overshot the finish and was given up; nothing moved.
    pub forfeited: bool,
    pub captured: Captured,
}

/// Owns every token and the per-player progress, and applies activation,
/// movement, capture and finish rules against a validated geometry.
#[derive(Debug, Clone)]
pub struct TokenSet<G> {
    geometry: G,
    path_lengths: [u8; PLAYER_COUNT],
    tokens: [Token; TOKEN_COUNT],
    progress: [PlayerProgress; PLAYER_COUNT],
}

impl<G: BoardGeometry> TokenSet<G> {
    /// All tokens start at home. Fails if the geometry is inconsistent.
    pub fn new(geometry: G) -> Result<Self, EngineError> {
        let path_lengths = geometry::validate(&geometry)?;
        let tokens = TokenId::ALL.map(Token::new);

        Ok(TokenSet {
            geometry,
            path_lengths,
            tokens,
            progress: [PlayerProgress::START; PLAYER_COUNT],
        })
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn path_length(&self, player: Player) -> u8 {
        self.path_lengths[player.index()]
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn progress(&self, player: Player) -> PlayerProgress {
        self.progress[player.index()]
    }

    /// Board position a renderer should draw the token at.
    pub fn waypoint_of(&self, id: TokenId) -> G::Position {
        let token = self.token(id);
        match token.state() {
            ActivationState::Inactive => self.geometry.home_waypoint(token.owner(), id.slot()),
            ActivationState::Active => self.geometry.waypoint(token.owner(), token.track_index() as u8),
            ActivationState::Finished => self.geometry.waypoint(token.owner(), self.path_length(token.owner())),
        }
    }

    fn owned(&self, player: Player, id: TokenId) -> Result<Token, EngineError> {
        if id.owner() != player {
            return Err(Rejection::NotYourTurn { player: id.owner(), current: player }.into());
        }
        Ok(*self.token(id))
    }

    /// Moves a home token onto its launch cell (track index 0). Needs a six.
    pub fn activate(&mut self, player: Player, id: TokenId, die_value: u8) -> Result<(), EngineError> {
        let token = self.owned(player, id)?;
        match token.state() {
            ActivationState::Active => return Err(Rejection::TokenAlreadyActive { token: id }.into()),
            ActivationState::Finished => return Err(Rejection::TokenFinished { token: id }.into()),
            ActivationState::Inactive if die_value != SIX => {
                return Err(Rejection::SixRequired { token: id, rolled: die_value }.into());
            }
            ActivationState::Inactive => {}
        }

        self.tokens[id.index()].place(0);
        self.progress[player.index()].active += 1;
        debug!(token = %id, "token activated");
        Ok(())
    }

    /// Moves an active token `steps` cells along its path.
    ///
    /// Landing on the finish cell finishes the token. Landing anywhere else sends
    /// every opposing active token on the same cell home. Overshooting the finish
    /// gives up the roll while the player still has other unfinished tokens and is
    /// refused otherwise.
    pub fn advance(&mut self, player: Player, id: TokenId, steps: u8) -> Result<Advance, EngineError> {
        let token = self.owned(player, id)?;
        match token.state() {
            ActivationState::Inactive => return Err(Rejection::TokenNotActive { token: id }.into()),
            ActivationState::Finished => return Err(Rejection::TokenFinished { token: id }.into()),
            ActivationState::Active => {}
        }
        if steps == 0 {
            return Err(EngineError::InvalidState("a move needs at least one step"));
        }

        let from = token.track_index() as u8;
        let path_length = self.path_length(player);
        let mut outcome = Advance {
            token: id,
            from,
            new_index: from,
            finished: false,
            forfeited: false,
            captured: Captured::new(),
        };

        let target = from as u16 + steps as u16;
        if target > path_length as u16 {
            if self.progress(player).available > 1 {
                debug!(token = %id, from, steps, "move overshoots the finish, roll given up");
                outcome.forfeited = true;
                return Ok(outcome);
            }
            return Err(Rejection::Overshoot { token: id, from, steps, path_length }.into());
        }

        let new_index = target as u8;
        outcome.new_index = new_index;

        if new_index == path_length {
            self.tokens[id.index()].finish(path_length);
            let progress = &mut self.progress[player.index()];
            progress.active -= 1;
            progress.available -= 1;
            outcome.finished = true;
            debug!(token = %id, available = progress.available, "token finished");
            return Ok(outcome);
        }

        self.tokens[id.index()].place(new_index);
        outcome.captured = self.capture_at(player, new_index);
        debug!(token = %id, from, to = new_index, captured = outcome.captured.len(), "token moved");
        Ok(outcome)
    }

    /// Sends every opposing active token sharing `mover`'s cell at `index` home.
    fn capture_at(&mut self, mover: Player, index: u8) -> Captured {
        let cell = self.geometry.waypoint(mover, index);
        let mut captured = Captured::new();

        for token in self.tokens.iter_mut() {
            if token.owner() == mover || token.state() != ActivationState::Active {
                continue;
            }
            if self.geometry.waypoint(token.owner(), token.track_index() as u8) == cell {
                token.send_home();
                self.progress[token.owner().index()].active -= 1;
                debug!(token = %token.id(), by = %mover, "token captured");
                captured.push(token.id());
            }
        }
        captured
    }

    /// Tokens of `player` that can legally use `die_value`.
    pub fn movable_tokens(&self, player: Player, die_value: u8) -> Movable {
        let path_length = self.path_length(player) as u16;
        TokenId::of_player(player)
            .filter(|&id| {
                let token = self.token(id);
                match token.state() {
                    ActivationState::Active => token.track_index() as u16 + die_value as u16 <= path_length,
                    ActivationState::Inactive => die_value == SIX,
                    ActivationState::Finished => false,
                }
            })
            .collect()
    }

    pub fn is_any_token_movable(&self, player: Player, die_value: u8) -> bool {
        !self.movable_tokens(player, die_value).is_empty()
    }

    /// True once every token of `player` is finished.
    pub fn has_finished(&self, player: Player) -> bool {
        self.progress(player).available == 0
    }
}

#[cfg(test)]
impl<G: BoardGeometry> TokenSet<G> {
    /// Puts a home token straight onto `index`, bypassing the six rule.
    pub(crate) fn put(&mut self, id: TokenId, index: u8) {
        assert_eq!(self.token(id).state(), ActivationState::Inactive);
        self.tokens[id.index()].place(index);
        self.progress[id.owner().index()].active += 1;
    }

    /// Finishes a home token without walking it.
    pub(crate) fn retire(&mut self, id: TokenId) {
        assert_eq!(self.token(id).state(), ActivationState::Inactive);
        let owner = id.owner();
        self.tokens[id.index()].finish(self.path_length(owner));
        self.progress[owner.index()].available -= 1;
    }
}
