use tracing::{debug, info, instrument};

use crate::ludo::{
    ActivationState, BoardGeometry, Die, EngineError, FaceSource, Movable, Player, PlayerProgress, Position,
    Rejection, SIX, TokenId, TokenSet,
};

/// What the current player has to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingAction {
    RollDie,
    MoveToken,
}

/// The controller's state machine, as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingRoll(Player),
    AwaitingMove(Player, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    pub current_player: Player,
    pub pending_action: PendingAction,
    /// The last resolved roll was a six, so the current player rolls again.
    pub awaiting_another_turn: bool,
}

impl TurnState {
    fn new() -> Self {
        // Start from the seat before Green and advance once, so Green opens.
        let mut state = TurnState {
            current_player: Player::Red,
            pending_action: PendingAction::RollDie,
            awaiting_another_turn: false,
        };
        state.pass_turn();
        state
    }

    fn pass_turn(&mut self) {
        self.current_player = self.current_player.next();
    }
}

/// Input accepted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    RollRequested,
    TokenSelected(TokenId),
}

/// Something that happened while handling an event, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Rolled { player: Player, value: u8 },
    NoMovableToken { player: Player, value: u8 },
    TokenActivated { token: TokenId },
    TokenMoved { token: TokenId, from: u8, to: u8 },
    MoveForfeited { token: TokenId },
    TokenCaptured { token: TokenId, by: TokenId },
    TokenFinished { token: TokenId },
    PlayerWon { player: Player },
    ExtraTurn { player: Player },
    TurnPassed { from: Player, to: Player },
}

/// Top level rules engine. Owns the turn state, the die and every token, and is
/// the only way to change any of them.
///
/// Every event is handled to completion before `handle` returns, so queries
/// always see a fully resolved position.
#[derive(Debug, Clone)]
pub struct TurnController<G, F> {
    state: TurnState,
    die: Die<F>,
    tokens: TokenSet<G>,
    winner: Option<Player>,
}

impl<G: BoardGeometry, F: FaceSource> TurnController<G, F> {
    /// Starts a game: Green to roll, every token at home.
    pub fn new(geometry: G, faces: F) -> Result<Self, EngineError> {
        Ok(TurnController {
            state: TurnState::new(),
            die: Die::new(faces),
            tokens: TokenSet::new(geometry)?,
            winner: None,
        })
    }

    /// Applies one input event. Refused events leave the game untouched.
    #[instrument(skip(self), fields(player = %self.state.current_player))]
    pub fn handle(&mut self, event: Event) -> Result<Vec<Notification>, EngineError> {
        if let Some(winner) = self.winner {
            return Err(Rejection::GameOver { winner }.into());
        }
        match event {
            Event::RollRequested => self.roll(),
            Event::TokenSelected(token) => self.select(token),
        }
    }

    fn roll(&mut self) -> Result<Vec<Notification>, EngineError> {
        if self.state.pending_action != PendingAction::RollDie {
            return Err(Rejection::WrongAction { expected: self.state.pending_action }.into());
        }
        if !self.die.rolling_allowed() {
            return Err(Rejection::DieNotReady.into());
        }

        let player = self.state.current_player;
        let value = self.die.roll()?;
        debug!(%player, value, "die rolled");
        let mut notifications = vec![Notification::Rolled { player, value }];

        if self.tokens.is_any_token_movable(player, value) {
            self.state.pending_action = PendingAction::MoveToken;
        } else {
            debug!(%player, value, "no movable token, skipping");
            notifications.push(Notification::NoMovableToken { player, value });
            self.die.allow_rolling();
            self.end_move(value, &mut notifications);
        }
        Ok(notifications)
    }

    fn select(&mut self, id: TokenId) -> Result<Vec<Notification>, EngineError> {
        if self.state.pending_action != PendingAction::MoveToken {
            return Err(Rejection::WrongAction { expected: self.state.pending_action }.into());
        }
        let player = self.state.current_player;
        if id.owner() != player {
            return Err(Rejection::NotYourTurn { player: id.owner(), current: player }.into());
        }
        let value = self.die.value().ok_or(EngineError::InvalidState("move pending without a rolled value"))?;

        let mut notifications = Vec::new();
        if self.tokens.token(id).state() == ActivationState::Inactive {
            self.tokens.activate(player, id, value)?;
            notifications.push(Notification::TokenActivated { token: id });
        } else {
            let outcome = self.tokens.advance(player, id, value)?;
            if outcome.forfeited {
                notifications.push(Notification::MoveForfeited { token: id });
            } else {
                notifications.push(Notification::TokenMoved { token: id, from: outcome.from, to: outcome.new_index });
                notifications.extend(outcome.captured.iter().map(|&token| Notification::TokenCaptured { token, by: id }));
                if outcome.finished {
                    notifications.push(Notification::TokenFinished { token: id });
                    if self.tokens.has_finished(player) {
                        info!(%player, "player finished every token");
                        self.winner = Some(player);
                        notifications.push(Notification::PlayerWon { player });
                    }
                }
            }
        }

        self.die.allow_rolling();
        self.end_move(value, &mut notifications);
        Ok(notifications)
    }

    /// A six keeps the turn, anything else passes it on.
    fn end_move(&mut self, value: u8, notifications: &mut Vec<Notification>) {
        let player = self.state.current_player;
        self.state.pending_action = PendingAction::RollDie;
        self.state.awaiting_another_turn = value == SIX;

        if self.state.awaiting_another_turn {
            debug!(%player, "rolled a six, playing again");
            notifications.push(Notification::ExtraTurn { player });
        } else {
            self.state.pass_turn();
            debug!(from = %player, to = %self.state.current_player, "turn passed");
            notifications.push(Notification::TurnPassed { from: player, to: self.state.current_player });
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player
    }

    pub fn pending_action(&self) -> PendingAction {
        self.state.pending_action
    }

    pub fn awaiting_another_turn(&self) -> bool {
        self.state.awaiting_another_turn
    }

    pub fn phase(&self) -> Phase {
        match (self.state.pending_action, self.die.value()) {
            (PendingAction::MoveToken, Some(value)) => Phase::AwaitingMove(self.state.current_player, value),
            _ => Phase::AwaitingRoll(self.state.current_player),
        }
    }

    pub fn token_position(&self, id: TokenId) -> Position {
        self.tokens.token(id).position()
    }

    pub fn die_value(&self) -> Option<u8> {
        self.die.value()
    }

    pub fn die(&self) -> &Die<F> {
        &self.die
    }

    pub fn player_progress(&self, player: Player) -> PlayerProgress {
        self.tokens.progress(player)
    }

    pub fn tokens(&self) -> &TokenSet<G> {
        &self.tokens
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Tokens the current player may select right now; empty unless a move is pending.
    pub fn movable_tokens(&self) -> Movable {
        match self.phase() {
            Phase::AwaitingMove(player, value) => self.tokens.movable_tokens(player, value),
            Phase::AwaitingRoll(_) => Movable::new(),
        }
    }
}
