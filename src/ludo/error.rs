use thiserror::Error;

use crate::ludo::{PendingAction, Player, TokenId};

/// Why an event was refused. A rejected event never changes the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("it is {current}'s turn, not {player}'s")]
    NotYourTurn { player: Player, current: Player },
    #[error("expected {expected:?}")]
    WrongAction { expected: PendingAction },
    #[error("the die cannot be rolled while a move is pending")]
    DieNotReady,
    #[error("{token} needs a six to leave home, rolled {rolled}")]
    SixRequired { token: TokenId, rolled: u8 },
    #[error("{token} is not on the track")]
    TokenNotActive { token: TokenId },
    #[error("{token} is already on the track")]
    TokenAlreadyActive { token: TokenId },
    #[error("{token} has already finished")]
    TokenFinished { token: TokenId },
    #[error("{token} cannot move {steps} from {from}, path ends at {path_length}")]
    Overshoot { token: TokenId, from: u8, steps: u8, path_length: u8 },
    #[error("the game is over, {winner} won")]
    GameOver { winner: Player },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("not allowed: {0}")]
    NotAllowed(#[from] Rejection),
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("invalid board configuration: {0}")]
    InvalidConfiguration(String),
}

impl EngineError {
    /// The rejection reason, if this error is an ordinary refused event.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            EngineError::NotAllowed(rejection) => Some(*rejection),
            _ => None,
        }
    }
}
