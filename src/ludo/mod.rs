mod player;
pub use player::{PLAYER_COUNT, Player};

mod position;
pub use position::{ActivationState, Position, TOKEN_COUNT, TOKENS_PER_PLAYER, Token, TokenId};

mod error;
pub use error::{EngineError, Rejection};

mod die;
pub use die::{Die, FaceSource, RngFaces, SIX, ScriptedFaces};

pub mod geometry;
pub use geometry::{BoardGeometry, Cell, StandardBoard};

mod token_set;
pub use token_set::{Advance, Captured, MAX_CAPTURES, Movable, PlayerProgress, TokenSet};

mod turn;
pub use turn::{Event, Notification, PendingAction, Phase, TurnController, TurnState};
