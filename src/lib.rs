//! Rules engine for four-player Ludo: whose turn it is, whether to roll or move,
//! and what a roll does to the tokens on the board.

pub mod config;
pub mod ludo;
pub mod misc;
pub mod simulation;
