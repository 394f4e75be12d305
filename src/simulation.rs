//! Headless games between players that pick a random legal token.
//!
//! Useful for checking that the rules always reach a winner and for rough
//! statistics (seat advantage, captures per game).

use rand::{SeedableRng, rngs::StdRng, seq::IteratorRandom};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info};

use crate::{
    config::SimulationConfig,
    ludo::{
        EngineError, Event, Notification, PLAYER_COUNT, PendingAction, Player, RngFaces, SIX, StandardBoard,
        TurnController,
    },
};

/// Counters for a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameRecord {
    pub winner: Option<Player>,
    pub events: u32,
    pub rolls: u32,
    pub sixes: u32,
    pub skipped_turns: u32,
    pub captures: u32,
    pub forfeits: u32,
}

/// Plays one game on the standard board. The die and the token choices are both
/// derived from `seed`, so a seed always replays the same game.
pub fn play_random_game(seed: u64, max_events: u32) -> Result<GameRecord, EngineError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let faces = RngFaces::new(StdRng::from_rng(&mut rng));
    let mut game = TurnController::new(StandardBoard::new(), faces)?;
    let mut record = GameRecord::default();

    while record.events < max_events && game.winner().is_none() {
        let event = match game.pending_action() {
            PendingAction::RollDie => Event::RollRequested,
            PendingAction::MoveToken => game
                .movable_tokens()
                .iter()
                .copied()
                .choose(&mut rng)
                .map(Event::TokenSelected)
                .ok_or(EngineError::InvalidState("move pending with no movable token"))?,
        };

        for notification in game.handle(event)? {
            match notification {
                Notification::Rolled { value, .. } => {
                    record.rolls += 1;
                    if value == SIX {
                        record.sixes += 1;
                    }
                }
                Notification::NoMovableToken { .. } => record.skipped_turns += 1,
                Notification::TokenCaptured { .. } => record.captures += 1,
                Notification::MoveForfeited { .. } => record.forfeits += 1,
                _ => (),
            }
        }
        record.events += 1;
    }

    record.winner = game.winner();
    debug!(seed, winner = ?record.winner, rolls = record.rolls, "game over");
    Ok(record)
}

/// Totals over many games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub games: u32,
    pub wins: [u32; PLAYER_COUNT],
    pub unfinished: u32,
    pub rolls: u64,
    pub sixes: u64,
    pub skipped_turns: u64,
    pub captures: u64,
    pub forfeits: u64,
}

impl Summary {
    pub fn add(mut self, record: GameRecord) -> Self {
        self.games += 1;
        match record.winner {
            Some(player) => self.wins[player.index()] += 1,
            None => self.unfinished += 1,
        }
        self.rolls += record.rolls as u64;
        self.sixes += record.sixes as u64;
        self.skipped_turns += record.skipped_turns as u64;
        self.captures += record.captures as u64;
        self.forfeits += record.forfeits as u64;
        self
    }

    pub fn win_rate(&self, player: Player) -> f32 {
        if self.games > 0 {
            self.wins[player.index()] as f32 / self.games as f32 * 100.0
        } else {
            0.0
        }
    }

    fn per_game(&self, total: u64) -> f32 {
        if self.games > 0 { total as f32 / self.games as f32 } else { 0.0 }
    }

    pub fn to_report(&self) -> String {
        let mut report = format!("Games: {}, Unfinished: {}\n", self.games, self.unfinished);
        for player in Player::ALL {
            report += &format!(
                "{player} Wins: {}, Winrate: {:.2}%\n",
                self.wins[player.index()],
                self.win_rate(player)
            );
        }
        report += &format!(
            "Per game: {:.1} rolls, {:.1} sixes, {:.1} skipped turns, {:.1} captures, {:.1} forfeits",
            self.per_game(self.rolls),
            self.per_game(self.sixes),
            self.per_game(self.skipped_turns),
            self.per_game(self.captures),
            self.per_game(self.forfeits),
        );
        report
    }
}

/// Plays `config.games` games in parallel, seeded `base_seed`, `base_seed + 1`, ...
pub fn run_games(config: &SimulationConfig, base_seed: u64) -> Result<Summary, EngineError> {
    let records = (0..config.games)
        .into_par_iter()
        .map(|i| play_random_game(base_seed.wrapping_add(i as u64), config.max_events))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = records.into_iter().fold(Summary::default(), Summary::add);
    info!(games = summary.games, unfinished = summary.unfinished, "simulation finished");
    Ok(summary)
}
