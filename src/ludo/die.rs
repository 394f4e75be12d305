use rand::{Rng, SeedableRng, rngs::{StdRng, ThreadRng}};
use tracing::trace;

use crate::ludo::EngineError;

/// The face that launches tokens and grants another turn.
pub const SIX: u8 = 6;

/// Rolling this many sixes in a row is never published.
const SIX_STREAK_LIMIT: u8 = 3;

/// Supplies raw die faces (1-6) to a [`Die`].
pub trait FaceSource {
    fn draw(&mut self) -> u8;
}

fn check_face(face: u8) -> Result<u8, EngineError> {
    if (1..=SIX).contains(&face) {
        Ok(face)
    } else {
        Err(EngineError::InvalidConfiguration(format!("die face {face} is not in 1..=6")))
    }
}

/// Uniform faces from any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngFaces<R> {
    rng: R,
}

impl<R: Rng> RngFaces<R> {
    pub fn new(rng: R) -> Self {
        RngFaces { rng }
    }
}

impl RngFaces<ThreadRng> {
    pub fn thread() -> Self {
        RngFaces { rng: rand::rng() }
    }
}

impl RngFaces<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RngFaces { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> FaceSource for RngFaces<R> {
    fn draw(&mut self) -> u8 {
        self.rng.random_range(1..=6)
    }
}

/// Replays a fixed cycle of faces. Handy for tests and for reproducing games.
#[derive(Debug, Clone)]
pub struct ScriptedFaces {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedFaces {
    /// Fails if a face is outside 1-6, or if the cycle has no face other than six
    /// (the three-sixes rule would re-roll forever).
    pub fn new(faces: Vec<u8>) -> Result<Self, EngineError> {
        for &face in &faces {
            check_face(face)?;
        }
        if faces.iter().all(|&face| face == SIX) {
            return Err(EngineError::InvalidConfiguration(
                "scripted faces need at least one face other than six".to_string(),
            ));
        }
        Ok(ScriptedFaces { faces, next: 0 })
    }
}

impl FaceSource for ScriptedFaces {
    fn draw(&mut self) -> u8 {
        let face = self.faces[self.next];
        self.next = (self.next + 1) % self.faces.len();
        face
    }
}

/// The single die of the game.
///
/// A third six in a row is never published: it is replaced by a fresh draw
/// under the same rule, so callers see at most two consecutive sixes.
/// Rolling is locked after every roll until [`Die::allow_rolling`] is called.
#[derive(Debug, Clone)]
pub struct Die<F> {
    faces: F,
    current: Option<u8>,
    previous: Option<u8>,
    consecutive_sixes: u8,
    rolling_allowed: bool,
}

impl<F: FaceSource> Die<F> {
    pub fn new(faces: F) -> Self {
        Die {
            faces,
            current: None,
            previous: None,
            consecutive_sixes: 0,
            rolling_allowed: true,
        }
    }

    /// Fails without changing anything if rolling is locked or the face source
    /// hands out a face outside 1-6.
    pub fn roll(&mut self) -> Result<u8, EngineError> {
        if !self.rolling_allowed {
            return Err(EngineError::InvalidState("die rolled while a move is pending"));
        }

        let value = loop {
            let value = check_face(self.faces.draw())?;
            if value == SIX {
                self.consecutive_sixes += 1;
            } else {
                self.consecutive_sixes = 0;
            }
            if self.consecutive_sixes < SIX_STREAK_LIMIT {
                break value;
            }
            trace!("third six in a row, rolling again");
            self.consecutive_sixes -= 1;
        };

        self.previous = self.current;
        self.current = Some(value);
        self.rolling_allowed = false;
        Ok(value)
    }

    pub fn allow_rolling(&mut self) {
        self.rolling_allowed = true;
    }

    pub fn rolling_allowed(&self) -> bool {
        self.rolling_allowed
    }

    /// Last published value, `None` before the first roll.
    pub fn value(&self) -> Option<u8> {
        self.current
    }

    pub fn previous_value(&self) -> Option<u8> {
        self.previous
    }

    pub fn consecutive_sixes(&self) -> u8 {
        self.consecutive_sixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(faces: &[u8]) -> Die<ScriptedFaces> {
        Die::new(ScriptedFaces::new(faces.to_vec()).unwrap())
    }

    fn roll(die: &mut Die<impl FaceSource>) -> u8 {
        let value = die.roll().unwrap();
        die.allow_rolling();
        value
    }

    #[test]
    fn test_third_six_is_rerolled() {
        let mut die = scripted(&[6, 6, 6, 2]);
        assert_eq!(roll(&mut die), 6);
        assert_eq!(die.consecutive_sixes(), 1);
        assert_eq!(roll(&mut die), 6);
        assert_eq!(die.consecutive_sixes(), 2);
        assert_eq!(roll(&mut die), 2);
        assert_eq!(die.consecutive_sixes(), 0);
        assert_eq!(die.previous_value(), Some(6));
    }

    #[test]
    fn test_reroll_keeps_rerolling_sixes() {
        let mut die = scripted(&[6, 6, 6, 6, 6, 3]);
        assert_eq!(roll(&mut die), 6);
        assert_eq!(roll(&mut die), 6);
        assert_eq!(roll(&mut die), 3);
        assert_eq!(die.consecutive_sixes(), 0);
    }

    #[test]
    fn test_non_six_resets_streak() {
        let mut die = scripted(&[6, 4, 6, 6]);
        roll(&mut die);
        assert_eq!(die.consecutive_sixes(), 1);
        roll(&mut die);
        assert_eq!(die.consecutive_sixes(), 0);
        roll(&mut die);
        roll(&mut die);
        assert_eq!(die.consecutive_sixes(), 2);
    }

    #[test]
    fn test_roll_locks_until_allowed() {
        let mut die = scripted(&[3]);
        assert_eq!(die.value(), None);
        assert!(die.rolling_allowed());
        assert_eq!(die.roll(), Ok(3));
        assert!(!die.rolling_allowed());
        assert!(matches!(die.roll(), Err(EngineError::InvalidState(_))));
        assert_eq!(die.value(), Some(3));
        die.allow_rolling();
        assert_eq!(die.roll(), Ok(3));
        assert_eq!(die.previous_value(), Some(3));
    }

    struct Cycle(Vec<u8>, usize);

    impl FaceSource for Cycle {
        fn draw(&mut self) -> u8 {
            let face = self.0[self.1 % self.0.len()];
            self.1 += 1;
            face
        }
    }

    #[test]
    fn test_out_of_range_face_is_refused() {
        let mut die = Die::new(Cycle(vec![6, 0, 7, 2], 0));
        assert_eq!(roll(&mut die), 6);

        for _ in 0..2 {
            assert!(matches!(die.roll(), Err(EngineError::InvalidConfiguration(_))));
            assert_eq!(die.value(), Some(6));
            assert_eq!(die.consecutive_sixes(), 1);
            assert!(die.rolling_allowed());
        }

        assert_eq!(die.roll(), Ok(2));
        assert_eq!(die.previous_value(), Some(6));
    }

    #[test]
    fn test_scripted_faces_validation() {
        assert!(ScriptedFaces::new(vec![]).is_err());
        assert!(ScriptedFaces::new(vec![6, 6]).is_err());
        assert!(ScriptedFaces::new(vec![0, 3]).is_err());
        assert!(ScriptedFaces::new(vec![7]).is_err());
        assert!(ScriptedFaces::new(vec![6, 1]).is_ok());
    }

    #[test]
    fn test_dice_roll_never_publishes_three_sixes() {
        for seed in 0..20 {
            let mut die = Die::new(RngFaces::seeded(seed));
            let mut streak = 0;
            let mut seen = [false; 6];
            for _ in 0..2_000 {
                let value = roll(&mut die);
                assert!((1..=6).contains(&value));
                seen[value as usize - 1] = true;
                streak = if value == SIX { streak + 1 } else { 0 };
                assert!(streak < 3);
                assert!(die.consecutive_sixes() <= 2);
                assert_eq!(die.consecutive_sixes(), streak);
            }
            assert!(seen.iter().all(|&s| s));
        }
    }
}
