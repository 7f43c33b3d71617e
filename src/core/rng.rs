//! Seeded six-sided die for hosts that want reproducible games.
//!
//! Sessions never roll on their own. A host either passes roll values in
//! directly or keeps a `GameRng` next to the session and hands it to
//! `GameSession::roll_d6`. Two dice built from the same seed produce the same
//! faces, and a `RngCheckpoint` resumes a die mid-stream.
//!
//! ```
//! use sprint_board::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll_d6(), b.roll_d6());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded die backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    stream: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            stream: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// One face, 1..=6.
    pub fn roll_d6(&mut self) -> u8 {
        self.stream.gen_range(1..=6)
    }

    /// Where the die is in its stream.
    #[must_use]
    pub fn checkpoint(&self) -> RngCheckpoint {
        RngCheckpoint {
            seed: self.seed,
            position: self.stream.get_word_pos(),
        }
    }

    /// Resume a die from a checkpoint.
    #[must_use]
    pub fn resume(checkpoint: &RngCheckpoint) -> Self {
        let mut stream = ChaCha8Rng::seed_from_u64(checkpoint.seed);
        stream.set_word_pos(checkpoint.position);
        Self {
            stream,
            seed: checkpoint.seed,
        }
    }
}

/// Seed plus stream position. Constant size however many rolls were made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngCheckpoint {
    pub seed: u64,
    /// ChaCha8 word position.
    pub position: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(rng: &mut GameRng, n: usize) -> Vec<u8> {
        (0..n).map(|_| rng.roll_d6()).collect()
    }

    #[test]
    fn test_same_seed_same_faces() {
        assert_eq!(faces(&mut GameRng::new(42), 100), faces(&mut GameRng::new(42), 100));
    }

    #[test]
    fn test_every_face_appears() {
        let rolls = faces(&mut GameRng::new(7), 600);
        assert!(rolls.iter().all(|r| (1..=6).contains(r)));
        for face in 1..=6 {
            assert!(rolls.contains(&face), "face {face} never came up");
        }
    }

    #[test]
    fn test_seeds_diverge() {
        assert_ne!(faces(&mut GameRng::new(1), 20), faces(&mut GameRng::new(2), 20));
    }

    #[test]
    fn test_resume_mid_stream() {
        let mut rng = GameRng::new(9);
        faces(&mut rng, 50);

        let checkpoint = rng.checkpoint();
        let ahead = faces(&mut rng, 10);

        let mut resumed = GameRng::resume(&checkpoint);
        assert_eq!(resumed.seed(), 9);
        assert_eq!(faces(&mut resumed, 10), ahead);
    }

    #[test]
    fn test_checkpoint_json() {
        let checkpoint = RngCheckpoint { seed: 3, position: 640 };
        let json = serde_json::to_string(&checkpoint).unwrap();
        assert_eq!(serde_json::from_str::<RngCheckpoint>(&json).unwrap(), checkpoint);
    }
}
