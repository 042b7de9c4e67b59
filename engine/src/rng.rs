use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Position in a deterministic random stream: the seed plus the number of
/// draws already consumed. Persisted alongside the combat snapshot so a
/// later request can resume the stream exactly where the last one stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomCursor {
    pub seed: u64,
    pub draws_consumed: u64,
}

impl RandomCursor {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draws_consumed: 0,
        }
    }
}

/// Seeded, replayable source of uniform draws.
///
/// Every public method consumes exactly one position in the logical stream,
/// so the cursor alone is enough to reproduce any prefix: reseed and redraw
/// `draws_consumed` times. For a fixed seed the Nth draw is identical across
/// process restarts and across machines (ChaCha8 is platform-independent).
///
/// Replay cost is linear in the cursor; combats are short enough that a
/// counter-seekable construction has not been worth the switch.
pub struct RandomStream {
    rng: ChaCha8Rng,
    cursor: RandomCursor,
}

impl RandomStream {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            cursor: RandomCursor::new(seed),
        }
    }

    /// Reconstruct the stream a previous request left behind by replaying
    /// every recorded draw. The values produced next match what a single
    /// continuously-running session would have produced.
    pub fn resume(cursor: RandomCursor) -> Self {
        let mut stream = Self::from_seed(cursor.seed);
        for _ in 0..cursor.draws_consumed {
            stream.next();
        }
        stream
    }

    pub fn cursor(&self) -> RandomCursor {
        self.cursor
    }

    /// One uniform draw in `[0, 1)`; advances the cursor by exactly one.
    pub fn next(&mut self) -> f64 {
        self.cursor.draws_consumed += 1;
        let value = self.rng.gen_range(0.0..1.0);
        tracing::trace!(draw = self.cursor.draws_consumed, value, "rng draw");
        value
    }

    /// Uniform integer in `min..=max` from a single draw.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = (max - min + 1) as f64;
        min + (self.next() * span).floor() as i32
    }

    /// One die of the given number of faces (`1..=faces`), a single draw.
    pub fn roll_die(&mut self, faces: u32) -> i32 {
        self.next_int(1, faces as i32)
    }
}
