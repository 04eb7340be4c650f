//! Random draws behind the rules
//!
//! Behaviors and chemistry only ever ask "does this chance pass", through
//! [`WorldRng`]. Tests swap in scripted draws; the world runs on [`SimRng`].

use rand::SeedableRng;

/// Generator the world owns; the same seed replays the same run
pub type SimRng = rand_xoshiro::Xoshiro256StarStar;

pub fn seeded(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

pub trait WorldRng {
    /// Uniform draw in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Passes when a fresh draw is strictly below `probability`
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }
}

impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }
}
