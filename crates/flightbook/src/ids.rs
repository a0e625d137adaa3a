//! Booking id generation.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::booking::format_id;
use crate::error::{Error, Result};

/// How new booking ids are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Uniform random suffix with no uniqueness check. Collisions with live
    /// bookings are possible.
    #[default]
    Random,
    /// Random suffix, redrawn while it collides with a live booking id.
    Checked,
}

impl std::fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Checked => write!(f, "checked"),
        }
    }
}

/// Generates `BKG<n>` ids with `n` in `0..range`.
#[derive(Debug)]
pub struct IdGenerator {
    strategy: IdStrategy,
    range: u32,
    max_attempts: u32,
    rng: StdRng,
}

impl IdGenerator {
    /// Create a generator seeded from the operating system.
    ///
    /// `range` and `max_attempts` are clamped to at least 1.
    #[must_use]
    pub fn new(strategy: IdStrategy, range: u32, max_attempts: u32) -> Self {
        Self {
            strategy,
            range: range.max(1),
            max_attempts: max_attempts.max(1),
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the random source with a deterministic one.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The configured strategy.
    #[must_use]
    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Draw the next id.
    ///
    /// `live_ids` is only called for [`IdStrategy::Checked`].
    ///
    /// # Errors
    ///
    /// Returns an error if `live_ids` fails, or if no free id was found
    /// within the configured number of attempts.
    pub fn next_id<F>(&mut self, live_ids: F) -> Result<String>
    where
        F: FnOnce() -> Result<HashSet<String>>,
    {
        match self.strategy {
            IdStrategy::Random => Ok(self.draw()),
            IdStrategy::Checked => {
                let taken = live_ids()?;
                for attempt in 1..=self.max_attempts {
                    let id = self.draw();
                    if !taken.contains(&id) {
                        return Ok(id);
                    }
                    debug!(%id, attempt, "Booking id already in use, redrawing");
                }
                Err(Error::internal(format!(
                    "no free booking id after {} attempts",
                    self.max_attempts
                )))
            }
        }
    }

    fn draw(&mut self) -> String {
        format_id(self.rng.gen_range(0..self.range))
    }
}
