//! Injectable source of uniform randomness.
//!
//! Selection and rotation jitter each take their own source so tests can
//! pin one without the other. Any `FnMut() -> f64` closure is a source,
//! which makes stubbing a draw a one-liner.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces uniform values in `[0, 1)`. Not cryptographically secure.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut() -> f64 + Send,
{
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Adapter exposing any `rand` generator as a [`RandomSource`].
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    inner: R,
}

impl<R: Rng + Send> RngSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl RngSource<StdRng> {
    /// Seed from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}
