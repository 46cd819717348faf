//! Builder for constructing spin machines and coordinators.

use crate::builder::error::BuildError;
use crate::config::SpinConfig;
use crate::coordinator::SpinCoordinator;
use crate::core::SpinRules;
use crate::machine::SpinMachine;
use crate::selection::{RandomSource, RngSource};
use std::time::Duration;

/// Builder for constructing a [`SpinMachine`] with a fluent API.
///
/// Unlike [`SpinMachine::add_participants`], the builder is strict: an
/// invalid or duplicate name fails the build.
pub struct SpinMachineBuilder {
    config: SpinConfig,
    participants: Vec<String>,
    selection_random: Option<Box<dyn RandomSource>>,
    jitter_random: Option<Box<dyn RandomSource>>,
    min_participants: Option<usize>,
}

impl SpinMachineBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: SpinConfig::default(),
            participants: Vec::new(),
            selection_random: None,
            jitter_random: None,
            min_participants: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SpinConfig) -> Self {
        self.config = config;
        self
    }

    pub fn spin_duration(mut self, duration: Duration) -> Self {
        self.config.spin_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn reveal_delay(mut self, delay: Duration) -> Self {
        self.config.reveal_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Add initial participants, in wheel order.
    pub fn participants<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants.extend(names.into_iter().map(Into::into));
        self
    }

    /// Random source for the winner draw.
    pub fn selection_random<R: RandomSource + 'static>(mut self, random: R) -> Self {
        self.selection_random = Some(Box::new(random));
        self
    }

    /// Random source for the cosmetic extra turns.
    pub fn jitter_random<R: RandomSource + 'static>(mut self, random: R) -> Self {
        self.jitter_random = Some(Box::new(random));
        self
    }

    /// Seed both random sources for a reproducible session. Sources set
    /// explicitly take precedence.
    pub fn seed(mut self, seed: u64) -> Self {
        if self.selection_random.is_none() {
            self.selection_random = Some(Box::new(RngSource::seeded(seed)));
        }
        if self.jitter_random.is_none() {
            self.jitter_random = Some(Box::new(RngSource::seeded(seed.wrapping_add(1))));
        }
        self
    }

    /// Raise the minimum roster size for a spin (never below two).
    pub fn min_participants(mut self, min: usize) -> Self {
        self.min_participants = Some(min);
        self
    }

    /// Build the machine.
    /// Returns an error if the configuration or any participant is invalid.
    pub fn build(self) -> Result<SpinMachine, BuildError> {
        let selection_random = self.selection_random.unwrap_or_else(entropy_source);
        let jitter_random = self.jitter_random.unwrap_or_else(entropy_source);

        let mut machine = SpinMachine::with_random(self.config, selection_random, jitter_random)?;
        if let Some(min) = self.min_participants {
            machine.set_rules(SpinRules::with_min_participants(min));
        }
        for name in &self.participants {
            machine.add_participant(name)?;
        }

        Ok(machine)
    }

    /// Build the machine and wrap it in a coordinator on the current tokio
    /// runtime.
    pub fn build_coordinator(self) -> Result<SpinCoordinator, BuildError> {
        SpinCoordinator::new(self.build()?)
    }
}

fn entropy_source() -> Box<dyn RandomSource> {
    Box::new(RngSource::from_entropy())
}

impl Default for SpinMachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
