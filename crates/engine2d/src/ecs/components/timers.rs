//! Named timers held per entity

use crate::ecs::Component;
use crate::foundation::time::Stopwatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by timer operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A timer with this name is already registered
    #[error("timer '{0}' already exists")]
    AlreadyExists(String),

    /// No timer with this name is registered
    #[error("timer '{0}' not found")]
    NotFound(String),

    /// The entity holds no timers at all
    #[error("entity has no timers")]
    NoTimers,
}

/// Collection of named stopwatches driven by the frame delta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    timers: BTreeMap<String, Stopwatch>,
}

impl Component for Timers {
    const NAME: &'static str = "Timers";
}

impl Timers {
    /// Register a new timer, playing from zero
    pub fn add(&mut self, name: impl Into<String>) -> Result<(), TimerError> {
        let name = name.into();
        if self.timers.contains_key(&name) {
            return Err(TimerError::AlreadyExists(name));
        }
        self.timers.insert(name, Stopwatch::start_new());
        Ok(())
    }

    /// Remove a timer, returning its final state
    pub fn remove(&mut self, name: &str) -> Result<Stopwatch, TimerError> {
        self.timers
            .remove(name)
            .ok_or_else(|| TimerError::NotFound(name.to_string()))
    }

    /// Resume a timer. Returns `false` if it was already playing.
    pub fn start(&mut self, name: &str) -> Result<bool, TimerError> {
        Ok(self.timer_mut(name)?.play())
    }

    /// Pause a timer. Returns `false` if it was already paused.
    pub fn pause(&mut self, name: &str) -> Result<bool, TimerError> {
        Ok(self.timer_mut(name)?.pause())
    }

    /// Shift a timer by a signed offset
    pub fn scan(&mut self, name: &str, offset: f32) -> Result<(), TimerError> {
        self.timer_mut(name)?.scan(offset);
        Ok(())
    }

    /// Reset a timer to zero and return the time it had accumulated
    pub fn restart(&mut self, name: &str) -> Result<f32, TimerError> {
        Ok(self.timer_mut(name)?.restart())
    }

    /// Elapsed seconds of a timer
    pub fn elapsed(&self, name: &str) -> Result<f32, TimerError> {
        self.get(name)
            .map(Stopwatch::elapsed)
            .ok_or_else(|| TimerError::NotFound(name.to_string()))
    }

    /// Look up a timer
    pub fn get(&self, name: &str) -> Option<&Stopwatch> {
        self.timers.get(name)
    }

    /// Whether a timer with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    /// Advance every playing timer by one frame delta
    pub fn tick_all(&mut self, delta_time: f32) {
        for stopwatch in self.timers.values_mut() {
            stopwatch.tick(delta_time);
        }
    }

    /// Timer names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.timers.keys().map(String::as_str)
    }

    /// Number of timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timers are registered
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    fn timer_mut(&mut self, name: &str) -> Result<&mut Stopwatch, TimerError> {
        self.timers
            .get_mut(name)
            .ok_or_else(|| TimerError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_twice_is_rejected() {
        let mut timers = Timers::default();
        timers.add("spawn").unwrap();
        assert_eq!(timers.add("spawn"), Err(TimerError::AlreadyExists("spawn".to_string())));
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_start_on_playing_timer_keeps_elapsed() {
        let mut timers = Timers::default();
        timers.add("cooldown").unwrap();
        timers.tick_all(0.75);

        assert_eq!(timers.start("cooldown"), Ok(false));
        assert_relative_eq!(timers.elapsed("cooldown").unwrap(), 0.75);
    }

    #[test]
    fn test_pause_stops_accumulation() {
        let mut timers = Timers::default();
        timers.add("cooldown").unwrap();
        timers.tick_all(0.5);
        assert_eq!(timers.pause("cooldown"), Ok(true));
        assert_eq!(timers.pause("cooldown"), Ok(false));
        timers.tick_all(2.0);
        assert_relative_eq!(timers.elapsed("cooldown").unwrap(), 0.5);
    }

    #[test]
    fn test_restart_returns_previous_elapsed() {
        let mut timers = Timers::default();
        timers.add("round").unwrap();
        timers.tick_all(1.25);

        assert_relative_eq!(timers.restart("round").unwrap(), 1.25);
        assert_relative_eq!(timers.elapsed("round").unwrap(), 0.0);
        assert!(timers.get("round").unwrap().is_playing());
    }

    #[test]
    fn test_scan_applies_while_paused() {
        let mut timers = Timers::default();
        timers.add("clock").unwrap();
        timers.pause("clock").unwrap();
        timers.scan("clock", -0.5).unwrap();
        assert_relative_eq!(timers.elapsed("clock").unwrap(), -0.5);
    }

    #[test]
    fn test_unknown_timer_operations() {
        let mut timers = Timers::default();
        let missing = TimerError::NotFound("ghost".to_string());
        assert_eq!(timers.start("ghost"), Err(missing.clone()));
        assert_eq!(timers.restart("ghost"), Err(missing.clone()));
        assert_eq!(timers.remove("ghost").map(|_| ()), Err(missing));
    }
}
