#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use grid_defence_core::{config::SpawningConfig, CellCoord, Command, Event};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    interval_ticks: u64,
    limit: Option<u32>,
}

impl Config {
    /// Creates a configuration spawning one enemy every `interval_ticks`
    /// ticks, at most `limit` times. An interval of zero disables spawning.
    #[must_use]
    pub const fn new(interval_ticks: u64, limit: Option<u32>) -> Self {
        Self {
            interval_ticks,
            limit,
        }
    }
}

impl From<SpawningConfig> for Config {
    fn from(config: SpawningConfig) -> Self {
        Self::new(config.interval_ticks, config.limit)
    }
}

/// Pure system that emits spawn commands at a fixed tick cadence.
#[derive(Debug)]
pub struct Spawning {
    interval_ticks: u64,
    accumulator: u64,
    remaining: Option<u32>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            interval_ticks: config.interval_ticks,
            accumulator: 0,
            remaining: config.limit,
        }
    }

    /// Consumes events to emit spawn commands targeting `spawn_cell`.
    pub fn handle(&mut self, events: &[Event], spawn_cell: CellCoord, out: &mut Vec<Command>) {
        if self.interval_ticks == 0 || self.remaining == Some(0) {
            return;
        }

        let elapsed = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count() as u64;
        if elapsed == 0 {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);
        let spawn_attempts = self.resolve_spawn_attempts();

        for _ in 0..spawn_attempts {
            out.push(Command::SpawnEnemy { cell: spawn_cell });
        }
    }

    fn resolve_spawn_attempts(&mut self) -> u32 {
        if self.interval_ticks == 0 {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.interval_ticks {
            if self.remaining == Some(0) {
                self.accumulator = 0;
                break;
            }
            self.accumulator -= self.interval_ticks;
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
            }
            attempts += 1;
        }
        attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_spawn_attempts_without_interval() {
        let mut spawning = Spawning::new(Config::new(0, None));
        spawning.accumulator = 10;
        assert_eq!(spawning.resolve_spawn_attempts(), 0);
    }

    #[test]
    fn limit_caps_attempts() {
        let mut spawning = Spawning::new(Config::new(1, Some(2)));
        spawning.accumulator = 5;
        assert_eq!(spawning.resolve_spawn_attempts(), 2);
        assert_eq!(spawning.remaining, Some(0));
        assert_eq!(spawning.accumulator, 0);
    }

    #[test]
    fn converts_from_game_config() {
        let config = Config::from(SpawningConfig {
            interval_ticks: 7,
            limit: Some(3),
        });
        assert_eq!(config, Config::new(7, Some(3)));
    }
}
