//! Dealer configuration management.
//!
//! Consolidates all environment variable reads, applies command-line
//! overrides and validates the result before any game is created.

use set_table::GameConfig;

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub players: Option<usize>,
    pub round_timeout_ms: Option<u64>,
    pub seed: Option<u64>,
    pub hints: bool,
}

/// Complete dealer configuration
#[derive(Debug, Clone)]
pub struct DealerConfig {
    /// Game parameters
    pub game: GameConfig,
    /// Capacity of the event queue feeding the log view
    pub view_capacity: usize,
}

impl DealerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but unparsable, or if the
    /// resulting game configuration is inconsistent.
    pub fn from_env(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration through `lookup` instead of the process environment
    pub fn from_lookup<F>(lookup: F, overrides: CliOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GameConfig::default();
        let env = Env { lookup };

        let game = GameConfig {
            deck_size: env.parse_or("SET_DECK_SIZE", defaults.deck_size)?,
            table_size: env.parse_or("SET_TABLE_SIZE", defaults.table_size)?,
            feature_size: env.parse_or("SET_FEATURE_SIZE", defaults.feature_size)?,
            feature_count: env.parse_or("SET_FEATURE_COUNT", defaults.feature_count)?,
            player_count: match overrides.players {
                Some(players) => players,
                None => env.parse_or("SET_PLAYERS", defaults.player_count)?,
            },
            round_timeout_ms: match overrides.round_timeout_ms {
                Some(timeout) => timeout,
                None => env.parse_or("SET_ROUND_TIMEOUT_MS", defaults.round_timeout_ms)?,
            },
            turn_timeout_warning_ms: env
                .parse_or("SET_WARNING_MS", defaults.turn_timeout_warning_ms)?,
            place_card_delay_ms: env.parse_or("SET_PLACE_DELAY_MS", defaults.place_card_delay_ms)?,
            remove_card_delay_ms: env
                .parse_or("SET_REMOVE_DELAY_MS", defaults.remove_card_delay_ms)?,
            point_freeze_ms: env.parse_or("SET_POINT_FREEZE_MS", defaults.point_freeze_ms)?,
            penalty_freeze_ms: env.parse_or("SET_PENALTY_FREEZE_MS", defaults.penalty_freeze_ms)?,
            display_tick_ms: env.parse_or("SET_DISPLAY_TICK_MS", defaults.display_tick_ms)?,
            hints: overrides.hints || env.parse_or("SET_HINTS", defaults.hints)?,
            bot_think_time_ms: env.parse_or("SET_BOT_THINK_MS", defaults.bot_think_time_ms)?,
            bot_accuracy_pct: env.parse_or("SET_BOT_ACCURACY", defaults.bot_accuracy_pct)?,
            seed: match overrides.seed {
                Some(seed) => Some(seed),
                None => env.parse_opt("SET_SEED")?,
            },
        };

        let config = DealerConfig {
            game,
            view_capacity: env.parse_or("SET_VIEW_CAPACITY", 1024)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "SET_VIEW_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        self.game.validate()?;
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Game(#[from] set_table::ConfigError),
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Parse `key` if set, falling back to `default` when unset or blank
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse_opt(key)?.unwrap_or(default))
    }

    fn parse_opt<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.lookup)(key) {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim()
                    .parse()
                    .map(Some)
                    .map_err(|e: T::Err| ConfigError::Invalid {
                        var: key.to_string(),
                        reason: format!("Cannot parse {:?}: {}", raw, e),
                    })
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)], overrides: CliOverrides) -> Result<DealerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DealerConfig::from_lookup(|key| vars.get(key).cloned(), overrides)
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = load(&[], CliOverrides::default()).unwrap();
        assert_eq!(config.game, GameConfig::default());
        assert_eq!(config.view_capacity, 1024);
    }

    #[test]
    fn test_environment_values_are_used() {
        let config = load(
            &[
                ("SET_PLAYERS", "4"),
                ("SET_ROUND_TIMEOUT_MS", "30000"),
                ("SET_HINTS", "true"),
                ("SET_SEED", " 99 "),
            ],
            CliOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.game.player_count, 4);
        assert_eq!(config.game.round_timeout_ms, 30_000);
        assert!(config.game.hints);
        assert_eq!(config.game.seed, Some(99));
    }

    #[test]
    fn test_command_line_wins_over_environment() {
        let config = load(
            &[("SET_PLAYERS", "4"), ("SET_SEED", "1")],
            CliOverrides {
                players: Some(6),
                seed: Some(5),
                ..CliOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(config.game.player_count, 6);
        assert_eq!(config.game.seed, Some(5));
    }

    #[test]
    fn test_unparsable_value_is_reported() {
        let err = load(&[("SET_DECK_SIZE", "lots")], CliOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "SET_DECK_SIZE"));
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_inconsistent_game_is_rejected() {
        let err = load(
            &[("SET_DECK_SIZE", "9"), ("SET_FEATURE_COUNT", "2")],
            CliOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Game(_)));
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let config = load(&[("SET_TABLE_SIZE", "  ")], CliOverrides::default()).unwrap();
        assert_eq!(config.game.table_size, 12);
    }
}
