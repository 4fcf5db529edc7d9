//! Game configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of distinct cards (default: 81)
    pub deck_size: usize,

    /// Number of slots on the table (default: 12)
    pub table_size: usize,

    /// Values per feature, which is also the number of cards in a claim (default: 3)
    pub feature_size: usize,

    /// Features per card (default: 4)
    pub feature_count: usize,

    /// Number of seated players
    pub player_count: usize,

    /// Round countdown before the table is swept
    pub round_timeout_ms: u64,

    /// Remaining time below which the countdown is shown as a warning
    pub turn_timeout_warning_ms: u64,

    /// Artificial pacing when dealing a card
    pub place_card_delay_ms: u64,

    /// Artificial pacing when taking a card off the table
    pub remove_card_delay_ms: u64,

    /// Freeze after a correct claim
    pub point_freeze_ms: u64,

    /// Freeze after a wrong claim
    pub penalty_freeze_ms: u64,

    /// How often the dealer refreshes the countdown while waiting for claims
    pub display_tick_ms: u64,

    /// Log every legal set whenever a fresh table is dealt
    pub hints: bool,

    /// Average pause between two bot moves
    pub bot_think_time_ms: u64,

    /// Chance (0-100) that a bot aims at a legal set instead of a random slot
    pub bot_accuracy_pct: u8,

    /// Fixed seed for reproducible shuffles
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            deck_size: 81,
            table_size: 12,
            feature_size: 3,
            feature_count: 4,
            player_count: 2,
            round_timeout_ms: 60_000,
            turn_timeout_warning_ms: 5_000,
            place_card_delay_ms: 10,
            remove_card_delay_ms: 10,
            point_freeze_ms: 1_000,
            penalty_freeze_ms: 3_000,
            display_tick_ms: 1_000,
            hints: false,
            bot_think_time_ms: 200,
            bot_accuracy_pct: 25,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Validate configuration
    ///
    /// Every check here is fatal: a game is never started with a config that
    /// fails validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feature_size < 2 {
            return Err(ConfigError::invalid("feature_size", "Must be at least 2"));
        }

        if self.feature_count == 0 {
            return Err(ConfigError::invalid("feature_count", "Must be at least 1"));
        }

        if self.deck_size == 0 {
            return Err(ConfigError::invalid("deck_size", "Must be greater than 0"));
        }

        // Overflow means the feature space is larger than any deck we can hold.
        if let Some(distinct_cards) = u32::try_from(self.feature_count)
            .ok()
            .and_then(|count| self.feature_size.checked_pow(count))
            && self.deck_size > distinct_cards
        {
            return Err(ConfigError::invalid(
                "deck_size",
                format!(
                    "Must be at most {} ({} features of {} values)",
                    distinct_cards, self.feature_count, self.feature_size
                ),
            ));
        }

        if u32::try_from(self.deck_size).is_err() {
            return Err(ConfigError::invalid("deck_size", "Too many cards"));
        }

        if self.table_size > self.deck_size {
            return Err(ConfigError::invalid(
                "table_size",
                format!("Cannot exceed deck size ({})", self.deck_size),
            ));
        }

        if self.table_size < self.feature_size {
            return Err(ConfigError::invalid(
                "table_size",
                format!(
                    "Must hold at least one full claim ({} cards)",
                    self.feature_size
                ),
            ));
        }

        if self.player_count == 0 {
            return Err(ConfigError::invalid("player_count", "Must be at least 1"));
        }

        if self.round_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "round_timeout_ms",
                "Must be greater than 0",
            ));
        }

        if self.display_tick_ms == 0 {
            return Err(ConfigError::invalid("display_tick_ms", "Must be greater than 0"));
        }

        if self.bot_accuracy_pct > 100 {
            return Err(ConfigError::invalid("bot_accuracy_pct", "Must be at most 100"));
        }

        Ok(())
    }

    /// Number of cards a claim must hold to be adjudicated
    pub fn set_size(&self) -> usize {
        self.feature_size
    }

    pub fn round_timeout(&self) -> Duration {
        Duration::from_millis(self.round_timeout_ms)
    }

    pub fn turn_timeout_warning(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_warning_ms)
    }

    pub fn place_card_delay(&self) -> Duration {
        Duration::from_millis(self.place_card_delay_ms)
    }

    pub fn remove_card_delay(&self) -> Duration {
        Duration::from_millis(self.remove_card_delay_ms)
    }

    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_ms)
    }

    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_ms)
    }

    pub fn display_tick(&self) -> Duration {
        Duration::from_millis(self.display_tick_ms)
    }

    pub fn bot_think_time(&self) -> Duration {
        Duration::from_millis(self.bot_think_time_ms)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_table_larger_than_deck_rejected() {
        let config = GameConfig {
            deck_size: 9,
            table_size: 12,
            ..GameConfig::default()
        };

        let err = config.validate().unwrap_err();
        let ConfigError::Invalid { field, .. } = err;
        assert_eq!(field, "table_size");
    }

    #[test]
    fn test_deck_larger_than_feature_space_rejected() {
        let config = GameConfig {
            deck_size: 28,
            table_size: 12,
            feature_count: 3,
            ..GameConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("deck_size"));
        assert!(err.to_string().contains("27"));
    }

    #[test]
    fn test_table_must_fit_a_claim() {
        let config = GameConfig {
            table_size: 2,
            ..GameConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_players_rejected() {
        let config = GameConfig {
            player_count: 0,
            ..GameConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("player_count"));
    }

    #[test]
    fn test_feature_values_beyond_a_byte_are_accepted() {
        let config = GameConfig {
            feature_size: 257,
            feature_count: 1,
            deck_size: 257,
            table_size: 257,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());

        let oracle = crate::game::SetOracle::from_config(&config);
        let deck: Vec<crate::game::Card> = (0..257).map(crate::game::Card).collect();
        assert!(crate::game::LegalityOracle::is_set(&oracle, &deck));
    }

    #[test]
    fn test_durations() {
        let config = GameConfig::default();
        assert_eq!(config.round_timeout(), Duration::from_secs(60));
        assert_eq!(config.penalty_freeze(), Duration::from_secs(3));
        assert_eq!(config.set_size(), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"table_size": 9, "player_count": 4}"#).unwrap();

        assert_eq!(config.table_size, 9);
        assert_eq!(config.player_count, 4);
        assert_eq!(config.deck_size, 81);
        assert!(config.validate().is_ok());
    }
}
