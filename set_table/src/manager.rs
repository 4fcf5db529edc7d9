//! Game manager: builds the table, spawns the actors, and collects the result.

use crate::{
    config::{ConfigError, GameConfig},
    dealer::{Dealer, GameSummary, claim_channel},
    game::{LegalityOracle, SetOracle},
    player::{Contestant, PlayerActor},
    shutdown::ShutdownHandle,
    table::{EventBus, Table},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Game lifecycle errors
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Oracle judges sets of {actual} cards, configuration expects {expected}")]
    OracleMismatch { expected: usize, actual: usize },

    #[error("Game has already been started")]
    AlreadyStarted,

    #[error("Game has not been started")]
    NotStarted,

    #[error("Game task failed: {0}")]
    Join(String),
}

/// Owns one game: the shared table, the dealer task and one task per player.
pub struct GameManager {
    config: GameConfig,
    table: Arc<Table>,
    shutdown: ShutdownHandle,
    dealer: Option<JoinHandle<GameSummary>>,
    players: Vec<JoinHandle<()>>,
    started: bool,
}

impl GameManager {
    /// Validate `config` and set up an empty table using the classic rule
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] if the configuration is inconsistent.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let oracle = Arc::new(SetOracle::from_config(&config));
        Self::with_oracle(config, oracle)
    }

    /// Like [`GameManager::new`] with a custom legality rule
    pub fn with_oracle(
        config: GameConfig,
        oracle: Arc<dyn LegalityOracle>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        if oracle.set_size() != config.set_size() {
            return Err(GameError::OracleMismatch {
                expected: config.set_size(),
                actual: oracle.set_size(),
            });
        }

        let table = Arc::new(Table::new(&config, oracle, Arc::new(EventBus::new())));
        Ok(Self {
            config,
            table,
            shutdown: ShutdownHandle::new(),
            dealer: None,
            players: Vec::new(),
            started: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Bus carrying every table change; subscribe before `start` to see the
    /// first deal.
    pub fn events(&self) -> &Arc<EventBus> {
        self.table.events()
    }

    /// Handle for stopping the game from elsewhere (e.g. a signal handler)
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Spawn the player tasks and the dealer task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        self.started = true;

        let (claims, receiver) = claim_channel(self.config.player_count);
        let mut contestants: Vec<Arc<dyn Contestant>> = Vec::with_capacity(self.config.player_count);

        for id in 0..self.config.player_count {
            let (actor, handle) = PlayerActor::new(
                id,
                &self.config,
                self.table.clone(),
                claims.clone(),
                self.shutdown.subscribe(),
            );
            contestants.push(Arc::new(handle));
            self.players.push(tokio::spawn(actor.run()));
        }

        let dealer = Dealer::new(
            self.config.clone(),
            self.table.clone(),
            contestants,
            receiver,
            self.shutdown.subscribe(),
        );
        self.dealer = Some(tokio::spawn(dealer.run()));

        log::info!(
            "Game started: {} players, {} cards, {} slots",
            self.config.player_count,
            self.config.deck_size,
            self.config.table_size
        );
        Ok(())
    }

    /// Ask the dealer and every player to stop
    pub fn terminate(&self) {
        self.shutdown.terminate();
    }

    /// Wait for the dealer to finish, then stop and join every player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotStarted`] if `start` was never called, or
    /// [`GameError::Join`] if the dealer task panicked.
    pub async fn wait(&mut self) -> Result<GameSummary, GameError> {
        let dealer = self.dealer.take().ok_or(GameError::NotStarted)?;
        let outcome = dealer.await;

        // Players only stop on termination, even when the deck ran dry.
        self.shutdown.terminate();
        for (id, player) in self.players.drain(..).enumerate().rev() {
            if let Err(e) = player.await {
                log::error!("Player {} task failed: {}", id, e);
            }
        }

        let summary = outcome.map_err(|e| GameError::Join(e.to_string()))?;
        log::info!(
            "Game finished after {} rounds ({}), winners {:?}",
            summary.rounds,
            summary.reason,
            summary.winners
        );
        Ok(summary)
    }

    /// Start the game and wait for it to end
    pub async fn run(mut self) -> Result<GameSummary, GameError> {
        self.start()?;
        self.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Card;

    struct Pairs;

    impl LegalityOracle for Pairs {
        fn set_size(&self) -> usize {
            2
        }

        fn is_set(&self, cards: &[Card]) -> bool {
            cards.len() == 2
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            table_size: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            GameManager::new(config),
            Err(GameError::Config(ConfigError::Invalid { .. }))
        ));
    }

    #[test]
    fn test_oracle_must_match_set_size() {
        let result = GameManager::with_oracle(GameConfig::default(), Arc::new(Pairs));
        assert!(matches!(
            result,
            Err(GameError::OracleMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[tokio::test]
    async fn test_wait_before_start() {
        let mut manager = GameManager::new(GameConfig::default()).unwrap();
        assert!(matches!(manager.wait().await, Err(GameError::NotStarted)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice() {
        let mut manager = GameManager::new(GameConfig {
            seed: Some(1),
            ..GameConfig::default()
        })
        .unwrap();

        manager.start().unwrap();
        assert!(matches!(manager.start(), Err(GameError::AlreadyStarted)));

        manager.terminate();
        let summary = manager.wait().await.unwrap();
        assert_eq!(summary.reason, crate::dealer::EndReason::Terminated);
    }
}
