//! Console state machine.

use fba_consensus::{ConsensusConfig, ConsensusMonitor, SettleDelaySource};
use fba_core::{Action, Event, StateMachine, SubStateMachine, ViewUpdate};
use fba_wallet::{WalletConfig, WalletState};
use std::time::Duration;
use tracing::{info, trace};

/// Configuration of the whole console state machine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateMachineConfig {
    pub wallet: WalletConfig,
    pub consensus: ConsensusConfig,
    /// Seed of the settle delay generator.
    pub seed: u64,
}

impl StateMachineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate both halves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wallet.validate()?;
        self.consensus.validate()?;
        Ok(())
    }
}

/// Invalid state machine configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid polling configuration: {0}")]
    Wallet(#[from] fba_wallet::ConfigError),

    #[error("Invalid consensus configuration: {0}")]
    Consensus(#[from] fba_consensus::ConfigError),
}

/// Combined console state machine.
///
/// Composes the wallet and the consensus monitor. The two never share state;
/// each event is owned by exactly one of them.
#[derive(Debug)]
pub struct ConsoleStateMachine {
    wallet: WalletState,
    consensus: ConsensusMonitor,
    now: Duration,
}

impl ConsoleStateMachine {
    /// Create a state machine with a seeded random settle delay source.
    pub fn new(config: StateMachineConfig) -> Self {
        Self {
            wallet: WalletState::new(config.wallet),
            consensus: ConsensusMonitor::new(config.consensus, config.seed),
            now: Duration::ZERO,
        }
    }

    /// Create a state machine with an explicit settle delay source.
    pub fn with_delay_source(
        config: StateMachineConfig,
        delays: Box<dyn SettleDelaySource>,
    ) -> Self {
        Self {
            wallet: WalletState::new(config.wallet),
            consensus: ConsensusMonitor::with_delay_source(config.consensus, delays),
            now: Duration::ZERO,
        }
    }

    pub fn wallet(&self) -> &WalletState {
        &self.wallet
    }

    pub fn consensus(&self) -> &ConsensusMonitor {
        &self.consensus
    }

    /// Show the setup view and start the consensus monitor.
    ///
    /// The wallet refresh only starts once a wallet is active.
    pub fn initialize(&mut self) -> Vec<Action> {
        info!("Initializing console");
        let mut actions = vec![Action::Render(ViewUpdate::Setup)];
        actions.extend(self.consensus.initialize());
        actions
    }
}

impl StateMachine for ConsoleStateMachine {
    fn handle(&mut self, event: Event) -> Vec<Action> {
        if let Some(actions) = self.wallet.try_handle(&event) {
            return actions;
        }
        if let Some(actions) = self.consensus.try_handle(&event) {
            return actions;
        }
        trace!(event = event.type_name(), "Unhandled event");
        vec![]
    }

    fn set_time(&mut self, now: Duration) {
        self.now = now;
        self.wallet.set_time(now);
        self.consensus.set_time(now);
    }

    fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fba_core::{Command, RemoteRequest, RemoteResponse};
    use fba_test_helpers::{five_node_directory, test_identity};

    fn requests(actions: &[Action]) -> Vec<&RemoteRequest> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Request { request } => Some(request),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initialize_shows_setup_and_loads_nodes() {
        let mut machine = ConsoleStateMachine::new(StateMachineConfig::default());
        let actions = machine.initialize();

        assert_eq!(actions[0], Action::Render(ViewUpdate::Setup));
        assert_eq!(requests(&actions), vec![&RemoteRequest::ListNodes]);
    }

    #[test]
    fn test_events_routed_to_owner() {
        let mut machine = ConsoleStateMachine::new(StateMachineConfig::default());
        machine.initialize();

        let actions = machine.handle(Event::RemoteCompleted(RemoteResponse::NodesListed(Ok(
            five_node_directory(),
        ))));
        assert!(matches!(actions.last(), Some(Action::Render(ViewUpdate::Nodes(_)))));
        assert!(machine.consensus().directory().is_some());

        machine.handle(Event::Command(Command::GenerateWallet));
        machine.handle(Event::RemoteCompleted(RemoteResponse::WalletGenerated {
            session: 1,
            result: Ok(test_identity()),
        }));
        assert_eq!(machine.wallet().active(), Some(&test_identity()));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = StateMachineConfig::default();
        config.wallet.history_limit = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Wallet(fba_wallet::ConfigError::ZeroHistoryLimit))
        );
    }
}
