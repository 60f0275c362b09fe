//! Node animation, round simulation and consensus inspection scenarios.

use fba_consensus::{RandomDelaySource, ScriptedDelays, SettleDelaySource, ROUND_STEPS};
use fba_core::{Command, NotifyLevel, TimerId};
use fba_node::StateMachineConfig;
use fba_simulation::{ScriptedLedger, SimulationRunner, SurfaceCall};
use fba_test_helpers::{five_node_directory, identity, node_id};
use fba_types::{NodePhase, RemoteError};
use std::time::Duration;
use tracing_test::traced_test;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn runner_with(delays: Box<dyn SettleDelaySource>) -> SimulationRunner {
    let ledger = ScriptedLedger::new(five_node_directory(), 7);
    let mut runner = SimulationRunner::new(StateMachineConfig::default(), ledger, delays);
    runner.initialize();
    runner
}

fn runner(settle: Duration) -> SimulationRunner {
    runner_with(Box::new(ScriptedDelays::constant(settle)))
}

fn all_phases(runner: &SimulationRunner) -> Vec<NodePhase> {
    let board = runner.machine().consensus().board();
    (1..=5).map(|n| board.phase(&node_id(n))).collect()
}

/// Status column of the most recent node render.
fn last_statuses(runner: &SimulationRunner) -> Vec<&'static str> {
    runner
        .surface()
        .calls()
        .iter()
        .rev()
        .find_map(|c| match c {
            SurfaceCall::Nodes(cards) => Some(cards.iter().map(|c| c.status).collect()),
            _ => None,
        })
        .unwrap_or_default()
}

#[test]
fn test_directory_renders_once_loaded() {
    let mut runner = runner(ms(2000));
    runner.run_until(ms(60));

    let cards = runner
        .surface()
        .calls()
        .iter()
        .find_map(|c| match c {
            SurfaceCall::Nodes(cards) => Some(cards.clone()),
            _ => None,
        })
        .expect("nodes rendered");
    assert_eq!(cards.len(), 5);
    assert_eq!(cards[0].name, "FBA Node 1");
    assert_eq!(cards[0].trusts, 3);
    assert_eq!(cards[2].trusts, 4);
    assert!(cards.iter().all(|c| c.status == "Ready"));
}

#[traced_test]
#[test]
fn test_directory_retried_on_next_poll() {
    let ledger = {
        let mut ledger = ScriptedLedger::new(five_node_directory(), 7);
        ledger.fail_next("list_nodes", RemoteError::Transport("refused".into()), 1);
        ledger
    };
    let mut runner = SimulationRunner::new(
        StateMachineConfig::default(),
        ledger,
        Box::new(ScriptedDelays::constant(ms(2000))),
    );
    runner.initialize();

    runner.run_until(ms(1000));
    assert!(runner.machine().consensus().directory().is_none());
    assert!(logs_contain("Failed to load node directory"));

    runner.run_until(ms(5100));
    assert!(runner.machine().consensus().directory().is_some());
    assert_eq!(runner.ledger().calls("list_nodes"), 2);

    // Loaded once, never refetched
    runner.run_until(ms(30_000));
    assert_eq!(runner.ledger().calls("list_nodes"), 2);
}

#[test]
fn test_pending_starts_voting_on_next_poll() {
    let mut runner = runner(ms(2000));

    runner.run_until(ms(9000));
    assert!(runner.phase_log().is_empty());

    runner.ledger_mut().set_auto_confirm(false);
    runner.ledger_mut().set_pending(["h1"]);
    runner.run_until(ms(10_049));
    assert_eq!(all_phases(&runner), vec![NodePhase::Idle; 5]);

    runner.run_until(ms(10_050));
    assert_eq!(all_phases(&runner), vec![NodePhase::Voting; 5]);
    assert!(runner.phase_log().iter().all(|c| c.at == ms(10_050)));
    assert_eq!(last_statuses(&runner), vec!["Voting..."; 5]);

    // Settle after the scripted delay, idle after the hold
    runner.run_until(ms(12_050));
    assert_eq!(all_phases(&runner), vec![NodePhase::Settling; 5]);
    runner.run_until(ms(12_550));
    assert_eq!(all_phases(&runner), vec![NodePhase::Idle; 5]);

    // Still pending on the next poll: a new cycle starts
    runner.run_until(ms(15_050));
    assert_eq!(all_phases(&runner), vec![NodePhase::Voting; 5]);
    assert_eq!(
        runner.phases_of(&node_id(1)),
        vec![
            NodePhase::Voting,
            NodePhase::Settling,
            NodePhase::Idle,
            NodePhase::Voting
        ]
    );
}

#[test]
fn test_empty_pending_mid_cycle_resets_every_node() {
    let mut runner = runner(ms(4800));
    runner.ledger_mut().set_pending(["h1"]);

    // Voting at 5.05s, settling at 9.85s, idle hold would end at 10.35s
    runner.run_until(ms(9900));
    assert_eq!(all_phases(&runner), vec![NodePhase::Settling; 5]);
    let idle_timer = TimerId::NodeIdle {
        node_id: node_id(1),
        cycle: 1,
    };
    assert!(runner.timer_armed(&idle_timer));

    runner.ledger_mut().confirm_pending();
    runner.run_until(ms(10_050));

    assert_eq!(all_phases(&runner), vec![NodePhase::Idle; 5]);
    assert!(!runner.timer_armed(&idle_timer));
    assert!(runner.stats().timers_cancelled >= 5);
    assert_eq!(last_statuses(&runner), vec!["Ready"; 5]);
}

#[test]
fn test_phase_changes_are_forward_steps() {
    let mut runner = runner_with(Box::new(RandomDelaySource::new(42, ms(1000), ms(4000))));
    runner.ledger_mut().set_pending(["h1", "h2"]);

    runner.run_until(Duration::from_secs(60));

    assert!(!runner.phase_log().is_empty());
    for change in runner.phase_log() {
        assert!(
            change.from.can_advance_to(change.to),
            "illegal step {:?} -> {:?} for {} at {:?}",
            change.from,
            change.to,
            change.node_id,
            change.at
        );
    }
}

#[test]
fn test_same_seed_same_animation() {
    let run = |seed| {
        let mut runner = runner_with(Box::new(RandomDelaySource::new(seed, ms(1000), ms(4000))));
        runner.ledger_mut().set_pending(["h1"]);
        runner.run_until(Duration::from_secs(45));
        runner.phase_log().to_vec()
    };

    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn test_failed_pending_poll_leaves_animation() {
    // Voting from 5.05s until 14.05s
    let mut runner = runner(ms(9000));
    runner.ledger_mut().set_pending(["h1"]);
    runner.run_until(ms(6000));
    assert_eq!(all_phases(&runner), vec![NodePhase::Voting; 5]);

    runner.ledger_mut().confirm_pending();
    runner.ledger_mut().fail_next(
        "get_pending_transactions",
        RemoteError::Transport("refused".into()),
        1,
    );
    runner.run_until(ms(11_000));
    assert_eq!(all_phases(&runner), vec![NodePhase::Voting; 5]);
    assert!(runner.surface().notifications(NotifyLevel::Error).is_empty());
}

#[test]
fn test_round_simulation_plays_labels_without_touching_phases() {
    let mut runner = runner(ms(2000));
    runner.run_until(ms(1000));

    runner.command(Command::SimulateRound {
        transaction_hash: "abcdef0123456789abcdef".into(),
    });
    runner.run_until(ms(1500));
    assert_eq!(
        runner.surface().notifications(NotifyLevel::Info),
        vec!["Simulating consensus round for abcdef0123456789..."]
    );

    let mut seen = Vec::new();
    for step in 1..=6u64 {
        runner.run_until(ms(1000 + step * 1000));
        seen.push(last_statuses(&runner)[0]);
    }

    let mut expected: Vec<&str> = ROUND_STEPS.to_vec();
    expected.push("Ready");
    assert_eq!(seen, expected);
    assert!(runner.phase_log().is_empty());
    assert!(!runner.machine().consensus().round().is_running());
}

#[test]
fn test_second_round_rejected_while_running() {
    let mut runner = runner(ms(2000));
    runner.run_until(ms(100));

    runner.command(Command::SimulateRound {
        transaction_hash: "h1".into(),
    });
    runner.command_after(
        ms(1500),
        Command::SimulateRound {
            transaction_hash: "h2".into(),
        },
    );
    runner.run_until(ms(3000));

    assert_eq!(
        runner.surface().notifications(NotifyLevel::Info).last(),
        Some(&"A consensus round simulation is already running")
    );
    assert_eq!(
        runner.machine().consensus().round().transaction_hash(),
        Some("h1")
    );
}

#[test]
fn test_node_detail_open_and_close() {
    let mut runner = runner(ms(2000));
    runner.run_until(ms(100));

    runner.command(Command::ShowNodeDetail {
        node_id: node_id(1),
    });
    runner.run_until(ms(200));

    let detail = runner.surface().calls().iter().find_map(|c| match c {
        SurfaceCall::Detail { title, fields } => Some((title.clone(), fields.clone())),
        _ => None,
    });
    let (title, fields) = detail.expect("detail shown");
    assert_eq!(title, "FBA Node 1 Details");
    assert!(fields.contains(&("Quorum Slice", "FBA Node 2, FBA Node 3, FBA Node 4".to_string())));
    assert!(fields.contains(&("Consensus Type", "Federated Byzantine Agreement".to_string())));
    assert_eq!(runner.view().model().detail, Some(node_id(1)));

    runner.command(Command::CloseNodeDetail);
    runner.run_until(ms(300));
    assert_eq!(runner.view().model().detail, None);
    assert_eq!(
        runner
            .surface()
            .count(|c| matches!(c, SurfaceCall::CloseDetail)),
        1
    );
}

#[test]
fn test_unknown_node_detail_is_error() {
    let mut runner = runner(ms(2000));
    runner.run_until(ms(100));

    runner.command(Command::ShowNodeDetail {
        node_id: node_id(42),
    });
    runner.run_until(ms(200));

    assert_eq!(
        runner.surface().notifications(NotifyLevel::Error),
        vec!["Unknown node: node_42"]
    );
}

#[test]
fn test_inspect_confirmed_transfer() {
    let mut runner = runner(ms(2000));
    runner.ledger_mut().script_identity(identity("fbaSender", "s1"));
    runner.ledger_mut().credit("fbaSender", 50.0);
    runner.command(Command::GenerateWallet);
    runner.run_until(ms(100));

    runner.command(Command::SubmitTransfer {
        to: "fbaRecipient".into(),
        amount: "5".into(),
    });
    runner.run_until(ms(200));

    let hash = format!("{:064x}", 1);
    runner.command(Command::InspectTransaction {
        transaction_hash: format!("  {}  ", hash),
    });
    runner.run_until(ms(300));

    let lines = runner
        .surface()
        .calls()
        .iter()
        .find_map(|c| match c {
            SurfaceCall::Consensus(lines) => Some(lines.clone()),
            _ => None,
        })
        .expect("consensus rendered");
    assert_eq!(lines[0], format!("Transaction: {}", hash));
    assert!(lines[1].starts_with("Result: "));
    assert_eq!(lines.len(), 2 + 5);
}

#[test]
fn test_inspect_unknown_transaction() {
    let mut runner = runner(ms(2000));

    runner.command(Command::InspectTransaction {
        transaction_hash: "feed".into(),
    });
    runner.command(Command::InspectTransaction {
        transaction_hash: "   ".into(),
    });
    runner.run_until(ms(200));

    assert_eq!(runner.ledger().calls("get_consensus_status"), 1);
    assert_eq!(
        runner.surface().notifications(NotifyLevel::Error),
        vec![
            "Please enter a transaction hash",
            "Error fetching consensus status: Transaction not found"
        ]
    );
}
