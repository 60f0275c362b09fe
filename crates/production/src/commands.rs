//! Terminal command parsing.
//!
//! Arguments are passed through untouched where the state machine validates
//! them, so `send` with a bad amount is reported the same way as in any other
//! front end.

use fba_core::Command;
use fba_types::NodeId;
use thiserror::Error;

/// Usage text printed by `help`.
pub const HELP: &str = "\
Commands:
  generate              create a new wallet
  import <seed>         import a wallet from a 64-character hex seed
  send <to> <amount>    send coins from the active wallet
  faucet                request test coins
  history               reload the transaction history
  discard               forget the active wallet
  node <id>             show node details
  close                 close the node details
  simulate <hash>       play a consensus round for a transaction
  inspect <hash>        show the recorded votes of a transaction
  help                  show this text
  quit                  exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    Command(Command),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleInput>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let mut arg = || words.next().unwrap_or_default().to_string();

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(ConsoleInput::Help)),
        "quit" | "exit" => return Ok(Some(ConsoleInput::Quit)),

        "generate" => Command::GenerateWallet,
        "import" => Command::ImportWallet { seed: arg() },
        "send" => {
            let to = arg();
            let amount = arg();
            Command::SubmitTransfer { to, amount }
        }
        "faucet" => Command::RequestFaucet,
        "history" => Command::RefreshHistory,
        "discard" => Command::DiscardWallet,
        "node" => {
            let id = arg();
            if id.is_empty() {
                return Err(ParseError::Usage("node <id>"));
            }
            Command::ShowNodeDetail {
                node_id: NodeId::new(id),
            }
        }
        "close" => Command::CloseNodeDetail,
        "simulate" => Command::SimulateRound {
            transaction_hash: arg(),
        },
        "inspect" => Command::InspectTransaction {
            transaction_hash: arg(),
        },
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(ConsoleInput::Command(command)))
}
