use thiserror::Error;

use std::str::FromStr;

/// Error returned for input that names no command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid command: '{0}'")]
pub struct UnknownCommand(pub String);

/// Commands understood by the interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Mine,
    Append,
    Remove,
    Check,
    Users,
    Balance,
    Transactions,
    Blocks,
    Help,
    Quit,
}

impl Command {
    /// Every command with a one-line description, in help order
    pub const ALL: [(Command, &'static str); 10] = [
        (Command::Mine, "discovers the nonce for a given transaction"),
        (Command::Append, "appends a new block onto the end of the chain"),
        (Command::Remove, "removes the last block from the end of the chain"),
        (Command::Check, "checks that the block chain is valid"),
        (Command::Users, "prints a list of users"),
        (Command::Balance, "finds a user's balance"),
        (Command::Transactions, "prints out the chain of transactions"),
        (Command::Blocks, "prints out the chain of blocks (for debugging only)"),
        (Command::Help, "prints this list of commands"),
        (Command::Quit, "quits the program"),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Mine => "mine",
            Command::Append => "append",
            Command::Remove => "remove",
            Command::Check => "check",
            Command::Users => "users",
            Command::Balance => "balance",
            Command::Transactions => "transactions",
            Command::Blocks => "blocks",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();

        Command::ALL
            .iter()
            .map(|(command, _)| *command)
            .find(|command| command.name() == name)
            .ok_or_else(|| UnknownCommand(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("mine".parse::<Command>(), Ok(Command::Mine));
        assert_eq!("  BALANCE ".parse::<Command>(), Ok(Command::Balance));
        assert_eq!("Quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_every_command_round_trips_by_name() {
        for (command, _) in Command::ALL {
            assert_eq!(command.name().parse::<Command>(), Ok(command));
        }
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            "fly".parse::<Command>(),
            Err(UnknownCommand("fly".to_string()))
        );
        assert!("".parse::<Command>().is_err());
    }
}
