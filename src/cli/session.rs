use anyhow::{Context, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use serde::Serialize;

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use super::command::Command;
use crate::blockchain::{Block, Blockchain, Transaction};
use crate::config::OutputFormat;

/// Whether the session keeps reading commands
enum Flow {
    Continue,
    Quit,
}

/// A line-oriented session driving one chain
///
/// Core failures are reported to the user and never end the session; only
/// `quit` or the end of input does.
pub struct Session<R, W> {
    chain: Blockchain,
    rng: StdRng,
    format: OutputFormat,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a new session
    ///
    /// # Arguments
    ///
    /// * `chain` - The chain the commands operate on
    /// * `rng` - Source of nonces for the `mine` command
    /// * `format` - Rendering for `blocks` and `transactions`
    /// * `input` - Where commands are read from
    /// * `output` - Where results are written to
    pub fn new(chain: Blockchain, rng: StdRng, format: OutputFormat, input: R, output: W) -> Self {
        Session {
            chain,
            rng,
            format,
            input,
            output,
        }
    }

    /// Reads and executes commands until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        self.instructions()?;

        loop {
            let Some(line) = self.prompt("\nCommand: ")? else {
                break;
            };

            let flow = match line.parse::<Command>() {
                Ok(command) => {
                    debug!("Executing {}", command.name());
                    self.execute(command)?
                }
                Err(err) => {
                    writeln!(self.output, "{}. Try again.", err)?;
                    Flow::Continue
                }
            };

            if let Flow::Quit = flow {
                break;
            }
        }

        writeln!(self.output, "\nGoodbye")?;
        self.output.flush().context("failed to flush output")?;
        info!("Session ended with {} blocks", self.chain.size());

        Ok(())
    }

    fn instructions(&mut self) -> Result<()> {
        writeln!(self.output, "Valid commands:")?;
        for (command, description) in Command::ALL {
            writeln!(self.output, "  {}: {}", command.name(), description)?;
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Mine => self.mine(),
            Command::Append => self.append(),
            Command::Remove => {
                if self.chain.remove_last() {
                    writeln!(self.output, "Removed last element.")?;
                } else {
                    writeln!(self.output, "Could not remove last element.")?;
                }
                Ok(Flow::Continue)
            }
            Command::Check => {
                match self.chain.check() {
                    Ok(()) => writeln!(self.output, "Chain checks out.")?,
                    Err(err) => writeln!(self.output, "{}", err)?,
                }
                Ok(Flow::Continue)
            }
            Command::Users => {
                for user in self.chain.users() {
                    writeln!(self.output, "{}", user)?;
                }
                Ok(Flow::Continue)
            }
            Command::Balance => self.balance(),
            Command::Transactions => {
                let transactions: Vec<Transaction> = self.chain.transactions().cloned().collect();
                self.list(&transactions)?;
                Ok(Flow::Continue)
            }
            Command::Blocks => {
                let blocks: Vec<Block> = self.chain.blocks().cloned().collect();
                self.list(&blocks)?;
                Ok(Flow::Continue)
            }
            Command::Help => {
                self.instructions()?;
                Ok(Flow::Continue)
            }
            Command::Quit => Ok(Flow::Quit),
        }
    }

    fn mine(&mut self) -> Result<Flow> {
        let Some(transaction) = self.read_transaction("Source (return for deposit): ")? else {
            return Ok(Flow::Quit);
        };

        let block = self.chain.mine_with_rng(transaction, &mut self.rng);
        writeln!(self.output, "Nonce: {}", block.nonce())?;

        Ok(Flow::Continue)
    }

    fn append(&mut self) -> Result<Flow> {
        let Some(transaction) = self.read_transaction("\nSource: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(nonce) = self.read_number::<i64>("Nonce: ")? else {
            return Ok(Flow::Quit);
        };

        let block = Block::from_nonce(
            self.chain.next_index(),
            transaction,
            self.chain.tail_hash().clone(),
            nonce,
        );

        match self.chain.append(block) {
            Ok(()) => writeln!(self.output, "Appended block {}.", self.chain.size() - 1)?,
            Err(err) => writeln!(self.output, "Could not append: {}", err)?,
        }

        Ok(Flow::Continue)
    }

    fn balance(&mut self) -> Result<Flow> {
        let Some(user) = self.prompt("\nUser: ")? else {
            return Ok(Flow::Quit);
        };

        match self.chain.balance(&user) {
            Ok(balance) => writeln!(self.output, "{}'s balance is {}", user, balance)?,
            Err(err) => writeln!(self.output, "Something wrong in the chain: {}", err)?,
        }

        Ok(Flow::Continue)
    }

    fn list<T: Display + Serialize>(&mut self, items: &[T]) -> Result<()> {
        for item in items {
            match self.format {
                OutputFormat::Text => writeln!(self.output, "{}", item)?,
                OutputFormat::Json => {
                    let json = serde_json::to_string(item).context("failed to encode listing")?;
                    writeln!(self.output, "{}", json)?;
                }
            }
        }
        Ok(())
    }

    fn read_transaction(&mut self, source_prompt: &str) -> Result<Option<Transaction>> {
        let Some(source) = self.prompt(source_prompt)? else {
            return Ok(None);
        };
        let Some(target) = self.prompt("Target: ")? else {
            return Ok(None);
        };
        let Some(amount) = self.read_number::<i32>("Amount: ")? else {
            return Ok(None);
        };

        Ok(Some(Transaction::new(source, target, amount)))
    }

    /// Prompts until the answer parses as a number
    fn read_number<T: FromStr>(&mut self, message: &str) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.prompt(message)? else {
                return Ok(None);
            };

            match answer.parse() {
                Ok(number) => return Ok(Some(number)),
                Err(_) => writeln!(self.output, "'{}' is not a valid number.", answer)?,
            }
        }
    }

    /// Prints `message` and reads one trimmed line, `None` at end of input
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush().context("failed to flush output")?;

        // Bytes that are not UTF-8 are replaced rather than ending the session
        let mut line = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut line)
            .context("failed to read input")?;

        if read == 0 {
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }
}
