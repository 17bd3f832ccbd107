//! Interactive terminal dialogue: login, then the menu loop until quit.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    command::{AccountAction, AccountCommand, AccountCommandError},
    directory::{Directory, DirectoryError, UserId},
};
use menu::{MENU, MenuChoice};

pub mod menu;

/// Soft failures: reported to the user, the session keeps going.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    CommandErr(#[from] AccountCommandError),
    #[error(transparent)]
    DirectoryErr(#[from] DirectoryError),
    #[error("Invalid option. Please try again.")]
    InvalidChoice(String),
}

#[derive(Debug, PartialEq, Eq)]
enum SessionState {
    Unauthenticated,
    Authenticated(UserId),
    Terminated,
}

pub struct Session<'a, R, W: 'a, D> {
    pub input: R,
    pub output: &'a mut W,
    pub directory: &'a mut D,
}

impl<'a, R, W, D> Session<'a, R, W, D>
where
    R: BufRead,
    W: Write + 'a,
    D: Directory,
{
    pub fn run(mut self) -> Result<()> {
        writeln!(self.output, "Welcome to the ATM")?;
        let mut state = SessionState::Unauthenticated;
        loop {
            state = match state {
                SessionState::Unauthenticated => self.login()?,
                SessionState::Authenticated(user_id) => self.serve(user_id)?,
                SessionState::Terminated => break,
            };
        }
        self.output.flush().context("Failed to flush output")
    }

    fn login(&mut self) -> Result<SessionState> {
        let user_id = self.prompt("Enter User ID: ")?;
        let pin = self.prompt("Enter PIN: ")?;
        match self.directory.authenticate(&user_id, &pin) {
            Ok(acc) => Ok(SessionState::Authenticated(acc.id().to_owned())),
            Err(err) => {
                // unknown id and wrong pin look the same from the outside
                info!("login failed: {err}");
                writeln!(self.output, "Invalid credentials. Please try again.")?;
                Ok(SessionState::Unauthenticated)
            }
        }
    }

    fn serve(&mut self, user_id: UserId) -> Result<SessionState> {
        writeln!(self.output, "{MENU}")?;
        let input = self.prompt("Choose an option: ")?;
        let outcome = match MenuChoice::parse(&input) {
            Ok(MenuChoice::Quit) => {
                info!(user_id = %user_id, "session ended");
                writeln!(self.output, "Thank you for using the ATM. Goodbye!")?;
                return Ok(SessionState::Terminated);
            }
            Ok(MenuChoice::History) => {
                self.print_history(&user_id)?;
                Ok(())
            }
            Ok(MenuChoice::Withdraw) => {
                let amount = self.prompt("Enter amount to withdraw: ")?;
                self.execute(&user_id, AccountAction::Withdraw, None, &amount)
            }
            Ok(MenuChoice::Deposit) => {
                let amount = self.prompt("Enter amount to deposit: ")?;
                self.execute(&user_id, AccountAction::Deposit, None, &amount)
            }
            Ok(MenuChoice::Transfer) => {
                let recipient = self.prompt("Enter recipient User ID: ")?;
                let amount = self.prompt("Enter amount to transfer: ")?;
                self.execute(&user_id, AccountAction::Transfer, Some(&recipient), &amount)
            }
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            self.report(err)?;
        }
        Ok(SessionState::Authenticated(user_id))
    }

    fn execute(
        &mut self,
        user_id: &str,
        action: AccountAction,
        recipient: Option<&str>,
        amount: &str,
    ) -> Result<(), SessionError> {
        let command = AccountCommand::parse_command(action, recipient, amount)?;
        debug!(
            user_id,
            action = ?command.action(),
            amount = %command.amount(),
            "executing command"
        );
        self.directory.execute(user_id, command)?;
        Ok(())
    }

    fn print_history(&mut self, user_id: &str) -> Result<()> {
        let acc = self.directory.lookup(user_id)?;
        writeln!(self.output, "Transaction History:")?;
        for entry in acc.history() {
            writeln!(self.output, "{entry}")?;
        }
        Ok(())
    }

    fn report(&mut self, err: SessionError) -> Result<()> {
        let message = match &err {
            SessionError::DirectoryErr(DirectoryError::NotFound(_)) => {
                "Recipient not found.".to_string()
            }
            SessionError::CommandErr(_) => format!("{err}. Please try again."),
            _ => err.to_string(),
        };
        info!("rejected: {err}");
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Writes `label` without a newline and reads one line of input.
    /// Running out of input before the session is over is a hard error.
    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed before the session ended");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }
}
