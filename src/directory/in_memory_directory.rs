use std::collections::{HashMap, hash_map::Entry};

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    account::{Account, AccountEvent},
    command::AccountCommand,
    config::AtmConfig,
};

use super::{Directory, DirectoryError, UserId};

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    accounts: HashMap<UserId, Account>,
}

impl InMemoryDirectory {
    pub fn from_config(config: &AtmConfig) -> Result<Self, DirectoryError> {
        let mut directory = Self::default();
        for seed in &config.seeds {
            directory.register(&seed.id, &seed.pin)?;
        }
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn account_mut(&mut self, user_id: &str) -> Result<&mut Account, DirectoryError> {
        self.accounts
            .get_mut(user_id)
            .ok_or_else(|| DirectoryError::NotFound(user_id.to_owned()))
    }

    /// Balance stays the same; the deposit is logged before the transfer.
    fn transfer_to_self(
        &mut self,
        user_id: &str,
        amount: Decimal,
    ) -> Result<AccountEvent, DirectoryError> {
        let acc = self.account_mut(user_id)?;
        let evt = acc.handle_command(&AccountCommand::Transfer {
            recipient: user_id.to_owned(),
            amount,
        })?;
        acc.deposit(amount)?;
        acc.apply(&evt);
        Ok(evt)
    }
}

impl Directory for InMemoryDirectory {
    fn register(&mut self, user_id: &str, pin: &str) -> Result<(), DirectoryError> {
        match self.accounts.entry(user_id.to_owned()) {
            Entry::Occupied(_) => Err(DirectoryError::DuplicateUser(user_id.to_owned())),
            Entry::Vacant(entry) => {
                entry.insert(Account::new(user_id, pin));
                info!(user_id, "registered account");
                Ok(())
            }
        }
    }

    fn authenticate(&self, user_id: &str, pin: &str) -> Result<&Account, DirectoryError> {
        let acc = self.lookup(user_id)?;
        if acc.validate_pin(pin) {
            info!(user_id, "user authenticated");
            Ok(acc)
        } else {
            debug!(user_id, "pin mismatch");
            Err(DirectoryError::InvalidCredential(user_id.to_owned()))
        }
    }

    fn lookup(&self, user_id: &str) -> Result<&Account, DirectoryError> {
        self.accounts.get(user_id).ok_or_else(|| {
            debug!(user_id, "unknown user");
            DirectoryError::NotFound(user_id.to_owned())
        })
    }

    fn execute(
        &mut self,
        user_id: &str,
        command: AccountCommand,
    ) -> Result<AccountEvent, DirectoryError> {
        match command {
            AccountCommand::Deposit { amount } => Ok(self.account_mut(user_id)?.deposit(amount)?),
            AccountCommand::Withdraw { amount } => {
                Ok(self.account_mut(user_id)?.withdraw(amount)?)
            }
            AccountCommand::Transfer { recipient, amount } => {
                // an unknown recipient wins over any balance problem
                self.lookup(&recipient)?;
                if recipient == user_id {
                    return self.transfer_to_self(user_id, amount);
                }
                let mut payee = self
                    .accounts
                    .remove(&recipient)
                    .ok_or_else(|| DirectoryError::NotFound(recipient.clone()))?;
                let result = self
                    .account_mut(user_id)
                    .and_then(|payer| Ok(payer.transfer(&mut payee, amount)?));
                self.accounts.insert(recipient, payee);
                result
            }
        }
    }
}
