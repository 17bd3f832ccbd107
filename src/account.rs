use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{command::AccountCommand, directory::UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEventKind {
    Deposited,
    Withdrawn,
    TransferredOut { recipient: UserId },
}

#[derive(Debug, Clone)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

impl AccountEvent {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> &AccountEventKind {
        &self.kind
    }

    /// Human readable history line for this event.
    pub fn describe(&self) -> String {
        let amount = format_amount(self.amount);
        match &self.kind {
            AccountEventKind::Deposited => format!("Deposited: ${amount}"),
            AccountEventKind::Withdrawn => format!("Withdrew: ${amount}"),
            AccountEventKind::TransferredOut { recipient } => {
                format!("Transferred: ${amount} to {recipient}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Insufficient balance.")]
    InsufficientBalance { balance: Decimal, requested: Decimal },
    #[error("Amount must not be negative.")]
    NegativeAmount,
    #[error("Amount is too large.")]
    AmountTooLarge { amount: Decimal },
}

/// Renders an amount the way the history log shows it: normalized, and
/// always with at least one fractional digit (`100` -> `100.0`).
pub fn format_amount(amount: Decimal) -> String {
    let amount = amount.normalize();
    if amount.scale() == 0 {
        format!("{amount}.0")
    } else {
        amount.to_string()
    }
}

#[derive(Debug)]
pub struct Account {
    id: UserId,
    pin: String,
    balance: Decimal,
    history: Vec<String>,
}

impl Account {
    pub fn new(id: impl Into<UserId>, pin: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pin: pin.into(),
            balance: Decimal::zero(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn validate_pin(&self, pin: &str) -> bool {
        self.pin == pin
    }

    pub fn apply(&mut self, event: &AccountEvent) {
        // events come from `handle_command`, which already proved the result fits
        let Some(balance) = self.balance_after(&event.kind, event.amount) else {
            warn!(user_id = %self.id, amount = %event.amount, "event does not fit balance, dropped");
            return;
        };
        self.balance = balance;
        self.history.push(event.describe());
        debug!(
            user_id = %self.id,
            amount = %event.amount,
            balance = %self.balance,
            "applied {:?}",
            event.kind
        );
    }

    /// Validates `command` against the current balance. Nothing is mutated;
    /// the returned event must be passed to [`Account::apply`].
    pub fn handle_command(&self, command: &AccountCommand) -> Result<AccountEvent, AccountError> {
        let amount = command.amount();
        if amount < Decimal::zero() {
            return Err(AccountError::NegativeAmount);
        }

        let kind = match command {
            AccountCommand::Deposit { .. } => AccountEventKind::Deposited,
            AccountCommand::Withdraw { .. } => {
                self.ensure_covered(amount)?;
                AccountEventKind::Withdrawn
            }
            AccountCommand::Transfer { recipient, .. } => {
                self.ensure_covered(amount)?;
                AccountEventKind::TransferredOut {
                    recipient: recipient.clone(),
                }
            }
        };
        self.ensure_exact(&kind, amount)?;
        Ok(AccountEvent { amount, kind })
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        let evt = self.handle_command(&AccountCommand::Deposit { amount })?;
        self.apply(&evt);
        Ok(evt)
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        let evt = self.handle_command(&AccountCommand::Withdraw { amount })?;
        self.apply(&evt);
        Ok(evt)
    }

    /// Moves `amount` to `recipient`. The recipient logs a plain deposit,
    /// only the sender logs the transfer. Either both sides change or neither.
    pub fn transfer(
        &mut self,
        recipient: &mut Account,
        amount: Decimal,
    ) -> Result<AccountEvent, AccountError> {
        let evt = self.handle_command(&AccountCommand::Transfer {
            recipient: recipient.id.clone(),
            amount,
        })?;
        recipient.deposit(amount)?;
        self.apply(&evt);
        Ok(evt)
    }

    fn balance_after(&self, kind: &AccountEventKind, amount: Decimal) -> Option<Decimal> {
        match kind {
            AccountEventKind::Deposited => self.balance.checked_add(amount),
            AccountEventKind::Withdrawn | AccountEventKind::TransferredOut { .. } => {
                self.balance.checked_sub(amount)
            }
        }
    }

    /// Rejects amounts that overflow the balance or would be rounded away
    /// by the 28 digit precision of [`Decimal`].
    fn ensure_exact(&self, kind: &AccountEventKind, amount: Decimal) -> Result<(), AccountError> {
        let exact = self
            .balance_after(kind, amount)
            .is_some_and(|balance| (balance - self.balance).abs() == amount);
        if exact {
            Ok(())
        } else {
            debug!(user_id = %self.id, %amount, balance = %self.balance, "amount too large");
            Err(AccountError::AmountTooLarge { amount })
        }
    }

    fn ensure_covered(&self, amount: Decimal) -> Result<(), AccountError> {
        if amount <= self.balance {
            Ok(())
        } else {
            debug!(user_id = %self.id, %amount, balance = %self.balance, "insufficient balance");
            Err(AccountError::InsufficientBalance {
                balance: self.balance,
                requested: amount,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::prelude::FromPrimitive;

    use super::*;

    fn dec(value: u32) -> Decimal {
        Decimal::from_u32(value).unwrap()
    }

    #[test]
    fn format_amounts() {
        assert_eq!(format_amount(dec(100)), "100.0");
        assert_eq!(format_amount(Decimal::new(4050, 2)), "40.5");
        assert_eq!(format_amount(Decimal::new(1, 2)), "0.01");
        assert_eq!(format_amount(Decimal::zero()), "0.0");
        assert_eq!(
            format_amount(Decimal::from_str("10000000000000000000000000000").unwrap()),
            "10000000000000000000000000000.0"
        );
    }

    #[test]
    fn validate_pin() {
        let acc = Account::new("user1", "1234");
        assert!(acc.validate_pin("1234"));
        assert!(!acc.validate_pin("4321"));
        assert!(!acc.validate_pin(""));
    }

    #[test]
    fn deposit_and_withdraw() {
        let mut acc = Account::new("user1", "1234");
        acc.deposit(dec(100)).unwrap();
        assert_eq!(acc.balance(), dec(100));
        assert_eq!(acc.history(), ["Deposited: $100.0"]);

        let err = acc.withdraw(dec(150)).unwrap_err();
        assert!(matches!(err, AccountError::InsufficientBalance { .. }));
        assert_eq!(err.to_string(), "Insufficient balance.");
        assert_eq!(acc.balance(), dec(100));
        assert_eq!(acc.history().len(), 1);

        acc.withdraw(dec(40)).unwrap();
        assert_eq!(acc.balance(), dec(60));
        assert_eq!(acc.history(), ["Deposited: $100.0", "Withdrew: $40.0"]);

        // whole balance can be taken out
        acc.withdraw(dec(60)).unwrap();
        assert_eq!(acc.balance(), Decimal::zero());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut acc = Account::new("user1", "1234");
        let err = acc.deposit(Decimal::from_i32(-10).unwrap()).unwrap_err();
        assert!(matches!(err, AccountError::NegativeAmount));
        let err = acc.withdraw(Decimal::from_i32(-10).unwrap()).unwrap_err();
        assert!(matches!(err, AccountError::NegativeAmount));
        assert_eq!(acc.balance(), Decimal::zero());
        assert!(acc.history().is_empty());
    }

    #[test]
    fn zero_deposit_is_logged() {
        let mut acc = Account::new("user1", "1234");
        acc.deposit(Decimal::zero()).unwrap();
        assert_eq!(acc.history(), ["Deposited: $0.0"]);
    }

    #[test]
    fn transfer_conserves_total() {
        let mut sender = Account::new("user1", "1234");
        let mut recipient = Account::new("user2", "5678");
        sender.deposit(dec(100)).unwrap();
        recipient.deposit(dec(5)).unwrap();

        sender.transfer(&mut recipient, dec(60)).unwrap();
        assert_eq!(sender.balance(), dec(40));
        assert_eq!(recipient.balance(), dec(65));
        assert_eq!(sender.balance() + recipient.balance(), dec(105));
        assert_eq!(
            sender.history().last().map(String::as_str),
            Some("Transferred: $60.0 to user2")
        );
        assert_eq!(
            recipient.history().last().map(String::as_str),
            Some("Deposited: $60.0")
        );

        let err = sender.transfer(&mut recipient, dec(41)).unwrap_err();
        assert!(matches!(err, AccountError::InsufficientBalance { .. }));
        assert_eq!(sender.balance(), dec(40));
        assert_eq!(recipient.balance(), dec(65));
        assert_eq!(sender.history().len(), 2);
        assert_eq!(recipient.history().len(), 2);
    }

    #[test]
    fn overflowing_deposit_is_rejected() {
        let mut acc = Account::new("user1", "1234");
        acc.deposit(Decimal::MAX).unwrap();

        let err = acc.deposit(dec(1)).unwrap_err();
        assert!(matches!(err, AccountError::AmountTooLarge { .. }));
        assert_eq!(err.to_string(), "Amount is too large.");
        assert_eq!(acc.balance(), Decimal::MAX);
        assert_eq!(acc.history().len(), 1);
    }

    #[test]
    fn amounts_lost_to_rounding_are_rejected() {
        let mut acc = Account::new("user1", "1234");
        let big = Decimal::from_str("10000000000000000000000000000").unwrap();
        acc.deposit(big).unwrap();

        let err = acc.deposit(Decimal::new(1, 1)).unwrap_err();
        assert!(matches!(err, AccountError::AmountTooLarge { .. }));
        let err = acc.withdraw(Decimal::new(1, 1)).unwrap_err();
        assert!(matches!(err, AccountError::AmountTooLarge { .. }));
        assert_eq!(acc.balance(), big);
        assert_eq!(acc.history().len(), 1);

        // whole units still fit
        acc.withdraw(dec(1)).unwrap();
        assert_eq!(acc.balance(), big - dec(1));
    }

    #[test]
    fn transfer_rejected_when_recipient_overflows() {
        let mut sender = Account::new("user1", "1234");
        let mut recipient = Account::new("user2", "5678");
        sender.deposit(dec(10)).unwrap();
        recipient.deposit(Decimal::MAX).unwrap();

        let err = sender.transfer(&mut recipient, dec(10)).unwrap_err();
        assert!(matches!(err, AccountError::AmountTooLarge { .. }));
        assert_eq!(sender.balance(), dec(10));
        assert_eq!(recipient.balance(), Decimal::MAX);
        assert_eq!(sender.history().len(), 1);
        assert_eq!(recipient.history().len(), 1);
    }

    #[test]
    fn handle_command_does_not_mutate() {
        let acc = Account::new("user1", "1234");
        let evt = acc
            .handle_command(&AccountCommand::Deposit { amount: dec(7) })
            .unwrap();
        assert_eq!(evt.amount(), dec(7));
        assert_eq!(evt.kind(), &AccountEventKind::Deposited);
        assert_eq!(acc.balance(), Decimal::zero());
        assert!(acc.history().is_empty());
    }
}
