use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::directory::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    Deposit,
    Withdraw,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCommand {
    Deposit { amount: Decimal },
    Withdraw { amount: Decimal },
    Transfer { recipient: UserId, amount: Decimal },
}

#[derive(Debug, Error)]
pub enum AccountCommandError {
    #[error("Amount is required for {action:?}")]
    AmountRequired { action: AccountAction },
    #[error("`{input}` is not a valid amount for {action:?}")]
    InvalidAmount { action: AccountAction, input: String },
    #[error("Recipient is required for transfer")]
    RecipientRequired,
}

impl AccountCommand {
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Deposit { amount }
            | Self::Withdraw { amount }
            | Self::Transfer { amount, .. } => *amount,
        }
    }

    pub fn action(&self) -> AccountAction {
        match self {
            Self::Deposit { .. } => AccountAction::Deposit,
            Self::Withdraw { .. } => AccountAction::Withdraw,
            Self::Transfer { .. } => AccountAction::Transfer,
        }
    }

    /// Builds a command from raw terminal input.
    ///
    /// `recipient` is only consulted for [`AccountAction::Transfer`].
    /// Sign checks are left to the account, which owns the balance invariant.
    pub fn parse_command(
        action: AccountAction,
        recipient: Option<&str>,
        amount: &str,
    ) -> Result<Self, AccountCommandError> {
        let amount = Self::parse_amount(action, amount)?;
        match action {
            AccountAction::Deposit => Ok(Self::Deposit { amount }),
            AccountAction::Withdraw => Ok(Self::Withdraw { amount }),
            AccountAction::Transfer => {
                let recipient = recipient
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .ok_or(AccountCommandError::RecipientRequired)?;
                Ok(Self::Transfer {
                    recipient: recipient.to_owned(),
                    amount,
                })
            }
        }
    }

    fn parse_amount(action: AccountAction, input: &str) -> Result<Decimal, AccountCommandError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AccountCommandError::AmountRequired { action });
        }
        Decimal::from_str(input).map_err(|_| AccountCommandError::InvalidAmount {
            action,
            input: input.to_owned(),
        })
    }
}
