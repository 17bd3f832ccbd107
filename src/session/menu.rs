use super::SessionError;

pub const MENU: &str = "\
1. Transaction History
2. Withdraw
3. Deposit
4. Transfer
5. Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    History,
    Withdraw,
    Deposit,
    Transfer,
    Quit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Result<Self, SessionError> {
        match input.trim().parse::<i64>() {
            Ok(1) => Ok(Self::History),
            Ok(2) => Ok(Self::Withdraw),
            Ok(3) => Ok(Self::Deposit),
            Ok(4) => Ok(Self::Transfer),
            Ok(5) => Ok(Self::Quit),
            _ => Err(SessionError::InvalidChoice(input.trim().to_owned())),
        }
    }
}
