use thiserror::Error;

use crate::{
    account::{Account, AccountError, AccountEvent},
    command::AccountCommand,
};

pub mod in_memory_directory;

pub type UserId = String;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User `{0}` is already registered")]
    DuplicateUser(UserId),
    #[error("User `{0}` not found")]
    NotFound(UserId),
    #[error("Invalid credentials for `{0}`")]
    InvalidCredential(UserId),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
}

pub trait Directory {
    /// Adds a zero balance account. Ids are never overwritten.
    fn register(&mut self, user_id: &str, pin: &str) -> Result<(), DirectoryError>;

    fn authenticate(&self, user_id: &str, pin: &str) -> Result<&Account, DirectoryError>;

    /// Finds an account by id alone, e.g. a transfer recipient.
    fn lookup(&self, user_id: &str) -> Result<&Account, DirectoryError>;

    /// Runs `command` on behalf of `user_id` and returns the event recorded
    /// on that user's account.
    fn execute(
        &mut self,
        user_id: &str,
        command: AccountCommand,
    ) -> Result<AccountEvent, DirectoryError>;
}
