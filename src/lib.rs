/// Account balance and transaction log.
/// State is modified using events, which are created by handling commands
pub mod account;

/// Account commands built from terminal input, later executed by [`account`].
pub mod command;

/// Registry of accounts keyed by user id, plus "in memory" implementation.
///
/// NOTE: the trait is the integration point for anything backed by real
/// storage; the session only talks to the trait.
pub mod directory;

/// Seed accounts registered at startup.
pub mod config;

/// Interactive login and menu loop over any reader/writer pair.
pub mod session;
