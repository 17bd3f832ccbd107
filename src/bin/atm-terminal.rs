use anyhow::Result;
use atm_terminal::{
    config::AtmConfig, directory::in_memory_directory::InMemoryDirectory, session::Session,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // stdout belongs to the dialogue, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AtmConfig::from_path(&path)?,
        None => AtmConfig::default(),
    };
    let mut directory = InMemoryDirectory::from_config(&config)?;

    let session = Session {
        input: std::io::stdin().lock(),
        output: &mut std::io::stdout(),
        directory: &mut directory,
    };
    session.run()
}
