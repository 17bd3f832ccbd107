use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use csv::Trim;
use serde::Deserialize;

/// Credentials of an account registered at startup.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SeedAccount {
    pub id: String,
    pub pin: String,
}

impl SeedAccount {
    pub fn new(id: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pin: pin.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AtmConfig {
    pub seeds: Vec<SeedAccount>,
}

impl Default for AtmConfig {
    fn default() -> Self {
        Self {
            seeds: vec![
                SeedAccount::new("user1", "1234"),
                SeedAccount::new("user2", "5678"),
            ],
        }
    }
}

impl AtmConfig {
    /// Reads seed accounts from CSV with an `id,pin` header.
    pub fn from_csv<R>(source: R) -> Result<Self>
    where
        R: Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(source);

        let mut seeds = Vec::new();
        for row in reader.deserialize() {
            let seed: SeedAccount = row.context("Malformed seed account row")?;
            seeds.push(seed);
        }
        Ok(Self { seeds })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open `{}`", path.display()))?;
        Self::from_csv(file).with_context(|| format!("Failed to load seeds from `{}`", path.display()))
    }
}
