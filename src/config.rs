use crate::error::AthenaeumError;
use clap::Parser;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Parser)]
pub struct StartArgs {
    #[arg(short, long, default_value = "config.json")]
    pub config_path: String,

    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    #[arg(short, long, default_value = "3030")]
    pub port: u16,

    #[arg(short, long, default_value = "INFO")]
    pub log_level: tracing::Level,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// The portal title for the front end
    pub title: Option<String>,

    /// Directory holding the durable session slot.
    /// Defaults to the working directory.
    pub data_dir: Option<String>,
}

impl Config {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, AthenaeumError> {
        let config = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&config)?)
    }
}
