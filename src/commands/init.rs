//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::EventStore;
use std::path::PathBuf;
use tracing::info;

/// Initialize quakewatch configuration and database
pub async fn cmd_init(base_dir: Option<PathBuf>, force: bool) -> Result<Config> {
    let mut config = Config::default();

    let base = base_dir.unwrap_or_else(Config::default_base_dir);
    config.paths.base_dir = base.clone();
    config.paths.config_file = base.join("config.toml");
    config.paths.db_file = base.join("earthquakes.db");

    if config.paths.config_file.exists() && !force {
        return Err(Error::Config(format!(
            "Already initialized at {} (use --force to overwrite)",
            config.paths.base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config.paths.base_dir)?;

    config.validate()?;
    config.save()?;
    info!("Created config at {:?}", config.paths.config_file);

    // Opening the store creates the schema
    EventStore::connect(&config).await?;
    info!("Created database at {:?}", config.paths.db_file);

    Ok(config)
}
