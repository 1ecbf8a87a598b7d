use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::mysql::MySqlPoolOptions;

use crate::config::Config;
use crate::store::mysql::MySqlStore;

pub async fn init_db(config: &Config) -> Result<MySqlStore> {
    let command_timeout = Duration::from_secs(config.db_command_timeout_secs);

    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(command_timeout)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(MySqlStore::new(pool, command_timeout))
}
