use crate::config::Config;
use crate::db::Store;

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    // Connecting runs every pending migration.
    Store::with_pool_options(&config.general.database_path, 1, 1).await?;
    println!("Migrations applied to {}", config.general.database_path);
    Ok(())
}
