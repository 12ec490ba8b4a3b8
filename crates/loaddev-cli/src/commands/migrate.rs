use anyhow::Context;
use loaddev_config::LoadDevConfig;
use loaddev_db::LoadDevDb;

/// Handle `loaddev migrate`. Opening the database applies pending migrations.
pub async fn handle(config: &LoadDevConfig) -> anyhow::Result<()> {
    let target = if config.database.is_remote() {
        config.database.url.clone()
    } else {
        config.database.path.clone()
    };
    LoadDevDb::from_config(&config.database)
        .await
        .with_context(|| format!("failed to migrate {target}"))?;
    println!("migrations applied to {target}");
    Ok(())
}
