use loaddev_config::LoadDevConfig;

/// Handle `loaddev config`.
pub fn handle(config: &LoadDevConfig) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&config.masked())?);
    Ok(())
}
