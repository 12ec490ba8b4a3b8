use anyhow::Context;
use loaddev_config::LoadDevConfig;
use loaddev_db::service::LoadDevService;
use loaddev_server::AppState;

use crate::cli::ServeArgs;

/// Handle `loaddev serve`.
pub async fn handle(args: &ServeArgs, config: &LoadDevConfig) -> anyhow::Result<()> {
    let mut server = config.server.clone();
    if let Some(port) = args.port {
        server.port = port;
    }

    let service = LoadDevService::from_config(&config.database)
        .await
        .context("failed to open database")?;

    loaddev_server::serve(args.service, AppState::new(service), &server)
        .await
        .with_context(|| format!("{} service failed on {}", args.service, server.bind_address()))
}
