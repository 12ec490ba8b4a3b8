use anyhow::Context;
use loaddev_config::LoadDevConfig;
use loaddev_server::GatewayState;

use crate::cli::GatewayArgs;

/// Handle `loaddev gateway`.
pub async fn handle(args: &GatewayArgs, config: &LoadDevConfig) -> anyhow::Result<()> {
    let mut gateway = config.gateway.clone();
    if let Some(port) = args.port {
        gateway.port = port;
    }
    for route in &gateway.routes {
        tracing::debug!(prefix = %route.prefix, upstream = %route.upstream, "route");
    }

    let state = GatewayState::new(&gateway)?;
    loaddev_server::serve_gateway(state, &gateway)
        .await
        .with_context(|| format!("gateway failed on {}", gateway.bind_address()))
}
