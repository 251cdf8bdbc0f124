use std::sync::Arc;

use anyhow::Context;
use voxql_config::VoxConfig;

use crate::cli::commands::ServeArgs;
use crate::context;

/// Handle `voxql serve`.
pub async fn handle(args: &ServeArgs, mut config: VoxConfig) -> anyhow::Result<()> {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let pipeline = Arc::new(context::pipeline(&config)?);
    voxql_server::serve(&config.server, pipeline)
        .await
        .with_context(|| format!("server on {} stopped", config.server.bind_address()))
}
