use std::sync::Arc;

use wwwworker::config::Config;
use wwwworker::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = match std::env::var("CONFIG") {
        Ok(path) => Config::from_file(&path)?,
        Err(_) => Config::load(),
    };

    tracing::info!(
        document_root = %cfg.site.document_root.display(),
        server = %cfg.site.server_name,
        "Configuration loaded"
    );

    let site = Arc::new(cfg.site);

    tokio::select! {
        res = server::listener::run(&cfg.listen_addr, site) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
