use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::SiteConfig;
use crate::http::connection::Connection;

pub async fn run(listen_addr: &str, site: Arc<SiteConfig>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!("Listening on {}", listen_addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let site = Arc::clone(&site);
        tokio::spawn(async move {
            let conn = Connection::new(socket, site);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
