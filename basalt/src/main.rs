//! Basalt server entry point.

use basalt::BasaltServer;
use basalt_core::config::BASALT_CONFIG;

fn main() -> anyhow::Result<()> {
    basalt::logger::init()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let server = BasaltServer::new(BASALT_CONFIG.clone());
        server.start();

        tokio::signal::ctrl_c().await?;
        log::info!("shutdown signal received");
        server.stop();
        Ok(())
    })
}
