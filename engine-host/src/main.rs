//! Arcade host binary
//!
//! Main entry point for the arcade shell.

use anyhow::Result;
use tracing::{error, info};

use engine_host::{registry_init, Config, Host};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse and validate configuration before logging is up
    let config = Config::load()?;
    config.validate()?;

    tracing_subscriber::fmt().with_max_level(config.level()?).init();

    registry_init::initialize_registry();

    let mut host = Host::new(&config)?;
    info!(
        "Arcade started on {} at {} fps",
        host.current().unwrap_or("nothing"),
        config.fps
    );

    let frames = host
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl+c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("Arcade stopped after {} frames", frames);
    Ok(())
}
