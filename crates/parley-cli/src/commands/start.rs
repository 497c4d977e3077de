use parley_config::ParleyConfig;
use parley_runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::builtin;

pub(super) async fn cmd_start(config: ParleyConfig) -> parley_core::Result<()> {
    let skills = builtin::registry(&config)?;
    let runtime = Runtime::from_config(&config, skills)?;

    eprintln!("parley v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   connectors: {}",
        config
            .connectors
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    eprintln!(
        "   parsers:    {}",
        runtime
            .dispatcher()
            .parsers()
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    eprintln!("   skills:     {}", runtime.dispatcher().skills().count());
    eprintln!();

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("received Ctrl-C"),
                Err(e) => warn!(error = %e, "cannot listen for Ctrl-C"),
            }
            shutdown.cancel();
        });
    }

    runtime.run(shutdown).await?;
    info!("parley stopped");
    Ok(())
}
