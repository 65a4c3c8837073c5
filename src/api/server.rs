use anyhow::{anyhow, bail, Context, Result};
use std::future::Future;
use std::io;
use tokio::task::JoinHandle;
use tracing::info;

/// Wait for either the shutdown signal or the server task to end.
///
/// Returns `Ok` only on shutdown. A server that stops on its own (error,
/// clean exit or panic) is reported as an error so the process exits
/// instead of ticking with no listener.
pub async fn supervise_server<S>(mut server: JoinHandle<io::Result<()>>, shutdown: S) -> Result<()>
where
    S: Future<Output = io::Result<()>>,
{
    tokio::select! {
        result = &mut server => {
            match result {
                Ok(Ok(())) => bail!("Server exited unexpectedly"),
                Ok(Err(e)) => Err(anyhow!(e).context("Server error")),
                Err(e) => Err(anyhow!(e).context("Server task failed")),
            }
        }
        signal = shutdown => {
            server.abort();
            signal.context("Failed to listen for shutdown signal")?;
            info!("Shutdown signal received");
            Ok(())
        }
    }
}
