//! Termination signal listener.

use std::future::{Future, pending};
use std::io;

use tracing::warn;

/// Resolves with the name of the first termination signal received.
///
/// When the handlers cannot be installed the failure is logged and the
/// future never resolves, leaving the audit to run to completion.
pub async fn termination() -> &'static str {
    settle(listen()).await
}

async fn settle<F>(listener: F) -> &'static str
where
    F: Future<Output = io::Result<&'static str>>,
{
    match listener.await {
        Ok(name) => name,
        Err(error) => {
            warn!(%error, "termination signals unavailable");
            pending().await
        }
    }
}

async fn listen() -> io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|()| "interrupt"),
            _ = terminate.recv() => Ok("terminated"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.map(|()| "interrupt")
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use super::settle;

    #[tokio::test]
    async fn received_signal_is_named() {
        let name = settle(async { Ok("terminated") }).await;

        assert_eq!(name, "terminated");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_install_never_resolves() {
        let listener = settle(async { Err(io::Error::other("no signal driver")) });

        let outcome = tokio::time::timeout(Duration::from_secs(3600), listener).await;

        assert!(outcome.is_err(), "listener should stay pending");
    }
}
