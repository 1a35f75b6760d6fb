use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::context::AppContext;

/// Handle for the background snapshot refresher.
#[derive(Debug)]
pub struct RefresherHandle {
    join: JoinHandle<()>,
}

impl RefresherHandle {
    /// Stop refreshing. A tick in progress is abandoned at its next await.
    pub fn shutdown(self) {
        self.join.abort();
    }
}

/// Recompute the dashboard snapshot every `every`.
///
/// Each recomputation runs on the blocking pool and is awaited before the next
/// tick, so refreshes never overlap. Late ticks are delayed, not bunched.
pub fn spawn_refresher(ctx: Arc<AppContext>, every: Duration) -> RefresherHandle {
    let every = every.max(Duration::from_secs(1));
    let join = tokio::spawn(async move {
        info!(interval_secs = every.as_secs(), "dashboard refresher started");
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The context already holds a fresh snapshot; skip the immediate tick.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let ctx = Arc::clone(&ctx);
            if let Err(e) = tokio::task::spawn_blocking(move || ctx.refresh()).await {
                warn!(error = %e, "dashboard refresh failed");
            }
        }
    });
    RefresherHandle { join }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[tokio::test]
    async fn refresher_replaces_the_snapshot_each_tick() {
        let ctx = Arc::new(testing::context());
        let before = ctx.latest().generated_at;

        let handle = spawn_refresher(Arc::clone(&ctx), Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1_600)).await;
        handle.shutdown();

        assert!(ctx.latest().generated_at > before);
    }
}
