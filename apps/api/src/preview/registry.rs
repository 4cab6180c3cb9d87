use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::preview::PreviewShell;
use crate::render::VisualTree;

/// Shortest pause between two idle sweeps.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

struct Session {
    shell: Arc<PreviewShell>,
    last_access: Instant,
}

/// Open preview sessions, keyed by id.
///
/// Sessions nobody has touched for the idle timeout are dropped by the sweep
/// task started with `spawn_eviction`.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, tree: VisualTree) -> (Uuid, Arc<PreviewShell>) {
        let id = Uuid::new_v4();
        let shell = Arc::new(PreviewShell::open(tree));
        self.sessions.write().await.insert(
            id,
            Session {
                shell: shell.clone(),
                last_access: Instant::now(),
            },
        );
        info!("Opened {} preview {id}", shell.kind().as_str());
        (id, shell)
    }

    /// Looks a session up and marks it as used.
    pub async fn get(&self, id: Uuid) -> Option<Arc<PreviewShell>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.last_access = Instant::now();
        Some(session.shell.clone())
    }

    pub async fn close(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Closed preview {id}");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions unused for longer than `idle`. Sessions in the middle of
    /// a download or print are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let fresh = now.duration_since(session.last_access) <= idle;
            let keep = fresh || !session.shell.is_idle();
            if !keep {
                debug!("Evicting idle preview {id}");
            }
            keep
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle preview(s), {} open", sessions.len());
        }
        evicted
    }

    /// Starts the background sweep that evicts sessions idle for `idle`.
    pub fn spawn_eviction(&self, idle: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        let period = (idle / 4).max(MIN_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                registry.evict_idle(idle).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::Resume;
    use crate::render::render_resume;

    fn tree() -> VisualTree {
        render_resume(&Resume::default(), "tech-modern")
    }

    #[tokio::test]
    async fn test_open_get_close() {
        let registry = PreviewRegistry::new();
        let (id, _) = registry.open(tree()).await;

        assert!(registry.get(id).await.is_some());
        assert_eq!(registry.len().await, 1);
        assert!(registry.close(id).await);
        assert!(!registry.close(id).await);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_evicted_and_used_one_kept() {
        let registry = PreviewRegistry::new();
        let idle = Duration::from_secs(30 * 60);
        let (stale, _) = registry.open(tree()).await;
        let (used, _) = registry.open(tree()).await;

        tokio::time::advance(Duration::from_secs(20 * 60)).await;
        assert!(registry.get(used).await.is_some());
        tokio::time::advance(Duration::from_secs(15 * 60)).await;

        assert_eq!(registry.evict_idle(idle).await, 1);
        assert!(registry.get(stale).await.is_none());
        assert!(registry.get(used).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweep_expires_sessions() {
        let registry = PreviewRegistry::new();
        registry.open(tree()).await;
        let sweep = registry.spawn_eviction(Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(registry.len().await, 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(registry.len().await, 0);
        sweep.abort();
    }
}
