use std::time::Duration;

use tokio::sync::watch;

pub const PROGRESS_DONE: u8 = 100;

/// Timer-driven download progress for UI feedback.
///
/// The values are approximate: they advance on a fixed schedule and say
/// nothing about how far the export actually is.
#[derive(Debug, Clone, Copy)]
pub struct ProgressTicker {
    step: u8,
    interval: Duration,
}

impl Default for ProgressTicker {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(20))
    }
}

impl ProgressTicker {
    pub fn new(step: u8, interval: Duration) -> Self {
        Self {
            step: step.max(1),
            interval,
        }
    }

    /// Publishes 0, step, 2·step, … up to 100, one value per interval.
    pub async fn run(&self, progress: &watch::Sender<u8>) {
        let mut value = 0u8;
        progress.send_replace(value);
        while value < PROGRESS_DONE {
            tokio::time::sleep(self.interval).await;
            value = value.saturating_add(self.step).min(PROGRESS_DONE);
            progress.send_replace(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticker_ends_at_done_after_fixed_schedule() {
        let (tx, rx) = watch::channel(0u8);
        let start = tokio::time::Instant::now();
        ProgressTicker::default().run(&tx).await;
        assert_eq!(*rx.borrow(), PROGRESS_DONE);
        assert!(start.elapsed() >= Duration::from_millis(50 * 20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_uneven_step_is_clamped_to_done() {
        let (tx, rx) = watch::channel(0u8);
        ProgressTicker::new(30, Duration::from_millis(5)).run(&tx).await;
        assert_eq!(*rx.borrow(), PROGRESS_DONE);
    }
}
