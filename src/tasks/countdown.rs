// src/tasks/countdown.rs
// Tick source for timed games: one message per interval until the budget runs out

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

/// Receiving end of a running countdown. Dropping it stops the task.
pub struct Countdown {
    rx: mpsc::Receiver<u32>,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Next tick number (1-based), or `None` once the countdown has finished
    /// or been stopped.
    pub async fn next_tick(&mut self) -> Option<u32> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn a countdown emitting `ticks` ticks, `interval` apart. The first tick
/// arrives one full interval after spawning.
pub fn spawn_countdown(interval: Duration, ticks: u32) -> Countdown {
    let (tx, rx) = mpsc::channel(ticks.max(1) as usize);

    let handle = tokio::spawn(async move {
        debug!("Countdown started ({} ticks every {:?})", ticks, interval);

        let mut interval_timer = time::interval_at(time::Instant::now() + interval, interval);
        interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        for tick in 1..=ticks {
            interval_timer.tick().await;
            if tx.send(tick).await.is_err() {
                debug!("Countdown receiver gone at tick {}", tick);
                return;
            }
        }
        debug!("Countdown finished");
    });

    Countdown { rx, handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_emits_budget_then_closes() {
        let start = time::Instant::now();
        let mut countdown = spawn_countdown(Duration::from_secs(1), 3);

        assert_eq!(countdown.next_tick().await, Some(1));
        assert_eq!(countdown.next_tick().await, Some(2));
        assert_eq!(countdown.next_tick().await, Some(3));
        assert_eq!(countdown.next_tick().await, None);
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_interval() {
        let start = time::Instant::now();
        let mut countdown = spawn_countdown(Duration::from_secs(1), 60);

        assert_eq!(countdown.next_tick().await, Some(1));
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_stream() {
        let mut countdown = spawn_countdown(Duration::from_secs(1), 60);
        assert_eq!(countdown.next_tick().await, Some(1));

        countdown.stop();
        // Buffered ticks may still drain, but the stream must end.
        let mut drained = 0;
        while countdown.next_tick().await.is_some() {
            drained += 1;
        }
        assert!(drained < 59);
    }
}
