//! Restartable interval timer driving one sensor's ticks.
//!
//! One tokio task per timer. Ticks are delivered to a [`TickHandler`] and
//! are never reentrant; a restart cancels the pending tick and starts a
//! fresh period from the moment the command is processed. Overruns follow
//! `MissedTickBehavior::Delay`: at most one pending tick fires after a
//! slow callback, then the schedule shifts (no backlog buildup).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, trace};

use crate::Scheduler;

/// Receiver of timer ticks.
#[trait_variant::make(TickHandler: Send)]
pub trait LocalTickHandler {
    /// Called once per elapsed period. Never invoked concurrently with
    /// itself; a slow handler delays, but does not overlap, the next tick.
    async fn on_tick(&mut self);
}

enum TimerCommand {
    Restart(Duration),
    Stop,
}

/// Cancellable, restartable periodic trigger.
///
/// Running from construction until [`stop`](IntervalTimer::stop) or drop.
pub struct IntervalTimer {
    interval: Arc<Mutex<Duration>>,
    running: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<TimerCommand>,
    task: Option<JoinHandle<()>>,
}

impl IntervalTimer {
    /// Spawn the timer task; the first tick fires one period from now.
    pub fn spawn<H>(scheduler: &Scheduler, interval: Duration, handler: H) -> Self
    where
        H: TickHandler + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let (tx, rx) = mpsc::unbounded_channel();
        let task = scheduler.spawn(timer_loop(interval, Arc::clone(&running), rx, handler));

        Self {
            interval: Arc::new(Mutex::new(interval)),
            running,
            tx,
            task: Some(task),
        }
    }

    /// Current period, no side effect.
    pub fn interval(&self) -> Duration {
        *self.interval.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether the timer task is still delivering ticks.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Update the period and reschedule: the next tick fires one new
    /// interval after this call, and any tick pending under the old
    /// period is cancelled. Safe to call concurrently with ticks firing.
    pub fn restart(&self, new_interval: Duration) {
        {
            let mut interval = self.interval.lock().unwrap_or_else(|e| e.into_inner());
            *interval = new_interval;
        }
        let _ = self.tx.send(TimerCommand::Restart(new_interval));
    }

    /// Cancel the pending tick; no new tick fires after this returns.
    /// A callback already executing runs to completion.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.tx.send(TimerCommand::Stop);
    }

    /// Stop and wait for the timer task to finish.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = ?e, "timer task panicked");
            }
        }
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn timer_loop<H: TickHandler>(
    initial: Duration,
    running: Arc<AtomicBool>,
    mut rx: mpsc::UnboundedReceiver<TimerCommand>,
    mut handler: H,
) {
    let mut ticker = interval_at(Instant::now() + initial, initial);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    trace!(period_ms = initial.as_millis() as u64, "interval timer started");

    loop {
        // Biased: a restart or stop queued during a callback wins over a
        // tick that became due in the meantime.
        tokio::select! {
            biased;
            cmd = rx.recv() => match cmd {
                Some(TimerCommand::Restart(period)) => {
                    ticker = interval_at(Instant::now() + period, period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    trace!(period_ms = period.as_millis() as u64, "interval timer restarted");
                }
                Some(TimerCommand::Stop) | None => break,
            },
            _ = ticker.tick() => {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                handler.on_tick().await;
            }
        }
    }

    running.store(false, Ordering::SeqCst);
    trace!("interval timer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use tokio::time::sleep;

    struct CountingHandler {
        ticks: Arc<AtomicU32>,
    }

    impl TickHandler for CountingHandler {
        async fn on_tick(&mut self) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Records the offset of each tick from a fixed start, with an
    /// optional per-tick delay to simulate a slow callback.
    struct RecordingHandler {
        start: Instant,
        offsets_ms: Arc<Mutex<Vec<u64>>>,
        in_flight: Arc<AtomicBool>,
        delay: Duration,
    }

    impl TickHandler for RecordingHandler {
        async fn on_tick(&mut self) {
            assert!(
                !self.in_flight.swap(true, Ordering::SeqCst),
                "tick overlapped a running callback"
            );
            self.offsets_ms
                .lock()
                .unwrap()
                .push(self.start.elapsed().as_millis() as u64);
            sleep(self.delay).await;
            self.in_flight.store(false, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period() {
        let scheduler = Scheduler::current().unwrap();
        let ticks = Arc::new(AtomicU32::new(0));
        let timer = IntervalTimer::spawn(
            &scheduler,
            Duration::from_millis(100),
            CountingHandler {
                ticks: Arc::clone(&ticks),
            },
        );

        sleep(Duration::from_millis(350)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        timer.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn restart_cancels_pending_tick() {
        let scheduler = Scheduler::current().unwrap();
        let ticks = Arc::new(AtomicU32::new(0));
        let timer = IntervalTimer::spawn(
            &scheduler,
            Duration::from_millis(500),
            CountingHandler {
                ticks: Arc::clone(&ticks),
            },
        );

        // Two restarts in quick succession: only the second one schedules
        timer.restart(Duration::from_millis(50));
        timer.restart(Duration::from_millis(200));
        assert_eq!(timer.interval(), Duration::from_millis(200));

        sleep(Duration::from_millis(150)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0, "old periods must not fire");

        sleep(Duration::from_millis(100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1, "one tick at the new period");

        timer.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn slow_callback_never_overlaps_and_builds_no_backlog() {
        let scheduler = Scheduler::current().unwrap();
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let handler = RecordingHandler {
            start: Instant::now(),
            offsets_ms: Arc::clone(&offsets),
            in_flight: Arc::new(AtomicBool::new(false)),
            delay: Duration::from_millis(150),
        };
        let timer = IntervalTimer::spawn(&scheduler, Duration::from_millis(100), handler);

        sleep(Duration::from_millis(960)).await;
        timer.shutdown().await;

        // First tick at 100, then one pending tick after each 150ms
        // callback: 100, 250, 400, 550, 700, 850.
        let offsets = offsets.lock().unwrap();
        assert_eq!(*offsets, vec![100, 250, 400, 550, 700, 850]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_deterministic() {
        let scheduler = Scheduler::current().unwrap();
        let ticks = Arc::new(AtomicU32::new(0));
        let timer = IntervalTimer::spawn(
            &scheduler,
            Duration::from_millis(100),
            CountingHandler {
                ticks: Arc::clone(&ticks),
            },
        );

        sleep(Duration::from_millis(250)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        timer.stop();
        assert!(!timer.is_running());

        sleep(Duration::from_millis(500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2, "no tick after stop");

        timer.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn restart_during_tick_reschedules_from_completion() {
        let scheduler = Scheduler::current().unwrap();
        let offsets = Arc::new(Mutex::new(Vec::new()));
        let handler = RecordingHandler {
            start: Instant::now(),
            offsets_ms: Arc::clone(&offsets),
            in_flight: Arc::new(AtomicBool::new(false)),
            delay: Duration::from_millis(50),
        };
        let timer = IntervalTimer::spawn(&scheduler, Duration::from_millis(100), handler);

        // Restart lands mid-callback (tick at 100, callback runs to 150):
        // the command is processed at completion, so the next tick fires
        // a full new period later, at 150 + 300.
        sleep(Duration::from_millis(120)).await;
        timer.restart(Duration::from_millis(300));
        sleep(Duration::from_millis(360)).await;

        timer.shutdown().await;

        let offsets = offsets.lock().unwrap();
        assert_eq!(*offsets, vec![100, 450]);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_ticks() {
        let scheduler = Scheduler::current().unwrap();
        let ticks = Arc::new(AtomicU32::new(0));
        let timer = IntervalTimer::spawn(
            &scheduler,
            Duration::from_millis(100),
            CountingHandler {
                ticks: Arc::clone(&ticks),
            },
        );

        sleep(Duration::from_millis(150)).await;
        drop(timer);

        sleep(Duration::from_millis(500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }
}
