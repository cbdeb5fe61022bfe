//! Periodic countdown recomputation.
//!
//! # Responsibility
//! - Recompute the countdown on a fixed cadence and deliver snapshots over
//!   a channel.
//!
//! # Invariants
//! - One ticker owns exactly one timer thread.
//! - `stop()` or drop cancels the timer and joins its thread before returning.
//! - The timer thread only reads the clock; it never touches storage.

use super::countdown::CountdownEngine;
use crate::clock::Clock;
use crate::model::countdown::CountdownState;
use log::{debug, info};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Handle to a running countdown timer.
pub struct CountdownTicker {
    cancel: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl CountdownTicker {
    /// Starts ticking every `interval`. The first snapshot is sent immediately.
    ///
    /// Ticking also ends on its own once the returned receiver is dropped.
    pub fn start(
        engine: CountdownEngine,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> std::io::Result<(Self, Receiver<CountdownState>)> {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let (state_tx, state_rx) = mpsc::channel::<CountdownState>();

        let worker = std::thread::Builder::new()
            .name("countdown-ticker".to_string())
            .spawn(move || loop {
                if state_tx.send(engine.snapshot(clock.as_ref())).is_err() {
                    debug!("event=ticker_tick module=countdown status=receiver_gone");
                    break;
                }
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        info!(
            "event=ticker_start module=countdown status=ok interval_ms={}",
            interval.as_millis()
        );
        Ok((
            Self {
                cancel: Some(cancel_tx),
                worker: Some(worker),
            },
            state_rx,
        ))
    }

    /// Whether the timer thread is still alive.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Cancels the timer and waits for its thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
            info!("event=ticker_stop module=countdown status=ok");
        }
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::CountdownTicker;
    use crate::clock::FixedClock;
    use crate::service::countdown::CountdownEngine;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    fn engine() -> (CountdownEngine, Arc<FixedClock>) {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let engine = CountdownEngine::new(start, start + Duration::days(380));
        let clock = Arc::new(FixedClock::new(start + Duration::days(7)));
        (engine, clock)
    }

    #[test]
    fn delivers_snapshots_until_stopped() {
        let (engine, clock) = engine();
        let (ticker, states) =
            CountdownTicker::start(engine, clock.clone(), StdDuration::from_millis(10)).unwrap();

        let first = states.recv_timeout(StdDuration::from_secs(2)).unwrap();
        assert_eq!(first.days_elapsed, 0);

        clock.advance(Duration::days(38));
        let later = (0..200)
            .filter_map(|_| states.recv_timeout(StdDuration::from_secs(2)).ok())
            .find(|state| state.days_elapsed == 38)
            .expect("ticker should observe the advanced clock");
        assert!((later.progress_percent - 10.0).abs() < 1e-9);

        assert!(ticker.is_running());
        ticker.stop();
        while states.try_recv().is_ok() {}
        assert!(states.recv_timeout(StdDuration::from_millis(50)).is_err());
    }

    #[test]
    fn drop_cancels_timer_thread() {
        let (engine, clock) = engine();
        let (ticker, states) =
            CountdownTicker::start(engine, clock, StdDuration::from_secs(60)).unwrap();
        states.recv_timeout(StdDuration::from_secs(2)).unwrap();
        drop(ticker);
        assert!(matches!(
            states.recv_timeout(StdDuration::from_millis(50)),
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected)
        ));
    }
}
