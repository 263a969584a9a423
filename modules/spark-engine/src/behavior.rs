//! Per-session behavior telemetry.
//!
//! A session accumulates hover time and hesitations until it is finalized,
//! after which the signals are frozen and further recordings are rejected.
//! Hover time is driven by a tokio ticker started with `begin_hover` and
//! stopped by `end_hover`, `finalize`, or dropping the handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, info};

use spark_common::{BehaviorSignals, Config, SparkError};

const DEFAULT_HOVER_TICK: Duration = Duration::from_millis(100);

/// Factory for behavior sessions. Holds only configuration; every session
/// it starts owns independent state.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorAggregator {
    hover_tick: Duration,
}

impl Default for BehaviorAggregator {
    fn default() -> Self {
        Self {
            hover_tick: DEFAULT_HOVER_TICK,
        }
    }
}

impl BehaviorAggregator {
    pub fn new(hover_tick: Duration) -> Self {
        Self {
            hover_tick: if hover_tick.is_zero() {
                DEFAULT_HOVER_TICK
            } else {
                hover_tick
            },
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.hover_tick)
    }

    pub fn hover_tick(&self) -> Duration {
        self.hover_tick
    }

    pub fn start(&self) -> SessionHandle {
        SessionHandle {
            state: Arc::new(Mutex::new(SessionState::default())),
            ticker: Mutex::new(None),
            hover_tick: self.hover_tick,
            started: Instant::now(),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    hover_time_ms: u64,
    hesitation_count: u32,
    frozen: Option<BehaviorSignals>,
}

impl SessionState {
    fn ensure_open(&self) -> Result<(), SparkError> {
        match self.frozen {
            Some(_) => Err(SparkError::SessionClosed),
            None => Ok(()),
        }
    }
}

struct Ticker {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn stop(self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.handle.abort();
    }
}

/// One spin-to-finalize telemetry session.
pub struct SessionHandle {
    state: Arc<Mutex<SessionState>>,
    ticker: Mutex<Option<Ticker>>,
    hover_tick: Duration,
    started: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SessionHandle {
    pub fn record_hover_tick(&self, delta_ms: u64) -> Result<(), SparkError> {
        let mut state = lock(&self.state);
        state.ensure_open()?;
        state.hover_time_ms = state.hover_time_ms.saturating_add(delta_ms);
        Ok(())
    }

    pub fn record_hesitation(&self) -> Result<(), SparkError> {
        let mut state = lock(&self.state);
        state.ensure_open()?;
        state.hesitation_count = state.hesitation_count.saturating_add(1);
        Ok(())
    }

    /// Start accumulating hover time on a periodic ticker. A second call
    /// while already hovering is a no-op. Must be called within a tokio runtime.
    pub fn begin_hover(&self) -> Result<(), SparkError> {
        lock(&self.state).ensure_open()?;

        let mut ticker = lock(&self.ticker);
        if ticker.is_some() {
            return Ok(());
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();
        let state = self.state.clone();
        let tick = self.hover_tick;
        let tick_ms = tick.as_millis() as u64;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                let mut state = lock(&state);
                if state.frozen.is_some() {
                    break;
                }
                state.hover_time_ms = state.hover_time_ms.saturating_add(tick_ms);
            }
        });

        debug!(tick_ms, "Hover started");
        *ticker = Some(Ticker { cancel, handle });
        Ok(())
    }

    /// Stop the hover ticker and count the pointer leaving as a hesitation.
    pub fn end_hover(&self) -> Result<(), SparkError> {
        if let Some(ticker) = lock(&self.ticker).take() {
            ticker.stop();
        }
        self.record_hesitation()
    }

    pub fn is_hovering(&self) -> bool {
        lock(&self.ticker).is_some()
    }

    /// Current totals without freezing the session.
    pub fn snapshot(&self) -> BehaviorSignals {
        let state = lock(&self.state);
        if let Some(frozen) = state.frozen {
            return frozen;
        }
        BehaviorSignals {
            hover_time_ms: state.hover_time_ms,
            hesitation_count: state.hesitation_count,
            decision_latency_ms: self.elapsed_ms(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        lock(&self.state).frozen.is_some()
    }

    /// Freeze and return the signals. Idempotent: later calls return the
    /// same values.
    pub fn finalize(&self) -> BehaviorSignals {
        if let Some(ticker) = lock(&self.ticker).take() {
            ticker.stop();
        }

        let mut state = lock(&self.state);
        if let Some(frozen) = state.frozen {
            return frozen;
        }

        let signals = BehaviorSignals {
            hover_time_ms: state.hover_time_ms,
            hesitation_count: state.hesitation_count,
            decision_latency_ms: self.elapsed_ms(),
        };
        state.frozen = Some(signals);

        info!(
            hover_time_ms = signals.hover_time_ms,
            hesitation_count = signals.hesitation_count,
            decision_latency_ms = signals.decision_latency_ms,
            "Behavior session finalized"
        );
        signals
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(ticker) = lock(&self.ticker).take() {
            ticker.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_recordings_accumulate() {
        let session = BehaviorAggregator::default().start();
        session.record_hover_tick(100).unwrap();
        session.record_hover_tick(250).unwrap();
        session.record_hesitation().unwrap();

        let signals = session.finalize();
        assert_eq!(signals.hover_time_ms, 350);
        assert_eq!(signals.hesitation_count, 1);
    }

    #[test]
    fn recordings_after_finalize_rejected() {
        let session = BehaviorAggregator::default().start();
        session.record_hesitation().unwrap();
        let first = session.finalize();

        assert!(matches!(
            session.record_hover_tick(100),
            Err(SparkError::SessionClosed)
        ));
        assert!(matches!(
            session.record_hesitation(),
            Err(SparkError::SessionClosed)
        ));
        assert_eq!(session.finalize(), first);
        assert!(session.is_finalized());
    }

    #[test]
    fn zero_tick_falls_back_to_default() {
        let aggregator = BehaviorAggregator::new(Duration::ZERO);
        assert_eq!(aggregator.hover_tick(), Duration::from_millis(100));
    }

    #[test]
    fn sessions_are_independent() {
        let aggregator = BehaviorAggregator::default();
        let a = aggregator.start();
        let b = aggregator.start();
        a.record_hesitation().unwrap();
        a.finalize();

        b.record_hesitation().unwrap();
        b.record_hesitation().unwrap();
        assert_eq!(b.finalize().hesitation_count, 2);
    }

    #[tokio::test]
    async fn hover_ticker_accumulates_in_tick_units() {
        let session = BehaviorAggregator::new(Duration::from_millis(10)).start();
        session.begin_hover().unwrap();
        assert!(session.is_hovering());

        tokio::time::sleep(Duration::from_millis(80)).await;
        session.end_hover().unwrap();
        assert!(!session.is_hovering());

        let signals = session.finalize();
        assert!(signals.hover_time_ms > 0);
        assert_eq!(signals.hover_time_ms % 10, 0);
        assert_eq!(signals.hesitation_count, 1);
    }

    #[tokio::test]
    async fn end_hover_stops_the_ticker() {
        let session = BehaviorAggregator::new(Duration::from_millis(5)).start();
        session.begin_hover().unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        session.end_hover().unwrap();

        let before = session.snapshot().hover_time_ms;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(session.snapshot().hover_time_ms, before);
    }

    #[tokio::test]
    async fn finalize_stops_a_running_ticker() {
        let session = BehaviorAggregator::new(Duration::from_millis(5)).start();
        session.begin_hover().unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let frozen = session.finalize();
        assert!(!session.is_hovering());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(session.snapshot(), frozen);
        assert!(matches!(session.begin_hover(), Err(SparkError::SessionClosed)));
    }

    #[tokio::test]
    async fn decision_latency_measures_start_to_finalize() {
        let session = BehaviorAggregator::default().start();
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(session.finalize().decision_latency_ms >= 25);
    }
}
