//! Timer-based value stabilization.
//!
//! [`DebouncedQuery`] turns a rapidly changing raw value into a stabilized value
//! that only moves once the raw value has been quiet for a fixed period. Each new
//! raw value supersedes the pending one and restarts the quiet period.
//!
//! The type itself is a clock-driven state machine: callers feed it raw values
//! and the current instant, and ask it whether the quiet period has elapsed.
//! [`spawn_debouncer`] wraps it in a tokio task wired to `watch` channels for
//! callers that prefer to push values and observe the stabilized output.
//!
//! # Example
//!
//! ```rust
//! use applytrack::app::DebouncedQuery;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let start = Instant::now();
//! let mut query = DebouncedQuery::new(String::new(), Duration::from_millis(300));
//!
//! query.push("acme".to_string(), start);
//! assert_eq!(query.poll(start + Duration::from_millis(299)), None);
//! assert_eq!(query.poll(start + Duration::from_millis(300)).map(String::as_str), Some("acme"));
//! ```

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Quiet period used for search input.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Stabilizes a rapidly changing value after a quiet period.
#[derive(Debug, Clone)]
pub struct DebouncedQuery<T> {
    quiet_period: Duration,
    stable: T,
    /// Latest raw value and the instant at which it becomes stable.
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> DebouncedQuery<T> {
    #[must_use]
    pub const fn new(initial: T, quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            stable: initial,
            pending: None,
        }
    }

    /// Records a new raw value observed at `now`.
    ///
    /// Any pending value is discarded and the quiet period restarts from `now`.
    pub fn push(&mut self, raw: T, now: Instant) {
        if self.pending.is_some() {
            tracing::trace!("debounce timer restarted");
        }
        self.pending = Some((raw, now + self.quiet_period));
    }

    /// Promotes the pending value if its quiet period has elapsed by `now`.
    ///
    /// Returns the new stabilized value only when it actually changed; a raw
    /// value equal to the current stable value settles silently.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let due = self.pending.as_ref().is_some_and(|(_, deadline)| *deadline <= now);
        if !due {
            return None;
        }
        let (raw, _) = self.pending.take()?;
        if raw == self.stable {
            return None;
        }
        self.stable = raw;
        Some(&self.stable)
    }

    /// Promotes the pending value immediately, regardless of the quiet period.
    pub fn flush(&mut self) -> Option<&T> {
        let (raw, _) = self.pending.take()?;
        if raw == self.stable {
            return None;
        }
        self.stable = raw;
        Some(&self.stable)
    }

    /// Instant at which the pending value becomes stable, if one is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    #[must_use]
    pub const fn stable(&self) -> &T {
        &self.stable
    }

    /// Latest raw value: the pending one if any, otherwise the stable one.
    #[must_use]
    pub fn latest(&self) -> &T {
        self.pending.as_ref().map_or(&self.stable, |(raw, _)| raw)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }
}

/// Handle to a spawned debouncer task.
///
/// Dropping `input` lets the task settle its last pending value and exit.
#[derive(Debug)]
pub struct DebounceHandle<T> {
    /// Raw values are sent here.
    pub input: watch::Sender<T>,
    /// Stabilized values are observed here.
    pub output: watch::Receiver<T>,
    pub task: JoinHandle<()>,
}

/// Spawns a tokio task that debounces values sent on the returned input channel.
///
/// Must be called from within a tokio runtime.
pub fn spawn_debouncer<T>(initial: T, quiet_period: Duration) -> DebounceHandle<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let (input, raw) = watch::channel(initial.clone());
    let (stable, output) = watch::channel(initial.clone());
    let query = DebouncedQuery::new(initial, quiet_period);
    let task = tokio::spawn(drive(query, raw, stable));
    DebounceHandle {
        input,
        output,
        task,
    }
}

async fn drive<T>(mut query: DebouncedQuery<T>, mut raw: watch::Receiver<T>, stable: watch::Sender<T>)
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    loop {
        let Some(deadline) = query.deadline() else {
            if raw.changed().await.is_err() {
                break;
            }
            let value = raw.borrow_and_update().clone();
            query.push(value, Instant::now());
            continue;
        };

        tokio::select! {
            changed = raw.changed() => {
                if changed.is_err() {
                    // Input closed: let the last value settle, then stop.
                    tokio::time::sleep_until(deadline).await;
                    if let Some(value) = query.poll(Instant::now()) {
                        stable.send_replace(value.clone());
                    }
                    break;
                }
                let value = raw.borrow_and_update().clone();
                query.push(value, Instant::now());
            }
            () = tokio::time::sleep_until(deadline) => {
                if let Some(value) = query.poll(Instant::now()) {
                    tracing::trace!("debounced value stabilized");
                    stable.send_replace(value.clone());
                }
            }
        }
    }
}
