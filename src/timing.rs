use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Delay used by [`Debouncer::with_default_delay`].
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

/// Runs the wrapped function only after `delay` has passed without another call.
///
/// Each call cancels the pending one. Must be used inside a tokio runtime.
pub struct Debouncer<A> {
    func: Arc<dyn Fn(A) + Send + Sync>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F>(delay: Duration, func: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            delay,
            pending: None,
        }
    }

    pub fn with_default_delay<F>(func: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self::new(DEFAULT_DEBOUNCE, func)
    }

    pub fn call(&mut self, args: A) {
        self.cancel();
        let func = Arc::clone(&self.func);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            func(args);
        }));
    }

    /// Drop the pending call, if any, without running it.
    pub fn cancel(&mut self) {
        if let Some(prev) = self.pending.take() {
            prev.abort();
        }
    }

    /// Whether a call is still waiting for its delay to pass.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(h) = self.pending.take() {
            h.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

/// Runs the wrapped function at most once per `delay`; other calls are dropped.
pub struct Throttle<F> {
    func: F,
    delay: Duration,
    prev: Option<Instant>,
}

impl<F> Throttle<F> {
    pub fn new(delay: Duration, func: F) -> Self {
        Self {
            func,
            delay,
            prev: None,
        }
    }

    /// Returns `None` when the call was throttled.
    pub fn call<A, R>(&mut self, args: A) -> Option<R>
    where
        F: FnMut(A) -> R,
    {
        let now = Instant::now();
        if let Some(prev) = self.prev {
            if now.duration_since(prev) <= self.delay {
                return None;
            }
        }
        self.prev = Some(now);
        Some((self.func)(args))
    }
}

/// Give other tasks (e.g. a pending redraw) a chance to run.
pub async fn refresh_ui() {
    tokio::task::yield_now().await;
}
