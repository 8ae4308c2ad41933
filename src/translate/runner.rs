//! Background translation task with a single hand-off point.
//!
//! [`TranslateRunner`] spawns at most one task on a tokio runtime.  The task
//! only calls the [`Translator`]; it never sees the text connection.  Each
//! spawn gets its own `oneshot` channel, so an aborted task that still
//! finishes its last poll can only send into a receiver that is already
//! gone.  The outcome is picked up by the UI thread via
//! [`try_next`](TranslateRunner::try_next) (per frame) or
//! [`next`](TranslateRunner::next) (async hosts and tests).
//!
//! ```text
//! UI thread                     tokio runtime
//! ─────────                     ─────────────
//! spawn(request) ──────────────▶ translator.translate(...)
//!                                     │
//! try_next() / next() ◀──── oneshot ──┘
//! cancel() ── abort + drop receiver ─▶ (late send goes nowhere)
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::task::JoinHandle;

use crate::llm::{TranslateError, Translator};

use super::state::{TranslateOutcome, TranslationRequest};

struct InFlight {
    handle: JoinHandle<()>,
    request: TranslationRequest,
    outcome_rx: oneshot::Receiver<TranslateOutcome>,
}

/// Runs translation requests off the UI thread, one at a time.
pub struct TranslateRunner {
    runtime: Handle,
    translator: Arc<dyn Translator>,
    in_flight: Option<InFlight>,
}

impl TranslateRunner {
    /// Create a runner that spawns onto `runtime`.
    pub fn new(runtime: Handle, translator: Arc<dyn Translator>) -> Self {
        Self {
            runtime,
            translator,
            in_flight: None,
        }
    }

    /// `true` while a task has been spawned and its outcome not yet taken.
    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start translating `request`.
    ///
    /// Returns `false` (and does nothing) if a request is already in flight.
    pub fn spawn(&mut self, request: TranslationRequest) -> bool {
        if self.in_flight.is_some() {
            return false;
        }

        let translator = Arc::clone(&self.translator);
        let (tx, outcome_rx) = oneshot::channel();
        let task_request = request.clone();

        let handle = self.runtime.spawn(async move {
            let result = translator
                .translate(&task_request.source, &task_request.target_language)
                .await;
            // Fails only when the request was cancelled or the runner dropped.
            let _ = tx.send(TranslateOutcome {
                request: task_request,
                result,
            });
        });

        self.in_flight = Some(InFlight {
            handle,
            request,
            outcome_rx,
        });
        true
    }

    /// Take the finished outcome without blocking.
    ///
    /// A task that ended without sending (it panicked) is reported as a
    /// [`TranslateError::Internal`] outcome so the caller always returns to
    /// idle.
    pub fn try_next(&mut self) -> Option<TranslateOutcome> {
        let received = self.in_flight.as_mut()?.outcome_rx.try_recv();

        match received {
            Ok(outcome) => {
                self.in_flight = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => self
                .in_flight
                .take()
                .map(|f| Self::lost(f.request, "translation task ended without a result".into())),
        }
    }

    /// Wait for the in-flight task and take its outcome.
    ///
    /// Returns `None` immediately when nothing is in flight.  Dropping the
    /// returned future early leaves the request in flight.
    pub async fn next(&mut self) -> Option<TranslateOutcome> {
        let received = (&mut self.in_flight.as_mut()?.outcome_rx).await;
        let InFlight { handle, request, .. } = self.in_flight.take()?;

        match received {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                let reason = match handle.await {
                    Err(e) => e.to_string(),
                    Ok(()) => "translation task ended without a result".into(),
                };
                Some(Self::lost(request, reason))
            }
        }
    }

    /// Abort the in-flight task and discard anything it sends.
    ///
    /// Returns the request that was cancelled, if any.
    pub fn cancel(&mut self) -> Option<TranslationRequest> {
        let InFlight { handle, request, .. } = self.in_flight.take()?;
        handle.abort();
        Some(request)
    }

    fn lost(request: TranslationRequest, reason: String) -> TranslateOutcome {
        log::warn!("translate task lost: {reason}");
        TranslateOutcome {
            request,
            result: Err(TranslateError::Internal(reason)),
        }
    }
}

impl Drop for TranslateRunner {
    fn drop(&mut self) {
        if let Some(f) = &self.in_flight {
            f.handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for Echo {
        async fn translate(&self, text: &str, lang: &str) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{text}@{lang}"))
        }
    }

    struct Hangs;

    #[async_trait]
    impl Translator for Hangs {
        async fn translate(&self, _text: &str, _lang: &str) -> Result<String, TranslateError> {
            std::future::pending().await
        }
    }

    struct Panics;

    #[async_trait]
    impl Translator for Panics {
        async fn translate(&self, _text: &str, _lang: &str) -> Result<String, TranslateError> {
            panic!("backend exploded")
        }
    }

    /// Blocks its worker thread, so an abort cannot interrupt it.
    struct BlocksOnSlow;

    #[async_trait]
    impl Translator for BlocksOnSlow {
        async fn translate(&self, text: &str, _lang: &str) -> Result<String, TranslateError> {
            if text == "slow" {
                std::thread::sleep(Duration::from_millis(100));
            }
            Ok(text.to_uppercase())
        }
    }

    fn request(source: &str) -> TranslationRequest {
        TranslationRequest {
            source: source.into(),
            target_language: "Hindi".into(),
            from_selection: false,
            session: 1,
        }
    }

    #[tokio::test]
    async fn next_returns_the_outcome() {
        let mut runner = TranslateRunner::new(
            Handle::current(),
            Arc::new(Echo {
                calls: AtomicUsize::new(0),
            }),
        );

        assert!(runner.spawn(request("hello")));
        assert!(runner.is_running());

        let outcome = runner.next().await.expect("outcome");
        assert_eq!(outcome.result.unwrap(), "hello@Hindi");
        assert_eq!(outcome.request.source, "hello");
        assert!(!runner.is_running());
        assert!(runner.next().await.is_none());
    }

    #[tokio::test]
    async fn second_spawn_is_rejected_while_running() {
        let echo = Arc::new(Echo {
            calls: AtomicUsize::new(0),
        });
        let mut runner = TranslateRunner::new(Handle::current(), echo.clone());

        assert!(runner.spawn(request("one")));
        assert!(!runner.spawn(request("two")));

        let outcome = runner.next().await.expect("outcome");
        assert_eq!(outcome.request.source, "one");
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn try_next_polls_without_blocking() {
        let mut runner = TranslateRunner::new(Handle::current(), Arc::new(Hangs));
        assert!(runner.try_next().is_none());

        runner.spawn(request("hello"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(runner.try_next().is_none());
        assert!(runner.is_running());
    }

    #[tokio::test]
    async fn try_next_picks_up_a_finished_task() {
        let mut runner = TranslateRunner::new(
            Handle::current(),
            Arc::new(Echo {
                calls: AtomicUsize::new(0),
            }),
        );
        runner.spawn(request("hi"));

        let mut outcome = None;
        for _ in 0..100 {
            tokio::task::yield_now().await;
            outcome = runner.try_next();
            if outcome.is_some() {
                break;
            }
        }
        assert_eq!(outcome.expect("outcome").result.unwrap(), "hi@Hindi");
    }

    #[tokio::test]
    async fn cancel_aborts_and_returns_the_request() {
        let mut runner = TranslateRunner::new(Handle::current(), Arc::new(Hangs));
        runner.spawn(request("hello"));

        let cancelled = runner.cancel().expect("request");
        assert_eq!(cancelled.source, "hello");
        assert!(!runner.is_running());
        assert!(runner.try_next().is_none());
        assert!(runner.cancel().is_none());
    }

    #[tokio::test]
    async fn cancel_discards_an_already_sent_outcome() {
        let mut runner = TranslateRunner::new(
            Handle::current(),
            Arc::new(Echo {
                calls: AtomicUsize::new(0),
            }),
        );
        runner.spawn(request("hello"));
        tokio::time::sleep(Duration::from_millis(10)).await;

        runner.cancel();
        runner.spawn(request("again"));
        let outcome = runner.next().await.expect("outcome");
        assert_eq!(outcome.request.source, "again");
    }

    #[tokio::test]
    async fn panicking_translator_becomes_internal_error() {
        let mut runner = TranslateRunner::new(Handle::current(), Arc::new(Panics));
        runner.spawn(request("hello"));

        let outcome = runner.next().await.expect("outcome");
        assert!(matches!(outcome.result, Err(TranslateError::Internal(_))));
        assert!(!runner.is_running());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn late_send_from_cancelled_task_is_not_taken_by_the_next_request() {
        let mut runner = TranslateRunner::new(Handle::current(), Arc::new(BlocksOnSlow));

        runner.spawn(request("slow"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        runner.cancel();

        runner.spawn(request("fast"));
        let outcome = runner.next().await.expect("outcome");
        assert_eq!(outcome.result.unwrap(), "FAST");

        // The cancelled task finishes its blocking poll and tries to send.
        tokio::time::sleep(Duration::from_millis(200)).await;

        runner.spawn(request("again"));
        let outcome = runner.next().await.expect("outcome");
        assert_eq!(outcome.request.source, "again");
        assert_eq!(outcome.result.unwrap(), "AGAIN");
        assert!(!runner.is_running());
    }
}
