//! Debounced search input.
//!
//! Each new input cancels the pending one and restarts the quiet-period
//! timer, so only the latest input is ever searched. After the timer
//! fires the input is dropped when it equals the previous debounced input
//! or is shorter than the minimum length.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

/// A search that ran after the input settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<R> {
    /// The input the search ran for.
    pub query: String,
    pub results: R,
}

/// Handle to a debouncing task. Dropping it (or calling
/// [`Self::close`]) ends the task.
pub struct SearchDebouncer {
    tx: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Spawns the debouncing task on the current tokio runtime.
    ///
    /// `search` runs for each settled input; its outcomes arrive on the
    /// returned receiver in input order.
    #[must_use]
    pub fn spawn<F, R>(
        delay: Duration,
        min_length: usize,
        search: F,
    ) -> (Self, mpsc::UnboundedReceiver<SearchOutcome<R>>)
    where
        F: Fn(&str) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut pending: Option<String> = None;
            let mut deadline = Instant::now();
            let mut last: Option<String> = None;

            loop {
                tokio::select! {
                    msg = rx.recv() => {
                        let Some(text) = msg else {
                            // Input closed: the last pending input still wins.
                            if let Some(text) = pending.take() {
                                settle(&search, min_length, &out_tx, text, &mut last);
                            }
                            break;
                        };
                        pending = Some(text);
                        deadline = Instant::now() + delay;
                    }
                    () = sleep_until(deadline), if pending.is_some() => {
                        if let Some(text) = pending.take() {
                            if !settle(&search, min_length, &out_tx, text, &mut last) {
                                // Receiver dropped; nobody is listening.
                                break;
                            }
                        }
                    }
                }
            }
        });

        (Self { tx, task }, out_rx)
    }

    /// Submits new input, superseding any input still waiting out the
    /// quiet period. Returns `false` if the task has stopped.
    pub fn input(&self, text: impl Into<String>) -> bool {
        self.tx.send(text.into()).is_ok()
    }

    /// Stops accepting input, runs the search for any pending input, and
    /// waits for the task to finish.
    pub async fn close(self) {
        let Self { tx, task } = self;
        drop(tx);
        if let Err(e) = task.await {
            log::warn!("Search debouncer task failed: {e}");
        }
    }
}

/// Runs `search` for a settled input unless it repeats the previous one or
/// is too short. Returns `false` once the outcome receiver is gone.
fn settle<F, R>(
    search: &F,
    min_length: usize,
    out_tx: &mpsc::UnboundedSender<SearchOutcome<R>>,
    text: String,
    last: &mut Option<String>,
) -> bool
where
    F: Fn(&str) -> R,
{
    if last.as_deref() == Some(text.as_str()) {
        log::trace!("Search input unchanged: {text:?}");
        return true;
    }
    *last = Some(text.clone());

    if text.chars().count() < min_length {
        log::trace!("Search input too short: {text:?}");
        return true;
    }

    let results = search(&text);
    out_tx
        .send(SearchOutcome {
            query: text,
            results,
        })
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn upper_debouncer() -> (SearchDebouncer, mpsc::UnboundedReceiver<SearchOutcome<String>>) {
        SearchDebouncer::spawn(Duration::from_millis(500), 3, str::to_uppercase)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_input() {
        let (debouncer, mut rx) = upper_debouncer();
        debouncer.input("Pe");
        debouncer.input("Per");
        debouncer.input("Pert");

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.query, "Pert");
        assert_eq!(outcome.results, "PERT");

        debouncer.close().await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn new_input_restarts_the_timer() {
        let (debouncer, mut rx) = upper_debouncer();
        let start = Instant::now();

        debouncer.input("Kings");
        sleep(Duration::from_millis(400)).await;
        debouncer.input("Kings P");
        sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.query, "Kings P");
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(900), "fired at {elapsed:?}");
        assert!(elapsed < Duration::from_millis(1_000), "fired at {elapsed:?}");

        debouncer.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn short_and_repeated_inputs_are_skipped() {
        let (debouncer, mut rx) = upper_debouncer();

        debouncer.input("Perth");
        assert_eq!(rx.recv().await.unwrap().query, "Perth");

        debouncer.input("Perth");
        sleep(Duration::from_millis(600)).await;
        debouncer.input("Pe");
        sleep(Duration::from_millis(600)).await;
        debouncer.input("Perth");
        sleep(Duration::from_millis(600)).await;

        // "Perth" after "Pe" is a change again.
        assert_eq!(rx.recv().await.unwrap().query, "Perth");
        assert!(rx.try_recv().is_err());

        debouncer.close().await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn close_flushes_pending_input() {
        let (debouncer, mut rx) = upper_debouncer();
        debouncer.input("Subiaco");
        debouncer.close().await;

        assert_eq!(rx.recv().await.unwrap().query, "Subiaco");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn search_only_needs_to_be_send() {
        // `Cell` is `Send` but not `Sync`.
        let calls = std::cell::Cell::new(0_u32);
        let (debouncer, mut rx) = SearchDebouncer::spawn(
            Duration::from_millis(500),
            3,
            move |text: &str| {
                calls.set(calls.get() + 1);
                (text.len(), calls.get())
            },
        );

        debouncer.input("Nedlands");
        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.results, (8, 1));

        debouncer.input("Nedlands");
        debouncer.input("Nollamara");
        assert_eq!(rx.recv().await.unwrap().results, (9, 2));

        debouncer.close().await;
    }
}
