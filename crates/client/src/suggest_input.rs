//! Debounced, supersedable suggestion fetch
//!
//! Each input change bumps a sequence number; a suggestion only surfaces when
//! its sequence is still the latest both after the debounce pause and after
//! the fetch returns. Stale responses are dropped, not cancelled in flight.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Inputs shorter than this never trigger a fetch
const MIN_INPUT_LEN: usize = 4;

pub struct SuggestionInput {
    seq: AtomicU64,
    debounce: Duration,
}

impl Default for SuggestionInput {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionInput {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(0),
            debounce: DEBOUNCE,
        }
    }

    /// Override the debounce interval
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Wait out the debounce interval, then fetch a suggestion for `text`.
    ///
    /// Every call supersedes any pending one, so the caller can invoke this
    /// on each keystroke and only the latest input produces a suggestion.
    /// Returns `None` for short input, superseded requests, and empty
    /// completions.
    pub async fn suggest_after_pause<F, Fut>(&self, text: &str, fetch: F) -> Option<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = String>,
    {
        let my_seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        if text.chars().count() < MIN_INPUT_LEN {
            return None;
        }

        tokio::time::sleep(self.debounce).await;
        if self.seq.load(Ordering::SeqCst) != my_seq {
            return None;
        }

        let completion = fetch(text.to_string()).await;
        if self.seq.load(Ordering::SeqCst) != my_seq {
            return None;
        }

        if completion.is_empty() {
            None
        } else {
            Some(completion)
        }
    }
}
