//! Callbacks fired at the occurrences of a recurrence, on the tokio runtime.
//!
//! The engine never waits; these helpers turn "the next occurrence after
//! now" into a sleep and re-ask the engine after every firing. Waits longer
//! than [`MAX_DELAY`] are split so that the next occurrence is recomputed
//! against the wall clock at least that often.
//!
//! # Functions
//!
//! - [`delay_until_next`] — How long to wait for the next firing
//! - [`set_timeout`] — Run a callback once, at the next occurrence
//! - [`set_interval`] — Run a callback at every occurrence until cleared

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::AbortHandle;

use crate::recurrence::Recurrence;

/// Longest single sleep: 2^31 - 1 milliseconds.
pub const MAX_DELAY: Duration = Duration::from_millis(2_147_483_647);

/// Occurrences closer than this are skipped in favour of the one after.
const MIN_DELAY_MS: i64 = 1_000;

/// Time from `now` until the next firing, or `None` when the recurrence has
/// no further occurrences.
///
/// An occurrence less than a second away is treated as already fired, so
/// the one after it is used (or a one-second delay if there is none).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cadence_engine::{timer::delay_until_next, Recurrence, RecurrenceDef};
/// use chrono::{TimeZone, Utc};
///
/// let def = RecurrenceDef::from_json(r#"{"recurrences": [{"m": [30], "s": [0]}]}"#).unwrap();
/// let recurrence = Recurrence::new(&def).unwrap();
/// let now = Utc.with_ymd_and_hms(2013, 3, 21, 3, 29, 0).unwrap();
/// assert_eq!(delay_until_next(&recurrence, now), Some(Duration::from_secs(60)));
/// ```
pub fn delay_until_next(recurrence: &Recurrence, now: DateTime<Utc>) -> Option<Duration> {
    let upcoming = recurrence.next(2, Some(now), None).into_vec();
    let first = upcoming.first()?;
    let mut millis = (*first - now).num_milliseconds();
    if millis < MIN_DELAY_MS {
        millis = upcoming
            .get(1)
            .map_or(MIN_DELAY_MS, |second| (*second - now).num_milliseconds());
    }
    Some(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
}

/// One step of a wait: sleep and fire, or sleep and re-evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wait {
    Fire(Duration),
    Recheck(Duration),
}

fn plan(delay: Duration) -> Wait {
    if delay < MAX_DELAY {
        Wait::Fire(delay)
    } else {
        Wait::Recheck(MAX_DELAY)
    }
}

/// Sleep until the next occurrence. `false` when there is none.
async fn wait_for_next(recurrence: &Recurrence) -> bool {
    loop {
        let Some(delay) = delay_until_next(recurrence, Utc::now()) else {
            tracing::debug!("recurrence has no further occurrences; timer stopped");
            return false;
        };
        match plan(delay) {
            Wait::Fire(delay) => {
                tracing::trace!(?delay, "timer armed");
                tokio::time::sleep(delay).await;
                return true;
            }
            Wait::Recheck(delay) => {
                tracing::trace!(?delay, "occurrence beyond the longest delay; rechecking later");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Handle to a running timer.
#[derive(Debug)]
pub struct TimerHandle {
    task: AbortHandle,
    cleared: Arc<AtomicBool>,
}

impl TimerHandle {
    /// `true` once the timer has fired its last callback, run out of
    /// occurrences, or been cleared.
    pub fn is_done(&self) -> bool {
        self.cleared.load(Ordering::Acquire) || self.task.is_finished()
    }

    /// Cancel the timer. Pending callbacks never run.
    pub fn clear(&self) {
        self.cleared.store(true, Ordering::Release);
        self.task.abort();
    }
}

/// Run `f` once at the next occurrence of `recurrence`.
///
/// Must be called from within a tokio runtime.
pub fn set_timeout<F>(recurrence: Arc<Recurrence>, f: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let cleared = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cleared);
    let task = tokio::spawn(async move {
        if wait_for_next(&recurrence).await && !flag.load(Ordering::Acquire) {
            f();
        }
    });
    TimerHandle {
        task: task.abort_handle(),
        cleared,
    }
}

/// Run `f` at every occurrence of `recurrence` until the handle is cleared
/// or the occurrences run out.
///
/// Must be called from within a tokio runtime.
pub fn set_interval<F>(recurrence: Arc<Recurrence>, mut f: F) -> TimerHandle
where
    F: FnMut() + Send + 'static,
{
    let cleared = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cleared);
    let task = tokio::spawn(async move {
        while wait_for_next(&recurrence).await {
            if flag.load(Ordering::Acquire) {
                break;
            }
            f();
        }
    });
    TimerHandle {
        task: task.abort_handle(),
        cleared,
    }
}
