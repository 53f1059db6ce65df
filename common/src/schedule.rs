use std::collections::BTreeMap;
use std::time::Duration;

/// Cancel token for a scheduled callback.
///
/// Tokens are never reused by a scheduler, so a token held past its
/// cancellation can't accidentally match a later timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(pub u64);

/// "Run after / every N" scheduling primitive supplied by the host.
///
/// When a timer fires the host hands its token back to whoever scheduled it;
/// the scheduler itself never holds callbacks.
pub trait Scheduler {
    /// Fire once after `delay`.
    fn schedule_once(&mut self, delay: Duration) -> TimerToken;

    /// Fire every `period` until cancelled.
    fn schedule_repeating(&mut self, period: Duration) -> TimerToken;

    /// Cancel a pending timer. Returns `false` if it had already fired or
    /// been cancelled.
    fn cancel(&mut self, token: TimerToken) -> bool;

    /// Number of timers that can still fire.
    fn pending(&self) -> usize;
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Duration,
    every: Option<Duration>,
}

/// Deterministic virtual-clock scheduler.
///
/// Nothing fires on its own: the driver calls [`next_due`](Self::next_due)
/// with a target time and dispatches each returned token before asking for
/// the next, so cancellations made while handling one timer are honored for
/// the rest of the window.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_token: u64,
    timers: BTreeMap<TimerToken, Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Repeating timers are re-armed for their next period.
    ///
    /// Returns `None` once nothing else is due; the clock is then moved to
    /// `until`.
    pub fn next_due(&mut self, until: Duration) -> Option<TimerToken> {
        let (token, timer) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(token, t)| (t.due, **token))
            .map(|(token, t)| (*token, *t))?;

        self.now = self.now.max(timer.due);
        match timer.every {
            Some(period) => {
                if let Some(t) = self.timers.get_mut(&token) {
                    t.due = timer.due + period;
                }
            }
            None => {
                self.timers.remove(&token);
            }
        }
        Some(token)
    }

    /// Move the clock to `until` without firing anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, delay: Duration, every: Option<Duration>) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.timers.insert(
            token,
            Pending {
                due: self.now + delay,
                every,
            },
        );
        token
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&mut self, delay: Duration) -> TimerToken {
        self.insert(delay, None)
    }

    fn schedule_repeating(&mut self, period: Duration) -> TimerToken {
        // A zero period would fire forever within one window.
        let period = period.max(Duration::from_millis(1));
        self.insert(period, Some(period))
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        self.timers.remove(&token).is_some()
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }
}
