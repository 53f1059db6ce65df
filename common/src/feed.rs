use std::collections::VecDeque;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::notification::{Notification, NotificationKind};

/// Share of ticks that produce a notification in the simulated feed.
pub const DEFAULT_ADMISSION_PROBABILITY: f64 = 0.2;

/// Display format for notification timestamps.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Errors a feed adapter may report for a tick.
///
/// The center treats any of these as a dropped tick and flags the feed as
/// degraded until the next successful poll.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("feed unavailable: {0}")]
    Unavailable(String),
    #[error("malformed feed event: {0}")]
    Malformed(String),
}

/// Source of incoming notifications, polled once per feed tick.
///
/// `Ok(None)` is a silent tick. Implementations swap freely: the simulated
/// feed below, a scripted queue in tests, or an adapter over a push/poll
/// transport.
pub trait Feed {
    fn poll(&mut self) -> Result<Option<Notification>, FeedError>;
}

impl<F: Feed + ?Sized> Feed for Box<F> {
    fn poll(&mut self) -> Result<Option<Notification>, FeedError> {
        (**self).poll()
    }
}

/// Wall-clock source for ids and display timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub fn set(&mut self, at: DateTime<Local>) {
        self.0 = at;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Shape of an event the simulated feed can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub body: &'static str,
}

/// One template per notification kind.
pub const TEMPLATES: [Template; 4] = [
    Template {
        kind: NotificationKind::Booking,
        title: "Service Started",
        body: "Your provider has started the service",
    },
    Template {
        kind: NotificationKind::Message,
        title: "Provider Update",
        body: "Provider is 10 minutes away",
    },
    Template {
        kind: NotificationKind::Payment,
        title: "Payment Received",
        body: "We received your payment for the last service",
    },
    Template {
        kind: NotificationKind::System,
        title: "System Update",
        body: "New features available in your app",
    },
];

/// Stand-in for a live push feed: on each tick, admits a random template
/// with a fixed probability.
///
/// Ids and timestamps are stamped at admission, not when the template was
/// defined.
pub struct SimulatedFeed<C = SystemClock, R = StdRng> {
    clock: C,
    rng: R,
    probability: f64,
    seq: u64,
}

impl SimulatedFeed {
    /// Wall clock and an entropy-seeded RNG.
    pub fn new(probability: f64) -> Self {
        Self::with_parts(SystemClock, StdRng::from_entropy(), probability)
    }
}

impl<C: Clock, R: Rng> SimulatedFeed<C, R> {
    pub fn with_parts(clock: C, rng: R, probability: f64) -> Self {
        let probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            clock,
            rng,
            probability,
            seq: 0,
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn admit(&mut self, template: Template) -> Notification {
        let now = self.clock.now();
        self.seq += 1;
        Notification::new(
            format!("{}-{}", now.timestamp_millis(), self.seq),
            template.kind,
            template.title,
            template.body,
            now.format(TIMESTAMP_FORMAT).to_string(),
        )
    }
}

impl<C: Clock, R: Rng> Feed for SimulatedFeed<C, R> {
    fn poll(&mut self) -> Result<Option<Notification>, FeedError> {
        if !self.rng.gen_bool(self.probability) {
            return Ok(None);
        }
        let template = match TEMPLATES.choose(&mut self.rng) {
            Some(t) => *t,
            None => return Ok(None),
        };
        Ok(Some(self.admit(template)))
    }
}

/// Feed that replays queued tick results, then goes silent.
#[derive(Debug, Default)]
pub struct ScriptedFeed {
    ticks: VecDeque<Result<Option<Notification>, FeedError>>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) -> &mut Self {
        self.ticks.push_back(Ok(Some(notification)));
        self
    }

    pub fn push_silent(&mut self) -> &mut Self {
        self.ticks.push_back(Ok(None));
        self
    }

    pub fn push_error(&mut self, err: FeedError) -> &mut Self {
        self.ticks.push_back(Err(err));
        self
    }

    /// Ticks still queued.
    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl Feed for ScriptedFeed {
    fn poll(&mut self) -> Result<Option<Notification>, FeedError> {
        self.ticks.pop_front().unwrap_or(Ok(None))
    }
}
