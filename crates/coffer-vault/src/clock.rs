//! Time source used for record timestamps.

use chrono::{DateTime, SubsecRound, Utc};

/// Supplies "now" to the store and codecs.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, truncated to the millisecond precision both export
/// formats carry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}
