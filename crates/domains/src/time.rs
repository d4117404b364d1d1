//! Millisecond-precision clock helpers.
//!
//! Every timestamp the domain hands to a store goes through here so that
//! all backends (BSON datetimes included) round-trip it exactly.

use chrono::{DateTime, TimeDelta, Utc};

pub fn now() -> DateTime<Utc> {
    truncate(Utc::now())
}

pub fn truncate(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

/// The current time, or one millisecond past `previous` if the clock has not
/// moved beyond it yet.
pub fn strictly_after(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        truncate(previous) + TimeDelta::milliseconds(1)
    }
}
