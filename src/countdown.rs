/// Iftar/sahur boundary resolution and countdown math
/// Pure functions over naive date-times; the engine calls `resolve`
/// once per second with a freshly sampled instant.

use chrono::{Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Today's two observance anchors as fetched from the provider.
/// No ordering is assumed between the fields: iftar falls in the
/// evening, sahur before dawn, and either may be numerically first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorSet {
    pub sahur: NaiveTime,
    pub iftar: NaiveTime,
}

/// Which observance boundary the countdown is running toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextBoundary {
    Iftar,
    Sahur,
}

/// Result of one resolution pass. Recomputed from scratch every tick,
/// never decremented, so it self-corrects after clock changes or
/// missed ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    /// Whole seconds until the next iftar/sahur boundary. Not clamped.
    pub seconds_to_next_observance: i64,
    /// Whole seconds until the work-end boundary, clamped at zero.
    pub seconds_to_work_end: i64,
    pub next_boundary: NextBoundary,
}

/// Sample the current wall-clock instant in the given timezone.
/// The anchors themselves are never converted; this only pins "now"
/// to the target city's clock regardless of where the host runs.
pub fn local_now(tz: Tz) -> NaiveDateTime {
    tz.from_utc_datetime(&Utc::now().naive_utc()).naive_local()
}

/// Resolve which boundaries are next and how far away they are.
///
/// The three-way split is exhaustive under a total order on instants:
/// 1. past today's iftar: both targets roll to tomorrow, next = sahur
/// 2. before today's sahur: today's sahur and today's work end
/// 3. between the two: today's iftar and today's work end
///
/// The work target only ever rolls forward through case 1. In the
/// window between the work-end time and iftar, case 3 still targets
/// today's work end even though it has passed; the clamp pins that
/// countdown to zero there.
pub fn resolve(anchors: AnchorSet, work_end: NaiveTime, now: NaiveDateTime) -> CountdownState {
    let today = now.date();
    let sahur_at = today.and_time(anchors.sahur);
    let iftar_at = today.and_time(anchors.iftar);
    let work_end_at = today.and_time(work_end);

    let (observance_at, work_at, next_boundary) = if now > iftar_at {
        (
            sahur_at + Duration::days(1),
            work_end_at + Duration::days(1),
            NextBoundary::Sahur,
        )
    } else if now < sahur_at {
        (sahur_at, work_end_at, NextBoundary::Sahur)
    } else {
        (iftar_at, work_end_at, NextBoundary::Iftar)
    };

    CountdownState {
        seconds_to_next_observance: (observance_at - now).num_seconds(),
        seconds_to_work_end: (work_at - now).num_seconds().max(0),
        next_boundary,
    }
}

/// Split a non-negative second count into (hours, minutes, seconds).
/// Hours are unbounded; minutes and seconds are always < 60.
#[inline]
pub fn split_hms(total: u64) -> (u64, u64, u64) {
    (total / 3600, (total % 3600) / 60, total % 60)
}

/// Render whole seconds as `HH:MM:SS`, each field zero-padded to two
/// digits, hours unbounded (90000 -> "25:00:00"). Negative input
/// renders the absolute value with a leading minus sign.
pub fn format_hms(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let (h, m, s) = split_hms(seconds.unsigned_abs());
    format!("{}{:02}:{:02}:{:02}", sign, h, m, s)
}



/// Kani formal verification proofs
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn split_hms_reassembles() {
        let total: u64 = kani::any();
        kani::assume(total < 10_000_000);
        let (h, m, s) = split_hms(total);
        kani::assert(m < 60, "minutes must be < 60");
        kani::assert(s < 60, "seconds must be < 60");
        kani::assert(h * 3600 + m * 60 + s == total, "split must reassemble exactly");
    }

    #[kani::proof]
    fn clamp_is_total() {
        let delta: i64 = kani::any();
        let clamped = delta.max(0);
        kani::assert(clamped >= 0, "clamped delta must be non-negative");
        if delta >= 0 {
            kani::assert(clamped == delta, "positive deltas pass through");
        }
    }
}
