// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Validity interval implementation.
//!
//! This module provides:
//! - [`Interval<T>`]: generic half-open interval over any [`TimeInstant`]
//! - [`Period<S>`]: system-based alias for `Interval<Time<S>>`, used as the
//!   validity range of every ephemeris

use crate::instant::{Time, TimeInstant, TimeSystem};
use qtty::Seconds;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

/// Represents the half-open range `[start, end)` between two instants.
///
/// # Examples
///
/// ```
/// use pulsephase::{Period, Time, TT};
///
/// let span = Period::new(Time::<TT>::new(0.0), Time::<TT>::new(100.0));
/// assert!(span.contains(Time::new(0.0)));
/// assert!(!span.contains(Time::new(100.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// Time-system period alias.
pub type Period<S> = Interval<Time<S>>;

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval between two time instants.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Returns the duration of the interval as the difference between end and start.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Whether `t` lies in `[start, end)`.
    #[inline]
    pub fn contains(&self, t: T) -> bool {
        self.start <= t && t < self.end
    }

    /// Returns the overlapping sub-interval between `self` and `other`.
    ///
    /// Intervals are half-open: if one ends exactly when the other starts,
    /// the intersection is empty and `None` is returned.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = if self.start >= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end <= other.end {
            self.end
        } else {
            other.end
        };

        if start < end {
            Some(Self::new(start, end))
        } else {
            None
        }
    }
}

impl<S: TimeSystem> Interval<Time<S>> {
    /// Distance from `t` to the nearest edge of the interval; zero inside.
    pub fn distance_to(&self, t: Time<S>) -> Seconds {
        if t < self.start {
            self.start - t
        } else if t >= self.end {
            t - self.end
        } else {
            Seconds::new(0.0)
        }
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// Field names follow the VALID_SINCE / VALID_UNTIL columns of pulsar
// ephemeris tables.
#[cfg(feature = "serde")]
impl<S: TimeSystem> Serialize for Interval<Time<S>> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        let mut s = serializer.serialize_struct("Period", 2)?;
        s.serialize_field("valid_since", &self.start.value())?;
        s.serialize_field("valid_until", &self.end.value())?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, S: TimeSystem> Deserialize<'de> for Interval<Time<S>> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            valid_since: f64,
            valid_until: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Interval::new(
            Time::new(raw.valid_since),
            Time::new(raw.valid_until),
        ))
    }
}

/// Returns the gaps (complement) of `periods` within the bounding `outer` interval.
///
/// `periods` must be sorted by start; overlaps are allowed. Runs in a
/// single O(n) pass and returns the uncovered intervals in chronological
/// order.
pub fn complement_within<T: TimeInstant>(
    outer: Interval<T>,
    periods: &[Interval<T>],
) -> Vec<Interval<T>> {
    let mut gaps = Vec::new();
    let mut cursor = outer.start;
    for p in periods {
        if p.start > cursor {
            let end = if p.start < outer.end {
                p.start
            } else {
                outer.end
            };
            if cursor < end {
                gaps.push(Interval::new(cursor, end));
            }
        }
        if p.end > cursor {
            cursor = p.end;
        }
    }
    if cursor < outer.end {
        gaps.push(Interval::new(cursor, outer.end));
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scales::TT;

    fn span(a: f64, b: f64) -> Period<TT> {
        Period::new(Time::new(a), Time::new(b))
    }

    #[test]
    fn contains_is_half_open() {
        let p = span(0.0, 100.0);
        assert!(p.contains(Time::new(0.0)));
        assert!(p.contains(Time::new(99.999)));
        assert!(!p.contains(Time::new(100.0)));
        assert!(!p.contains(Time::new(-0.001)));
    }

    #[test]
    fn duration_in_seconds() {
        assert_eq!(span(150.0, 250.0).duration(), Seconds::new(100.0));
    }

    #[test]
    fn distance_to_edges() {
        let p = span(150.0, 250.0);
        assert_eq!(p.distance_to(Time::new(120.0)), Seconds::new(30.0));
        assert_eq!(p.distance_to(Time::new(260.0)), Seconds::new(10.0));
        assert_eq!(p.distance_to(Time::new(250.0)), Seconds::new(0.0));
        assert_eq!(p.distance_to(Time::new(200.0)), Seconds::new(0.0));
    }

    #[test]
    fn intersection_overlap_and_touching() {
        let overlap = span(0.0, 5.0).intersection(&span(3.0, 8.0)).expect("expected overlap");
        assert_eq!(overlap, span(3.0, 5.0));
        assert_eq!(span(0.0, 3.0).intersection(&span(3.0, 8.0)), None);
    }

    #[test]
    fn complement_within_gaps() {
        let gaps = complement_within(span(0.0, 10.0), &[span(2.0, 4.0), span(6.0, 8.0)]);
        assert_eq!(gaps, vec![span(0.0, 2.0), span(4.0, 6.0), span(8.0, 10.0)]);
    }

    #[test]
    fn complement_within_overlapping_and_outside() {
        let gaps = complement_within(
            span(0.0, 10.0),
            &[span(-5.0, 3.0), span(2.0, 4.0), span(12.0, 20.0)],
        );
        assert_eq!(gaps, vec![span(4.0, 10.0)]);
    }

    #[test]
    fn complement_within_full_and_empty() {
        assert!(complement_within(span(0.0, 10.0), &[span(0.0, 10.0)]).is_empty());
        assert_eq!(complement_within(span(0.0, 10.0), &[]), vec![span(0.0, 10.0)]);
    }

    #[test]
    fn display_is_half_open() {
        let s = format!("{}", span(0.0, 1.0));
        assert!(s.starts_with('['));
        assert!(s.ends_with(')'));
    }
}
