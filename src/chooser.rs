// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Ephemeris candidate set and selection.
//!
//! An [`EphemerisSet`] is a plain insertion-ordered arena of immutable
//! ephemerides.  [`EphemerisSet::select`] picks the one to use at a time `t`:
//!
//! 1. Ephemerides whose validity interval `[since, until)` contains `t` are
//!    candidates.  Among several, the narrowest interval wins; equal widths
//!    go to the ephemeris inserted last.
//! 2. If none covers `t`, [`ChooserMode::Strict`] fails with
//!    [`PhaseError::EphemerisGap`], naming the nearest interval on each side.
//! 3. [`ChooserMode::Lenient`] instead extrapolates the ephemeris whose
//!    interval edge is closest to `t`.  On equal distance the ephemeris lying
//!    after `t` wins, then the narrowest, then the one inserted last.  The
//!    result is marked [`Fit::Extrapolated`].
//!
//! Selection is a pure read; loading is append-only.

use crate::ephemeris::{Ephemeris, EphemerisSpec};
use crate::error::{PhaseError, Result, Span};
use crate::instant::{Time, TimeSystem};
use crate::period::{complement_within, Period};
use qtty::Seconds;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Behaviour when no ephemeris covers the requested time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChooserMode {
    /// Fail with [`PhaseError::EphemerisGap`].
    #[default]
    Strict,
    /// Extrapolate the nearest ephemeris.
    Lenient,
}

impl From<bool> for ChooserMode {
    /// `true` means strict.
    fn from(strict: bool) -> Self {
        if strict {
            ChooserMode::Strict
        } else {
            ChooserMode::Lenient
        }
    }
}

/// How well the selected ephemeris matches the requested time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fit {
    /// The time lies inside the validity interval.
    Exact,
    /// The time lies `distance` outside the validity interval.
    Extrapolated { distance: Seconds },
}

impl Fit {
    pub fn is_exact(&self) -> bool {
        matches!(self, Fit::Exact)
    }
}

/// Outcome of a successful selection.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a, S: TimeSystem> {
    pub ephemeris: &'a Ephemeris<S>,
    /// Insertion index within the set.
    pub index: usize,
    pub fit: Fit,
}

/// Insertion-ordered collection of ephemerides for one source.
#[derive(Debug, Clone)]
pub struct EphemerisSet<S: TimeSystem> {
    ephemerides: Vec<Ephemeris<S>>,
}

impl<S: TimeSystem> Default for EphemerisSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSystem> EphemerisSet<S> {
    pub fn new() -> Self {
        Self {
            ephemerides: Vec::new(),
        }
    }

    /// Append an already validated ephemeris.
    pub fn insert(&mut self, ephemeris: Ephemeris<S>) {
        debug!(
            index = self.ephemerides.len(),
            origin = ?ephemeris.origin(),
            since = ephemeris.validity().start.value(),
            until = ephemeris.validity().end.value(),
            "Inserted ephemeris"
        );
        self.ephemerides.push(ephemeris);
    }

    /// Normalise `spec` and append it.
    pub fn insert_spec(&mut self, spec: EphemerisSpec<S>) -> Result<()> {
        self.insert(Ephemeris::from_spec(spec)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ephemerides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ephemerides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Ephemeris<S>> {
        self.ephemerides.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ephemeris<S>> {
        self.ephemerides.iter()
    }

    /// Choose the ephemeris to use at `t`.
    pub fn select(&self, t: Time<S>, mode: ChooserMode) -> Result<Selection<'_, S>> {
        if self.ephemerides.is_empty() {
            return Err(PhaseError::NoEphemeris);
        }

        if let Some((index, ephemeris)) = self.best_covering(t) {
            return Ok(Selection {
                ephemeris,
                index,
                fit: Fit::Exact,
            });
        }

        match mode {
            ChooserMode::Strict => Err(self.gap_error(t)),
            ChooserMode::Lenient => {
                let (index, ephemeris) = self.nearest(t).ok_or(PhaseError::NoEphemeris)?;
                let distance = ephemeris.validity().distance_to(t);
                warn!(
                    time = t.value(),
                    index = index,
                    distance = distance.value(),
                    "No ephemeris covers time; extrapolating nearest"
                );
                Ok(Selection {
                    ephemeris,
                    index,
                    fit: Fit::Extrapolated { distance },
                })
            }
        }
    }

    /// Parts of `span` no ephemeris covers, in chronological order.
    pub fn coverage_gaps(&self, span: Period<S>) -> Vec<Period<S>> {
        let mut intervals: Vec<Period<S>> = self
            .ephemerides
            .iter()
            .filter_map(|e| e.validity().intersection(&span))
            .collect();
        intervals.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
        complement_within(span, &intervals)
    }

    fn best_covering(&self, t: Time<S>) -> Option<(usize, &Ephemeris<S>)> {
        let mut best: Option<(usize, &Ephemeris<S>)> = None;
        for (index, ephemeris) in self.ephemerides.iter().enumerate() {
            if !ephemeris.validity().contains(t) {
                continue;
            }
            let width = ephemeris.validity().duration();
            // Equal widths fall through, so the later insertion wins.
            match best {
                Some((_, current)) if width > current.validity().duration() => {}
                _ => best = Some((index, ephemeris)),
            }
        }
        best
    }

    fn nearest(&self, t: Time<S>) -> Option<(usize, &Ephemeris<S>)> {
        let mut best: Option<(usize, &Ephemeris<S>)> = None;
        for (index, ephemeris) in self.ephemerides.iter().enumerate() {
            let replace = match best {
                None => true,
                Some((_, current)) => prefer_when_extrapolating(ephemeris, current, t),
            };
            if replace {
                best = Some((index, ephemeris));
            }
        }
        best
    }

    fn gap_error(&self, t: Time<S>) -> PhaseError {
        let before = self
            .ephemerides
            .iter()
            .map(|e| e.validity())
            .filter(|v| v.end <= t)
            .fold(None, |acc: Option<Period<S>>, v| match acc {
                Some(a) if a.end >= v.end => Some(a),
                _ => Some(v),
            });
        let after = self
            .ephemerides
            .iter()
            .map(|e| e.validity())
            .filter(|v| v.start > t)
            .fold(None, |acc: Option<Period<S>>, v| match acc {
                Some(a) if a.start <= v.start => Some(a),
                _ => Some(v),
            });
        PhaseError::EphemerisGap {
            time: t.value(),
            before: before.map(to_span),
            after: after.map(to_span),
        }
    }
}

/// Whether `candidate`, inserted after `current`, should replace it as the
/// extrapolation choice for `t`.
fn prefer_when_extrapolating<S: TimeSystem>(
    candidate: &Ephemeris<S>,
    current: &Ephemeris<S>,
    t: Time<S>,
) -> bool {
    let (cand, cur) = (candidate.validity(), current.validity());
    let (cand_distance, cur_distance) = (cand.distance_to(t), cur.distance_to(t));
    if cand_distance != cur_distance {
        return cand_distance < cur_distance;
    }
    let (cand_after, cur_after) = (cand.start > t, cur.start > t);
    if cand_after != cur_after {
        return cand_after;
    }
    cand.duration() <= cur.duration()
}

fn to_span<S: TimeSystem>(period: Period<S>) -> Span {
    Span {
        since: period.start.value(),
        until: period.end.value(),
    }
}

impl<'a, S: TimeSystem> IntoIterator for &'a EphemerisSet<S> {
    type Item = &'a Ephemeris<S>;
    type IntoIter = std::slice::Iter<'a, Ephemeris<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: TimeSystem> Extend<Ephemeris<S>> for EphemerisSet<S> {
    fn extend<I: IntoIterator<Item = Ephemeris<S>>>(&mut self, iter: I) {
        for ephemeris in iter {
            self.insert(ephemeris);
        }
    }
}

impl<S: TimeSystem> FromIterator<Ephemeris<S>> for EphemerisSet<S> {
    fn from_iter<I: IntoIterator<Item = Ephemeris<S>>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
