// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Phase computation over event lists.
//!
//! Every event is processed independently: select an ephemeris, evaluate
//! the timing model, add the global offset, wrap into `[0, 1)`.  The
//! candidate set is only read, so the per-event loop can run on any number
//! of threads (`parallel` feature) and still yields results identical to
//! the sequential loop, in event order.
//!
//! A gap in strict mode is reported per event; whether that aborts a run or
//! skips the event is left to the caller.

use crate::chooser::{ChooserMode, EphemerisSet, Fit};
use crate::database::RemarkRecord;
use crate::error::{PhaseError, Result};
use crate::instant::{Time, TimeSystem};
use crate::period::Period;
use crate::timing::{calc_pdot_corr, calc_phase, wrap_phase};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Phase of one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseResult {
    /// Phase in `[0, 1)`, global offset included.
    pub phase: f64,
    /// Whether the ephemeris covered the event or was extrapolated.
    pub fit: Fit,
    /// Insertion index of the ephemeris used.
    pub index: usize,
}

/// Phase of a single event time.
pub fn compute_phase<S: TimeSystem>(
    set: &EphemerisSet<S>,
    t: Time<S>,
    mode: ChooserMode,
    global_offset: f64,
) -> Result<PhaseResult> {
    let selection = set.select(t, mode)?;
    let raw = calc_phase(selection.ephemeris, t);
    Ok(PhaseResult {
        phase: wrap_phase(raw + global_offset),
        fit: selection.fit,
        index: selection.index,
    })
}

/// Phases of all `events`, in order.
pub fn compute_all<S: TimeSystem>(
    events: &[Time<S>],
    set: &EphemerisSet<S>,
    mode: ChooserMode,
    global_offset: f64,
) -> Vec<Result<PhaseResult>> {
    debug!(
        events = events.len(),
        ephemerides = set.len(),
        mode = ?mode,
        global_offset,
        "Computing phases"
    );
    events
        .iter()
        .map(|&t| compute_phase(set, t, mode, global_offset))
        .collect()
}

/// Same as [`compute_all`], spread over the rayon thread pool.
#[cfg(feature = "parallel")]
pub fn compute_all_par<S: TimeSystem>(
    events: &[Time<S>],
    set: &EphemerisSet<S>,
    mode: ChooserMode,
    global_offset: f64,
) -> Vec<Result<PhaseResult>> {
    debug!(
        events = events.len(),
        ephemerides = set.len(),
        mode = ?mode,
        global_offset,
        "Computing phases in parallel"
    );
    events
        .par_iter()
        .map(|&t| compute_phase(set, t, mode, global_offset))
        .collect()
}

/// Condition of the ephemerides over the span of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum EphemerisStatus {
    /// No spin ephemeris covers `[since, until)`.
    Unavailable { since: f64, until: f64 },
    /// A database remark is in effect during the run.
    Remarked {
        since: f64,
        until: f64,
        description: String,
    },
}

impl fmt::Display for EphemerisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemerisStatus::Unavailable { since, until } => {
                write!(f, "No spin ephemeris available over [{since}, {until})")
            }
            EphemerisStatus::Remarked {
                since,
                until,
                description,
            } => write!(f, "Remarked over [{since}, {until}): {description}"),
        }
    }
}

/// Spin and orbital ephemerides of one pulsar, ready for evaluation.
#[derive(Debug, Clone)]
pub struct PhaseComputer<S: TimeSystem> {
    spin: EphemerisSet<S>,
    orbital: EphemerisSet<S>,
    remarks: Vec<RemarkRecord>,
    mode: ChooserMode,
}

impl<S: TimeSystem> PhaseComputer<S> {
    pub fn new(spin: EphemerisSet<S>, mode: ChooserMode) -> Self {
        Self {
            spin,
            orbital: EphemerisSet::new(),
            remarks: Vec::new(),
            mode,
        }
    }

    pub fn with_orbital(mut self, orbital: EphemerisSet<S>) -> Self {
        self.orbital = orbital;
        self
    }

    pub fn with_remarks(mut self, remarks: Vec<RemarkRecord>) -> Self {
        self.remarks = remarks;
        self
    }

    pub fn spin(&self) -> &EphemerisSet<S> {
        &self.spin
    }

    pub fn orbital(&self) -> &EphemerisSet<S> {
        &self.orbital
    }

    pub fn mode(&self) -> ChooserMode {
        self.mode
    }

    pub fn calc_pulse_phase(&self, t: Time<S>, phase_offset: f64) -> Result<f64> {
        compute_phase(&self.spin, t, self.mode, phase_offset).map(|r| r.phase)
    }

    pub fn calc_orbital_phase(&self, t: Time<S>, phase_offset: f64) -> Result<f64> {
        compute_phase(&self.orbital, t, self.mode, phase_offset).map(|r| r.phase)
    }

    /// Spin-down corrected time of `t` under the selected spin ephemeris.
    pub fn calc_pdot_corr(&self, t: Time<S>) -> Result<Time<S>> {
        let selection = self.spin.select(t, self.mode)?;
        Ok(calc_pdot_corr(selection.ephemeris, t))
    }

    pub fn pulse_phases(&self, events: &[Time<S>], phase_offset: f64) -> Vec<Result<PhaseResult>> {
        compute_all(events, &self.spin, self.mode, phase_offset)
    }

    /// Spin coverage gaps and remarks in effect over `span`, each logged at
    /// `warn!`.  Gaps come first, in chronological order.
    pub fn ephemeris_status(&self, span: Period<S>) -> Vec<EphemerisStatus> {
        let gaps = self
            .spin
            .coverage_gaps(span)
            .into_iter()
            .map(|gap| EphemerisStatus::Unavailable {
                since: gap.start.value(),
                until: gap.end.value(),
            });
        let remarks = self.remarks.iter().filter_map(|remark| {
            remark
                .validity::<S>()
                .intersection(&span)
                .map(|_| EphemerisStatus::Remarked {
                    since: remark.valid_since,
                    until: remark.valid_until,
                    description: remark.description.clone(),
                })
        });
        let status: Vec<EphemerisStatus> = gaps.chain(remarks).collect();
        for entry in &status {
            warn!(%entry, "Ephemeris status");
        }
        status
    }

    pub fn orbital_phases(
        &self,
        events: &[Time<S>],
        phase_offset: f64,
    ) -> Vec<Result<PhaseResult>> {
        compute_all(events, &self.orbital, self.mode, phase_offset)
    }
}

/// Tally of a run, for status reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub exact: usize,
    pub extrapolated: usize,
    pub gaps: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn tally(results: &[Result<PhaseResult>]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result {
                Ok(PhaseResult {
                    fit: Fit::Exact, ..
                }) => summary.exact += 1,
                Ok(_) => summary.extrapolated += 1,
                Err(PhaseError::EphemerisGap { .. }) => summary.gaps += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.exact + self.extrapolated + self.gaps + self.failed
    }

    /// Whether every event was covered by an ephemeris.
    pub fn is_clean(&self) -> bool {
        self.exact == self.total()
    }
}

/// History line recorded in the header of a modified event file.
pub fn history_line(creator: &str, at: DateTime<Utc>) -> String {
    format!(
        "File modified by {creator} on {}",
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
