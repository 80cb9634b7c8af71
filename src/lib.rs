// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Pulsar Phase Module
//!
//! This crate assigns rotational (pulse) and orbital phases to event times
//! from a pulsar timing model.
//!
//! # Core types
//!
//! - [`Time<S>`] — mission elapsed time parameterised by a [`TimeSystem`] marker.
//! - [`Period<S>`] — a half-open validity interval `[since, until)`.
//! - [`FrequencyCoeff`] / [`PeriodCoeff`] — second-order Taylor coefficients,
//!   convertible into each other.
//! - [`Ephemeris<S>`] — one validity-bounded timing solution, built from any
//!   [`EphemerisSpec`] style.
//! - [`EphemerisSet<S>`] — the candidate ephemerides of one source, with
//!   [`select`](EphemerisSet::select).
//! - [`PhaseConfig`] — explicit run configuration.
//!
//! # Phase evaluation
//!
//! ```
//! use pulsephase::{compute_all, ChooserMode, Ephemeris, EphemerisSet, FrequencyCoeff, Period, Time, TDB};
//!
//! let eph = Ephemeris::frequency(
//!     Period::new(Time::<TDB>::new(0.0), Time::new(1_000.0)),
//!     Time::new(123.456789),
//!     0.11,
//!     FrequencyCoeff::new(1.125e-2, -2.25e-4, 6.75e-6),
//! )
//! .unwrap();
//! let set: EphemerisSet<TDB> = [eph].into_iter().collect();
//!
//! let phases = compute_all(&[Time::new(223.456789)], &set, ChooserMode::Strict, 0.0);
//! assert!((phases[0].as_ref().unwrap().phase - 0.235).abs() < 1e-8);
//! ```
//!
//! # Time systems
//!
//! | Marker | System |
//! |--------|--------|
//! | [`TT`] | Terrestrial Time |
//! | [`TDB`] | Barycentric Dynamical Time |

mod chooser;
mod coeff;
mod config;
mod database;
mod driver;
mod ephemeris;
mod error;
pub(crate) mod instant;
mod period;
pub(crate) mod scales;
mod timing;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use chooser::{ChooserMode, EphemerisSet, Fit, Selection};
pub use coeff::{
    invert, invert_frequency_to_period, invert_period_to_frequency, FrequencyCoeff, PeriodCoeff,
};
pub use config::{EphemerisStyle, PhaseConfig};
pub use database::{OrbitalRecord, PulsarDb, PulsarRecord, RemarkRecord, ANY_PULSAR};
#[cfg(feature = "parallel")]
pub use driver::compute_all_par;
pub use driver::{
    compute_all, compute_phase, history_line, EphemerisStatus, PhaseComputer, PhaseResult,
    RunSummary,
};
pub use ephemeris::{Ephemeris, EphemerisSpec, Origin};
pub use error::{PhaseError, Result, Span};
pub use instant::{Time, TimeFormat, TimeInstant, TimeSystem, MJD_REF};
pub use period::{complement_within, Interval, Period};
pub use scales::{TimeSystemKind, TDB, TT};
pub use timing::{calc_pdot_corr, calc_phase, wrap_phase};
