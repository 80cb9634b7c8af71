// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for timing-model construction and ephemeris selection.

use std::fmt;
use thiserror::Error;

/// Bounds of a validity interval in MET seconds, carried by errors so they
/// stay independent of the time-system marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub since: f64,
    pub until: f64,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.since, self.until)
    }
}

fn describe(span: &Option<Span>) -> String {
    match span {
        Some(s) => s.to_string(),
        None => "none".to_string(),
    }
}

/// Errors raised by this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    #[error("{what} must be positive, got {value}")]
    InvalidEphemeris { what: &'static str, value: f64 },

    #[error("invalid validity interval: valid_until {until} does not follow valid_since {since}")]
    InvalidInterval { since: f64, until: f64 },

    #[error(
        "no ephemeris covers time {time} (nearest before: {}, nearest after: {})",
        describe(.before),
        describe(.after)
    )]
    EphemerisGap {
        time: f64,
        before: Option<Span>,
        after: Option<Span>,
    },

    #[error("no ephemeris loaded")]
    NoEphemeris,

    #[error("ephemeris style \"{0}\" is not supported")]
    UnsupportedStyle(String),

    #[error("time format \"{0}\" is not supported")]
    UnsupportedTimeFormat(String),

    #[error("time system \"{0}\" is not supported")]
    UnsupportedTimeSystem(String),

    #[error("configuration names time system {found}, but events are in {expected}")]
    TimeSystemMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("no ephemeris found for pulsar {0}")]
    UnknownPulsar(String),

    #[error("pulsar database error: {0}")]
    Database(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PhaseError>;
