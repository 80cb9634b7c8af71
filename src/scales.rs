// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-system marker types.
//!
//! Each zero-sized type identifies the time system event times and
//! ephemeris epochs are expressed in.  Pulse phase is only meaningful when
//! events and ephemerides share one system, so the marker is carried in the
//! type of every instant and the compiler rejects mixed queries.
//!
//! | Marker | Description |
//! |--------|-------------|
//! | [`TT`]  | Terrestrial Time (topocentric or geocentric event times) |
//! | [`TDB`] | Barycentric Dynamical Time (barycentred event times) |
//!
//! No conversion between systems is offered here; barycentring and
//! leap-second handling happen before times reach this crate.

use crate::error::PhaseError;
use crate::instant::TimeSystem;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Run-time tag of a time system, as named in configuration and file headers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TimeSystemKind {
    Tt,
    Tdb,
}

impl TimeSystemKind {
    /// Header label of the system (`TIMESYS` keyword value).
    pub const fn label(self) -> &'static str {
        match self {
            TimeSystemKind::Tt => "TT",
            TimeSystemKind::Tdb => "TDB",
        }
    }
}

impl fmt::Display for TimeSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSystemKind {
    type Err = PhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TT" => Ok(TimeSystemKind::Tt),
            "TDB" => Ok(TimeSystemKind::Tdb),
            _ => Err(PhaseError::UnsupportedTimeSystem(s.to_string())),
        }
    }
}

/// Terrestrial Time.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct TT;

impl TimeSystem for TT {
    const LABEL: &'static str = "TT";
    const KIND: TimeSystemKind = TimeSystemKind::Tt;
}

/// Barycentric Dynamical Time.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct TDB;

impl TimeSystem for TDB {
    const LABEL: &'static str = "TDB";
    const KIND: TimeSystemKind = TimeSystemKind::Tdb;
}
