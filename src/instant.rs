// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-system parameterised instant.
//!
//! [`Time<S>`] stores mission elapsed time (MET) as a [`Seconds`] quantity
//! whose *system* is fixed by the compile-time marker `S: TimeSystem`.
//! Differences between two instants of the same system are plain
//! [`Seconds`], which is the `dt` every timing-model formula works with.
//!
//! Epochs supplied as Modified Julian Dates are mapped onto the MET axis
//! through the mission reference epoch ([`MJD_REF`]); this is a change of
//! counter only and never a change of time system.

use crate::error::PhaseError;
use crate::scales::TimeSystemKind;
use qtty::{Day, Days, Second, Seconds};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Sub};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// MJD of MET zero (2001-01-01T00:00:00 UTC expressed on the TT axis).
pub const MJD_REF: Days = Days::new(51_910.0 + 7.428_703_703_703_703e-4);

// ═══════════════════════════════════════════════════════════════════════════
// TimeSystem trait
// ═══════════════════════════════════════════════════════════════════════════

/// Marker trait for time systems.
pub trait TimeSystem: Copy + Clone + fmt::Debug + PartialEq + PartialOrd + Send + Sync + 'static {
    /// Display label used by [`Time`] formatting.
    const LABEL: &'static str;

    /// Run-time tag matching this marker.
    const KIND: TimeSystemKind;
}

// ═══════════════════════════════════════════════════════════════════════════
// TimeFormat
// ═══════════════════════════════════════════════════════════════════════════

/// Representation a user-supplied epoch is written in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum TimeFormat {
    /// Mission elapsed seconds.
    #[default]
    Met,
    /// Modified Julian Date in days.
    Mjd,
}

impl FromStr for TimeFormat {
    type Err = PhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MET" | "GLAST" | "FERMI" => Ok(TimeFormat::Met),
            "MJD" => Ok(TimeFormat::Mjd),
            _ => Err(PhaseError::UnsupportedTimeFormat(s.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Time<S>
// ═══════════════════════════════════════════════════════════════════════════

/// A point on the MET axis of time system `S`.
///
/// `PhantomData` is zero-sized, so `Time<S>` is layout-identical to
/// [`Seconds`] (a single `f64`).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Time<S: TimeSystem> {
    quantity: Seconds,
    _system: PhantomData<S>,
}

impl<S: TimeSystem> Time<S> {
    /// Create from raw mission elapsed seconds.
    #[inline]
    pub const fn new(met: f64) -> Self {
        Self {
            quantity: Seconds::new(met),
            _system: PhantomData,
        }
    }

    /// Create from a [`Seconds`] quantity.
    #[inline]
    pub const fn from_seconds(seconds: Seconds) -> Self {
        Self {
            quantity: seconds,
            _system: PhantomData,
        }
    }

    /// Map a Modified Julian Date onto the MET axis.
    pub fn from_mjd(mjd: Days) -> Self {
        Self::from_seconds((mjd - MJD_REF).to::<Second>())
    }

    /// Interpret `value` according to `format`.
    pub fn from_format(value: f64, format: TimeFormat) -> Self {
        match format {
            TimeFormat::Met => Self::new(value),
            TimeFormat::Mjd => Self::from_mjd(Days::new(value)),
        }
    }

    /// The underlying quantity in seconds.
    #[inline]
    pub const fn quantity(&self) -> Seconds {
        self.quantity
    }

    /// The underlying scalar value in seconds.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    /// This instant as a Modified Julian Date.
    pub fn to_mjd(&self) -> Days {
        MJD_REF + self.quantity.to::<Day>()
    }
}

impl<S: TimeSystem> fmt::Display for Time<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MET {}", S::LABEL, self.quantity)
    }
}

#[cfg(feature = "serde")]
impl<S: TimeSystem> Serialize for Time<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.serialize_f64(self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de, S: TimeSystem> Deserialize<'de> for Time<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = f64::deserialize(deserializer)?;
        Ok(Self::new(v))
    }
}

impl<S: TimeSystem> Add<Seconds> for Time<S> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Seconds) -> Self::Output {
        Self::from_seconds(self.quantity + rhs)
    }
}

impl<S: TimeSystem> Sub<Seconds> for Time<S> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Seconds) -> Self::Output {
        Self::from_seconds(self.quantity - rhs)
    }
}

impl<S: TimeSystem> Sub for Time<S> {
    type Output = Seconds;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TimeInstant trait
// ═══════════════════════════════════════════════════════════════════════════

/// Trait for types that represent a point in time.
///
/// Types implementing this trait can be used as endpoints of an
/// [`Interval`](crate::Interval).
pub trait TimeInstant: Copy + Clone + PartialEq + PartialOrd + Sized {
    /// The duration type used for arithmetic operations.
    type Duration;

    /// Compute the difference between two time instants.
    fn difference(&self, other: &Self) -> Self::Duration;

    /// Add a duration to this time instant.
    fn add_duration(&self, duration: Self::Duration) -> Self;
}

impl<S: TimeSystem> TimeInstant for Time<S> {
    type Duration = Seconds;

    #[inline]
    fn difference(&self, other: &Self) -> Self::Duration {
        *self - *other
    }

    #[inline]
    fn add_duration(&self, duration: Self::Duration) -> Self {
        *self + duration
    }
}
