// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Frequency ⇄ period Taylor coefficients.
//!
//! A spin (or orbit) is described to second order either by its frequency
//! `f(t) = f0 + f1·dt + f2·dt²/2` or by its period `p(t) = 1/f(t)` expanded
//! the same way.  Differentiating `p = 1/f` twice gives
//!
//! ```text
//! p0 =  1 / f0
//! p1 = -f1 / f0²
//! p2 =  2·f1² / f0³ − f2 / f0²
//! ```
//!
//! and, since `f = 1/p`, the identical formula with `f` and `p` exchanged
//! maps periods back to frequencies.  Both directions share [`invert`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Frequency `f0` (cycles/s) and its first two time derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrequencyCoeff {
    pub f0: f64,
    pub f1: f64,
    pub f2: f64,
}

/// Period `p0` (s/cycle) and its first two time derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeriodCoeff {
    pub p0: f64,
    pub p1: f64,
    pub p2: f64,
}

impl FrequencyCoeff {
    pub const fn new(f0: f64, f1: f64, f2: f64) -> Self {
        Self { f0, f1, f2 }
    }

    /// Equivalent period-domain coefficients. `f0` must be non-zero.
    pub fn to_period(self) -> PeriodCoeff {
        let (p0, p1, p2) = invert(self.f0, self.f1, self.f2);
        PeriodCoeff { p0, p1, p2 }
    }
}

impl PeriodCoeff {
    pub const fn new(p0: f64, p1: f64, p2: f64) -> Self {
        Self { p0, p1, p2 }
    }

    /// Equivalent frequency-domain coefficients. `p0` must be non-zero.
    pub fn to_frequency(self) -> FrequencyCoeff {
        let (f0, f1, f2) = invert(self.p0, self.p1, self.p2);
        FrequencyCoeff { f0, f1, f2 }
    }
}

impl From<PeriodCoeff> for FrequencyCoeff {
    fn from(p: PeriodCoeff) -> Self {
        p.to_frequency()
    }
}

impl From<FrequencyCoeff> for PeriodCoeff {
    fn from(f: FrequencyCoeff) -> Self {
        f.to_period()
    }
}

/// Reciprocal Taylor series to second order.
///
/// Dividing by a zero `c0` is a caller bug; ephemeris construction rejects
/// non-positive zeroth-order terms before this is reached.
#[inline]
pub fn invert(c0: f64, c1: f64, c2: f64) -> (f64, f64, f64) {
    let c0_squared = c0 * c0;
    let r0 = 1.0 / c0;
    let r1 = -c1 / c0_squared;
    let r2 = 2.0 * c1 * c1 / (c0_squared * c0) - c2 / c0_squared;
    (r0, r1, r2)
}

/// Frequency coefficients to period coefficients, as a tuple.
pub fn invert_frequency_to_period(f0: f64, f1: f64, f2: f64) -> (f64, f64, f64) {
    invert(f0, f1, f2)
}

/// Period coefficients to frequency coefficients, as a tuple.
pub fn invert_period_to_frequency(p0: f64, p1: f64, p2: f64) -> (f64, f64, f64) {
    invert(p0, p1, p2)
}
