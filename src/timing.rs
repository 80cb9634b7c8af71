// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Taylor-series timing model.
//!
//! For an ephemeris with epoch `t0`, phase `φ0` and frequency coefficients
//! `(f0, f1, f2)`, the accumulated phase at `t` is
//!
//! ```text
//! φ(t) = φ0 + f0·dt + f1/2·dt² + f2/6·dt³,    dt = t − t0
//! ```
//!
//! and the reported pulse phase is its fractional part in `[0, 1)`.
//! The evaluation order below is fixed: results are reproducible bit for
//! bit across platforms with IEEE-754 doubles.

use crate::ephemeris::Ephemeris;
use crate::instant::{Time, TimeSystem};
use qtty::Seconds;

/// Fractional part of `x`, wrapped into `[0, 1)`.
///
/// The integer cycle count is discarded by truncation (`x − trunc(x)`, exact
/// in binary floating point), and negative remainders are shifted up by one.
#[inline]
pub fn wrap_phase(x: f64) -> f64 {
    let mut phase = x.fract();
    if phase < 0.0 {
        phase += 1.0;
        // -1e-17 + 1.0 rounds to 1.0
        if phase >= 1.0 {
            phase = 0.0;
        }
    }
    phase
}

/// Pulse phase of `ephemeris` at `t`, in `[0, 1)`.
pub fn calc_phase<S: TimeSystem>(ephemeris: &Ephemeris<S>, t: Time<S>) -> f64 {
    let coeff = ephemeris.frequency_coeff();
    let dt = (t - ephemeris.epoch()).value();
    let dt_squared = dt * dt;
    wrap_phase(
        ephemeris.phi0()
            + coeff.f0 * dt
            + coeff.f1 / 2.0 * dt_squared
            + coeff.f2 / 6.0 * dt * dt_squared,
    )
}

/// Spin-down ("pdot") corrected time.
///
/// Returns the time at which a source spinning steadily at `f0` would have
/// accumulated the same number of cycles since the epoch as the modelled
/// source has at `t`:
///
/// ```text
/// t' = t + (f1/2·dt² + f2/6·dt³) / f0
/// ```
///
/// With `f1 = f2 = 0` this is `t` itself.
pub fn calc_pdot_corr<S: TimeSystem>(ephemeris: &Ephemeris<S>, t: Time<S>) -> Time<S> {
    let coeff = ephemeris.frequency_coeff();
    let dt = (t - ephemeris.epoch()).value();
    let dt_squared = dt * dt;
    let excess_cycles = coeff.f1 / 2.0 * dt_squared + coeff.f2 / 6.0 * dt * dt_squared;
    t + Seconds::new(excess_cycles / coeff.f0)
}

impl<S: TimeSystem> Ephemeris<S> {
    /// See [`calc_phase`].
    #[inline]
    pub fn calc_phase(&self, t: Time<S>) -> f64 {
        calc_phase(self, t)
    }

    /// See [`calc_pdot_corr`].
    #[inline]
    pub fn calc_pdot_corr(&self, t: Time<S>) -> Time<S> {
        calc_pdot_corr(self, t)
    }
}
