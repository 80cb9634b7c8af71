// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Validity-bounded timing solutions.
//!
//! Ephemerides arrive in several styles: frequency coefficients typed in
//! by a user, period coefficients typed in by a user, rows of a pulsar
//! database, or a binary orbit.  All of them are described by
//! [`EphemerisSpec`] and normalised once, at construction, into the single
//! canonical [`Ephemeris`] (frequency coefficients on a validity interval).
//! Nothing downstream needs to know which style an ephemeris came from
//! except for reporting, which reads [`Ephemeris::origin`].

use crate::coeff::{FrequencyCoeff, PeriodCoeff};
use crate::database::{OrbitalRecord, PulsarRecord};
use crate::error::{PhaseError, Result};
use crate::instant::{Time, TimeSystem};
use crate::period::Period;
use crate::timing::wrap_phase;

/// Style an ephemeris was specified in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Frequency,
    Period,
    Database,
    Orbital,
}

/// Every way an ephemeris can be specified.
#[derive(Debug, Clone, PartialEq)]
pub enum EphemerisSpec<S: TimeSystem> {
    Frequency {
        validity: Period<S>,
        epoch: Time<S>,
        phi0: f64,
        coeff: FrequencyCoeff,
    },
    Period {
        validity: Period<S>,
        epoch: Time<S>,
        phi0: f64,
        coeff: PeriodCoeff,
    },
    Database(PulsarRecord),
    Orbital(OrbitalRecord),
}

/// One timing solution in canonical form; immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ephemeris<S: TimeSystem> {
    validity: Period<S>,
    epoch: Time<S>,
    phi0: f64,
    coeff: FrequencyCoeff,
    origin: Origin,
}

impl<S: TimeSystem> Ephemeris<S> {
    /// Normalise any [`EphemerisSpec`].
    ///
    /// Fails with [`PhaseError::InvalidEphemeris`] when the zeroth-order
    /// coefficient (frequency, period or orbital period) is not strictly
    /// positive, and with [`PhaseError::InvalidInterval`] when the validity
    /// interval is empty or reversed.
    pub fn from_spec(spec: EphemerisSpec<S>) -> Result<Self> {
        match spec {
            EphemerisSpec::Frequency {
                validity,
                epoch,
                phi0,
                coeff,
            } => {
                require_positive("frequency", coeff.f0)?;
                Self::build(validity, epoch, phi0, coeff, Origin::Frequency)
            }
            EphemerisSpec::Period {
                validity,
                epoch,
                phi0,
                coeff,
            } => {
                require_positive("period", coeff.p0)?;
                Self::build(validity, epoch, phi0, coeff.to_frequency(), Origin::Period)
            }
            EphemerisSpec::Database(record) => {
                require_positive("frequency", record.f0)?;
                Self::build(
                    Period::new(Time::new(record.valid_since), Time::new(record.valid_until)),
                    Time::new(record.epoch),
                    record.phi0,
                    FrequencyCoeff::new(record.f0, record.f1, record.f2),
                    Origin::Database,
                )
            }
            EphemerisSpec::Orbital(record) => {
                require_positive("orbital period", record.pb)?;
                let coeff = PeriodCoeff::new(record.pb, record.pbdot, record.pb2dot);
                Self::build(
                    Period::new(Time::new(record.valid_since), Time::new(record.valid_until)),
                    Time::new(record.t0),
                    0.0,
                    coeff.to_frequency(),
                    Origin::Orbital,
                )
            }
        }
    }

    /// Frequency-style constructor.
    pub fn frequency(
        validity: Period<S>,
        epoch: Time<S>,
        phi0: f64,
        coeff: FrequencyCoeff,
    ) -> Result<Self> {
        Self::from_spec(EphemerisSpec::Frequency {
            validity,
            epoch,
            phi0,
            coeff,
        })
    }

    /// Period-style constructor.
    pub fn period(
        validity: Period<S>,
        epoch: Time<S>,
        phi0: f64,
        coeff: PeriodCoeff,
    ) -> Result<Self> {
        Self::from_spec(EphemerisSpec::Period {
            validity,
            epoch,
            phi0,
            coeff,
        })
    }

    fn build(
        validity: Period<S>,
        epoch: Time<S>,
        phi0: f64,
        coeff: FrequencyCoeff,
        origin: Origin,
    ) -> Result<Self> {
        if !(validity.start < validity.end) {
            return Err(PhaseError::InvalidInterval {
                since: validity.start.value(),
                until: validity.end.value(),
            });
        }
        Ok(Self {
            validity,
            epoch,
            phi0: wrap_phase(phi0),
            coeff,
            origin,
        })
    }

    #[inline]
    pub fn validity(&self) -> Period<S> {
        self.validity
    }

    #[inline]
    pub fn epoch(&self) -> Time<S> {
        self.epoch
    }

    /// Phase at the epoch, in `[0, 1)`.
    #[inline]
    pub fn phi0(&self) -> f64 {
        self.phi0
    }

    #[inline]
    pub fn frequency_coeff(&self) -> FrequencyCoeff {
        self.coeff
    }

    /// Period-domain view of the same solution.
    pub fn period_coeff(&self) -> PeriodCoeff {
        self.coeff.to_period()
    }

    #[inline]
    pub fn origin(&self) -> Origin {
        self.origin
    }
}

fn require_positive(what: &'static str, value: f64) -> Result<()> {
    // Written so NaN is rejected too.
    if value > 0.0 {
        Ok(())
    } else {
        Err(PhaseError::InvalidEphemeris { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scales::TDB;

    fn span(a: f64, b: f64) -> Period<TDB> {
        Period::new(Time::new(a), Time::new(b))
    }

    #[test]
    fn rejects_non_positive_frequency() {
        for f0 in [0.0, -1.0, f64::NAN] {
            let err = Ephemeris::frequency(
                span(0.0, 1.0),
                Time::new(0.0),
                0.0,
                FrequencyCoeff::new(f0, 0.0, 0.0),
            )
            .unwrap_err();
            assert!(matches!(err, PhaseError::InvalidEphemeris { what: "frequency", .. }));
        }
    }

    #[test]
    fn rejects_non_positive_period() {
        let err = Ephemeris::period(
            span(0.0, 1.0),
            Time::new(0.0),
            0.0,
            PeriodCoeff::new(-88.0, 0.0, 0.0),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PhaseError::InvalidEphemeris {
                what: "period",
                value: -88.0
            }
        );
    }

    #[test]
    fn rejects_empty_interval() {
        let err = Ephemeris::frequency(
            span(10.0, 10.0),
            Time::new(0.0),
            0.0,
            FrequencyCoeff::new(1.0, 0.0, 0.0),
        )
        .unwrap_err();
        assert!(matches!(err, PhaseError::InvalidInterval { .. }));
    }

    #[test]
    fn period_style_is_stored_as_frequency() {
        let eph = Ephemeris::period(
            span(0.0, 1000.0),
            Time::new(123.456_789),
            0.11,
            PeriodCoeff::new(4.0, 0.0, 0.0),
        )
        .unwrap();
        assert_eq!(eph.frequency_coeff(), FrequencyCoeff::new(0.25, 0.0, 0.0));
        assert_eq!(eph.period_coeff().p0, 4.0);
        assert_eq!(eph.origin(), Origin::Period);
    }

    #[test]
    fn phi0_is_taken_modulo_one() {
        let eph = Ephemeris::frequency(
            span(0.0, 1.0),
            Time::new(0.0),
            -0.25,
            FrequencyCoeff::new(1.0, 0.0, 0.0),
        )
        .unwrap();
        assert_eq!(eph.phi0(), 0.75);
    }

    #[test]
    fn database_record_normalises() {
        let record = PulsarRecord {
            psr_name: "PSR B0531+21".to_string(),
            valid_since: 0.0,
            valid_until: 100.0,
            epoch: 50.0,
            phi0: 0.0,
            f0: 29.9,
            f1: -3.7e-10,
            f2: 0.0,
        };
        let eph = Ephemeris::<TDB>::from_spec(EphemerisSpec::Database(record)).unwrap();
        assert_eq!(eph.origin(), Origin::Database);
        assert_eq!(eph.epoch(), Time::new(50.0));
        assert_eq!(eph.validity(), span(0.0, 100.0));
    }

    #[test]
    fn orbital_record_uses_period_coefficients() {
        let record = OrbitalRecord {
            psr_name: "PSR J0737-3039A".to_string(),
            valid_since: 0.0,
            valid_until: 1e6,
            t0: 10.0,
            pb: 8_834.5,
            pbdot: -1.25e-12,
            pb2dot: 0.0,
        };
        let eph = Ephemeris::<TDB>::from_spec(EphemerisSpec::Orbital(record)).unwrap();
        assert_eq!(eph.origin(), Origin::Orbital);
        assert_eq!(eph.phi0(), 0.0);
        assert_eq!(eph.frequency_coeff().f0, 1.0 / 8_834.5);
    }

    #[test]
    fn orbital_record_rejects_zero_period() {
        let record = OrbitalRecord {
            psr_name: "X".to_string(),
            valid_since: 0.0,
            valid_until: 1.0,
            t0: 0.0,
            pb: 0.0,
            pbdot: 0.0,
            pb2dot: 0.0,
        };
        let err = Ephemeris::<TDB>::from_spec(EphemerisSpec::Orbital(record)).unwrap_err();
        assert!(matches!(err, PhaseError::InvalidEphemeris { what: "orbital period", .. }));
    }
}
