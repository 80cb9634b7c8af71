// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Run configuration.
//!
//! [`PhaseConfig`] gathers every user choice a phase-assignment run depends
//! on and is passed explicitly into the driver.  Its field names follow the
//! parameters of the pulse-phase tools (`ephstyle`, `ephepoch`, `timeformat`,
//! `timesys`, `phi0`, `f0..f2`/`p0..p2`, `pphaseoffset`).

use crate::chooser::{ChooserMode, EphemerisSet};
use crate::coeff::{FrequencyCoeff, PeriodCoeff};
use crate::database::{PulsarDb, RemarkRecord, ANY_PULSAR};
use crate::ephemeris::{Ephemeris, EphemerisSpec};
use crate::error::{PhaseError, Result};
use crate::instant::{Time, TimeFormat, TimeSystem};
use crate::period::Period;
use crate::scales::TimeSystemKind;
use std::str::FromStr;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the spin ephemeris comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum EphemerisStyle {
    /// Pulsar database rows for [`PhaseConfig::psr_name`].
    #[default]
    Db,
    /// User-supplied frequency and derivatives.
    Freq,
    /// User-supplied period and derivatives.
    Per,
}

impl FromStr for EphemerisStyle {
    type Err = PhaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DB" => Ok(EphemerisStyle::Db),
            "FREQ" => Ok(EphemerisStyle::Freq),
            "PER" => Ok(EphemerisStyle::Per),
            _ => Err(PhaseError::UnsupportedStyle(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhaseConfig {
    pub ephemeris_style: EphemerisStyle,
    /// Epoch of a user ephemeris, in `time_format`.
    pub epoch: f64,
    pub time_format: TimeFormat,
    pub time_system: TimeSystemKind,
    /// Phase at `epoch` for a user ephemeris.
    pub phi0: f64,
    /// `(f0, f1, f2)` or `(p0, p1, p2)` depending on the style.
    pub coefficients: [f64; 3],
    /// Added to every computed phase, whatever the ephemeris source.
    pub global_phase_offset: f64,
    pub strict_selection: bool,
    /// Pulsar selected from the database.
    pub psr_name: String,
    /// Validity span (MET) of a user ephemeris.  Unbounded by default, so a
    /// user ephemeris applies to every event.
    pub valid_since: f64,
    pub valid_until: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            ephemeris_style: EphemerisStyle::Db,
            epoch: 0.0,
            time_format: TimeFormat::Met,
            time_system: TimeSystemKind::Tdb,
            phi0: 0.0,
            coefficients: [1.0, 0.0, 0.0],
            global_phase_offset: 0.0,
            strict_selection: true,
            psr_name: ANY_PULSAR.to_string(),
            valid_since: f64::NEG_INFINITY,
            valid_until: f64::INFINITY,
        }
    }
}

impl PhaseConfig {
    pub fn chooser_mode(&self) -> ChooserMode {
        ChooserMode::from(self.strict_selection)
    }

    /// Build the spin candidate set for a run whose events are on system `S`.
    ///
    /// FREQ and PER styles yield exactly the user ephemeris; database
    /// content is ignored.  DB style loads the rows of `db` matching
    /// [`psr_name`](Self::psr_name).
    pub fn build_set<S: TimeSystem>(&self, db: Option<&PulsarDb>) -> Result<EphemerisSet<S>> {
        self.check_time_system::<S>()?;
        let mut set = EphemerisSet::new();
        match self.ephemeris_style {
            EphemerisStyle::Freq | EphemerisStyle::Per => {
                set.insert(self.user_ephemeris()?);
            }
            EphemerisStyle::Db => {
                let mut db = db.cloned().ok_or(PhaseError::MissingParameter("psrdbfile"))?;
                db.filter_name(&self.psr_name);
                if db.load_spin(&mut set)? == 0 {
                    return Err(PhaseError::UnknownPulsar(self.psr_name.clone()));
                }
            }
        }
        debug!(
            style = ?self.ephemeris_style,
            count = set.len(),
            "Built spin ephemeris set"
        );
        Ok(set)
    }

    /// Orbital candidate set from the database rows for `psr_name`; empty
    /// when the pulsar is not in a binary.
    pub fn build_orbital_set<S: TimeSystem>(&self, db: &PulsarDb) -> Result<EphemerisSet<S>> {
        self.check_time_system::<S>()?;
        let mut db = db.clone();
        db.filter_name(&self.psr_name);
        let mut set = EphemerisSet::new();
        db.load_orbital(&mut set)?;
        Ok(set)
    }

    /// Database remarks for `psr_name`.
    pub fn remarks(&self, db: &PulsarDb) -> Vec<RemarkRecord> {
        let mut db = db.clone();
        db.filter_name(&self.psr_name);
        db.remark_records().to_vec()
    }

    fn check_time_system<S: TimeSystem>(&self) -> Result<()> {
        if self.time_system != S::KIND {
            return Err(PhaseError::TimeSystemMismatch {
                expected: S::LABEL,
                found: self.time_system.label(),
            });
        }
        Ok(())
    }

    fn user_ephemeris<S: TimeSystem>(&self) -> Result<Ephemeris<S>> {
        let validity = Period::new(Time::new(self.valid_since), Time::new(self.valid_until));
        let epoch = Time::from_format(self.epoch, self.time_format);
        let [c0, c1, c2] = self.coefficients;
        let spec = match self.ephemeris_style {
            EphemerisStyle::Freq => EphemerisSpec::Frequency {
                validity,
                epoch,
                phi0: self.phi0,
                coeff: FrequencyCoeff::new(c0, c1, c2),
            },
            EphemerisStyle::Per => EphemerisSpec::Period {
                validity,
                epoch,
                phi0: self.phi0,
                coeff: PeriodCoeff::new(c0, c1, c2),
            },
            EphemerisStyle::Db => return Err(PhaseError::UnsupportedStyle("DB".to_string())),
        };
        Ephemeris::from_spec(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::PulsarRecord;
    use crate::ephemeris::Origin;
    use crate::scales::{TDB, TT};

    fn user(style: EphemerisStyle, coefficients: [f64; 3]) -> PhaseConfig {
        PhaseConfig {
            ephemeris_style: style,
            epoch: 123.456_789,
            phi0: 0.11,
            coefficients,
            valid_since: 0.0,
            valid_until: 1_000.0,
            ..PhaseConfig::default()
        }
    }

    fn db() -> PulsarDb {
        let mut db = PulsarDb::new();
        db.add_spin(PulsarRecord {
            psr_name: "PSR B0531+21".to_string(),
            valid_since: 0.0,
            valid_until: 500.0,
            epoch: 0.0,
            phi0: 0.0,
            f0: 29.9,
            f1: 0.0,
            f2: 0.0,
        });
        db
    }

    #[test]
    fn parses_styles() {
        assert_eq!("freq".parse::<EphemerisStyle>().unwrap(), EphemerisStyle::Freq);
        assert_eq!("Per".parse::<EphemerisStyle>().unwrap(), EphemerisStyle::Per);
        assert_eq!("DB".parse::<EphemerisStyle>().unwrap(), EphemerisStyle::Db);
        assert!(matches!(
            "FILE".parse::<EphemerisStyle>(),
            Err(PhaseError::UnsupportedStyle(_))
        ));
    }

    #[test]
    fn freq_and_per_styles_agree() {
        let t = Time::<TDB>::new(223.456_789);
        let freq = user(EphemerisStyle::Freq, [1.125e-2, -2.25e-4, 6.75e-6])
            .build_set::<TDB>(None)
            .unwrap();
        let per = user(
            EphemerisStyle::Per,
            [88.888_888_888_888_89, 1.777_777_777_777_778, 0.017_777_777_777_778],
        )
        .build_set::<TDB>(None)
        .unwrap();
        let a = freq.get(0).unwrap().calc_phase(t);
        let b = per.get(0).unwrap().calc_phase(t);
        assert!((a / b - 1.0).abs() < 1e-8);
        assert_eq!(per.get(0).unwrap().origin(), Origin::Period);
    }

    #[test]
    fn user_style_overrides_database() {
        let set = user(EphemerisStyle::Freq, [2.0, 0.0, 0.0])
            .build_set::<TDB>(Some(&db()))
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().origin(), Origin::Frequency);
    }

    #[test]
    fn non_positive_user_frequency_is_rejected() {
        let err = user(EphemerisStyle::Freq, [0.0, 0.0, 0.0])
            .build_set::<TDB>(None)
            .unwrap_err();
        assert!(matches!(err, PhaseError::InvalidEphemeris { .. }));
    }

    #[test]
    fn db_style_filters_by_name() {
        let config = PhaseConfig {
            psr_name: "psr b0531+21".to_string(),
            ..PhaseConfig::default()
        };
        let set = config.build_set::<TDB>(Some(&db())).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().origin(), Origin::Database);
    }

    #[test]
    fn db_style_without_match_fails() {
        let config = PhaseConfig {
            psr_name: "PSR J0000+0000".to_string(),
            ..PhaseConfig::default()
        };
        assert_eq!(
            config.build_set::<TDB>(Some(&db())).unwrap_err(),
            PhaseError::UnknownPulsar("PSR J0000+0000".to_string())
        );
        assert_eq!(
            config.build_set::<TDB>(None).unwrap_err(),
            PhaseError::MissingParameter("psrdbfile")
        );
    }

    #[test]
    fn time_system_must_match_events() {
        let err = PhaseConfig::default().build_set::<TT>(Some(&db())).unwrap_err();
        assert_eq!(
            err,
            PhaseError::TimeSystemMismatch {
                expected: "TT",
                found: "TDB"
            }
        );
    }

    #[test]
    fn orbital_set_checks_time_system() {
        let mut db = db();
        db.add_orbital(crate::database::OrbitalRecord {
            psr_name: "PSR B0531+21".to_string(),
            valid_since: 0.0,
            valid_until: 500.0,
            t0: 0.0,
            pb: 3_600.0,
            pbdot: 0.0,
            pb2dot: 0.0,
        });
        let config = PhaseConfig::default();
        assert_eq!(
            config.build_orbital_set::<TT>(&db).unwrap_err(),
            PhaseError::TimeSystemMismatch {
                expected: "TT",
                found: "TDB"
            }
        );
        assert_eq!(config.build_orbital_set::<TDB>(&db).unwrap().len(), 1);
    }

    #[test]
    fn user_ephemeris_without_span_covers_everything() {
        let config = PhaseConfig {
            ephemeris_style: EphemerisStyle::Freq,
            coefficients: [29.9, 0.0, 0.0],
            ..PhaseConfig::default()
        };
        let set = config.build_set::<TDB>(None).unwrap();
        for t in [-1e9, 0.0, 5e8] {
            let sel = set.select(Time::new(t), ChooserMode::Strict).unwrap();
            assert!(sel.fit.is_exact());
        }
        assert!(set
            .coverage_gaps(Period::new(Time::new(0.0), Time::new(1e8)))
            .is_empty());
    }

    #[test]
    fn mjd_epoch_is_mapped_to_met() {
        let config = PhaseConfig {
            epoch: crate::instant::MJD_REF.value() + 1.0,
            time_format: TimeFormat::Mjd,
            ..user(EphemerisStyle::Freq, [1.0, 0.0, 0.0])
        };
        let set = config.build_set::<TDB>(None).unwrap();
        assert!((set.get(0).unwrap().epoch().value() - 86_400.0).abs() < 1e-4);
    }

    #[test]
    fn strict_flag_selects_mode() {
        let mut config = PhaseConfig::default();
        assert_eq!(config.chooser_mode(), ChooserMode::Strict);
        config.strict_selection = false;
        assert_eq!(config.chooser_mode(), ChooserMode::Lenient);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_with_defaults() {
        let config: PhaseConfig = serde_json::from_str(
            r#"{"ephemeris_style": "FREQ", "coefficients": [29.9, 0.0, 0.0], "time_system": "TT"}"#,
        )
        .unwrap();
        assert_eq!(config.ephemeris_style, EphemerisStyle::Freq);
        assert_eq!(config.time_system, TimeSystemKind::Tt);
        assert!(config.strict_selection);
        assert_eq!(config.psr_name, "ANY");
    }
}
