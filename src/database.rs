// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! In-memory pulsar ephemeris database.
//!
//! Records mirror the rows of a pulsar timing database: spin solutions in
//! frequency style, binary orbits and remarks, each tagged with the pulsar
//! name and a validity interval.  All times are MET seconds on the time system of the
//! run that loads them; orbital periods are in seconds.
//!
//! Reading the mission FITS tables is left to the caller; with the `serde`
//! feature a JSON document can be parsed directly:
//!
//! ```json
//! {
//!   "spin":    [{ "psr_name": "PSR B0531+21", "valid_since": 0.0, "valid_until": 1e8,
//!                 "epoch": 5e7, "f0": 29.9, "f1": -3.7e-10, "f2": 0.0 }],
//!   "orbital": [],
//!   "remarks": [{ "psr_name": "PSR B0531+21", "valid_since": 6e7, "description": "Glitch" }]
//! }
//! ```

use crate::chooser::EphemerisSet;
use crate::ephemeris::{Ephemeris, EphemerisSpec};
use crate::error::Result;
use crate::instant::{Time, TimeSystem};
use crate::period::Period;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pulsar name that matches every record.
pub const ANY_PULSAR: &str = "ANY";

/// One spin ephemeris row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulsarRecord {
    pub psr_name: String,
    pub valid_since: f64,
    pub valid_until: f64,
    pub epoch: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phi0: f64,
    pub f0: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub f1: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub f2: f64,
}

/// One binary-orbit row. `t0` is the epoch of periastron.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalRecord {
    pub psr_name: String,
    pub valid_since: f64,
    pub valid_until: f64,
    pub t0: f64,
    pub pb: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pbdot: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pb2dot: f64,
}

/// A remark attached to a pulsar over a span of time, such as a glitch or
/// a change of timing solution.  `valid_until` defaults to open-ended.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RemarkRecord {
    pub psr_name: String,
    pub valid_since: f64,
    #[cfg_attr(feature = "serde", serde(default = "open_ended"))]
    pub valid_until: f64,
    pub description: String,
}

impl RemarkRecord {
    pub fn validity<S: TimeSystem>(&self) -> Period<S> {
        Period::new(Time::new(self.valid_since), Time::new(self.valid_until))
    }
}

#[cfg(feature = "serde")]
fn open_ended() -> f64 {
    f64::INFINITY
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulsarDb {
    #[cfg_attr(feature = "serde", serde(default))]
    spin: Vec<PulsarRecord>,
    #[cfg_attr(feature = "serde", serde(default))]
    orbital: Vec<OrbitalRecord>,
    #[cfg_attr(feature = "serde", serde(default))]
    remarks: Vec<RemarkRecord>,
}

impl PulsarDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON database document.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let db: PulsarDb = serde_json::from_str(json)
            .map_err(|e| crate::error::PhaseError::Database(e.to_string()))?;
        info!(
            spin = db.spin.len(),
            orbital = db.orbital.len(),
            remarks = db.remarks.len(),
            "Parsed pulsar database"
        );
        Ok(db)
    }

    pub fn add_spin(&mut self, record: PulsarRecord) {
        self.spin.push(record);
    }

    pub fn add_orbital(&mut self, record: OrbitalRecord) {
        self.orbital.push(record);
    }

    pub fn add_remark(&mut self, record: RemarkRecord) {
        self.remarks.push(record);
    }

    pub fn spin_records(&self) -> &[PulsarRecord] {
        &self.spin
    }

    pub fn orbital_records(&self) -> &[OrbitalRecord] {
        &self.orbital
    }

    pub fn remark_records(&self) -> &[RemarkRecord] {
        &self.remarks
    }

    /// Keep only records for `psr_name`.
    ///
    /// Names compare case-insensitively, ignoring surrounding whitespace;
    /// [`ANY_PULSAR`] keeps everything.
    pub fn filter_name(&mut self, psr_name: &str) {
        let wanted = psr_name.trim();
        if wanted.eq_ignore_ascii_case(ANY_PULSAR) {
            return;
        }
        self.spin
            .retain(|r| r.psr_name.trim().eq_ignore_ascii_case(wanted));
        self.orbital
            .retain(|r| r.psr_name.trim().eq_ignore_ascii_case(wanted));
        self.remarks
            .retain(|r| r.psr_name.trim().eq_ignore_ascii_case(wanted));
    }

    /// Append every spin record to `set`, in database order.
    ///
    /// Returns the number of ephemerides loaded.  A record with a
    /// non-positive frequency aborts the load.
    pub fn load_spin<S: TimeSystem>(&self, set: &mut EphemerisSet<S>) -> Result<usize> {
        for record in &self.spin {
            set.insert(Ephemeris::from_spec(EphemerisSpec::Database(record.clone()))?);
        }
        info!(count = self.spin.len(), "Loaded spin ephemerides");
        Ok(self.spin.len())
    }

    /// Append every orbital record to `set`, in database order.
    pub fn load_orbital<S: TimeSystem>(&self, set: &mut EphemerisSet<S>) -> Result<usize> {
        for record in &self.orbital {
            set.insert(Ephemeris::from_spec(EphemerisSpec::Orbital(record.clone()))?);
        }
        info!(count = self.orbital.len(), "Loaded orbital ephemerides");
        Ok(self.orbital.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhaseError;
    use crate::scales::TDB;

    fn spin(name: &str, since: f64, until: f64) -> PulsarRecord {
        PulsarRecord {
            psr_name: name.to_string(),
            valid_since: since,
            valid_until: until,
            epoch: since,
            phi0: 0.0,
            f0: 10.0,
            f1: 0.0,
            f2: 0.0,
        }
    }

    fn sample() -> PulsarDb {
        let mut db = PulsarDb::new();
        db.add_spin(spin("PSR B0531+21", 0.0, 100.0));
        db.add_spin(spin("PSR J0835-4510", 0.0, 100.0));
        db.add_spin(spin("psr b0531+21", 100.0, 200.0));
        db.add_orbital(OrbitalRecord {
            psr_name: "PSR J0835-4510".to_string(),
            valid_since: 0.0,
            valid_until: 100.0,
            t0: 0.0,
            pb: 3600.0,
            pbdot: 0.0,
            pb2dot: 0.0,
        });
        db.add_remark(RemarkRecord {
            psr_name: "PSR B0531+21".to_string(),
            valid_since: 40.0,
            valid_until: f64::INFINITY,
            description: "Glitch".to_string(),
        });
        db
    }

    #[test]
    fn filter_is_case_insensitive() {
        let mut db = sample();
        db.filter_name("PSR B0531+21");
        assert_eq!(db.spin_records().len(), 2);
        assert!(db.orbital_records().is_empty());
        assert_eq!(db.remark_records().len(), 1);

        db.filter_name("PSR J0835-4510");
        assert!(db.remark_records().is_empty());
    }

    #[test]
    fn any_keeps_everything() {
        let mut db = sample();
        db.filter_name("any");
        assert_eq!(db.spin_records().len(), 3);
        assert_eq!(db.orbital_records().len(), 1);
    }

    #[test]
    fn load_preserves_database_order() {
        let mut db = sample();
        db.filter_name("PSR B0531+21");
        let mut set = EphemerisSet::<TDB>::new();
        assert_eq!(db.load_spin(&mut set).unwrap(), 2);
        assert_eq!(set.get(0).unwrap().validity().start.value(), 0.0);
        assert_eq!(set.get(1).unwrap().validity().start.value(), 100.0);
    }

    #[test]
    fn load_rejects_bad_record() {
        let mut db = PulsarDb::new();
        let mut bad = spin("X", 0.0, 1.0);
        bad.f0 = 0.0;
        db.add_spin(bad);
        let mut set = EphemerisSet::<TDB>::new();
        assert!(matches!(
            db.load_spin(&mut set),
            Err(PhaseError::InvalidEphemeris { .. })
        ));
    }

    #[test]
    fn load_orbital_records() {
        let db = sample();
        let mut set = EphemerisSet::<TDB>::new();
        assert_eq!(db.load_orbital(&mut set).unwrap(), 1);
        assert_eq!(set.len(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn parses_json_document() {
        let json = r#"{
            "spin": [{"psr_name": "PSR B0531+21", "valid_since": 0.0, "valid_until": 1e8,
                      "epoch": 5e7, "f0": 29.9, "f1": -3.7e-10}],
            "orbital": []
        }"#;
        let db = PulsarDb::from_json_str(json).unwrap();
        assert_eq!(db.spin_records().len(), 1);
        assert_eq!(db.spin_records()[0].f2, 0.0);
        assert!(db.remark_records().is_empty());

        let db = PulsarDb::from_json_str(
            r#"{"remarks": [{"psr_name": "PSR B0531+21", "valid_since": 10.0,
                             "description": "Glitch"}]}"#,
        )
        .unwrap();
        assert_eq!(db.remark_records()[0].valid_until, f64::INFINITY);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn malformed_json_is_a_database_error() {
        assert!(matches!(
            PulsarDb::from_json_str("{\"spin\": 3}"),
            Err(PhaseError::Database(_))
        ));
    }
}
