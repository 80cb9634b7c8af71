use chrono::Utc;
use pulsephase::{
    history_line, ChooserMode, OrbitalRecord, Period, PhaseComputer, PhaseConfig, PhaseError,
    PulsarDb, PulsarRecord, RemarkRecord, RunSummary, Time, TimeSystemKind, TT,
};

fn main() -> Result<(), PhaseError> {
    let mut db = PulsarDb::new();
    db.add_spin(PulsarRecord {
        psr_name: "PSR J0737-3039A".to_string(),
        valid_since: 0.0,
        valid_until: 50_000.0,
        epoch: 25_000.0,
        phi0: 0.0,
        f0: 44.054,
        f1: -3.4e-15,
        f2: 0.0,
    });
    db.add_orbital(OrbitalRecord {
        psr_name: "PSR J0737-3039A".to_string(),
        valid_since: 0.0,
        valid_until: 50_000.0,
        t0: 0.0,
        pb: 8_834.5,
        pbdot: -1.25e-12,
        pb2dot: 0.0,
    });
    db.add_remark(RemarkRecord {
        psr_name: "PSR J0737-3039A".to_string(),
        valid_since: 30_000.0,
        valid_until: f64::INFINITY,
        description: "Timing noise".to_string(),
    });

    let config = PhaseConfig {
        psr_name: "PSR J0737-3039A".to_string(),
        time_system: TimeSystemKind::Tt,
        strict_selection: false,
        ..PhaseConfig::default()
    };
    let spin = config.build_set::<TT>(Some(&db))?;
    let orbit = config.build_orbital_set::<TT>(&db)?;
    let computer = PhaseComputer::new(spin, ChooserMode::from(config.strict_selection))
        .with_orbital(orbit)
        .with_remarks(config.remarks(&db));

    for status in computer.ephemeris_status(Period::new(Time::new(0.0), Time::new(60_000.0))) {
        println!("{status}");
    }

    let events: Vec<Time<TT>> = (0..12).map(|i| Time::new(i as f64 * 4_321.7)).collect();
    let pulses = computer.pulse_phases(&events, config.global_phase_offset);
    let orbits = computer.orbital_phases(&events, 0.0);

    for ((t, pulse), orbit) in events.iter().zip(&pulses).zip(&orbits) {
        match (pulse, orbit) {
            (Ok(p), Ok(o)) => println!("{t}: pulse {:.6}  orbit {:.6}", p.phase, o.phase),
            (Err(e), _) | (_, Err(e)) => println!("{t}: {e}"),
        }
    }

    let summary = RunSummary::tally(&pulses);
    println!(
        "{} events: {} exact, {} extrapolated, {} gaps",
        summary.total(),
        summary.exact,
        summary.extrapolated,
        summary.gaps
    );
    println!("{}", history_line("fold 0.1.0", Utc::now()));
    Ok(())
}
