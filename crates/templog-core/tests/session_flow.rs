//! End-to-end session flow tests: acquisition, recording, persistence, and
//! series reconstruction working together over a real (temporary)
//! filesystem.

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use templog_core::prelude::*;
use templog_core::probe::demo::SimulatedBus;

fn handle(dir: &TempDir) -> SessionHandle {
    SessionHandle::new(LogStore::new(dir.path()).unwrap())
}

#[test]
fn row_roundtrip_through_store_and_series() {
    let dir = TempDir::new().unwrap();
    let store = LogStore::new(dir.path()).unwrap();

    store.append("roundtrip.csv", &LogRow::new(3725, 23.47)).unwrap();

    let series = Series::load(store.path_of("roundtrip.csv").unwrap()).unwrap();
    assert_eq!(
        series.points(),
        &[SeriesPoint {
            offset_ms: 3_725_000,
            value: 23.47
        }]
    );
}

#[test]
fn full_session_lifecycle() {
    let dir = TempDir::new().unwrap();
    let session = handle(&dir);

    // A reading arrives before any session exists
    session.observe(Reading {
        external_temp_c: 22.25,
        internal_temp_c: 24.0,
        fault: false,
    });

    // Start: one file, recording, first row already present
    let status = session.start().unwrap();
    assert!(status.recording);
    let first = status.active.clone().unwrap();
    assert_eq!(session.list_logs().unwrap().len(), 1);
    assert_eq!(session.series(&first).unwrap().values(), vec![22.25]);

    // Start again: idempotent, same file, no new file created
    let status = session.start().unwrap();
    assert_eq!(status.active.as_deref(), Some(first.as_str()));
    assert_eq!(session.list_logs().unwrap().len(), 1);

    // The acquisition path appends while recording
    session
        .observe_and_record(Reading {
            external_temp_c: 22.5,
            internal_temp_c: 24.0,
            fault: false,
        })
        .unwrap();
    assert_eq!(session.series(&first).unwrap().values(), vec![22.25, 22.5]);

    // Deleting the active file is a conflict; the file survives
    assert!(matches!(
        session.delete_log(&first),
        Err(ControlError::Busy(_))
    ));
    assert!(session.list_logs().unwrap().iter().any(|f| f.name == first));

    // Stop, then a second session gets its own file
    session.stop();
    let second = session.start().unwrap().active.unwrap();
    assert_ne!(first, second);
    session.stop();

    let names: Vec<String> = session
        .list_logs()
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert!(names.contains(&first));
    assert!(names.contains(&second));

    // Both files independently deletable once inactive
    session.delete_log(&first).unwrap();
    session.delete_log(&second).unwrap();
    assert!(session.list_logs().unwrap().is_empty());
}

#[test]
fn simulated_probe_drives_the_whole_pipeline() {
    let dir = TempDir::new().unwrap();

    let mut sampler = FrameSampler::new(SimulatedBus::with_seed(99));
    let avg = average(&mut sampler, &AggregatorConfig::default());
    assert!((15.0..30.0).contains(&avg.external_temp_c));
    assert_eq!(avg.fault_count, 0);

    let session = handle(&dir);
    session.observe(avg.into());
    let active = session.start().unwrap().active.unwrap();
    session.observe_and_record(avg.into()).unwrap();
    session.stop();

    let series = session.series(&active).unwrap();
    assert_eq!(series.len(), 2);
    assert!(series.points().windows(2).all(|w| w[0].offset_ms <= w[1].offset_ms));
}

#[test]
fn status_serializes_for_the_external_json_layer() {
    let dir = TempDir::new().unwrap();
    let session = handle(&dir);
    session.observe(Reading {
        external_temp_c: 21.0,
        internal_temp_c: 23.5,
        fault: false,
    });
    session.start().unwrap();

    let json = serde_json::to_value(session.status()).unwrap();
    assert_eq!(json["recording"], true);
    assert_eq!(json["reading"]["external_temp_c"], 21.0);
    assert_eq!(json["elapsed_hms"], "00:00:00");
    assert!(json["active"].as_str().unwrap().starts_with("templog-"));
}
