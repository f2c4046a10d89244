use std::path::Path;
use std::time::Duration;

use trainlog_rs::config::{Config, StravaConfig};
use trainlog_rs::error::{ActivityError, AppError};
use trainlog_rs::state::AppState;
use trainlog_rs::store::{NewRecord, SqliteStore};
use trainlog_rs::types::units::MeasurementSystem;

fn state(dir: &Path) -> (AppState, i64) {
    let config = Config {
        port: 0,
        cache_ttl: Duration::from_secs(60),
        database_path: dir.join("trainlog.db"),
        conf_dir: dir.to_path_buf(),
        measurement_system: MeasurementSystem::Metric,
        max_hr: None,
        rest_hr: None,
        age: None,
        karvonen: false,
        catalog_path: None,
        strava: StravaConfig::default(),
    };
    let store = SqliteStore::open_in_memory().expect("store");
    let sport = store.insert_sport("Run", None).expect("sport");
    let id = store
        .insert_record(&NewRecord {
            sport: Some(sport),
            distance: Some(5.0),
            time: Some(1500),
            ..Default::default()
        })
        .expect("record");
    (AppState::with_store(config, store), id)
}

#[test]
fn update_loads_uncached_activity() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (state, id) = state(dir.path());

    let (activity, changed) = state.update(id, "distance", "7.5").expect("update");
    assert!(changed);
    assert_eq!(activity.scalars().distance, 7.5);
    assert_eq!(state.activity(id).expect("cached").scalars().distance, 7.5);
}

#[test]
fn update_after_eviction_reloads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (state, id) = state(dir.path());

    state.update(id, "distance", "7.5").expect("update");
    state.evict_expired(Duration::ZERO);
    assert_eq!(state.activity(id).expect("reload").scalars().distance, 5.0);

    let (activity, _) = state.update(id, "distance", "8").expect("update");
    assert_eq!(activity.scalars().distance, 8.0);
}

#[test]
fn update_of_unknown_activity_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (state, _) = state(dir.path());

    let err = state.update(999, "distance", "7.5").expect_err("unknown id");
    assert!(matches!(
        err,
        AppError::Activity(ActivityError::InconsistentData { rows: 0, .. })
    ));
}

#[test]
fn concurrent_loads_never_overwrite_an_edit() {
    for _ in 0..20 {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, id) = state(dir.path());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    state.activity(id).expect("load");
                });
            }
            scope.spawn(|| {
                state.update(id, "distance", "7.5").expect("update");
            });
        });

        assert_eq!(state.activity(id).expect("cached").scalars().distance, 7.5);
    }
}
