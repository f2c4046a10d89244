use std::collections::HashMap;

use trainlog_rs::activity::fields::{format_duration, Field, FieldValue};
use trainlog_rs::activity::pace::{pace_from_float, pace_to_float};
use trainlog_rs::activity::{ActivityLoader, ActivityRecord};
use trainlog_rs::catalog::{Catalog, EnglishCatalog, JsonCatalog};
use trainlog_rs::error::{CatalogError, ParseError};
use trainlog_rs::pipeline::TrackLogSource;
use trainlog_rs::profile::Profile;
use trainlog_rs::store::{NewRecord, SqliteStore};
use trainlog_rs::types::activity::TrackLog;
use trainlog_rs::types::units::{MeasurementSystem, UnitKind, UnitLabels};

struct NoTrackLog;

impl TrackLogSource for NoTrackLog {
    fn open(&self, _id: i64) -> Result<Option<TrackLog>, ParseError> {
        Ok(None)
    }
}

fn load(record: NewRecord, system: MeasurementSystem) -> ActivityRecord {
    let store = SqliteStore::open_in_memory().expect("store");
    let sport = store.insert_sport("Run", None).expect("sport");
    let id = store
        .insert_record(&NewRecord {
            sport: Some(sport),
            ..record
        })
        .expect("record");
    let profile = Profile {
        measurement_system: system,
        ..Default::default()
    };
    ActivityLoader::new(&store, &NoTrackLog, &profile, &EnglishCatalog)
        .load(Some(id))
        .expect("load")
}

fn run() -> NewRecord {
    NewRecord {
        distance: Some(10.0),
        time: Some(3725),
        average: Some(12.0),
        upositive: Some(100.0),
        pace: Some(5.3),
        maxpace: Some(4.05),
        calories: Some(640),
        ..Default::default()
    }
}

#[test]
fn pace_strings_keep_seconds_in_the_fraction() {
    assert_eq!(pace_to_float("5:30"), Some(5.30));
    assert_eq!(pace_to_float("5.30"), Some(5.30));
    assert_eq!(pace_to_float("abc"), None);
    assert_eq!(pace_from_float(pace_to_float("5:30").expect("pace")), "5:30");
    assert_eq!(pace_from_float(4.05), "4:05");
    assert_eq!(pace_from_float(0.0), "");
}

#[test]
fn durations_render_with_hours_only_when_needed() {
    assert_eq!(format_duration(0), "");
    assert_eq!(format_duration(59), "00:59");
    assert_eq!(format_duration(3725), "1:02:05");
}

#[test]
fn field_names_resolve_to_the_closed_set() {
    for field in Field::ALL {
        assert_eq!(Field::from_str(field.as_str()), Some(field));
    }
    assert_eq!(Field::from_str("beats"), None);
    assert!(Field::Calories.access().set.is_none());
    assert!(Field::Time.access().set.is_none());
}

#[test]
fn metric_values_are_returned_as_stored() {
    let activity = load(run(), MeasurementSystem::Metric);

    assert_eq!(activity.get_value("distance"), FieldValue::Number(10.0));
    assert_eq!(activity.get_value("pace"), FieldValue::Text("5:30".to_string()));
    assert_eq!(activity.get_value("calories"), FieldValue::Integer(640));
    assert_eq!(activity.get_value("time"), FieldValue::Text("1:02:05".to_string()));
    assert_eq!(activity.get_value("nonsense"), FieldValue::Missing);
}

#[test]
fn imperial_values_are_converted_on_read() {
    let activity = load(run(), MeasurementSystem::Imperial);

    match activity.get_value("distance") {
        FieldValue::Number(miles) => assert!((miles - 6.21371192).abs() < 1e-9),
        other => panic!("unexpected value: {other:?}"),
    }
    match activity.get_value("upositive") {
        FieldValue::Number(feet) => assert!((feet - 328.08399).abs() < 1e-6),
        other => panic!("unexpected value: {other:?}"),
    }
    assert_eq!(
        activity.get_value_formatted("distance", Some(2), true),
        "6.21miles"
    );
}

#[test]
fn formatted_zero_is_empty() {
    let activity = load(
        NewRecord {
            distance: Some(0.0),
            ..Default::default()
        },
        MeasurementSystem::Metric,
    );

    assert_eq!(activity.get_value_formatted("distance", Some(2), true), "");
    assert_eq!(activity.get_value_formatted("pace", None, true), "");
    assert_eq!(activity.get_value_formatted("calories", None, false), "");
    assert_eq!(activity.get_value_formatted("unknown", None, true), "");
}

#[test]
fn formatted_values_append_unit_labels() {
    let activity = load(run(), MeasurementSystem::Metric);

    assert_eq!(activity.get_value_formatted("distance", Some(1), true), "10.0km");
    assert_eq!(activity.get_value_formatted("distance", Some(1), false), "10.0");
    assert_eq!(activity.get_value_formatted("average", None, true), "12.0km/h");
    assert_eq!(activity.get_value_formatted("distance", None, false), "10.0");
    assert_eq!(activity.get_value_formatted("maxpace", None, true), "4:05min/km");
    assert_eq!(activity.get_value_formatted("calories", None, true), "640");
}

#[test]
fn set_value_stores_metric() {
    let mut activity = load(run(), MeasurementSystem::Imperial);

    assert!(activity.set_value("distance", "10"));
    assert!((activity.scalars().distance - 16.09344).abs() < 1e-4);

    assert!(activity.set_value("pace", "8:00"));
    assert!((activity.scalars().pace - 8.0 * 0.621371192).abs() < 1e-9);
}

#[test]
fn set_value_rejects_unknown_read_only_and_unparseable() {
    let mut activity = load(run(), MeasurementSystem::Metric);

    assert!(!activity.set_value("beats", "150"));
    assert!(!activity.set_value("calories", "100"));
    assert_eq!(activity.scalars().calories, 640);

    assert!(!activity.set_value("pace", "fast"));
    assert_eq!(activity.scalars().pace, 5.3);
}

#[test]
fn unit_labels_go_through_the_catalog() {
    let catalog = JsonCatalog::new(HashMap::from([
        ("km".to_string(), "Kilometer".to_string()),
        ("Distance".to_string(), "Strecke".to_string()),
    ]));

    let labels = UnitLabels::new(MeasurementSystem::Metric, &catalog);
    assert_eq!(labels.label(UnitKind::Distance), "Kilometer");
    assert_eq!(labels.label(UnitKind::Speed), "km/h");
    assert_eq!(catalog.translate("Distance"), "Strecke");
    assert_eq!(EnglishCatalog.translate("Distance"), "Distance");

    let imperial = UnitLabels::new(MeasurementSystem::Imperial, &EnglishCatalog);
    assert_eq!(imperial.label(UnitKind::Pace), "min/mile");
    assert_eq!(imperial.label(UnitKind::Elevation), "feet");
}

#[test]
fn catalog_file_errors_are_typed() {
    let dir = tempfile::tempdir().expect("tempdir");

    let missing = JsonCatalog::from_file(&dir.path().join("missing.json"));
    assert!(matches!(missing, Err(CatalogError::Io(_))));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").expect("write");
    assert!(matches!(JsonCatalog::from_file(&broken), Err(CatalogError::Json(_))));

    let valid = dir.path().join("de.json");
    std::fs::write(&valid, r#"{"Pace": "Tempo"}"#).expect("write");
    let catalog = JsonCatalog::from_file(&valid).expect("catalog");
    assert_eq!(catalog.translate("Pace"), "Tempo");
    assert_eq!(catalog.translate("Speed"), "Speed");
}
