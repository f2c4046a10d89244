use trainlog_rs::pipeline::parse::parse;
use trainlog_rs::pipeline::process::{haversine_distance, process};
use trainlog_rs::pipeline::{TrackLogDir, TrackLogSource};
use trainlog_rs::types::activity::FileFormat;

fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test"
     xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1"
     xmlns:gpxdata="http://www.cluetrust.com/XML/GPXDATA/1/0">
  <metadata><time>2024-05-01T05:00:00Z</time></metadata>
  <trk><name>Test Run</name><trkseg>
    <trkpt lat="52.5200" lon="13.4050"><ele>34.0</ele><time>2024-05-01T05:30:00Z</time>
      <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>140</gpxtpx:hr><gpxtpx:cad>85</gpxtpx:cad></gpxtpx:TrackPointExtension></extensions>
    </trkpt>
    <trkpt lat="52.5210" lon="13.4050"><ele>36.0</ele><time>2024-05-01T05:31:00Z</time>
      <extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>150</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions>
    </trkpt>
    <trkpt lat="52.5220" lon="13.4050"><time>2024-05-01T05:32:10Z</time></trkpt>
  </trkseg></trk>
  <extensions>
    <gpxdata:lap>
      <gpxdata:startPoint lat="52.5200" lon="13.4050"/>
      <gpxdata:endPoint lat="52.5220" lon="13.4050"/>
      <gpxdata:elapsedTime>120</gpxdata:elapsedTime>
      <gpxdata:distance>222.4</gpxdata:distance>
      <gpxdata:calories>15</gpxdata:calories>
      <gpxdata:summary name="AverageHeartRateBpm" kind="avg">144.6</gpxdata:summary>
      <gpxdata:summary name="MaximumHeartRateBpm" kind="max">150</gpxdata:summary>
      <gpxdata:summary name="MaximumSpeed" kind="max">3.8</gpxdata:summary>
      <gpxdata:trigger kind="manual"/>
      <gpxdata:intensity>active</gpxdata:intensity>
    </gpxdata:lap>
  </extensions>
</gpx>"#
}

#[test]
fn parses_points_with_extensions() {
    let parsed = parse(sample_gpx().as_bytes(), FileFormat::Gpx).expect("parse");

    assert_eq!(parsed.points.len(), 3);
    let first = &parsed.points[0];
    assert_eq!(first.lat, 52.52);
    assert_eq!(first.elevation, Some(34.0));
    assert_eq!(first.heart_rate, Some(140));
    assert_eq!(first.cadence, Some(85));
    assert!(first.time.is_some());

    let last = &parsed.points[2];
    assert_eq!(last.elevation, None);
    assert_eq!(last.heart_rate, None);
}

#[test]
fn parses_lap_extension() {
    let parsed = parse(sample_gpx().as_bytes(), FileFormat::Gpx).expect("parse");

    assert_eq!(parsed.laps.len(), 1);
    let lap = &parsed.laps[0];
    assert_eq!(lap.elapsed_time, 120.0);
    assert_eq!(lap.distance_m, 222.4);
    assert_eq!(lap.start_lat, Some(52.52));
    assert_eq!(lap.end_lat, Some(52.522));
    assert_eq!(lap.calories, Some(15));
    assert_eq!(lap.avg_hr, Some(145));
    assert_eq!(lap.max_hr, Some(150));
    assert_eq!(lap.max_speed, Some(3.8));
    assert_eq!(lap.trigger.as_deref(), Some("manual"));
    assert_eq!(lap.intensity.as_deref(), Some("active"));
}

#[test]
fn process_totals_prefer_laps() {
    let parsed = parse(sample_gpx().as_bytes(), FileFormat::Gpx).expect("parse");
    let log = process(&parsed);

    assert_eq!(log.total_time_points, 130.0);
    assert_eq!(log.total_time_laps, 120.0);
    assert!((log.total_distance - 0.2224).abs() < 1e-9);
    assert!((log.total_distance_points - 0.2224).abs() < 1e-3);

    let second = &log.points[1];
    assert_eq!(second.time_elapsed, 60.0);
    // ~111 m in a minute
    assert!((second.velocity - 6.67).abs() < 0.05);
    assert_eq!(log.points[0].velocity, 0.0);
    assert_eq!(log.points[2].corrected_elevation, None);
    assert_eq!(log.points[0].corrected_elevation, Some(35.0));
}

#[test]
fn process_without_laps_uses_points() {
    let gpx = r#"<gpx><trk><trkseg>
        <trkpt lat="0.0" lon="0.0"><time>2024-05-01T05:30:00Z</time></trkpt>
        <trkpt lat="0.0" lon="0.01"><time>2024-05-01T05:35:00Z</time></trkpt>
    </trkseg></trk></gpx>"#;
    let log = process(&parse(gpx.as_bytes(), FileFormat::Gpx).expect("parse"));

    assert!(log.laps.is_empty());
    assert_eq!(log.total_time_laps, log.total_time_points);
    assert_eq!(log.total_distance, log.total_distance_points);
    assert!(log.points.iter().all(|p| p.heart_rate.is_none()));
}

#[test]
fn malformed_gpx_is_an_error() {
    let result = parse(b"<gpx><trk></gpx>", FileFormat::Gpx);
    assert!(result.is_err());
}

#[test]
fn haversine_matches_known_distance() {
    // One degree of latitude
    let km = haversine_distance(0.0, 0.0, 1.0, 0.0);
    assert!((km - 111.19).abs() < 0.01);
}

#[test]
fn track_log_dir_reports_missing_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = TrackLogDir::new(dir.path());

    assert!(source.open(42).expect("open").is_none());

    std::fs::write(source.path_for(42), sample_gpx()).expect("write");
    let log = source.open(42).expect("open").expect("track log");
    assert_eq!(log.points.len(), 3);
    assert_eq!(log.laps.len(), 1);
}
