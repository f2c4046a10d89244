use crate::types::activity::{ParsedTrackLog, RawTrackPoint, TrackLog, TrackPoint};

/// Half-width of the moving average used for corrected elevation.
const SMOOTH_WINDOW: usize = 5;

pub fn process(parsed: &ParsedTrackLog) -> TrackLog {
    let points = enrich_points(&parsed.points);

    let total_distance_points = points.last().map(|p| p.elapsed_distance).unwrap_or(0.0);
    let total_time_points = points.last().map(|p| p.time_elapsed).unwrap_or(0.0);

    let (total_distance, total_time_laps) = if parsed.laps.is_empty() {
        (total_distance_points, total_time_points)
    } else {
        (
            parsed.laps.iter().map(|lap| lap.distance_m).sum::<f64>() / 1000.0,
            parsed.laps.iter().map(|lap| lap.elapsed_time).sum::<f64>(),
        )
    };

    tracing::info!(
        "GPX distance: {:.3} | distance (trkpts): {:.3} | duration: {} | duration (trkpts): {}",
        total_distance,
        total_distance_points,
        total_time_laps,
        total_time_points
    );

    TrackLog {
        points,
        laps: parsed.laps.clone(),
        total_distance,
        total_distance_points,
        total_time_laps,
        total_time_points,
    }
}

fn enrich_points(raw: &[RawTrackPoint]) -> Vec<TrackPoint> {
    let corrected = smooth_elevation(raw);
    let start_time = raw.iter().find_map(|p| p.time);

    let mut points = Vec::with_capacity(raw.len());
    let mut elapsed_distance = 0.0;
    let mut time_elapsed = 0.0;

    for (idx, curr) in raw.iter().enumerate() {
        let mut velocity = 0.0;

        if idx > 0 {
            let prev = &raw[idx - 1];
            let segment_km = haversine_distance(prev.lat, prev.lon, curr.lat, curr.lon);
            elapsed_distance += segment_km;

            if let (Some(prev_time), Some(curr_time)) = (prev.time, curr.time) {
                let delta_seconds = (curr_time - prev_time).num_milliseconds() as f64 / 1000.0;
                if delta_seconds > f64::EPSILON {
                    velocity = segment_km / (delta_seconds / 3600.0);
                }
            }
        }

        if let (Some(start), Some(curr_time)) = (start_time, curr.time) {
            time_elapsed = ((curr_time - start).num_milliseconds() as f64 / 1000.0).max(0.0);
        }

        points.push(TrackPoint {
            elapsed_distance,
            time_elapsed,
            elevation: curr.elevation,
            corrected_elevation: corrected[idx],
            heart_rate: curr.heart_rate,
            cadence: curr.cadence,
            velocity,
        });
    }

    points
}

/// Centered moving average over the points that carry an elevation.
fn smooth_elevation(points: &[RawTrackPoint]) -> Vec<Option<f64>> {
    (0..points.len())
        .map(|i| {
            points[i].elevation?;
            let start = i.saturating_sub(SMOOTH_WINDOW);
            let end = (i + SMOOTH_WINDOW + 1).min(points.len());
            let window: Vec<f64> = points[start..end].iter().filter_map(|p| p.elevation).collect();
            Some(window.iter().sum::<f64>() / window.len() as f64)
        })
        .collect()
}

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const R: f64 = 6371.0; // Earth radius in km

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    R * c
}
