//! Geographic distance: `geoDistance`.

use cel_interpreter::{ExecutionError, Value};

/// WGS84 equatorial radius in meters.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

#[expect(clippy::cast_precision_loss, reason = "Coordinates are well within f64 precision")]
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::UInt(u) => Some(*u as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn coordinate(function: &str, value: &Value) -> Result<(f64, f64), ExecutionError> {
    if let Value::List(items) = value {
        if let [lat, lng] = items.as_slice() {
            if let (Some(lat), Some(lng)) = (numeric(lat), numeric(lng)) {
                return Ok((lat, lng));
            }
        }
    }
    Err(ExecutionError::function_error(function, "coordinates must be 2-element numeric [lat, lng] lists"))
}

/// Great-circle distance in meters between two `[lat, lng]` points,
/// using the haversine formula.
pub(crate) fn geo_distance(from: Value, to: Value) -> Result<Value, ExecutionError> {
    let (lat1, lng1) = coordinate("geoDistance", &from)?;
    let (lat2, lng2) = coordinate("geoDistance", &to)?;

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lng2 - lng1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Ok(Value::Float(EARTH_RADIUS_M * c))
}
