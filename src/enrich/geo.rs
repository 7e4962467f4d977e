const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance between two `(lat, lon)` points, in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());

    let a = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// WKT `Point(lon lat)` -> `(lat, lon)`
pub fn parse_wkt_point(value: &str) -> Option<(f64, f64)> {
    let inner = value.trim().strip_prefix("Point(")?.strip_suffix(')')?;
    let mut parts = inner.split_whitespace();
    let lon = parts.next()?.parse::<f64>().ok()?;
    let lat = parts.next()?.parse::<f64>().ok()?;
    Some((lat, lon))
}

/// `"(lat, lon)"` as written in the cities CSV.
pub fn parse_lat_lon(value: &str) -> Option<(f64, f64)> {
    let inner = value.trim().trim_start_matches('(').trim_end_matches(')');
    let (lat, lon) = inner.split_once(',')?;
    Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
}

pub fn format_lat_lon(point: (f64, f64)) -> String {
    format!("({}, {})", point.0, point.1)
}
