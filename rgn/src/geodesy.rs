//! Distance orthodromique (formule de Haversine)
//!
//! https://en.wikipedia.org/wiki/Haversine_formula

use geo::Point;

/// Rayon terrestre utilisé par la formule, en kilomètres
pub const EARTH_RADIUS_KM: f64 = 6372.8;

/// Approximation de π utilisée pour la conversion degrés → radians.
/// Les seuils par ordre sont comparés à des distances calculées avec cette valeur,
/// la remplacer par `std::f64::consts::PI` décale les résultats aux bornes.
pub(crate) const PI_APPROX: f64 = 3.1415926535898;

#[inline]
fn to_rad(deg: f64) -> f64 {
    deg * PI_APPROX / 180.0
}

/// Distance en km entre deux paires de coordonnées (degrés décimaux)
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = to_rad(lat2 - lat1);
    let d_lon = to_rad(lon2 - lon1);
    let sa = (d_lat / 2.0).sin();
    let so = (d_lon / 2.0).sin();
    let a = sa * sa + so * so * to_rad(lat1).cos() * to_rad(lat2).cos();
    EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
}

/// Distance en km entre deux points `geo` (x = longitude, y = latitude)
pub fn point_distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    distance_km(a.y(), a.x(), b.y(), b.x())
}
