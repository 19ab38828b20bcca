use crate::branches::LocationRecord;
use geo::{Distance, Geodesic, Point};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyBranch<'a> {
    pub location: &'a LocationRecord,
    pub distance_km: f64,
}

// geo works in meters, we show km with two decimals
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let meters = Geodesic::distance(from.to_point(), to.to_point());
    (meters / 1000.0 * 100.0).round() / 100.0
}

/// The `k` closest branches within `radius_km` of `reference`, nearest first.
pub fn nearest<'a>(
    locations: &'a [LocationRecord],
    reference: GeoPoint,
    radius_km: f64,
    k: usize,
) -> Vec<NearbyBranch<'a>> {
    let mut nearby: Vec<NearbyBranch> = locations
        .iter()
        .map(|location| NearbyBranch {
            location,
            distance_km: distance_km(reference, GeoPoint::new(location.lat, location.lng)),
        })
        .filter(|b| b.distance_km <= radius_km)
        .collect();
    nearby.sort_by(|a, b| a.distance_km.partial_cmp(&b.distance_km).unwrap_or(Ordering::Equal));
    nearby.truncate(k);
    nearby
}

pub fn closest_name<'a>(nearby: &[NearbyBranch<'a>]) -> Option<&'a str> {
    nearby.first().map(|b| b.location.name.as_str())
}
