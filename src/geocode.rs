use crate::proximity::GeoPoint;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeResult {
    Found { lat: f64, lon: f64 },
    NotFound,
}

/// Address lookup service.
///
/// Implementations own their transport. They must give up after a bounded
/// timeout and report every failure (network, rate limit, empty match) as
/// [`GeocodeResult::NotFound`].
pub trait Geocoder {
    fn geocode(&self, address: &str, region: &str) -> GeocodeResult;
}

/// Strips the `#` and `-` of street addresses like `Carrera 28 # 61-40`,
/// which geocoders tend to misread.
pub fn sanitize_query(address: &str) -> String {
    address.replace(['#', '-'], "")
}

/// Where a proximity search is centred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub point: GeoPoint,
    /// `false` when the address could not be resolved and `point` is the fallback.
    pub resolved: bool,
}

pub fn resolve_reference<G: Geocoder + ?Sized>(
    geocoder: &G,
    address: &str,
    region: &str,
    fallback: GeoPoint,
) -> ReferencePoint {
    let query = sanitize_query(address);
    match geocoder.geocode(&query, region) {
        GeocodeResult::Found { lat, lon } => {
            info!(address, lat, lon, "address resolved");
            ReferencePoint { point: GeoPoint::new(lat, lon), resolved: true }
        }
        GeocodeResult::NotFound => {
            warn!(address, "address not found, using fallback location");
            ReferencePoint { point: fallback, resolved: false }
        }
    }
}

/// Answers from a fixed table. Keys are compared after sanitizing and
/// trimming, case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    known: HashMap<String, GeoPoint>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, point: GeoPoint) -> Self {
        self.known.insert(key(address), point);
        self
    }
}

fn key(address: &str) -> String {
    sanitize_query(address)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, address: &str, _region: &str) -> GeocodeResult {
        match self.known.get(&key(address)) {
            Some(p) => GeocodeResult::Found { lat: p.lat, lon: p.lon },
            None => GeocodeResult::NotFound,
        }
    }
}
