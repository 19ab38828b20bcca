use crate::error::Result;
use crate::proximity::GeoPoint;
use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

pub const CONFIG_PATH_VAR: &str = "PITWALL_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "pitwall.toml";

// same range as the radius slider, in km
pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    pub results_path: String,
    pub locations_path: String,
    pub default_season: i32,
    pub top_pole_getters: usize,
    pub radius_km: f64,
    pub nearest_limit: usize,
    pub fallback_lat: f64,
    pub fallback_lon: f64,
    pub region_hint: String,
    pub metrics_seed: u64,
}

impl DashboardConfig {
    /// Defaults, then `pitwall.toml` (or `$PITWALL_CONFIG`) if present, then
    /// `PITWALL_*` environment variables.
    pub fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let cfg = Self::defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("PITWALL").try_parsing(true))
            .build()?;
        Ok(cfg.try_deserialize::<Self>()?.clamped())
    }

    fn defaults() -> Result<::config::ConfigBuilder<::config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("results_path", "qualifying_results_F1.csv")?
            .set_default("locations_path", "tus_puntos.csv")?
            .set_default("default_season", 2024i64)?
            .set_default("top_pole_getters", 10i64)?
            .set_default("radius_km", 5.0)?
            .set_default("nearest_limit", 15i64)?
            .set_default("fallback_lat", 4.6767)?
            .set_default("fallback_lon", -74.0483)?
            .set_default("region_hint", "co")?
            .set_default("metrics_seed", 42i64)?)
    }

    fn clamped(mut self) -> Self {
        self.radius_km = clamp_radius(self.radius_km);
        self
    }

    pub fn fallback_point(&self) -> GeoPoint {
        GeoPoint::new(self.fallback_lat, self.fallback_lon)
    }
}

pub fn clamp_radius(radius_km: f64) -> f64 {
    if radius_km.is_nan() {
        return MIN_RADIUS_KM;
    }
    radius_km.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM)
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            results_path: "qualifying_results_F1.csv".into(),
            locations_path: "tus_puntos.csv".into(),
            default_season: 2024,
            top_pole_getters: 10,
            radius_km: 5.0,
            nearest_limit: 15,
            fallback_lat: 4.6767,
            fallback_lon: -74.0483,
            region_hint: "co".into(),
            metrics_seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_file() {
        let cfg = DashboardConfig::load_from("no/such/pitwall").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.fallback_point(), GeoPoint::new(4.6767, -74.0483));
    }

    #[test]
    fn radius_is_clamped() {
        assert_eq!(clamp_radius(0.2), MIN_RADIUS_KM);
        assert_eq!(clamp_radius(40.0), MAX_RADIUS_KM);
        assert_eq!(clamp_radius(7.5), 7.5);
        assert_eq!(clamp_radius(f64::NAN), MIN_RADIUS_KM);
    }
}
