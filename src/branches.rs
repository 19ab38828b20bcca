use crate::error::{Error, Result};
use csv::{ReaderBuilder, Trim};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const REQUIRED_COLUMNS: [&str; 3] = ["Nombre", "Lat", "Lng"];

const DEPARTMENTS: [(&str, [&str; 2]); 3] = [
    ("Antioquia", ["Medellín", "Envigado"]),
    ("Cundinamarca", ["Bogotá", "Chía"]),
    ("Valle del Cauca", ["Cali", "Palmira"]),
];

#[derive(Debug, Deserialize)]
struct RawBranch {
    #[serde(rename = "Nombre")] name: String,
    #[serde(rename = "Lat")] lat: String,
    #[serde(rename = "Lng")] lng: String,
}

// a branch plus the made-up business numbers we attach to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub department: String,
    pub city: String,
    pub address: String,
    pub transactions: u32,
    pub current_collection: u64,
    pub weekly_projection: [u64; 4],
    pub month_projection: u64,
    pub confidence_score: f64,
}

// some exports write "4,6767" instead of "4.6767"
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

// the metrics are illustrative only. drawn in file order from a seeded rng,
// so the same seed and file always give the same network
fn synthesize(name: String, lat: f64, lng: f64, rng: &mut StdRng) -> LocationRecord {
    let (department, cities) = DEPARTMENTS[rng.random_range(0..DEPARTMENTS.len())];
    let city = cities[rng.random_range(0..cities.len())];
    let address = format!(
        "Carrera {} # {}",
        rng.random_range(1..=100u32),
        rng.random_range(1..=100u32)
    );

    let transactions: u32 = rng.random_range(500..3000);
    let current_collection = u64::from(transactions) * rng.random_range(40_000..60_000u64);
    let weekly_projection: [u64; 4] = std::array::from_fn(|_| {
        (current_collection as f64 / 4.0 * rng.random_range(0.9..1.1)) as u64
    });
    let month_projection = weekly_projection.iter().sum();
    let confidence_score = rng.random_range(0.85..0.99);

    LocationRecord {
        name,
        lat,
        lng,
        department: department.to_string(),
        city: city.to_string(),
        address,
        transactions,
        current_collection,
        weekly_projection,
        month_projection,
        confidence_score,
    }
}

#[derive(Debug, Clone, Default)]
pub struct BranchNetwork {
    branches: Vec<LocationRecord>,
}

impl BranchNetwork {
    /// Loads the locations file. A missing file gives an empty network.
    pub fn from_path<P: AsRef<Path>>(filename: P, seed: u64) -> Result<Self> {
        let path = filename.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "locations file not found, starting with an empty network");
            return Ok(Self::default());
        }
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_path(path)?;
        Self::from_csv(reader, seed)
    }

    pub fn from_reader<R: Read>(rdr: R, seed: u64) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(rdr);
        Self::from_csv(reader, seed)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>, seed: u64) -> Result<Self> {
        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::MissingColumn(column));
            }
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut branches = Vec::new();
        for (line, res) in reader.deserialize::<RawBranch>().enumerate() {
            let raw = match res {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(row = line + 1, error = %err, "skipping unreadable location row");
                    continue;
                }
            };
            match (parse_coordinate(&raw.lat), parse_coordinate(&raw.lng)) {
                (Some(lat), Some(lng)) => branches.push(synthesize(raw.name, lat, lng, &mut rng)),
                _ => warn!(row = line + 1, name = %raw.name, lat = %raw.lat, lng = %raw.lng, "dropping location with unreadable coordinates"),
            }
        }

        info!(branches = branches.len(), "loaded branch network");
        Ok(Self { branches })
    }

    pub fn from_records(branches: Vec<LocationRecord>) -> Self {
        Self { branches }
    }

    pub fn branches(&self) -> &[LocationRecord] {
        &self.branches
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn departments(&self) -> Vec<&str> {
        distinct(self.branches.iter().map(|b| b.department.as_str()))
    }

    pub fn cities(&self) -> Vec<&str> {
        distinct(self.branches.iter().map(|b| b.city.as_str()))
    }

    /// Branches whose department and city are both selected. An empty
    /// selection matches nothing.
    pub fn filter_region(&self, departments: &[String], cities: &[String]) -> Vec<&LocationRecord> {
        self.branches
            .iter()
            .filter(|b| departments.iter().any(|d| *d == b.department))
            .filter(|b| cities.iter().any(|c| *c == b.city))
            .collect()
    }

    pub fn totals(&self) -> NetworkTotals {
        NetworkTotals {
            total_collection: self.branches.iter().map(|b| b.current_collection).sum(),
            total_transactions: self.branches.iter().map(|b| u64::from(b.transactions)).sum(),
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkTotals {
    pub total_collection: u64,
    pub total_transactions: u64,
}

impl NetworkTotals {
    // $1.23 B above a billion, $4.5 M otherwise
    pub fn format_collection(&self) -> String {
        let total = self.total_collection as f64;
        if total > 1_000_000_000.0 {
            format!("${:.2} B", total / 1_000_000_000.0)
        } else {
            format!("${:.1} M", total / 1_000_000.0)
        }
    }

    pub fn format_transactions(&self) -> String {
        if self.total_transactions > 1000 {
            format!("{:.1} K", self.total_transactions as f64 / 1000.0)
        } else {
            self.total_transactions.to_string()
        }
    }
}

// upper bound for the progress bar, 100 when the table is empty
pub fn max_month_projection(records: &[&LocationRecord]) -> u64 {
    records.iter().map(|r| r.month_projection).max().unwrap_or(100)
}

pub fn short_name(name: &str) -> String {
    if name.chars().count() > 15 {
        let head: String = name.chars().take(15).collect();
        format!("{head}..")
    } else {
        name.to_string()
    }
}
