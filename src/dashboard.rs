use crate::aggregate::{q1_axis_range, SessionKpis};
use crate::branches::{max_month_projection, short_name, BranchNetwork, LocationRecord, NetworkTotals};
use crate::config::{clamp_radius, DashboardConfig};
use crate::data::{QualifyingTable, ResultRecord};
use crate::error::Result;
use crate::geocode::{resolve_reference, Geocoder, ReferencePoint};
use crate::history::{top_pole_getters, PoleCount};
use crate::proximity::{closest_name, nearest, NearbyBranch};
use crate::query::Selection;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct QualifyingView<'a> {
    pub results: Vec<&'a ResultRecord>,
    pub kpis: SessionKpis,
    pub top_pole_getters: Vec<PoleCount>,
    pub axis_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchView<'a> {
    pub reference: ReferencePoint,
    pub nearby: Vec<NearbyBranch<'a>>,
    pub totals: NetworkTotals,
    /// Short name of the closest branch, or `N/A`.
    pub closest: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionProjection<'a> {
    pub rows: Vec<&'a LocationRecord>,
    pub max_month_projection: u64,
}

// column names match the predicciones.csv export the dashboard offers
#[derive(Debug, Serialize)]
struct ProjectionRow<'a> {
    #[serde(rename = "Nombre")] name: &'a str,
    #[serde(rename = "Ciudad")] city: &'a str,
    #[serde(rename = "Semana_1")] week_1: u64,
    #[serde(rename = "Semana_2")] week_2: u64,
    #[serde(rename = "Semana_3")] week_3: u64,
    #[serde(rename = "Semana_4")] week_4: u64,
    #[serde(rename = "Proyeccion_Mes")] month_projection: u64,
    #[serde(rename = "Score_Confianza")] confidence_score: f64,
}

impl RegionProjection<'_> {
    /// Writes the filtered rows as CSV, one line per branch plus a header.
    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(w);
        if self.rows.is_empty() {
            // serialize only emits the header alongside the first row
            writer.write_record([
                "Nombre", "Ciudad", "Semana_1", "Semana_2", "Semana_3", "Semana_4",
                "Proyeccion_Mes", "Score_Confianza",
            ])?;
        }
        for r in &self.rows {
            let [week_1, week_2, week_3, week_4] = r.weekly_projection;
            writer.serialize(ProjectionRow {
                name: &r.name,
                city: &r.city,
                week_1,
                week_2,
                week_3,
                week_4,
                month_projection: r.month_projection,
                confidence_score: r.confidence_score,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Holds the loaded snapshots and answers every dashboard query against
/// them. Cloning shares the snapshots.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: Arc<QualifyingTable>,
    network: Arc<BranchNetwork>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(table: QualifyingTable, network: BranchNetwork, config: DashboardConfig) -> Self {
        Self { table: Arc::new(table), network: Arc::new(network), config }
    }

    pub fn load(config: DashboardConfig) -> Result<Self> {
        let table = QualifyingTable::from_path(&config.results_path)?;
        let network = BranchNetwork::from_path(&config.locations_path, config.metrics_seed)?;
        Ok(Self::new(table, network, config))
    }

    pub fn table(&self) -> &QualifyingTable {
        &self.table
    }

    pub fn network(&self) -> &BranchNetwork {
        &self.network
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn qualifying_view(&self, selection: &Selection) -> QualifyingView<'_> {
        let results = selection.results(&self.table);
        debug!(season = selection.season, circuit = ?selection.circuit, rows = results.len(), "qualifying view");
        QualifyingView {
            kpis: SessionKpis::from_results(&results),
            axis_range: q1_axis_range(&results),
            top_pole_getters: top_pole_getters(&self.table, self.config.top_pole_getters),
            results,
        }
    }

    pub fn branch_view<G: Geocoder + ?Sized>(&self, geocoder: &G, address: &str, radius_km: f64) -> BranchView<'_> {
        let reference = resolve_reference(geocoder, address, &self.config.region_hint, self.config.fallback_point());
        let nearby = nearest(
            self.network.branches(),
            reference.point,
            clamp_radius(radius_km),
            self.config.nearest_limit,
        );
        let closest = closest_name(&nearby).map_or_else(|| "N/A".to_string(), short_name);
        BranchView { reference, nearby, totals: self.network.totals(), closest }
    }

    pub fn region_projection(&self, departments: &[String], cities: &[String]) -> RegionProjection<'_> {
        let rows = self.network.filter_region(departments, cities);
        RegionProjection { max_month_projection: max_month_projection(&rows), rows }
    }
}
