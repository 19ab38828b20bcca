use pitwall::aggregate::SessionKpis;
use pitwall::geocode::StaticGeocoder;
use pitwall::laptime::{format_gap, format_lap_time};
use pitwall::query::{circuits_for_season, Selection};
use pitwall::{trend, Dashboard, DashboardConfig};
use tracing_subscriber::EnvFilter;

// monthly collection (millions) shown on the trends chart
const OBSERVED_COLLECTION: [f64; 3] = [480.0, 510.0, 540.0];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DashboardConfig::load()?;
    let dashboard = Dashboard::load(config.clone())?;

    // qualifying report for the first circuit of the default season
    let season = config.default_season;
    match circuits_for_season(dashboard.table(), season).first() {
        Some(circuit) => {
            let view = dashboard.qualifying_view(&Selection::new(season).circuit(circuit.as_str()));
            println!("--- Qualifying: {} {} ---", circuit, season);
            for r in &view.results {
                let best = r.best_time.seconds().map_or_else(|| "-".to_string(), format_lap_time);
                println!("{:>3}. {:20} {:20} {}", r.position, r.driver_name, r.constructor_name, best);
            }
            match view.kpis {
                SessionKpis::Data { pole, gap_to_second, entrant_count } => {
                    println!("Pole: {} ({})", pole.driver_name, pole.constructor_name);
                    if let Some(gap) = gap_to_second {
                        println!("Gap to P2: {}", format_gap(gap));
                    }
                    println!("Entrants: {}", entrant_count);
                }
                SessionKpis::NoData => println!("No data for this selection."),
            }
        }
        None => println!("No circuits found for season {}.", season),
    }

    let view = dashboard.qualifying_view(&Selection::new(season));
    println!("\n--- All-time poles (top {}) ---", config.top_pole_getters);
    for p in &view.top_pole_getters {
        println!("- {:20} {}", p.driver_name, p.count);
    }

    // no geocoding service is wired in here, so this always shows the fallback area
    let branches = dashboard.branch_view(&StaticGeocoder::new(), "Carrera 28 61-40", config.radius_km);
    println!("\n--- Branches within {} km ---", config.radius_km);
    if !branches.reference.resolved {
        println!("(address not found, showing default location)");
    }
    println!(
        "Network collection: {}, transactions: {}",
        branches.totals.format_collection(),
        branches.totals.format_transactions()
    );
    println!("Nearest: {}", branches.closest);
    for b in &branches.nearby {
        println!("- {:30} {:6.2} km", b.location.name, b.distance_km);
    }

    let projected = trend::project(&OBSERVED_COLLECTION, 3)?;
    let rendered: Vec<String> = projected.iter().map(|v| format!("{:.0}", v)).collect();
    println!("\nCollection trend (next 3 months): {}", rendered.join(", "));

    Ok(())
}
