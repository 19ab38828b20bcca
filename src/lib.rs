//! Data layer for the qualifying results dashboard and the branch network map.
//!
//! Both datasets are loaded once into immutable snapshots ([`QualifyingTable`],
//! [`BranchNetwork`]) and every query is a pure read over them. The
//! [`Dashboard`] bundles the two with the configuration.

pub mod aggregate;
pub mod branches;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod geocode;
pub mod history;
pub mod laptime;
pub mod proximity;
pub mod query;
pub mod trend;

pub use crate::config::DashboardConfig;
pub use aggregate::{best_time, SessionKpis};
pub use branches::{BranchNetwork, LocationRecord};
pub use dashboard::Dashboard;
pub use data::{QualifyingTable, ResultRecord};
pub use error::{Error, Result};
pub use geocode::{GeocodeResult, Geocoder};
pub use laptime::{parse_time, LapTime};
pub use proximity::{nearest, GeoPoint};
pub use query::{results_for, Selection};
