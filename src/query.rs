use crate::data::{QualifyingTable, ResultRecord};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

// label/value pair for the selectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption<V> {
    pub label: String,
    pub value: V,
}

impl<V: ToString> SelectOption<V> {
    pub fn of(value: V) -> Self {
        Self { label: value.to_string(), value }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub season: i32,
    pub circuit: Option<String>,
    // empty means every entrant
    pub entrants: Vec<String>,
}

impl Selection {
    pub fn new(season: i32) -> Self {
        Self { season, ..Self::default() }
    }

    pub fn circuit(mut self, circuit: impl Into<String>) -> Self {
        self.circuit = Some(circuit.into());
        self
    }

    pub fn entrants<I, S>(mut self, entrants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrants = entrants.into_iter().map(Into::into).collect();
        self
    }

    // no circuit picked yet means nothing to show
    pub fn results<'a>(&self, table: &'a QualifyingTable) -> Vec<&'a ResultRecord> {
        match &self.circuit {
            Some(circuit) => results_for(table, self.season, circuit, &self.entrants),
            None => Vec::new(),
        }
    }
}

pub fn season_options(table: &QualifyingTable) -> Vec<SelectOption<i32>> {
    table.seasons().into_iter().map(SelectOption::of).collect()
}

// keep the order circuits first show up in the file, not alphabetical
pub fn circuits_for_season(table: &QualifyingTable, season: i32) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut circuits = Vec::new();
    for r in table.records().iter().filter(|r| r.season == season) {
        if seen.insert(r.circuit_id.as_str()) {
            circuits.push(r.circuit_id.clone());
        }
    }
    circuits
}

pub fn circuit_options(table: &QualifyingTable, season: i32) -> Vec<SelectOption<String>> {
    circuits_for_season(table, season).into_iter().map(SelectOption::of).collect()
}

pub fn entrants_for_season_circuit(table: &QualifyingTable, season: i32, circuit: &str) -> Vec<String> {
    let names: BTreeSet<&str> = table
        .records()
        .iter()
        .filter(|r| r.season == season && r.circuit_id == circuit)
        .map(|r| r.driver_name.as_str())
        .collect();
    names.into_iter().map(str::to_string).collect()
}

pub fn entrant_options(table: &QualifyingTable, season: i32, circuit: &str) -> Vec<SelectOption<String>> {
    entrants_for_season_circuit(table, season, circuit)
        .into_iter()
        .map(SelectOption::of)
        .collect()
}

/// Results for one event ordered by position, optionally narrowed to `entrants`.
pub fn results_for<'a>(
    table: &'a QualifyingTable,
    season: i32,
    circuit: &str,
    entrants: &[String],
) -> Vec<&'a ResultRecord> {
    let mut results: Vec<&ResultRecord> = table
        .records()
        .iter()
        .filter(|r| r.season == season && r.circuit_id == circuit)
        .filter(|r| entrants.is_empty() || entrants.iter().any(|e| *e == r.driver_name))
        .collect();
    results.sort_by_key(|r| r.position);
    debug!(season, circuit, matched = results.len(), "filtered results");
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Season,CircuitID,Position,FamilyName,ConstructorName,Nationality,Q1,Q2,Q3
2023,bahrain,2,Leclerc,Ferrari,Monegasque,1:30.8,1:30.2,1:29.9
2023,bahrain,1,Verstappen,Red Bull,Dutch,1:31.2,1:30.5,1:29.7
2023,monaco,3,Ocon,Alpine,French,1:12.911,1:12.330,
2023,monaco,1,Verstappen,Red Bull,Dutch,1:12.386,1:12.050,1:12.345
2023,monaco,2,Alonso,Aston Martin,Spanish,1:12.886,1:12.240,1:12.890
2023,Monaco,1,Hamilton,Mercedes,British,1:13.0,,
2024,monaco,1,Leclerc,Ferrari,Monegasque,1:11.5,1:10.8,1:10.270
";

    fn table() -> QualifyingTable {
        QualifyingTable::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn circuits_are_distinct_in_encounter_order() {
        let table = table();
        assert_eq!(circuits_for_season(&table, 2023), vec!["bahrain", "monaco", "Monaco"]);
        assert_eq!(circuits_for_season(&table, 2024), vec!["monaco"]);
        assert!(circuits_for_season(&table, 1999).is_empty());
    }

    #[test]
    fn entrants_are_sorted() {
        let table = table();
        assert_eq!(
            entrants_for_season_circuit(&table, 2023, "monaco"),
            vec!["Alonso", "Ocon", "Verstappen"]
        );
        assert!(entrants_for_season_circuit(&table, 2023, "suzuka").is_empty());
    }

    #[test]
    fn results_are_in_position_order() {
        let table = table();
        let results = results_for(&table, 2023, "monaco", &[]);
        let positions: Vec<u32> = results.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);

        let ocon = results[2];
        assert_eq!(ocon.best_time, ocon.q2_sec);
    }

    #[test]
    fn entrant_subset_keeps_relative_order() {
        let table = table();
        let subset = vec!["Ocon".to_string(), "Verstappen".to_string()];
        let results = results_for(&table, 2023, "monaco", &subset);
        let names: Vec<&str> = results.iter().map(|r| r.driver_name.as_str()).collect();
        assert_eq!(names, vec!["Verstappen", "Ocon"]);
    }

    #[test]
    fn unknown_season_gives_empty_results() {
        let table = table();
        assert!(results_for(&table, 1999, "monaco", &[]).is_empty());
    }

    #[test]
    fn selection_without_circuit_is_empty() {
        let table = table();
        assert!(Selection::new(2023).results(&table).is_empty());
        let picked = Selection::new(2023).circuit("bahrain").entrants(["Leclerc"]);
        let results = picked.results(&table);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].driver_name, "Leclerc");
    }

    #[test]
    fn options_carry_label_and_value() {
        let table = table();
        let seasons = season_options(&table);
        assert_eq!(seasons[0], SelectOption { label: "2024".into(), value: 2024 });
        let circuits = circuit_options(&table, 2024);
        assert_eq!(circuits, vec![SelectOption { label: "monaco".into(), value: "monaco".to_string() }]);
        assert_eq!(entrant_options(&table, 2024, "monaco").len(), 1);
    }
}
