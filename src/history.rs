use crate::data::QualifyingTable;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoleCount {
    pub driver_name: String,
    pub count: usize,
}

// all-time poles per driver over the whole table, whatever is selected elsewhere
pub fn top_pole_getters(table: &QualifyingTable, n: usize) -> Vec<PoleCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<PoleCount> = Vec::new();

    for r in table.records() {
        if r.position != 1 || r.driver_name.is_empty() {
            continue;
        }
        match index.get(r.driver_name.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(r.driver_name.as_str(), counts.len());
                counts.push(PoleCount { driver_name: r.driver_name.clone(), count: 1 });
            }
        }
    }

    // sort_by is stable, which keeps first-pole order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RawResult, ResultRecord};
    use proptest::prelude::*;

    fn pole(season: i32, circuit: &str, driver: &str, position: u32) -> ResultRecord {
        ResultRecord::normalize(RawResult {
            season,
            circuit_id: circuit.into(),
            position,
            driver_name: driver.into(),
            constructor_name: String::new(),
            nationality: String::new(),
            q1: Some("1:20.000".into()),
            q2: None,
            q3: None,
        })
    }

    #[test]
    fn counts_and_orders_poles() {
        let table = QualifyingTable::from_records(vec![
            pole(2020, "a", "Hamilton", 1),
            pole(2020, "b", "Bottas", 1),
            pole(2020, "c", "Hamilton", 1),
            pole(2020, "c", "Verstappen", 2),
            pole(2021, "a", "Verstappen", 1),
            pole(2021, "b", "Verstappen", 1),
            pole(2021, "c", "Verstappen", 1),
            pole(2021, "d", "Norris", 1),
        ]);
        let top = top_pole_getters(&table, 10);
        let summary: Vec<(&str, usize)> = top.iter().map(|p| (p.driver_name.as_str(), p.count)).collect();
        assert_eq!(summary, vec![("Verstappen", 3), ("Hamilton", 2), ("Bottas", 1), ("Norris", 1)]);
    }

    #[test]
    fn truncates_and_skips_blank_names() {
        let table = QualifyingTable::from_records(vec![
            pole(2020, "a", "", 1),
            pole(2020, "b", "Bottas", 1),
            pole(2020, "c", "Hamilton", 1),
        ]);
        let top = top_pole_getters(&table, 1);
        assert_eq!(top, vec![PoleCount { driver_name: "Bottas".into(), count: 1 }]);
        assert!(top_pole_getters(&table, 0).is_empty());
        assert!(top_pole_getters(&QualifyingTable::default(), 5).is_empty());
    }

    proptest! {
        #[test]
        fn leaderboard_invariants(
            rows in prop::collection::vec((0usize..5, 1u32..4), 0..60),
            n in 0usize..8,
        ) {
            let names = ["Senna", "Prost", "Mansell", "Piquet", "Berger"];
            let records: Vec<ResultRecord> = rows
                .iter()
                .enumerate()
                .map(|(i, (d, p))| pole(1990, &format!("c{i}"), names[*d], *p))
                .collect();
            let total_poles = records.iter().filter(|r| r.position == 1).count();
            let table = QualifyingTable::from_records(records);

            let top = top_pole_getters(&table, n);
            prop_assert!(top.len() <= n);
            prop_assert!(top.windows(2).all(|w| w[0].count >= w[1].count));

            let everyone = top_pole_getters(&table, usize::MAX);
            prop_assert_eq!(everyone.iter().map(|p| p.count).sum::<usize>(), total_poles);
        }
    }
}
