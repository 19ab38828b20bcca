use crate::aggregate::best_time;
use crate::error::{Error, Result};
use crate::laptime::{parse_time, LapTime};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const REQUIRED_COLUMNS: [&str; 4] = ["Season", "CircuitID", "Position", "FamilyName"];

// one row of the qualifying results file, with the columns renamed to what we use
#[derive(Debug, Clone, Deserialize)]
pub struct RawResult {
    #[serde(rename = "Season", deserialize_with = "trimmed")] pub season: i32,
    #[serde(rename = "CircuitID")] pub circuit_id: String,
    #[serde(rename = "Position", deserialize_with = "trimmed")] pub position: u32,
    #[serde(rename = "FamilyName")] pub driver_name: String,
    #[serde(rename = "ConstructorName", default)] pub constructor_name: String,
    #[serde(rename = "Nationality", default)] pub nationality: String,
    #[serde(rename = "Q1", default)] pub q1: Option<String>,
    #[serde(rename = "Q2", default)] pub q2: Option<String>,
    #[serde(rename = "Q3", default)] pub q3: Option<String>,
}

// numbers like " 2023" show up in hand-edited files, so strip them before parsing
fn trimmed<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(serde::de::Error::custom)
}

/// One driver's qualifying result at one event, with normalized times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub season: i32,
    pub circuit_id: String,
    pub position: u32,
    pub driver_name: String,
    pub constructor_name: String,
    pub nationality: String,
    pub q1: Option<String>,
    pub q2: Option<String>,
    pub q3: Option<String>,
    pub q1_sec: LapTime,
    pub q2_sec: LapTime,
    pub q3_sec: LapTime,
    pub best_time: LapTime,
}

impl ResultRecord {
    /// Parses the three session times and derives the best time.
    pub fn normalize(raw: RawResult) -> Self {
        let q1_sec = parse_time(&raw.q1);
        let q2_sec = parse_time(&raw.q2);
        let q3_sec = parse_time(&raw.q3);
        ResultRecord {
            season: raw.season,
            circuit_id: raw.circuit_id,
            position: raw.position,
            driver_name: raw.driver_name,
            constructor_name: raw.constructor_name,
            nationality: raw.nationality,
            q1: raw.q1,
            q2: raw.q2,
            q3: raw.q3,
            q1_sec,
            q2_sec,
            q3_sec,
            best_time: best_time(q1_sec, q2_sec, q3_sec),
        }
    }
}

/// The loaded qualifying results. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct QualifyingTable {
    records: Vec<ResultRecord>,
}

impl QualifyingTable {
    pub fn from_path<P: AsRef<Path>>(filename: P) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_path(filename)?;
        Self::from_csv(reader)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(rdr);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::MissingColumn(column));
            }
        }

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (line, res) in reader.deserialize::<RawResult>().enumerate() {
            match res {
                Ok(raw) => records.push(ResultRecord::normalize(raw)),
                Err(err) => {
                    // a broken row must not take the whole table down
                    warn!(row = line + 1, error = %err, "skipping unreadable result row");
                    skipped += 1;
                }
            }
        }

        info!(records = records.len(), skipped, "loaded qualifying results");
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<ResultRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct seasons, most recent first.
    pub fn seasons(&self) -> Vec<i32> {
        let seasons: BTreeSet<i32> = self.records.iter().map(|r| r.season).collect();
        seasons.into_iter().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Season,Round,CircuitID,Position,DriverID,FamilyName,ConstructorName,Nationality,Q1,Q2,Q3
2023,6,monaco,1,max_verstappen,Verstappen,Red Bull,Dutch,1:12.386,1:12.050,1:11.365
2023,6,monaco,2,alonso,Alonso,Aston Martin,Spanish,1:12.886,1:12.240,1:11.449
2023,6,monaco,3,ocon,Ocon,Alpine,French,1:12.911,1:12.330,
2022,7,monaco,1,leclerc,Leclerc,Ferrari,Monegasque,1:12.569,1:11.864,1:11.376
2022,1,bahrain,20,zhou,Zhou,Alfa Romeo,Chinese,0,,
";

    #[test]
    fn loads_and_normalizes_rows() {
        let table = QualifyingTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 5);

        let ocon = &table.records()[2];
        assert_eq!(ocon.q3_sec, LapTime::Absent);
        assert_eq!(ocon.best_time, ocon.q2_sec);

        let zhou = &table.records()[4];
        assert_eq!(zhou.q1_sec, LapTime::Absent);
        assert_eq!(zhou.best_time, LapTime::Absent);
    }

    #[test]
    fn seasons_are_descending_and_distinct() {
        let table = QualifyingTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.seasons(), vec![2023, 2022]);
    }

    #[test]
    fn bad_rows_are_skipped() {
        let csv = "Season,CircuitID,Position,FamilyName,Q1\n\
                   2023,monza,1,Sainz,1:21.000\n\
                   twenty,monza,2,Leclerc,1:21.100\n";
        let table = QualifyingTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].constructor_name, "");
        assert_eq!(table.records()[0].q3, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let csv = "Season,Position,FamilyName\n2023,1,Sainz\n";
        let err = QualifyingTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn("CircuitID")));
    }

    #[test]
    fn headers_with_padding_still_match() {
        let csv = " Season , CircuitID ,Position,FamilyName\n2023,monza,1,Sainz\n";
        let table = QualifyingTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.records()[0].circuit_id, "monza");
    }

    #[test]
    fn padded_numbers_still_load() {
        let csv = "Season,CircuitID,Position,FamilyName,Q1\n2023, monaco, 1,Sainz,1:12.5\n";
        let table = QualifyingTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        let r = &table.records()[0];
        assert_eq!(r.season, 2023);
        assert_eq!(r.position, 1);
        assert_eq!(r.circuit_id, " monaco");
    }

    #[test]
    fn empty_file_gives_empty_table() {
        let csv = "Season,CircuitID,Position,FamilyName\n";
        let table = QualifyingTable::from_reader(csv.as_bytes()).unwrap();
        assert!(table.is_empty());
        assert!(table.seasons().is_empty());
    }
}
