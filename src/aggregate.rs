use crate::data::ResultRecord;
use crate::laptime::LapTime;
use serde::Serialize;
use std::cmp::Ordering;

/// Picks the time that represents a driver's qualifying: Q3 if they set
/// one, else Q2, else Q1.
pub fn best_time(q1: LapTime, q2: LapTime, q3: LapTime) -> LapTime {
    q3.or(q2).or(q1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoleSitter {
    pub driver_name: String,
    pub constructor_name: String,
    pub best_time: LapTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionKpis {
    NoData,
    Data {
        pole: PoleSitter,
        /// Second place best time minus the pole time, when both exist.
        gap_to_second: Option<f64>,
        entrant_count: usize,
    },
}

impl SessionKpis {
    // expects results already sorted by position
    pub fn from_results(results: &[&ResultRecord]) -> Self {
        let Some((first, rest)) = results.split_first() else {
            return SessionKpis::NoData;
        };

        let gap_to_second = rest.first().and_then(|second| {
            let pole = first.best_time.seconds()?;
            let other = second.best_time.seconds()?;
            Some(other - pole)
        });

        SessionKpis::Data {
            pole: PoleSitter {
                driver_name: first.driver_name.clone(),
                constructor_name: first.constructor_name.clone(),
                best_time: first.best_time,
            },
            gap_to_second,
            entrant_count: results.len(),
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, SessionKpis::Data { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult<'a> {
    pub rank: usize,
    pub record: &'a ResultRecord,
    pub best_time: f64,
    pub gap_to_fastest: f64,
}

/// Orders drivers with a best time from fastest to slowest; ties keep
/// official position order. Drivers without any time are left out.
pub fn rank_by_best_time<'a>(records: &[&'a ResultRecord]) -> Vec<RankedResult<'a>> {
    let mut timed: Vec<(&ResultRecord, f64)> = records
        .iter()
        .filter_map(|r| r.best_time.seconds().map(|t| (*r, t)))
        .collect();
    timed.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.position.cmp(&b.0.position))
    });

    let fastest = timed.first().map(|(_, t)| *t).unwrap_or(0.0);
    timed
        .into_iter()
        .enumerate()
        .map(|(i, (record, best_time))| RankedResult {
            rank: i + 1,
            record,
            best_time,
            gap_to_fastest: best_time - fastest,
        })
        .collect()
}

// y-axis bounds for the time chart: 10% under the fastest Q1, 10% over the slowest
pub fn q1_axis_range(records: &[&ResultRecord]) -> Option<(f64, f64)> {
    let times = records.iter().filter_map(|r| r.q1_sec.seconds());
    let (min, max) = times.fold(None, |acc: Option<(f64, f64)>, t| match acc {
        None => Some((t, t)),
        Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
    })?;
    Some((min * 0.9, max * 1.1))
}
