use serde::Serialize;

/// A normalized session time.
///
/// `Absent` covers every way a driver can end up without a time: the
/// field was blank, held the `"0"` sentinel, or was not a readable time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(into = "Option<f64>")]
pub enum LapTime {
    Present(f64),
    #[default]
    Absent,
}

impl LapTime {
    // NaN is the only float that can't stand for a time
    pub fn from_seconds(seconds: f64) -> Self {
        if !seconds.is_nan() {
            LapTime::Present(seconds)
        } else {
            LapTime::Absent
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, LapTime::Present(_))
    }

    pub fn seconds(&self) -> Option<f64> {
        match *self {
            LapTime::Present(s) => Some(s),
            LapTime::Absent => None,
        }
    }

    /// Returns `self` if present, otherwise `other`.
    pub fn or(self, other: LapTime) -> LapTime {
        match self {
            LapTime::Present(_) => self,
            LapTime::Absent => other,
        }
    }
}

impl From<LapTime> for Option<f64> {
    fn from(time: LapTime) -> Self {
        time.seconds()
    }
}

/// A time field as it arrives from a source, before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawTime<'a> {
    Missing,
    Text(&'a str),
    Number(f64),
}

impl<'a> From<&'a str> for RawTime<'a> {
    fn from(text: &'a str) -> Self {
        RawTime::Text(text)
    }
}

impl<'a> From<Option<&'a str>> for RawTime<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(RawTime::Missing, RawTime::Text)
    }
}

impl<'a> From<&'a Option<String>> for RawTime<'a> {
    fn from(text: &'a Option<String>) -> Self {
        RawTime::from(text.as_deref())
    }
}

impl From<f64> for RawTime<'_> {
    fn from(n: f64) -> Self {
        RawTime::Number(n)
    }
}

/// Converts a raw qualifying time (`"1:23.456"`, `"83.456"`, `83.456`) to seconds.
///
/// Never fails: blank, `"0"`, `0` and anything unreadable come back as
/// [`LapTime::Absent`]. Only the first `:` separates minutes from seconds,
/// so `"1:02:03"` leaves `"02:03"` as the seconds part and is rejected.
pub fn parse_time<'a>(raw: impl Into<RawTime<'a>>) -> LapTime {
    match raw.into() {
        RawTime::Missing => LapTime::Absent,
        RawTime::Number(n) if n == 0.0 => LapTime::Absent,
        RawTime::Number(n) => LapTime::from_seconds(n),
        RawTime::Text(text) => parse_text(text).map_or(LapTime::Absent, LapTime::from_seconds),
    }
}

fn parse_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || text == "0" {
        return None;
    }

    match text.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = minutes.trim().parse().ok()?;
            let seconds: f64 = seconds.trim().parse().ok()?;
            // both halves of a minutes:seconds time must be non-negative
            if !(seconds.is_finite() && seconds >= 0.0) {
                return None;
            }
            Some(f64::from(minutes) * 60.0 + seconds)
        }
        None => text.parse().ok(),
    }
}

/// Renders seconds as `M:SS.sss`, or `SS.sss` below one minute.
pub fn format_lap_time(seconds: f64) -> String {
    let millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let minutes = millis / 60_000;
    let rem = millis % 60_000;
    if minutes == 0 {
        format!("{}.{:03}", rem / 1000, rem % 1000)
    } else {
        format!("{}:{:02}.{:03}", minutes, rem / 1000, rem % 1000)
    }
}

/// Renders a gap to the leader, e.g. `+0.545s`.
pub fn format_gap(seconds: f64) -> String {
    format!("+{:.3}s", seconds)
}
