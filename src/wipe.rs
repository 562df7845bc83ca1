//! Wipe history: how long each wipe lasted and the recent average.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Number of most recent ended wipes averaged by default.
pub const DEFAULT_AVERAGE_WINDOW: usize = 6;

/// One entry of the wipe history file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WipeDetail {
    /// Patch that started the wipe.
    pub name: String,
    #[serde(deserialize_with = "deserialize_start")]
    pub start: DateTime<Utc>,
}

/// A wipe with its derived end and length.
#[derive(Debug, Clone, PartialEq)]
pub struct Wipe {
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub length_days: i64,
    pub ongoing: bool,
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
fn deserialize_start<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_start(&raw).ok_or_else(|| D::Error::custom(format!("invalid wipe start '{}'", raw)))
}

fn parse_start(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Derives each wipe's end and length. A wipe ends when the next one
/// starts; the last one is ongoing and measured up to `now`. Lengths are
/// whole days, rounded down.
pub fn wipe_lengths(details: &[WipeDetail], now: DateTime<Utc>) -> Vec<Wipe> {
    details
        .iter()
        .enumerate()
        .map(|(idx, current)| {
            let (end, ongoing) = match details.get(idx + 1) {
                Some(next) => (next.start, false),
                None => (now, true),
            };
            let length_days = (end - current.start).num_seconds().div_euclid(24 * 60 * 60);
            Wipe {
                name: current.name.clone(),
                start: current.start,
                end,
                length_days,
                ongoing,
            }
        })
        .collect()
}

/// Mean length in whole days (rounded down) of the `window` most recent
/// ended wipes. `None` when no wipe has ended or `window` is zero.
pub fn compute_average(wipes: &[Wipe], window: usize) -> Option<i64> {
    let mut ended: Vec<&Wipe> = wipes.iter().filter(|w| !w.ongoing).collect();
    ended.sort_by(|a, b| b.start.cmp(&a.start));
    ended.truncate(window);

    if ended.is_empty() {
        return None;
    }

    let sum: i64 = ended.iter().map(|w| w.length_days).sum();
    Some(sum.div_euclid(ended.len() as i64))
}
