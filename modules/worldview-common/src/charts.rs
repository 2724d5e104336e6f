//! Chart and statistics-tile definitions over the Filtered Subset.
//!
//! Each chart is one instantiation of [`group_mean`] with its own key and
//! value extractors.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDateTime};
use serde::Serialize;

use crate::aggregate::{distinct_count, group_mean, GroupMean, UNKNOWN_GROUP};
use crate::record::Record;

/// Timestamp layout the world-details provider uses for `published`/`added`.
pub const PUBLISHED_FORMAT: &str = "%B, %d %Y %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub records: usize,
    pub sectors: usize,
    pub countries: usize,
    pub topics: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    /// 0 = Sunday.
    pub weekday: u32,
    /// Day of month divided by seven.
    pub week: u32,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub intensity_by_sector: Vec<GroupMean>,
    pub intensity_by_pestle: Vec<GroupMean>,
    pub impact_by_region: Vec<GroupMean>,
    pub likelihood_by_region: Vec<GroupMean>,
    pub intensity_timeline: Vec<GroupMean>,
    pub publication_heatmap: Vec<HeatmapCell>,
}

impl Charts {
    pub fn compute<R: Borrow<Record>>(records: &[R]) -> Self {
        Self {
            intensity_by_sector: intensity_by_sector(records),
            intensity_by_pestle: intensity_by_pestle(records),
            impact_by_region: impact_by_region(records),
            likelihood_by_region: likelihood_by_region(records),
            intensity_timeline: intensity_timeline(records),
            publication_heatmap: publication_heatmap(records),
        }
    }
}

pub fn statistics<R: Borrow<Record>>(records: &[R]) -> Statistics {
    Statistics {
        records: records.len(),
        sectors: distinct_count(records, |r| r.sector.as_deref()),
        countries: distinct_count(records, |r| r.country.as_deref()),
        topics: distinct_count(records, |r| r.topic.as_deref()),
    }
}

/// Bar chart. The provider uses the literal sector `"none"` for unclassified
/// rows; those join the unknown group.
pub fn intensity_by_sector<R: Borrow<Record>>(records: &[R]) -> Vec<GroupMean> {
    group_mean(
        records,
        |r| match r.sector.as_deref() {
            Some("none") => Some(UNKNOWN_GROUP),
            other => other,
        },
        Record::intensity_or_zero,
    )
}

/// Pie chart.
pub fn intensity_by_pestle<R: Borrow<Record>>(records: &[R]) -> Vec<GroupMean> {
    group_mean(records, |r| r.pestle.as_deref(), Record::intensity_or_zero)
}

/// Donut chart. Regions whose mean impact is not positive have no slice.
pub fn impact_by_region<R: Borrow<Record>>(records: &[R]) -> Vec<GroupMean> {
    group_mean(records, |r| r.region.as_deref(), Record::impact_or_zero)
        .into_iter()
        .filter(|g| g.mean > 0.0)
        .collect()
}

pub fn likelihood_by_region<R: Borrow<Record>>(records: &[R]) -> Vec<GroupMean> {
    group_mean(records, |r| r.region.as_deref(), Record::likelihood_or_zero)
}

/// Line chart: mean intensity per start year, earliest first. Records
/// without a start year are left out rather than grouped as unknown.
pub fn intensity_timeline<R: Borrow<Record>>(records: &[R]) -> Vec<GroupMean> {
    let dated: Vec<&Record> = records
        .iter()
        .map(Borrow::<Record>::borrow)
        .filter(|r| r.start_year.as_deref().is_some_and(|y| !y.is_empty()))
        .collect();

    let mut points = group_mean(&dated, |r| r.start_year.as_deref(), Record::intensity_or_zero);
    points.sort_by(|a, b| compare_years(&a.key, &b.key));
    points
}

fn compare_years(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Parse a `published` timestamp in the provider's layout or RFC 3339.
pub fn parse_published(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, PUBLISHED_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

/// Calendar heatmap of mean intensity by (week of month, weekday) of the
/// publication date. Unparseable dates are skipped.
pub fn publication_heatmap<R: Borrow<Record>>(records: &[R]) -> Vec<HeatmapCell> {
    let mut cells: HashMap<(u32, u32), (f64, usize)> = HashMap::new();

    for record in records.iter().map(Borrow::<Record>::borrow) {
        let Some(published) = record.published.as_deref().and_then(parse_published) else {
            continue;
        };
        let slot = (published.day() / 7, published.weekday().num_days_from_sunday());
        let cell = cells.entry(slot).or_insert((0.0, 0));
        cell.0 += record.intensity_or_zero();
        cell.1 += 1;
    }

    let mut out: Vec<HeatmapCell> = cells
        .into_iter()
        .map(|((week, weekday), (sum, count))| HeatmapCell {
            weekday,
            week,
            mean: sum / count as f64,
            count,
        })
        .collect();
    out.sort_by_key(|c| (c.week, c.weekday));
    out
}
