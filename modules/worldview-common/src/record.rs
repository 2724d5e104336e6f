use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

// --- Record ---

/// One "world event" row as served by the world-details endpoint.
///
/// Every field is optional. The provider is loose about types (years arrive
/// as numbers or strings, missing numbers arrive as `""`), so categorical
/// fields go through `lenient_text` and numeric ones through
/// `lenient_number`. A malformed field never fails the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "lenient_text")]
    pub end_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub start_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pestle: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub insight: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub published: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub added: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub intensity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub impact: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub likelihood: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub relevance: Option<f64>,
}

impl Record {
    /// Intensity, with an absent value counting as zero.
    pub fn intensity_or_zero(&self) -> f64 {
        self.intensity.unwrap_or(0.0)
    }

    /// Impact, with an absent value counting as zero.
    pub fn impact_or_zero(&self) -> f64 {
        self.impact.unwrap_or(0.0)
    }

    pub fn likelihood_or_zero(&self) -> f64 {
        self.likelihood.unwrap_or(0.0)
    }
}

// --- Lenient field decoding ---

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Other(serde_json::Value),
}

fn number_text(n: &serde_json::Number) -> String {
    match (n.as_i64(), n.as_u64(), n.as_f64()) {
        (Some(i), _, _) => i.to_string(),
        (_, Some(u), _) => u.to_string(),
        (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Accept a string, a number (rendered as decimal text), or null.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawField>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawField::Text(s)) => Some(s),
        Some(RawField::Number(n)) => Some(number_text(&n)),
        Some(RawField::Bool(b)) => Some(b.to_string()),
        Some(RawField::Other(_)) | None => None,
    })
}

/// Accept a number, a numeric string, or `""`/null (absent).
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawField>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawField::Number(n)) => n.as_f64(),
        Some(RawField::Text(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    })
}

// --- Record Store ---

/// The full, unfiltered collection fetched from the provider.
///
/// Immutable once built. A reload builds a new store rather than patching
/// this one.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[Record]>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for RecordStore {
    type Target = [Record];

    fn deref(&self) -> &[Record] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_and_empty_strings_are_tolerated() {
        let json = r#"{
            "_id": {"$oid": "abc"},
            "end_year": 2027,
            "start_year": "",
            "intensity": 6,
            "impact": "",
            "likelihood": "3",
            "relevance": null,
            "sector": "Energy",
            "region": "Northern America"
        }"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.end_year.as_deref(), Some("2027"));
        assert_eq!(r.start_year.as_deref(), Some(""));
        assert_eq!(r.intensity, Some(6.0));
        assert_eq!(r.impact, None);
        assert_eq!(r.likelihood, Some(3.0));
        assert_eq!(r.relevance, None);
        assert_eq!(r.sector.as_deref(), Some("Energy"));
        assert_eq!(r.topic, None);
    }

    #[test]
    fn test_missing_numbers_default_to_zero() {
        let r: Record = serde_json::from_str("{}").unwrap();
        assert_eq!(r.intensity_or_zero(), 0.0);
        assert_eq!(r.impact_or_zero(), 0.0);
        assert_eq!(r.likelihood_or_zero(), 0.0);
    }

    #[test]
    fn test_garbage_number_is_absent() {
        let r: Record = serde_json::from_str(r#"{"intensity": "high", "impact": [1]}"#).unwrap();
        assert_eq!(r.intensity, None);
        assert_eq!(r.impact, None);
    }

    #[test]
    fn test_fractional_year_keeps_fraction() {
        let r: Record = serde_json::from_str(r#"{"end_year": 2030.5}"#).unwrap();
        assert_eq!(r.end_year.as_deref(), Some("2030.5"));
    }

    #[test]
    fn test_store_derefs_to_slice() {
        let store = RecordStore::new(vec![Record::default(), Record::default()]);
        assert_eq!(store.len(), 2);
        assert!(RecordStore::default().is_empty());
    }
}
