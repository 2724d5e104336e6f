use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorldviewError;
use crate::record::Record;

/// A categorical field usable as a filter axis.
///
/// The set is closed; [`Dimension::ALL`] lists them in the order the
/// filter panel shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    EndYear,
    Topic,
    Sector,
    Region,
    Pestle,
    Source,
    Country,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::EndYear,
        Dimension::Topic,
        Dimension::Sector,
        Dimension::Region,
        Dimension::Pestle,
        Dimension::Source,
        Dimension::Country,
    ];

    /// The record field name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::EndYear => "end_year",
            Dimension::Topic => "topic",
            Dimension::Sector => "sector",
            Dimension::Region => "region",
            Dimension::Pestle => "pestle",
            Dimension::Source => "source",
            Dimension::Country => "country",
        }
    }

    /// Selector heading, e.g. `END YEAR`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }

    /// The record's value for this dimension, if the field is present.
    pub fn value_of<'r>(&self, record: &'r Record) -> Option<&'r str> {
        let field = match self {
            Dimension::EndYear => &record.end_year,
            Dimension::Topic => &record.topic,
            Dimension::Sector => &record.sector,
            Dimension::Region => &record.region,
            Dimension::Pestle => &record.pestle,
            Dimension::Source => &record.source,
            Dimension::Country => &record.country,
        };
        field.as_deref()
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = WorldviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| WorldviewError::UnknownDimension(s.to_string()))
    }
}
