use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Baseline
// ---------------------------------------------------------------------------

/// Reference price and held quantity for one tracked item.
/// Also accepts the Portuguese keys written by the older script.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    #[serde(alias = "preco_inicial")]
    pub baseline_price: f64,
    #[serde(alias = "quantidade")]
    pub quantity: u32,
}

impl Default for BaselineRecord {
    fn default() -> Self {
        Self {
            baseline_price: 0.0,
            quantity: 1,
        }
    }
}

/// Identifier → baseline record, as stored in the baseline file.
pub type Baseline = HashMap<String, BaselineRecord>;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportEntry {
    pub baseline_price: f64,
    pub current_price: f64,
    pub percent_change: f64,
    pub quantity: u32,
}

/// Output of one sweep. Serializes as `{"<id>": [entry]}` with keys in
/// catalog order; the one-element list is the format the display layer reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: Vec<(String, ReportEntry)>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>, entry: ReportEntry) {
        self.entries.push((id.into(), entry));
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, e)| e)
    }

    #[cfg(test)]
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, entry) in &self.entries {
            map.serialize_entry(id, &[entry])?;
        }
        map.end()
    }
}
