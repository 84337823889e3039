use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::{Baseline, BaselineRecord};

/// Owns the baseline file. Records are edited by hand between runs; this store
/// only ever adds default records for catalog items it has not seen before.
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the baseline. A missing file means first run: every catalog item
    /// gets a default record and the file is written before returning.
    pub async fn load(&self, catalog: &Catalog) -> Result<Baseline> {
        let mut baseline: Baseline = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No baseline at {}, creating defaults", self.path.display());
                Baseline::new()
            }
            Err(e) => return Err(e.into()),
        };

        let mut added = 0usize;
        for id in catalog.iter() {
            if !baseline.contains_key(id) {
                baseline.insert(id.to_string(), BaselineRecord::default());
                added += 1;
            }
        }

        if added > 0 {
            self.save(&baseline).await?;
            info!(added, "Baseline saved with {added} new default records");
        }

        Ok(baseline)
    }

    /// Overwrite the baseline file with `baseline`.
    pub async fn save(&self, baseline: &Baseline) -> Result<()> {
        let sorted: BTreeMap<&String, &BaselineRecord> = baseline.iter().collect();
        let json = serde_json::to_string_pretty(&sorted)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
