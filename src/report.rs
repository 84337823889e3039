use std::collections::HashMap;
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::{Baseline, Report, ReportEntry};

/// Build the report for one sweep. Items without a current price are left out;
/// items without a baseline record are compared against the default record.
pub fn generate(catalog: &Catalog, baseline: &Baseline, prices: &HashMap<String, f64>) -> Report {
    let mut report = Report::new();

    for id in catalog.iter() {
        let Some(&current_price) = prices.get(id) else { continue };
        let record = baseline.get(id).copied().unwrap_or_default();

        report.push(
            id,
            ReportEntry {
                baseline_price: record.baseline_price,
                current_price,
                percent_change: percent_change(record.baseline_price, current_price),
                quantity: record.quantity,
            },
        );
    }

    report
}

/// Percentage change from `baseline` to `current`, rounded to 2 decimals.
/// A baseline of zero or below has no meaningful change and yields 0.
pub fn percent_change(baseline: f64, current: f64) -> f64 {
    if baseline <= 0.0 {
        return 0.0;
    }
    round2((current - baseline) / baseline * 100.0)
}

/// Round to 2 decimals, ties to even.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

impl Report {
    /// Overwrite `path` with the pretty-printed report.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BaselineRecord;

    fn prices(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn non_positive_baseline_gives_zero_change() {
        assert_eq!(percent_change(0.0, 5.0), 0.0);
        assert_eq!(percent_change(-1.0, 5.0), 0.0);
    }

    #[test]
    fn change_is_rounded_to_two_decimals() {
        assert_eq!(percent_change(1.0, 1.5), 50.0);
        assert_eq!(percent_change(3.0, 4.0), 33.33);
        assert_eq!(percent_change(3.0, 2.0), -33.33);
        assert_eq!(percent_change(2.0, 2.0), 0.0);
    }

    #[test]
    fn half_cent_ties_round_to_even() {
        assert_eq!(percent_change(0.32, 0.07), -78.12);
        assert_eq!(percent_change(0.32, 0.11), -65.62);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn missing_price_is_omitted_and_missing_baseline_defaults() {
        let catalog = Catalog::new(["Sticker A", "Sticker B"]);
        let mut baseline = Baseline::new();
        baseline.insert(
            "Sticker A".to_string(),
            BaselineRecord { baseline_price: 1.0, quantity: 2 },
        );

        let report = generate(&catalog, &baseline, &prices(&[("Sticker A", 1.5)]));

        assert_eq!(report.len(), 1);
        assert!(report.get("Sticker B").is_none());
        assert_eq!(
            report.get("Sticker A"),
            Some(&ReportEntry {
                baseline_price: 1.0,
                current_price: 1.5,
                percent_change: 50.0,
                quantity: 2,
            })
        );
    }

    #[test]
    fn item_without_baseline_record_uses_default() {
        let catalog = Catalog::new(["Sticker B"]);
        let report = generate(&catalog, &Baseline::new(), &prices(&[("Sticker B", 0.42)]));

        let entry = report.get("Sticker B").unwrap();
        assert_eq!(entry.baseline_price, 0.0);
        assert_eq!(entry.percent_change, 0.0);
        assert_eq!(entry.quantity, 1);
    }

    #[test]
    fn prices_outside_catalog_are_ignored() {
        let catalog = Catalog::new(["Sticker A"]);
        let report = generate(
            &catalog,
            &Baseline::new(),
            &prices(&[("Sticker A", 1.0), ("Stray", 9.0)]),
        );
        let ids: Vec<&str> = report.ids().collect();
        assert_eq!(ids, vec!["Sticker A"]);
    }

    #[test]
    fn report_follows_catalog_order() {
        let catalog = Catalog::new(["C", "A", "B"]);
        let report = generate(
            &catalog,
            &Baseline::new(),
            &prices(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]),
        );
        let ids: Vec<&str> = report.ids().collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn save_writes_expected_shape() {
        let dir = std::env::temp_dir().join(format!("sticker-monitor-report-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("report.json");

        let mut report = Report::new();
        report.push(
            "Sticker A",
            ReportEntry { baseline_price: 1.0, current_price: 1.5, percent_change: 50.0, quantity: 2 },
        );
        report.save(&path).await.unwrap();

        let v: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "Sticker A": [{
                    "baseline_price": 1.0,
                    "current_price": 1.5,
                    "percent_change": 50.0,
                    "quantity": 2
                }]
            })
        );

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
