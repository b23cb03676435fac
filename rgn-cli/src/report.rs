//! Rapport de chargement d'un jeu de données

use std::path::Path;

use rgn::{LoadResult, Order};
use serde::Serialize;

/// Nombre de VGs chargés pour un ordre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotal {
    pub order: Order,
    pub vertices: usize,
}

/// Rapport de chargement
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Fichier source
    pub source: String,
    /// VGs chargés par ordre
    pub by_order: Vec<OrderTotal>,
    /// Nombre de POIs simples
    pub pois: usize,
    /// Enregistrements ignorés (message d'erreur)
    pub skipped: Vec<String>,
}

impl LoadReport {
    pub fn new(source: &Path, result: &LoadResult) -> Self {
        Self {
            source: source.display().to_string(),
            by_order: Order::ALL
                .iter()
                .map(|&order| OrderTotal {
                    order,
                    vertices: result.collection.bucket(order).len(),
                })
                .collect(),
            pois: result.pois.len(),
            skipped: result.errors.iter().map(ToString::to_string).collect(),
        }
    }

    /// Nombre total de VGs chargés
    pub fn total_vertices(&self) -> usize {
        self.by_order.iter().map(|t| t.vertices).sum()
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("LOAD REPORT - {}", self.source);
        println!("{}", "=".repeat(60));

        println!("\n--- SUMMARY ---");
        println!(
            "Vertices: {}, POIs: {}, skipped: {}",
            self.total_vertices(),
            self.pois,
            self.skipped.len()
        );

        println!("\n--- BY ORDER ---");
        for total in &self.by_order {
            println!("  Order {}: {} vertices", total.order, total.vertices);
        }

        if !self.skipped.is_empty() {
            println!("\n--- SKIPPED ({}) ---", self.skipped.len());
            for message in self.skipped.iter().take(20) {
                println!("  {}", message);
            }
            if self.skipped.len() > 20 {
                println!("  ... and {} more", self.skipped.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Affichage compact pour les logs
    pub fn summary(&self) -> String {
        format!(
            "{}: {} vertices, {} POIs, {} skipped",
            self.source,
            self.total_vertices(),
            self.pois,
            self.skipped.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgn::Record;

    fn record(name: &str, order: &str) -> Record {
        Record {
            name: Some(name.into()),
            latitude: Some("38.7".into()),
            longitude: Some("-9.1".into()),
            order: Some(order.into()),
            altitude: Some("100".into()),
            survey_type: Some("Marco".into()),
        }
    }

    #[test]
    fn test_report_counts() {
        let mut bad = record("Bad", "2");
        bad.longitude = None;
        let result = rgn::build(vec![
            record("A", "1"),
            record("B", "1"),
            record("C", "4"),
            record("P", "x"),
            bad,
        ]);

        let report = LoadReport::new(Path::new("rgn.xml"), &result);
        assert_eq!(report.total_vertices(), 3);
        assert_eq!(report.by_order[0].vertices, 2);
        assert_eq!(report.by_order[1].vertices, 0);
        assert_eq!(report.by_order[3].vertices, 1);
        assert_eq!(report.pois, 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].contains("longitude"));

        let summary = report.summary();
        assert!(summary.contains("rgn.xml"));
        assert!(summary.contains("3 vertices"));
    }
}
