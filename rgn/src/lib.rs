//! # rgn
//!
//! Modèle du réseau géodésique national (RGN): vertices géodésiques (VGs)
//! groupés par ordre, vérification des distances entre VGs d'un même ordre,
//! requêtes par rayon et statistiques d'altitude.
//!
//! ## Features
//!
//! - Distance de Haversine reproductible (rayon 6372.8 km)
//! - Règles de distance par ordre (table `Order::distance_range`)
//! - Visibilité par ordre et instantané de statistiques sérialisable
//! - Chargement des fichiers RGN XML avec erreurs non fatales par enregistrement
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rgn::{load, Order};
//! use std::path::Path;
//!
//! let mut result = load(Path::new("resources/rgn.xml"))?;
//! result.collection.show_order(Order::First);
//!
//! let stats = result.collection.compute_statistics();
//! println!("Visibles: {}", stats.total_visible);
//! println!("Invalides: {:?}", result.collection.verify_network());
//! ```

pub mod collection;
pub mod error;
pub mod geodesy;
pub mod parser;
pub mod stats;
pub mod types;

pub use collection::{Inserted, VertexCollection};
pub use error::RgnError;
pub use geodesy::distance_km;
pub use stats::{OrderCount, Statistics, VertexSummary};
pub use types::{DistanceRange, Order, Poi, Record, Vertex, Visibility};

use std::path::Path;

use tracing::{info, warn};

/// Résultat du chargement d'un jeu de données
#[derive(Debug, Default)]
pub struct LoadResult {
    /// VGs groupés par ordre (tous cachés au chargement)
    pub collection: VertexCollection,

    /// POIs simples, à afficher directement
    pub pois: Vec<Poi>,

    /// Enregistrements ignorés et leur erreur
    pub errors: Vec<RgnError>,
}

/// Charge un fichier RGN XML et construit la collection.
///
/// # Errors
///
/// Retourne `RgnError` si le fichier est illisible, mal formé ou ne contient
/// aucun élément `<vg>`. Les enregistrements invalides sont ignorés et listés
/// dans `LoadResult::errors`.
pub fn load(path: &Path) -> Result<LoadResult, RgnError> {
    let source = path.display().to_string();
    let data = std::fs::read(path)?;
    load_bytes(&source, &data)
}

/// Comme `load`, depuis le contenu brut d'un document
pub fn load_bytes(source: &str, data: &[u8]) -> Result<LoadResult, RgnError> {
    let xml = parser::decode(source, data)?;
    let records = parser::parse_document(source, &xml)?;

    if records.is_empty() {
        return Err(RgnError::EmptyDataset(source.to_string()));
    }

    let result = build(records);
    info!(
        source,
        vertices = result.collection.len(),
        pois = result.pois.len(),
        skipped = result.errors.len(),
        "dataset loaded"
    );
    Ok(result)
}

/// Construit la collection à partir d'enregistrements déjà parsés
pub fn build(records: impl IntoIterator<Item = Record>) -> LoadResult {
    let mut result = LoadResult::default();

    for record in records {
        match result.collection.add_record(record) {
            Ok(Inserted::Vertex(_)) => {}
            Ok(Inserted::Poi(poi)) => result.pois.push(poi),
            Err(e) => {
                warn!(error = %e, "record skipped");
                result.errors.push(e);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, order: &str, lat: &str) -> Record {
        Record {
            name: Some(name.into()),
            latitude: Some(lat.into()),
            longitude: Some("-9.0".into()),
            order: Some(order.into()),
            altitude: Some("ND".into()),
            survey_type: Some("Marco".into()),
        }
    }

    #[test]
    fn test_build_skips_bad_records() {
        let result = build(vec![
            record("A", "1", "38.0"),
            record("B", "poi", "38.1"),
            record("C", "2", "not a number"),
            Record::default(),
            record("D", "4", "38.3"),
        ]);

        assert_eq!(result.collection.len(), 2);
        assert_eq!(result.pois.len(), 1);
        assert_eq!(result.pois[0].name, "B");
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().all(RgnError::is_record_level));
    }

    #[test]
    fn test_load_bytes_empty_dataset() {
        let result = load_bytes("empty.xml", b"<rgn></rgn>");
        assert!(matches!(result, Err(RgnError::EmptyDataset(ref s)) if s == "empty.xml"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("does/not/exist/rgn.xml"));
        assert!(matches!(result, Err(RgnError::Io(_))));
    }
}
