//! Types d'erreurs pour le crate rgn

use thiserror::Error;

/// Erreurs pouvant survenir lors du chargement ou de l'insertion d'un VG
#[derive(Debug, Error)]
pub enum RgnError {
    /// Erreur d'I/O lors de la lecture du fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document XML illisible
    #[error("Parse error in {file}: {reason}")]
    Parse { file: String, reason: String },

    /// Aucun élément <vg> dans le document
    #[error("Empty dataset: no <vg> element found in {0}")]
    EmptyDataset(String),

    /// Champ obligatoire absent de l'enregistrement
    #[error("Malformed record {name}: missing field '{field}'")]
    MalformedRecord { name: String, field: &'static str },

    /// Valeur numérique illisible (coordonnée ou altitude)
    #[error("Invalid number in record {name}: {field} = '{value}'")]
    InvalidNumber {
        name: String,
        field: &'static str,
        value: String,
    },
}

impl RgnError {
    /// Crée une erreur de parsing avec contexte
    pub fn parse_error(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            file: file.into(),
            reason: reason.to_string(),
        }
    }

    /// Crée une erreur de champ manquant
    pub fn missing_field(name: Option<&str>, field: &'static str) -> Self {
        Self::MalformedRecord {
            name: name.unwrap_or("<unnamed>").to_string(),
            field,
        }
    }

    /// Crée une erreur de valeur numérique invalide
    pub fn invalid_number(name: &str, field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            name: name.to_string(),
            field,
            value: value.into(),
        }
    }

    /// Vrai si l'erreur concerne un seul enregistrement (le chargement continue)
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::InvalidNumber { .. }
        )
    }
}
