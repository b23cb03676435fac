//! Configuration de l'outil
//!
//! Priorité: options de la ligne de commande, fichier JSON (`--config`),
//! variables d'environnement (`RGN_FILE`, `RGN_ORDERS`, éventuellement via `.env`),
//! puis valeurs par défaut.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rgn::Order;
use serde::Deserialize;

/// Fichier RGN par défaut
pub const DEFAULT_FILE: &str = "resources/rgn.xml";

/// Configuration effective
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Chemin du fichier RGN XML
    pub file: PathBuf,

    /// Ordres affichés au démarrage (1..4)
    pub orders: Vec<u8>,
}

/// Contenu d'un fichier de configuration JSON; les champs absents
/// laissent la valeur de la couche inférieure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileConfig {
    pub file: Option<PathBuf>,
    pub orders: Option<Vec<u8>>,
}

impl FileConfig {
    /// Charge une configuration depuis un fichier JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_json(&content)
    }

    fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse config JSON")
    }
}

fn default_orders() -> Vec<u8> {
    Order::ALL.iter().map(|o| o.number()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_FILE),
            orders: default_orders(),
        }
    }
}

impl Config {
    /// Charge la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("RGN_FILE").ok(),
            std::env::var("RGN_ORDERS").ok(),
        )
    }

    fn from_vars(file: Option<String>, orders: Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(file) = file {
            config.file = PathBuf::from(file);
        }
        if let Some(orders) = orders {
            let orders = parse_order_list(&orders).context("Invalid RGN_ORDERS")?;
            config.orders = orders.iter().map(|o| o.number()).collect();
        }

        Ok(config)
    }

    /// Résout la configuration effective
    pub fn resolve(
        config_path: Option<&Path>,
        file: Option<PathBuf>,
        orders: Option<Vec<Order>>,
    ) -> Result<Self> {
        let file_config = config_path.map(FileConfig::load).transpose()?;
        Ok(Self::layered(Self::from_env()?, file_config, file, orders))
    }

    fn layered(
        mut config: Self,
        file_config: Option<FileConfig>,
        file: Option<PathBuf>,
        orders: Option<Vec<Order>>,
    ) -> Self {
        if let Some(json) = file_config {
            if let Some(file) = json.file {
                config.file = file;
            }
            if let Some(orders) = json.orders {
                config.orders = orders;
            }
        }

        if let Some(file) = file {
            config.file = file;
        }
        if let Some(orders) = orders {
            config.orders = orders.iter().map(|o| o.number()).collect();
        }

        config
    }

    /// Ordres visibles au démarrage, sans doublon
    pub fn visible_orders(&self) -> Result<Vec<Order>> {
        let mut orders = Vec::new();
        for &number in &self.orders {
            let order = Order::try_from(number).map_err(anyhow::Error::msg)?;
            if !orders.contains(&order) {
                orders.push(order);
            }
        }
        Ok(orders)
    }
}

/// Parse une liste d'ordres séparés par des virgules ("1,2,4")
pub fn parse_order_list(s: &str) -> Result<Vec<Order>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<Order>().map_err(anyhow::Error::msg))
        .collect()
}
