//! Définition et implémentation des commandes CLI
//!
//! Chaque commande charge le jeu de données, affiche les ordres configurés
//! puis interroge la collection. Le rendu (texte ou JSON) se fait ici,
//! la collection ne renvoie que des données.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use rgn::{LoadResult, Order, Statistics, Vertex, VertexCollection, VertexSummary};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::report::LoadReport;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the load report (vertices per order, POIs, skipped records)
    Summary,

    /// Statistics of the visible vertices (counts, highest, lowest, average altitude)
    Stats,

    /// Check the distance rules between vertices of the same order
    Verify,

    /// Vertices of an order within a radius of a point, or the all-order count without --order
    Within {
        /// Latitude of the query point (decimal degrees)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the query point (decimal degrees)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Order (1..4)
        #[arg(long)]
        order: Option<Order>,

        /// Maximum distance in km
        #[arg(long)]
        dist: f64,
    },

    /// Vertices sharing a survey type, visible or not
    SameType {
        /// Survey type (e.g. Pilar, Marco)
        survey_type: String,
    },

    /// Visible vertices with a known altitude
    Altitudes,

    /// Number of vertices within the maximum distance of a vertex's order
    Neighbours {
        /// Vertex name
        name: String,
    },
}

/// Charge le jeu de données et applique la visibilité configurée
pub fn open(config: &Config) -> Result<(LoadReport, LoadResult)> {
    let mut result = rgn::load(&config.file)
        .with_context(|| format!("Failed to load {}", config.file.display()))?;
    let report = LoadReport::new(&config.file, &result);
    info!("{}", report.summary());

    for order in config.visible_orders()? {
        result.collection.show_order(order);
    }
    debug!(visible = result.collection.total_visible(), "initial visibility applied");

    Ok((report, result))
}

/// Exécute une commande sur le jeu de données configuré
pub fn run(command: &Commands, config: &Config, json: bool) -> Result<()> {
    let (report, result) = open(config)?;
    let vgs = &result.collection;

    match command {
        Commands::Summary => cmd_summary(&report, json),
        Commands::Stats => cmd_stats(vgs, json),
        Commands::Verify => cmd_verify(vgs, json),
        Commands::Within {
            lat,
            lon,
            order,
            dist,
        } => cmd_within(vgs, *lat, *lon, *order, *dist, json),
        Commands::SameType { survey_type } => {
            print_vertices(&vgs.same_survey_type(survey_type), json)
        }
        Commands::Altitudes => print_vertices(&vgs.visible_altitudes(), json),
        Commands::Neighbours { name } => cmd_neighbours(vgs, name, json),
    }
}

fn cmd_summary(report: &LoadReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    report.display();
    Ok(())
}

/// Affiche l'instantané des statistiques
pub fn cmd_stats(vgs: &VertexCollection, json: bool) -> Result<()> {
    let stats = vgs.compute_statistics();
    if json {
        return print_json(&stats);
    }
    print!("{}", format_statistics(&stats));
    Ok(())
}

fn format_statistics(stats: &Statistics) -> String {
    let mut out = String::new();
    out.push_str(&format!("Visible vertices: {}\n", stats.total_visible));
    for count in &stats.per_order_visible {
        out.push_str(&format!("  Order {}: {}\n", count.order, count.visible));
    }
    out.push_str(&format!("Highest: {}\n", format_extremal(stats.highest.as_ref())));
    out.push_str(&format!("Lowest: {}\n", format_extremal(stats.lowest.as_ref())));
    match stats.average_altitude {
        Some(avg) => out.push_str(&format!("Average altitude: {:.0} m\n", avg)),
        None => out.push_str("Average altitude: undefined\n"),
    }
    out
}

fn format_extremal(summary: Option<&VertexSummary>) -> String {
    match summary {
        Some(VertexSummary {
            name,
            altitude: Some(alt),
            ..
        }) => format!("{} ({} m)", name, alt),
        Some(summary) => summary.name.clone(),
        None => "none".to_string(),
    }
}

#[derive(Serialize)]
struct VerifyOutput<'a> {
    valid: bool,
    invalid: Vec<&'a str>,
}

/// Vérifie le réseau et liste les VGs invalides
pub fn cmd_verify(vgs: &VertexCollection, json: bool) -> Result<()> {
    let invalid = vgs.verify_network();
    info!(invalid = invalid.len(), "network verified");

    if json {
        return print_json(&VerifyOutput {
            valid: invalid.is_empty(),
            invalid,
        });
    }

    if invalid.is_empty() {
        println!("All vertices are valid.");
    } else {
        println!("Invalid ({}): {}", invalid.len(), invalid.join(", "));
    }
    Ok(())
}

#[derive(Serialize)]
struct CountOutput {
    latitude: f64,
    longitude: f64,
    max_km: f64,
    count: usize,
}

fn cmd_within(
    vgs: &VertexCollection,
    lat: f64,
    lon: f64,
    order: Option<Order>,
    dist: f64,
    json: bool,
) -> Result<()> {
    match order {
        Some(order) => print_vertices(&vgs.vertices_within_distance(lat, lon, order, dist), json),
        None => {
            let count = vgs.count_within_distance(lat, lon, dist);
            if json {
                return print_json(&CountOutput {
                    latitude: lat,
                    longitude: lon,
                    max_km: dist,
                    count,
                });
            }
            println!("{} vertices within {} km of ({}, {})", count, dist, lat, lon);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct NeighboursOutput {
    vertex: VertexSummary,
    max_km: Option<f64>,
    neighbours: Option<usize>,
}

fn cmd_neighbours(vgs: &VertexCollection, name: &str, json: bool) -> Result<()> {
    let vertex = vgs
        .find(name)
        .with_context(|| format!("No vertex named '{}'", name))?;
    let max_km = vertex.order.distance_range().map(|r| r.max_km);
    let neighbours = vgs.neighbour_count(vertex);

    if json {
        return print_json(&NeighboursOutput {
            vertex: VertexSummary::from(vertex),
            max_km,
            neighbours,
        });
    }

    println!("{}", format_vertex(vertex));
    match (neighbours, max_km) {
        (Some(n), Some(km)) => println!("Vertices under or equal to {} km away: {}", km, n),
        _ => println!("No distance rule for order {}", vertex.order),
    }
    Ok(())
}

fn print_vertices(vertices: &[&Vertex], json: bool) -> Result<()> {
    if json {
        let summaries: Vec<VertexSummary> = vertices
            .iter()
            .copied()
            .map(VertexSummary::from)
            .collect();
        return print_json(&summaries);
    }

    for vertex in vertices {
        println!("{}", format_vertex(vertex));
    }
    println!("{} vertices", vertices.len());
    Ok(())
}

fn format_vertex(vertex: &Vertex) -> String {
    let altitude = vertex
        .altitude
        .map_or_else(|| rgn::types::ALTITUDE_NOT_AVAILABLE.to_string(), |a| a.to_string());
    format!(
        "{} [order {}] lat {} lng {} alt {} type {}",
        vertex.name(),
        vertex.order,
        vertex.latitude(),
        vertex.longitude(),
        altitude,
        vertex.survey_type
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Vérifie que le fichier de données existe avant le chargement
pub fn check_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!(
            "RGN file not found: {} (use --file, RGN_FILE or a config file)",
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgn::Poi;

    fn collection() -> VertexCollection {
        let mut vgs = VertexCollection::new();
        vgs.add_vertex(Vertex::new(
            Poi::new("Monsanto", 38.7306, -9.1887),
            Order::First,
            Some(226.0),
            "Pilar",
        ));
        vgs.add_vertex(Vertex::new(
            Poi::new("Caparica", 38.661, -9.2044),
            Order::Second,
            None,
            "Marco",
        ));
        vgs
    }

    #[test]
    fn test_format_statistics_undefined_average() {
        let vgs = collection();
        let text = format_statistics(&vgs.compute_statistics());
        assert!(text.contains("Visible vertices: 0"));
        assert!(text.contains("Highest: none"));
        assert!(text.contains("Average altitude: undefined"));
    }

    #[test]
    fn test_format_statistics_visible() {
        let mut vgs = collection();
        vgs.show_order(Order::First);
        vgs.show_order(Order::Second);
        let text = format_statistics(&vgs.compute_statistics());
        assert!(text.contains("Visible vertices: 2"));
        assert!(text.contains("  Order 2: 1"));
        assert!(text.contains("Highest: Monsanto (226 m)"));
        assert!(text.contains("Average altitude: 226 m"));
    }

    #[test]
    fn test_format_vertex_not_available_altitude() {
        let vgs = collection();
        let text = format_vertex(vgs.find("Caparica").unwrap());
        assert!(text.contains("alt ND"));
        assert!(text.contains("[order 2]"));
    }

    #[test]
    fn test_check_file_missing() {
        assert!(check_file(Path::new("does/not/exist.xml")).is_err());
    }
}
