//! Statistiques des VGs visibles
//!
//! Calcul pur: la collection produit un instantané sérialisable,
//! l'affichage est laissé à l'appelant.

use serde::Serialize;

use crate::collection::VertexCollection;
use crate::types::{Order, Vertex};

/// Résumé d'un VG (données seules)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexSummary {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub order: Order,
    pub altitude: Option<f64>,
    pub survey_type: String,
}

impl From<&Vertex> for VertexSummary {
    fn from(vertex: &Vertex) -> Self {
        Self {
            name: vertex.name().to_string(),
            latitude: vertex.latitude(),
            longitude: vertex.longitude(),
            order: vertex.order,
            altitude: vertex.altitude,
            survey_type: vertex.survey_type.clone(),
        }
    }
}

/// Nombre de VGs visibles pour un ordre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderCount {
    pub order: Order,
    pub visible: usize,
}

/// Instantané des statistiques
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Nombre total de VGs visibles
    pub total_visible: usize,

    /// Nombre de VGs visibles par ordre (les 4 ordres, même vides)
    pub per_order_visible: Vec<OrderCount>,

    /// VG visible le plus haut
    pub highest: Option<VertexSummary>,

    /// VG visible le plus bas
    pub lowest: Option<VertexSummary>,

    /// Altitude moyenne des VGs visibles d'altitude connue,
    /// `None` si aucun VG n'est éligible
    pub average_altitude: Option<f64>,
}

impl Statistics {
    pub fn visible(&self, order: Order) -> usize {
        self.per_order_visible
            .iter()
            .find(|c| c.order == order)
            .map_or(0, |c| c.visible)
    }
}

impl VertexCollection {
    /// Altitude moyenne des VGs visibles dont l'altitude est connue
    pub fn average_altitude(&self) -> Option<f64> {
        let (sum, count) = self
            .visible_with_altitude()
            .fold((0.0, 0usize), |(sum, count), (_, alt)| (sum + alt, count + 1));

        (count > 0).then(|| sum / count as f64)
    }

    /// Calcule l'instantané des statistiques
    pub fn compute_statistics(&self) -> Statistics {
        Statistics {
            total_visible: self.total_visible(),
            per_order_visible: Order::ALL
                .iter()
                .map(|&order| OrderCount {
                    order,
                    visible: self.visible_count(order),
                })
                .collect(),
            highest: self.highest_vertex().map(VertexSummary::from),
            lowest: self.lowest_vertex().map(VertexSummary::from),
            average_altitude: self.average_altitude(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Poi;
    use approx::assert_relative_eq;

    fn vg(name: &str, order: Order, altitude: Option<f64>) -> Vertex {
        Vertex::new(Poi::new(name, 38.7, -9.1), order, altitude, "Marco")
    }

    #[test]
    fn test_empty_collection() {
        let stats = VertexCollection::new().compute_statistics();
        assert_eq!(stats.total_visible, 0);
        assert_eq!(stats.per_order_visible.len(), 4);
        assert!(stats.highest.is_none());
        assert!(stats.lowest.is_none());
        assert!(stats.average_altitude.is_none());
    }

    #[test]
    fn test_average_excludes_missing_altitudes() {
        let mut vgs = VertexCollection::new();
        vgs.add_vertex(vg("A", Order::First, Some(100.0)));
        vgs.add_vertex(vg("B", Order::First, None));
        vgs.add_vertex(vg("C", Order::Second, Some(250.0)));
        vgs.add_vertex(vg("D", Order::Third, Some(9000.0)));
        vgs.show_order(Order::First);
        vgs.show_order(Order::Second);

        let stats = vgs.compute_statistics();
        assert_eq!(stats.total_visible, 3);
        assert_eq!(stats.visible(Order::First), 2);
        assert_eq!(stats.visible(Order::Second), 1);
        assert_eq!(stats.visible(Order::Third), 0);
        assert_relative_eq!(stats.average_altitude.unwrap(), 175.0);
        assert_eq!(stats.highest.as_ref().map(|v| v.name.as_str()), Some("C"));
        assert_eq!(stats.lowest.as_ref().map(|v| v.name.as_str()), Some("A"));
    }

    #[test]
    fn test_average_undefined_when_only_missing_visible() {
        let mut vgs = VertexCollection::new();
        vgs.add_vertex(vg("A", Order::First, None));
        vgs.add_vertex(vg("B", Order::Second, Some(10.0)));
        vgs.show_order(Order::First);

        let stats = vgs.compute_statistics();
        assert_eq!(stats.total_visible, 1);
        assert_eq!(stats.average_altitude, None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut vgs = VertexCollection::new();
        vgs.add_vertex(vg("Sintra", Order::First, Some(528.0)));
        vgs.show_order(Order::First);

        let json = serde_json::to_value(vgs.compute_statistics()).unwrap();
        assert_eq!(json["total_visible"], 1);
        assert_eq!(json["highest"]["name"], "Sintra");
        assert_eq!(json["highest"]["order"], "first");
        assert_eq!(json["per_order_visible"][3]["visible"], 0);
    }
}
