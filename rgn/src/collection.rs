//! Collection des VGs groupés par ordre
//!
//! La collection possède tous les VGs chargés. Chaque ordre a son propre
//! "bucket" qui conserve l'ordre d'insertion. Les POIs qui ne sont pas des VGs
//! ne sont pas conservés: ils sont rendus à l'appelant qui les affiche.
//!
//! Les mutations (visibilité) passent par `&mut self`; un hôte qui partage la
//! collection entre plusieurs threads doit la protéger lui-même.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::types::{Entry, Order, Poi, Record, Vertex};
use crate::RgnError;

/// Résultat d'une insertion
#[derive(Debug, Clone, PartialEq)]
pub enum Inserted {
    /// VG rangé dans le bucket de son ordre
    Vertex(Order),
    /// POI simple, à afficher immédiatement par l'appelant
    Poi(Poi),
}

/// Collection des VGs, groupés par ordre
#[derive(Debug, Default)]
pub struct VertexCollection {
    buckets: BTreeMap<Order, Vec<Vertex>>,
    visible: BTreeMap<Order, usize>,
}

impl VertexCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classe un enregistrement brut et l'insère s'il s'agit d'un VG
    ///
    /// # Errors
    ///
    /// Retourne l'erreur de classification; la collection n'est pas modifiée.
    pub fn add_record(&mut self, record: Record) -> Result<Inserted, RgnError> {
        match record.classify()? {
            Entry::Vertex(vertex) => {
                let order = vertex.order;
                self.add_vertex(vertex);
                Ok(Inserted::Vertex(order))
            }
            Entry::Poi(poi) => Ok(Inserted::Poi(poi)),
        }
    }

    /// Ajoute un VG dans le bucket de son ordre
    pub fn add_vertex(&mut self, vertex: Vertex) {
        trace!(name = vertex.name(), order = %vertex.order, "add vertex");
        if vertex.is_shown() {
            *self.visible.entry(vertex.order).or_default() += 1;
        }
        self.buckets.entry(vertex.order).or_default().push(vertex);
    }

    /// Nombre total de VGs
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// VGs d'un ordre, dans l'ordre d'insertion
    pub fn bucket(&self, order: Order) -> &[Vertex] {
        self.buckets.get(&order).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tous les VGs, bucket par bucket (1er ordre d'abord)
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.buckets.values().flatten()
    }

    /// Premier VG portant ce nom
    pub fn find(&self, name: &str) -> Option<&Vertex> {
        self.vertices().find(|v| v.name() == name)
    }

    // ----- Visibilité -----

    /// Affiche tous les VGs d'un ordre. Retourne le nombre de VGs devenus visibles.
    pub fn show_order(&mut self, order: Order) -> usize {
        let changed = match self.buckets.get_mut(&order) {
            Some(bucket) => bucket.iter_mut().map(Vertex::show).filter(|&c| c).count(),
            None => 0,
        };
        *self.visible.entry(order).or_default() += changed;
        debug!(order = %order, changed, visible = self.visible_count(order), "show order");
        changed
    }

    /// Cache tous les VGs d'un ordre. Retourne le nombre de VGs cachés.
    pub fn hide_order(&mut self, order: Order) -> usize {
        let changed = match self.buckets.get_mut(&order) {
            Some(bucket) => bucket.iter_mut().map(Vertex::hide).filter(|&c| c).count(),
            None => 0,
        };
        let count = self.visible.entry(order).or_default();
        *count = count.saturating_sub(changed);
        debug!(order = %order, changed, visible = self.visible_count(order), "hide order");
        changed
    }

    /// Nombre de VGs visibles d'un ordre
    pub fn visible_count(&self, order: Order) -> usize {
        self.visible.get(&order).copied().unwrap_or(0)
    }

    /// Nombre total de VGs visibles
    pub fn total_visible(&self) -> usize {
        self.visible.values().sum()
    }

    // ----- Validation -----

    /// VGs sans aucun partenaire valide dans leur bucket.
    ///
    /// Chaque paire (i, j), i < j, est évaluée une seule fois; une paire valide
    /// valide ses deux extrémités. Un bucket d'un seul VG le rend invalide,
    /// sauf au 4ème ordre qui n'a pas de contrainte.
    pub fn invalid_vertices(&self) -> Vec<&Vertex> {
        let mut invalid = Vec::new();

        for (order, bucket) in &self.buckets {
            if order.distance_range().is_none() {
                continue;
            }

            let mut partnered = vec![false; bucket.len()];
            for i in 0..bucket.len() {
                for j in (i + 1)..bucket.len() {
                    if partnered[i] && partnered[j] {
                        continue;
                    }
                    if bucket[i].verify(&bucket[j]) {
                        partnered[i] = true;
                        partnered[j] = true;
                    }
                }
            }

            invalid.extend(
                bucket
                    .iter()
                    .zip(&partnered)
                    .filter(|(_, ok)| !**ok)
                    .map(|(v, _)| v),
            );
        }

        debug!(invalid = invalid.len(), total = self.len(), "verify network");
        invalid
    }

    /// Noms des VGs invalides; vide si tout le réseau est valide
    pub fn verify_network(&self) -> Vec<&str> {
        self.invalid_vertices().into_iter().map(Vertex::name).collect()
    }

    // ----- Requêtes spatiales -----

    /// VGs d'un ordre à une distance <= `max_km` du point, en excluant
    /// ceux situés exactement sur le point de requête
    pub fn vertices_within_distance(
        &self,
        latitude: f64,
        longitude: f64,
        order: Order,
        max_km: f64,
    ) -> Vec<&Vertex> {
        self.bucket(order)
            .iter()
            .filter(|v| !v.poi.is_at(latitude, longitude))
            .filter(|v| v.poi.distance_to(latitude, longitude) <= max_km)
            .collect()
    }

    /// Nombre de VGs, tous ordres confondus, à une distance <= `max_km` du point
    pub fn count_within_distance(&self, latitude: f64, longitude: f64, max_km: f64) -> usize {
        Order::ALL
            .iter()
            .map(|&order| {
                self.vertices_within_distance(latitude, longitude, order, max_km)
                    .len()
            })
            .sum()
    }

    /// Nombre de VGs à portée de la distance max de l'ordre du VG.
    /// `None` pour le 4ème ordre (pas de distance max).
    pub fn neighbour_count(&self, vertex: &Vertex) -> Option<usize> {
        let range = vertex.order.distance_range()?;
        Some(self.count_within_distance(vertex.latitude(), vertex.longitude(), range.max_km))
    }

    /// Tous les VGs d'un même type de levé, visibles ou non
    pub fn same_survey_type(&self, survey_type: &str) -> Vec<&Vertex> {
        self.vertices()
            .filter(|v| v.survey_type == survey_type)
            .collect()
    }

    // ----- Altitudes -----

    /// VGs visibles dont l'altitude est connue
    pub fn visible_altitudes(&self) -> Vec<&Vertex> {
        self.visible_with_altitude().map(|(v, _)| v).collect()
    }

    /// VG visible le plus haut (le premier rencontré en cas d'égalité)
    pub fn highest_vertex(&self) -> Option<&Vertex> {
        self.extremal(|candidate, best| candidate > best)
    }

    /// VG visible le plus bas (le premier rencontré en cas d'égalité)
    pub fn lowest_vertex(&self) -> Option<&Vertex> {
        self.extremal(|candidate, best| candidate < best)
    }

    pub(crate) fn visible_with_altitude(&self) -> impl Iterator<Item = (&Vertex, f64)> {
        self.vertices()
            .filter(|v| v.is_shown())
            .filter_map(|v| v.altitude.map(|alt| (v, alt)))
    }

    fn extremal(&self, better: impl Fn(f64, f64) -> bool) -> Option<&Vertex> {
        self.visible_with_altitude()
            .fold(None, |best: Option<(&Vertex, f64)>, (v, alt)| match best {
                Some((_, best_alt)) if !better(alt, best_alt) => best,
                _ => Some((v, alt)),
            })
            .map(|(v, _)| v)
    }
}
