//! Types de données pour le crate rgn

use std::fmt;

use geo::Point;
use serde::Serialize;

use crate::geodesy;
use crate::RgnError;

/// Marqueur d'altitude non disponible dans les données sources
pub const ALTITUDE_NOT_AVAILABLE: &str = "ND";

/// Ordre d'un vertice géodésique (classe de précision du levé)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    First,
    Second,
    Third,
    Fourth,
}

/// Intervalle de distance (km, bornes incluses) exigé entre deux VGs d'un même ordre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRange {
    pub min_km: f64,
    pub max_km: f64,
}

impl DistanceRange {
    pub fn contains(&self, distance_km: f64) -> bool {
        distance_km >= self.min_km && distance_km <= self.max_km
    }
}

/// Règles de distance par ordre (le 4ème ordre n'a pas de contrainte)
const DISTANCE_RULES: [(Order, Option<DistanceRange>); 4] = [
    (
        Order::First,
        Some(DistanceRange {
            min_km: 30.0,
            max_km: 60.0,
        }),
    ),
    (
        Order::Second,
        Some(DistanceRange {
            min_km: 20.0,
            max_km: 30.0,
        }),
    ),
    (
        Order::Third,
        Some(DistanceRange {
            min_km: 5.0,
            max_km: 30.0,
        }),
    ),
    (Order::Fourth, None),
];

impl Order {
    pub const ALL: [Order; 4] = [Order::First, Order::Second, Order::Third, Order::Fourth];

    /// Parse le tag d'ordre des données sources ("1".."4").
    /// Tout autre tag désigne un simple POI.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "1" => Some(Order::First),
            "2" => Some(Order::Second),
            "3" => Some(Order::Third),
            "4" => Some(Order::Fourth),
            _ => None,
        }
    }

    /// Numéro de l'ordre (1..4)
    pub fn number(self) -> u8 {
        match self {
            Order::First => 1,
            Order::Second => 2,
            Order::Third => 3,
            Order::Fourth => 4,
        }
    }

    /// Règle de distance de l'ordre, `None` pour le 4ème ordre
    pub fn distance_range(self) -> Option<DistanceRange> {
        DISTANCE_RULES
            .iter()
            .find(|(order, _)| *order == self)
            .and_then(|(_, range)| *range)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u8> for Order {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Order::ALL
            .into_iter()
            .find(|order| order.number() == number)
            .ok_or_else(|| format!("Invalid order: {}. Use: 1, 2, 3, 4", number))
    }
}

impl std::str::FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Order::from_tag(s).ok_or_else(|| format!("Invalid order: {}. Use: 1, 2, 3, 4", s))
    }
}

/// Point d'intérêt générique
#[derive(Debug, Clone, PartialEq)]
pub struct Poi {
    pub name: String,

    /// Position (x = longitude, y = latitude, degrés décimaux)
    pub position: Point<f64>,
}

impl Poi {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            position: Point::new(longitude, latitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.position.y()
    }

    pub fn longitude(&self) -> f64 {
        self.position.x()
    }

    /// Distance en km jusqu'à un point (latitude, longitude)
    pub fn distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        geodesy::distance_km(self.latitude(), self.longitude(), latitude, longitude)
    }

    /// Coordonnées strictement identiques
    pub fn is_at(&self, latitude: f64, longitude: f64) -> bool {
        self.latitude() == latitude && self.longitude() == longitude
    }
}

/// État de visibilité d'un VG
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

/// Vertice géodésique (VG)
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub poi: Poi,
    pub order: Order,

    /// Altitude en mètres, `None` si non disponible ("ND")
    pub altitude: Option<f64>,

    /// Type de levé (sert au regroupement "même type")
    pub survey_type: String,

    visibility: Visibility,
}

impl Vertex {
    pub fn new(
        poi: Poi,
        order: Order,
        altitude: Option<f64>,
        survey_type: impl Into<String>,
    ) -> Self {
        Self {
            poi,
            order,
            altitude,
            survey_type: survey_type.into(),
            visibility: Visibility::Hidden,
        }
    }

    pub fn name(&self) -> &str {
        &self.poi.name
    }

    pub fn latitude(&self) -> f64 {
        self.poi.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.poi.longitude()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_shown(&self) -> bool {
        self.visibility == Visibility::Shown
    }

    /// Rend le VG visible. Retourne `true` si l'état a changé.
    pub fn show(&mut self) -> bool {
        let changed = self.visibility == Visibility::Hidden;
        self.visibility = Visibility::Shown;
        changed
    }

    /// Cache le VG. Retourne `true` si l'état a changé.
    pub fn hide(&mut self) -> bool {
        let changed = self.visibility == Visibility::Shown;
        self.visibility = Visibility::Hidden;
        changed
    }

    /// Vérifie que la distance à `other` respecte la règle de l'ordre de ce VG
    pub fn verify(&self, other: &Vertex) -> bool {
        match self.order.distance_range() {
            Some(range) => range.contains(geodesy::point_distance_km(
                self.poi.position,
                other.poi.position,
            )),
            None => true,
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Enregistrement brut tel que fourni par le loader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub order: Option<String>,
    pub altitude: Option<String>,
    pub survey_type: Option<String>,
}

/// Résultat de la classification d'un enregistrement
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Vertex(Vertex),
    Poi(Poi),
}

impl Record {
    /// Classe l'enregistrement en VG (ordre 1..4) ou en POI.
    ///
    /// # Errors
    ///
    /// `MalformedRecord` si un champ obligatoire manque,
    /// `InvalidNumber` si une coordonnée ou l'altitude n'est pas un nombre fini.
    pub fn classify(self) -> Result<Entry, RgnError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| RgnError::missing_field(None, "name"))?;

        let latitude = required(&name, "latitude", self.latitude.as_deref())?;
        let latitude = parse_number(&name, "latitude", latitude)?;
        let longitude = required(&name, "longitude", self.longitude.as_deref())?;
        let longitude = parse_number(&name, "longitude", longitude)?;

        let poi = Poi::new(name, latitude, longitude);

        let Some(order) = self.order.as_deref().and_then(Order::from_tag) else {
            return Ok(Entry::Poi(poi));
        };

        let altitude = required(&poi.name, "altitude", self.altitude.as_deref())?;
        let altitude = parse_altitude(&poi.name, altitude)?;
        let survey_type = required(&poi.name, "type", self.survey_type.as_deref())?.to_string();

        Ok(Entry::Vertex(Vertex::new(poi, order, altitude, survey_type)))
    }
}

fn required<'a>(
    name: &str,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, RgnError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RgnError::missing_field(Some(name), field))
}

fn parse_number(name: &str, field: &'static str, value: &str) -> Result<f64, RgnError> {
    match fast_float::parse::<f64, _>(value) {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RgnError::invalid_number(name, field, value)),
    }
}

fn parse_altitude(name: &str, value: &str) -> Result<Option<f64>, RgnError> {
    if value.eq_ignore_ascii_case(ALTITUDE_NOT_AVAILABLE) {
        return Ok(None);
    }
    parse_number(name, "altitude", value).map(Some)
}
