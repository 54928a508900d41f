// ============================================================================
// Structures : PricePoint et ChartPoint
// ============================================================================
// Série de prix renvoyée par /coins/{id}/market_chart
//
// - PricePoint : paire brute [timestamp_ms, prix] de l'API
// - ChartPoint : point prêt à dessiner, avec un label court ("Jan 5")
//
// CONCEPT RUST : Tuple struct
// - L'API renvoie des tableaux JSON à deux éléments
// - Serde désérialise [a, b] directement dans PricePoint(a, b)
// ============================================================================

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;

/// Format du label de l'axe X : mois abrégé + jour sans zéro ("Jan 5")
const LABEL_FORMAT: &str = "%b %-d";

/// Un échantillon brut (timestamp en millisecondes, prix en USD)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PricePoint(pub i64, pub f64);

impl PricePoint {
    pub fn timestamp_ms(&self) -> i64 {
        self.0
    }

    pub fn price(&self) -> f64 {
        self.1
    }
}

/// Un point du graphique
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Label court pour l'axe X (ex: "Jan 5")
    pub label: String,

    /// Timestamp d'origine en millisecondes
    pub timestamp_ms: i64,

    /// Prix d'origine, non modifié
    pub price: f64,
}

/// Convertit la série brute en points de graphique (fuseau local)
pub fn to_chart_points(points: &[PricePoint]) -> Vec<ChartPoint> {
    to_chart_points_in(points, &Local)
}

/// Convertit la série brute en points de graphique dans un fuseau donné
///
/// CONCEPT RUST : Générique sur TimeZone
/// - Local en production, Utc dans les tests (résultat déterministe)
/// - Un timestamp hors plage garde un label vide plutôt que de perdre le point
pub fn to_chart_points_in<Tz>(points: &[PricePoint], tz: &Tz) -> Vec<ChartPoint>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    points
        .iter()
        .map(|point| ChartPoint {
            label: date_label(point.timestamp_ms(), tz).unwrap_or_default(),
            timestamp_ms: point.timestamp_ms(),
            price: point.price(),
        })
        .collect()
}

/// Label "Jan 5" pour un timestamp en millisecondes
pub fn date_label<Tz>(timestamp_ms: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let utc: DateTime<Utc> = DateTime::from_timestamp_millis(timestamp_ms)?;
    Some(utc.with_timezone(tz).format(LABEL_FORMAT).to_string())
}

/// Bornes (min, max) des prix, None si la série est vide
pub fn price_bounds(points: &[ChartPoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }

    Some(points.iter().fold((f64::MAX, f64::MIN), |(min, max), point| {
        (min.min(point.price), max.max(point.price))
    }))
}

// ============================================================================
// Tests unitaires
// ============================================================================
