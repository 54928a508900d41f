// ============================================================================
// Structures : AssetSummary et AssetDetail
// ============================================================================
// Représentent une cryptomonnaie telle que renvoyée par CoinGecko
//
// - AssetSummary : une ligne du tableau (endpoint /coins/markets)
// - AssetDetail : la fiche complète d'un coin (endpoint /coins/{id})
//
// CONCEPT RUST : Option<f64>
// - CoinGecko renvoie parfois null pour le prix ou la market cap
// - Option rend ce cas explicite au lieu de planter à l'affichage
// ============================================================================

use std::collections::HashMap;

use serde::Deserialize;

/// Une ligne du listing, classée par market cap décroissante
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetSummary {
    /// Identifiant CoinGecko (ex: "bitcoin")
    pub id: String,

    /// Nom affiché (ex: "Bitcoin")
    pub name: String,

    /// Ticker en minuscules tel que renvoyé par l'API (ex: "btc")
    pub symbol: String,

    /// URL de l'icône
    #[serde(default)]
    pub image: Option<String>,

    /// Prix actuel en USD
    #[serde(default)]
    pub current_price: Option<f64>,

    /// Variation sur 24h en pourcentage (null pour les coins récents)
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    /// Capitalisation en USD
    #[serde(default)]
    pub market_cap: Option<f64>,
}

impl AssetSummary {
    /// Crée une ligne sans données de marché
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: None,
            current_price: None,
            price_change_percentage_24h: None,
            market_cap: None,
        }
    }

    /// Libellé "Bitcoin (BTC)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.symbol.to_uppercase())
    }

    /// Vérifie si le nom ou le symbole contient `needle` (déjà en minuscules)
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }
}

/// Fiche détaillée d'un coin
///
/// Construite par le client API à partir de la réponse imbriquée de CoinGecko
/// (`image.large`, `market_data.current_price.usd`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDetail {
    pub id: String,
    pub name: String,
    pub symbol: String,

    /// URL de la grande icône
    pub image_large: Option<String>,

    /// Prix actuel en USD
    pub current_price_usd: Option<f64>,

    /// Capitalisation en USD
    pub market_cap_usd: Option<f64>,

    /// Description par code de langue ("en", "fr", ...)
    pub description: HashMap<String, String>,
}

impl AssetDetail {
    /// Libellé "Bitcoin (BTC)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.symbol.to_uppercase())
    }

    /// Description anglaise, None si absente ou vide
    pub fn english_description(&self) -> Option<&str> {
        self.description
            .get("en")
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Première phrase de la description anglaise
    ///
    /// Découpe sur ". " et garde le premier segment, suivi d'un point.
    /// Sans description : "No description available."
    pub fn description_excerpt(&self) -> String {
        description_excerpt(self.english_description())
    }
}

/// Filtre le listing selon le texte de recherche
///
/// CONCEPT : Fonction pure
/// - Recalculée à chaque frappe, jamais stockée
/// - Insensible à la casse, sur le nom OU le symbole
/// - Une recherche vide renvoie tout, dans l'ordre d'origine
pub fn filter_assets<'a>(assets: &'a [AssetSummary], query: &str) -> Vec<&'a AssetSummary> {
    let needle = query.to_lowercase();
    assets.iter().filter(|asset| asset.matches(&needle)).collect()
}

/// Texte affiché quand un coin n'a pas de description anglaise
pub const NO_DESCRIPTION: &str = "No description available.";

/// Extrait la première phrase d'une description
pub fn description_excerpt(description: Option<&str>) -> String {
    match description {
        Some(text) if !text.is_empty() => {
            let first = text.split(". ").next().unwrap_or(text);
            format!("{}.", first)
        }
        _ => NO_DESCRIPTION.to_string(),
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
