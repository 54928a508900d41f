// ============================================================================
// Router : chemins → vues
// ============================================================================
// Deux routes, sans garde ni redirection :
// - "/"          → Listing View
// - "/coin/:id"  → Detail View, avec `id` lié au segment
//
// CONCEPT RUST : FromStr + Display
// - "/coin/bitcoin".parse::<Route>() fonctionne grâce à FromStr
// - route.to_string() redonne le chemin grâce à Display
// ============================================================================

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Préfixe de la route détail
const COIN_PREFIX: &str = "/coin/";

/// Une route de l'application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// "/" : tableau des coins avec recherche
    #[default]
    Listing,

    /// "/coin/:id" : fiche et graphique d'un coin
    Detail { id: String },
}

/// Chemin qui ne correspond à aucune route
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route matches path {0:?}")]
    NotFound(String),
}

impl Route {
    /// Route détail pour un coin
    pub fn detail(id: impl Into<String>) -> Self {
        Route::Detail { id: id.into() }
    }

    /// Associe un chemin à une route
    ///
    /// Le slash final est toléré ("/coin/bitcoin/"), un id vide
    /// ou contenant plusieurs segments ne matche pas.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        if normalized == "/" {
            return Ok(Route::Listing);
        }

        match normalized.strip_prefix(COIN_PREFIX) {
            Some(id) if !id.is_empty() && !id.contains('/') => Ok(Route::detail(id)),
            _ => Err(RouteError::NotFound(path.to_string())),
        }
    }

    /// Chemin correspondant à la route
    pub fn path(&self) -> String {
        match self {
            Route::Listing => "/".to_string(),
            Route::Detail { id } => format!("{}{}", COIN_PREFIX, id),
        }
    }

    /// Id du coin pour la route détail
    pub fn coin_id(&self) -> Option<&str> {
        match self {
            Route::Listing => None,
            Route::Detail { id } => Some(id),
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        assert_eq!(Route::parse("/"), Ok(Route::Listing));
    }

    #[test]
    fn test_parse_detail() {
        assert_eq!(Route::parse("/coin/bitcoin"), Ok(Route::detail("bitcoin")));
        assert_eq!(Route::parse("/coin/wrapped-bitcoin/"), Ok(Route::detail("wrapped-bitcoin")));
    }

    #[test]
    fn test_parse_unknown() {
        for path in ["", "/coin", "/coin/", "/coin/a/b", "/coins/bitcoin", "/about"] {
            assert!(Route::parse(path).is_err(), "path {path:?} should not match");
        }
    }

    #[test]
    fn test_path_round_trip() {
        let route = Route::detail("ethereum");
        assert_eq!(route.path(), "/coin/ethereum");
        assert_eq!(route.to_string().parse::<Route>(), Ok(route));
        assert_eq!(Route::Listing.path(), "/");
    }

    #[test]
    fn test_coin_id() {
        assert_eq!(Route::detail("solana").coin_id(), Some("solana"));
        assert_eq!(Route::Listing.coin_id(), None);
    }
}
