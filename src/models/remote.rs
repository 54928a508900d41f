// ============================================================================
// Enum : Remote<T>
// ============================================================================
// État d'une donnée chargée depuis le réseau
//
// CONCEPT RUST : Enums pour state machines
// - Idle → Loading → Ready(valeur) | Failed(message)
// - Chaque vue déclare, par source de données, si l'échec est visible
//   (bannière d'erreur) ou seulement loggé
//
// CONCEPT : Ticket de montage
// - Chaque montage de vue reçoit un Ticket unique
// - Les commandes et leurs résultats portent ce ticket
// - Un résultat dont le ticket ne correspond plus est ignoré
// ============================================================================

use std::fmt;

/// Identifiant d'un montage de vue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticket(pub u64);

impl Ticket {
    /// Ticket d'une vue jamais montée
    pub const UNMOUNTED: Ticket = Ticket(0);

    /// Ticket suivant
    pub fn next(self) -> Self {
        Ticket(self.0 + 1)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// État d'une donnée distante
#[derive(Debug, Clone, PartialEq)]
pub enum Remote<T> {
    /// Aucune requête émise
    Idle,

    /// Requête en cours
    Loading,

    /// Dernière requête terminée avec succès
    Ready(T),

    /// Dernière requête échouée (message lisible)
    Failed(String),
}

impl<T> Remote<T> {
    /// Construit l'état final à partir du résultat d'une requête
    pub fn settle<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Remote::Ready(value),
            Err(e) => Remote::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Remote::Idle | Remote::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Remote::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Remote::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// Pas de derive : il exigerait T: Default
impl<T> Default for Remote<T> {
    fn default() -> Self {
        Remote::Idle
    }
}

/// Comment un échec est montré à l'utilisateur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureVisibility {
    /// Bannière "Error: ..." à la place du contenu
    Banner,

    /// Loggé uniquement, l'écran reste sur son placeholder
    LogOnly,
}

/// Sources de données de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Listing classé par market cap (Listing View)
    Listing,

    /// Métadonnées d'un coin (Detail View)
    AssetDetail,

    /// Historique de prix sur 7 jours (Detail View)
    PriceHistory,
}

impl DataSource {
    /// Visibilité des échecs pour cette source
    pub fn failure_visibility(&self) -> FailureVisibility {
        match self {
            DataSource::Listing | DataSource::AssetDetail => FailureVisibility::Banner,
            DataSource::PriceHistory => FailureVisibility::LogOnly,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Listing => "listing",
            DataSource::AssetDetail => "asset detail",
            DataSource::PriceHistory => "price history",
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle() {
        let ready: Remote<u32> = Remote::settle::<String>(Ok(3));
        assert_eq!(ready.ready(), Some(&3));
        assert!(!ready.is_loading());

        let failed: Remote<u32> = Remote::settle(Err("Failed to fetch data"));
        assert_eq!(failed.error(), Some("Failed to fetch data"));
        assert!(failed.ready().is_none());
    }

    #[test]
    fn test_default_is_idle_and_loading() {
        let remote: Remote<()> = Remote::default();
        assert_eq!(remote, Remote::Idle);
        assert!(remote.is_loading());
    }

    #[test]
    fn test_failure_visibility() {
        assert_eq!(DataSource::Listing.failure_visibility(), FailureVisibility::Banner);
        assert_eq!(DataSource::AssetDetail.failure_visibility(), FailureVisibility::Banner);
        assert_eq!(DataSource::PriceHistory.failure_visibility(), FailureVisibility::LogOnly);
    }

    #[test]
    fn test_ticket_next() {
        assert_eq!(Ticket::UNMOUNTED.next(), Ticket(1));
        assert!(Ticket(2) > Ticket(1));
    }
}
