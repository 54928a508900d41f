// ============================================================================
// Crypto Tracker - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;    // Client API CoinGecko
pub mod app;    // État de l'application (vues montées, tickets)
pub mod config; // Ligne de commande
pub mod models; // Structures de données
pub mod router; // Chemins → vues
pub mod ui;     // Interface utilisateur
pub mod worker; // Worker thread (requêtes HTTP)
