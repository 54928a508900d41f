// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application : coins, séries de prix,
// et état des données chargées depuis le réseau
// ============================================================================

pub mod asset;        // AssetSummary, AssetDetail, filtre du listing
pub mod price_series; // PricePoint, ChartPoint
pub mod remote;       // Remote<T>, Ticket, DataSource

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use crypto_tracker::models::asset::AssetSummary;
// On peut faire : use crypto_tracker::models::AssetSummary;
pub use asset::{description_excerpt, filter_assets, AssetDetail, AssetSummary, NO_DESCRIPTION};
pub use price_series::{to_chart_points, to_chart_points_in, ChartPoint, PricePoint};
pub use remote::{DataSource, FailureVisibility, Remote, Ticket};
