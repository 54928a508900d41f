// ============================================================================
// Module : api
// ============================================================================
// Clients API pour récupérer les données de marché
// ============================================================================

pub mod coingecko; // Client API CoinGecko

pub use coingecko::{CoinGeckoClient, FetchError, LISTING_PAGE_SIZE, PRICE_HISTORY_DAYS};
