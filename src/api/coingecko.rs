// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Récupère le listing, la fiche d'un coin et son historique de prix
//
// CONCEPTS RUST :
// 1. async/await : requêtes HTTP non-bloquantes
// 2. thiserror : erreurs typées, dont le message est affiché tel quel
// 3. Serde : désérialisation JSON vers des structures privées puis
//    conversion vers nos modèles
// ============================================================================

use std::collections::HashMap;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::models::{AssetDetail, AssetSummary, PricePoint};

/// URL de base de l'API publique
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Nombre de coins dans le listing (une seule page)
pub const LISTING_PAGE_SIZE: u32 = 50;

/// Fenêtre de l'historique affiché dans la Detail View
pub const PRICE_HISTORY_DAYS: u32 = 7;

/// Devise de cotation de toutes les requêtes
const VS_CURRENCY: &str = "usd";

// ============================================================================
// Erreurs
// ============================================================================
// Le Display de FetchError est le message montré dans la bannière d'erreur.
// Pas de distinction pour l'utilisateur entre 404, 429 et réseau coupé.
// ============================================================================

/// Erreurs du client CoinGecko
#[derive(Debug, Error)]
pub enum FetchError {
    /// Le client HTTP n'a pas pu être construit
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// L'URL de base n'est pas une URL http(s) utilisable
    #[error("Invalid API base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    /// La requête n'a pas abouti (DNS, connexion, timeout)
    #[error("Failed to fetch {what}: {source}")]
    Network {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Le serveur a répondu avec un statut non-succès
    #[error("Failed to fetch {what} (HTTP {status})")]
    Status {
        what: &'static str,
        status: StatusCode,
    },

    /// Le corps de la réponse n'est pas le JSON attendu
    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Structures pour parser la réponse JSON de /coins/{id}
// ============================================================================
// La réponse est imbriquée (image.large, market_data.current_price.usd, ...)
// On la mappe telle quelle puis on l'aplatit en AssetDetail
// ============================================================================

#[derive(Debug, Deserialize)]
struct CoinResponse {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    image: Option<CoinImage>,
    #[serde(default)]
    market_data: Option<CoinMarketData>,
    #[serde(default)]
    description: HashMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
struct CoinImage {
    large: Option<String>,
}

/// Prix et market cap par devise ("usd", "eur", ...)
#[derive(Debug, Deserialize)]
struct CoinMarketData {
    #[serde(default)]
    current_price: HashMap<String, Option<f64>>,
    #[serde(default)]
    market_cap: HashMap<String, Option<f64>>,
}

/// Réponse de /coins/{id}/market_chart
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<PricePoint>,
}

impl From<CoinResponse> for AssetDetail {
    fn from(coin: CoinResponse) -> Self {
        let (current_price_usd, market_cap_usd) = match coin.market_data {
            Some(data) => (
                data.current_price.get(VS_CURRENCY).copied().flatten(),
                data.market_cap.get(VS_CURRENCY).copied().flatten(),
            ),
            None => (None, None),
        };

        AssetDetail {
            id: coin.id,
            name: coin.name,
            symbol: coin.symbol,
            image_large: coin.image.and_then(|image| image.large),
            current_price_usd,
            market_cap_usd,
            // CoinGecko renvoie parfois null pour une langue : on l'écarte
            description: coin
                .description
                .into_iter()
                .filter_map(|(lang, text)| text.map(|text| (lang, text)))
                .collect(),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client HTTP pour l'API CoinGecko
///
/// CONCEPT RUST : Clone bon marché
/// - reqwest::Client est un Arc en interne
/// - Le worker clone le client pour chaque tâche
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CoinGeckoClient {
    /// Crée un client pointant sur l'API publique
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Crée un client pointant sur une autre URL (proxy, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("crypto-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        let raw = base_url.into();
        let base_url = Url::parse(&raw).map_err(|e| FetchError::BaseUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        // "mailto:..." et consorts n'ont pas de segments de chemin
        if base_url.cannot_be_a_base() {
            return Err(FetchError::BaseUrl {
                url: raw,
                reason: "URL cannot have path segments".to_string(),
            });
        }

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// URL d'un endpoint : base + segments
    ///
    /// CONCEPT : Chaque segment est encodé (percent-encoding)
    /// - "bitcoin?x" devient "bitcoin%3Fx" : un id ne peut pas
    ///   ajouter de query string ni changer de ressource
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Listing des 50 premiers coins par market cap décroissante
    ///
    /// GET /coins/markets?vs_currency=usd&order=market_cap_desc&per_page=50&page=1&sparkline=false
    #[instrument(skip(self))]
    pub async fn list_assets(&self) -> Result<Vec<AssetSummary>, FetchError> {
        let per_page = LISTING_PAGE_SIZE.to_string();
        let query = [
            ("vs_currency", VS_CURRENCY),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", "1"),
            ("sparkline", "false"),
        ];

        let assets: Vec<AssetSummary> = self.get_json(&["coins", "markets"], &query, "data").await?;

        info!(count = assets.len(), "Fetched asset listing");
        Ok(assets)
    }

    /// Fiche d'un coin (prix, market cap, description)
    ///
    /// GET /coins/{id}?localization=false&tickers=false&market_data=true&...
    #[instrument(skip(self))]
    pub async fn get_asset(&self, id: &str) -> Result<AssetDetail, FetchError> {
        let query = [
            ("localization", "false"),
            ("tickers", "false"),
            ("market_data", "true"),
            ("community_data", "false"),
            ("developer_data", "false"),
            ("sparkline", "false"),
        ];

        let coin: CoinResponse = self.get_json(&["coins", id], &query, "coin").await?;

        info!(coin = %coin.id, "Fetched asset detail");
        Ok(coin.into())
    }

    /// Historique des prix en USD sur les `days` derniers jours
    ///
    /// GET /coins/{id}/market_chart?vs_currency=usd&days=7
    #[instrument(skip(self))]
    pub async fn get_price_history(&self, id: &str, days: u32) -> Result<Vec<PricePoint>, FetchError> {
        let days = days.to_string();
        let query = [("vs_currency", VS_CURRENCY), ("days", days.as_str())];

        let chart: MarketChartResponse = self
            .get_json(&["coins", id, "market_chart"], &query, "price history")
            .await?;

        info!(points = chart.prices.len(), "Fetched price history");
        Ok(chart.prices)
    }

    /// GET + vérification du statut + parsing JSON
    ///
    /// CONCEPT RUST : Générique avec DeserializeOwned
    /// - T est choisi par l'appelant (Vec<AssetSummary>, CoinResponse, ...)
    /// - DeserializeOwned : T ne garde pas de référence vers le body
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        what: &'static str,
    ) -> Result<T, FetchError> {
        let url = self.endpoint(segments);
        debug!(url = %url, "Sending HTTP request to CoinGecko");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Network { what, source })?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            error!(status = %status, what, "CoinGecko returned error status");
            return Err(FetchError::Status { what, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Network { what, source })?;

        serde_json::from_slice(&body).map_err(|source| {
            error!(error = %source, what, "Failed to decode CoinGecko response");
            FetchError::Decode { what, source }
        })
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
// CONCEPT : Faux serveur HTTP
// - wiremock démarre un serveur local par test
// - Le client pointe dessus via with_base_url()
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> CoinGeckoClient {
        CoinGeckoClient::with_base_url(server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_list_assets_sends_listing_query() {
        let mock_server = MockServer::start().await;

        let body = r#"[
            {
                "id": "bitcoin",
                "symbol": "btc",
                "name": "Bitcoin",
                "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
                "current_price": 43250.12,
                "market_cap": 846000000000,
                "price_change_percentage_24h": 2.35
            },
            {
                "id": "ethereum",
                "symbol": "eth",
                "name": "Ethereum",
                "image": "https://assets.coingecko.com/coins/images/279/large/ethereum.png",
                "current_price": 2280.5,
                "market_cap": 274000000000,
                "price_change_percentage_24h": -1.1
            }
        ]"#;

        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("order", "market_cap_desc"))
            .and(query_param("per_page", "50"))
            .and(query_param("page", "1"))
            .and(query_param("sparkline", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let assets = client_for(&mock_server).await.list_assets().await.unwrap();

        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].id, "bitcoin");
        assert_eq!(assets[0].current_price, Some(43250.12));
        assert_eq!(assets[1].price_change_percentage_24h, Some(-1.1));
    }

    #[tokio::test]
    async fn test_list_assets_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).await.list_assets().await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status, .. } if status == StatusCode::TOO_MANY_REQUESTS));
        assert!(err.to_string().starts_with("Failed to fetch data"));
    }

    #[tokio::test]
    async fn test_get_asset_flattens_nested_fields() {
        let mock_server = MockServer::start().await;

        let body = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": {
                "thumb": "https://example.com/thumb.png",
                "small": "https://example.com/small.png",
                "large": "https://example.com/large.png"
            },
            "description": {
                "en": "Bitcoin is digital money. It is decentralized. Learn more.",
                "de": null
            },
            "market_data": {
                "current_price": { "usd": 43250.12, "eur": 39800.0 },
                "market_cap": { "usd": 846000000000, "eur": 779000000000 }
            }
        }"#;

        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .and(query_param("localization", "false"))
            .and(query_param("tickers", "false"))
            .and(query_param("market_data", "true"))
            .and(query_param("community_data", "false"))
            .and(query_param("developer_data", "false"))
            .and(query_param("sparkline", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let detail = client_for(&mock_server).await.get_asset("bitcoin").await.unwrap();

        assert_eq!(detail.name, "Bitcoin");
        assert_eq!(detail.image_large.as_deref(), Some("https://example.com/large.png"));
        assert_eq!(detail.current_price_usd, Some(43250.12));
        assert_eq!(detail.market_cap_usd, Some(846_000_000_000.0));
        assert_eq!(detail.description_excerpt(), "Bitcoin is digital money.");
        assert!(!detail.description.contains_key("de"));
    }

    #[tokio::test]
    async fn test_get_asset_checks_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/coins/not-a-coin"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"error":"coin not found"}"#),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .await
            .get_asset("not-a-coin")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status, .. } if status == StatusCode::NOT_FOUND));
        assert!(err.to_string().starts_with("Failed to fetch coin"));
    }

    #[tokio::test]
    async fn test_get_price_history() {
        let mock_server = MockServer::start().await;

        let body = r#"{
            "prices": [
                [1704067200000, 42000.0],
                [1704153600000, 42500.5],
                [1704240000000, 41800.25]
            ],
            "market_caps": [],
            "total_volumes": []
        }"#;

        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let prices = client_for(&mock_server)
            .await
            .get_price_history("bitcoin", PRICE_HISTORY_DAYS)
            .await
            .unwrap();

        assert_eq!(prices.len(), 3);
        assert_eq!(prices[1], PricePoint(1_704_153_600_000, 42_500.5));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"oops"}"#))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .await
            .get_price_history("bitcoin", PRICE_HISTORY_DAYS)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode { what: "price history", .. }));
    }

    #[tokio::test]
    async fn test_coin_id_is_sent_as_a_single_path_segment() {
        let mock_server = MockServer::start().await;

        // Seul "bitcoin" existe : "bitcoin?evil" ne doit pas y arriver
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"id":"bitcoin","symbol":"btc","name":"Bitcoin"}"#,
            ))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .await
            .get_asset("bitcoin?evil")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::Status { what: "coin", status } if status == StatusCode::NOT_FOUND
        ));

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/coins/bitcoin%3Fevil");
        assert!(requests[0].url.query_pairs().all(|(key, _)| key != "evil"));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = CoinGeckoClient::with_base_url("https://api.coingecko.com/api/v3").unwrap();
        assert_eq!(
            client.endpoint(&["coins", "a/b#c", "market_chart"]).as_str(),
            "https://api.coingecko.com/api/v3/coins/a%2Fb%23c/market_chart"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = CoinGeckoClient::with_base_url("not a url").unwrap_err();
        assert!(matches!(err, FetchError::BaseUrl { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CoinGeckoClient::with_base_url("http://localhost:1234/api/v3/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234/api/v3");
    }
}
