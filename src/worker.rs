// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui possède un runtime tokio
// - Reçoit des FetchCommand via un channel (command_rx)
// - Envoie des FetchResult via un autre channel (result_tx)
// - Chaque commande devient une tâche tokio : les deux requêtes de la
//   Detail View tournent en parallèle
// - L'UI ne bloque jamais sur le réseau
// ============================================================================

use std::sync::mpsc;
use std::thread::JoinHandle;

use tracing::{debug, error, info, warn};

use crate::api::{CoinGeckoClient, FetchError};
use crate::models::{AssetDetail, AssetSummary, PricePoint, Ticket};

/// Commandes envoyées au worker
///
/// Chaque commande porte le ticket du montage de vue qui l'a émise.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchCommand {
    /// Charger le listing classé par market cap
    ListAssets { ticket: Ticket },

    /// Charger la fiche d'un coin
    LoadAsset { ticket: Ticket, id: String },

    /// Charger l'historique de prix d'un coin
    LoadPriceHistory { ticket: Ticket, id: String, days: u32 },
}

impl FetchCommand {
    pub fn ticket(&self) -> Ticket {
        match self {
            FetchCommand::ListAssets { ticket }
            | FetchCommand::LoadAsset { ticket, .. }
            | FetchCommand::LoadPriceHistory { ticket, .. } => *ticket,
        }
    }
}

/// Résultats renvoyés par le worker
#[derive(Debug)]
pub enum FetchResult {
    Assets {
        ticket: Ticket,
        result: Result<Vec<AssetSummary>, FetchError>,
    },

    Asset {
        ticket: Ticket,
        id: String,
        result: Result<AssetDetail, FetchError>,
    },

    PriceHistory {
        ticket: Ticket,
        id: String,
        result: Result<Vec<PricePoint>, FetchError>,
    },
}

impl FetchResult {
    pub fn ticket(&self) -> Ticket {
        match self {
            FetchResult::Assets { ticket, .. }
            | FetchResult::Asset { ticket, .. }
            | FetchResult::PriceHistory { ticket, .. } => *ticket,
        }
    }
}

/// Exécute une commande et construit son résultat
pub async fn execute(client: &CoinGeckoClient, command: FetchCommand) -> FetchResult {
    match command {
        FetchCommand::ListAssets { ticket } => FetchResult::Assets {
            ticket,
            result: client.list_assets().await,
        },
        FetchCommand::LoadAsset { ticket, id } => {
            let result = client.get_asset(&id).await;
            FetchResult::Asset { ticket, id, result }
        }
        FetchCommand::LoadPriceHistory { ticket, id, days } => {
            let result = client.get_price_history(&id, days).await;
            FetchResult::PriceHistory { ticket, id, result }
        }
    }
}

/// Lance le worker thread
///
/// CONCEPT RUST : Thread + async runtime
/// - std::thread::spawn() : crée un thread OS
/// - tokio::runtime::Runtime : runtime multi-thread dans ce thread
/// - runtime.spawn() : une tâche par commande, pas d'attente séquentielle
///
/// Le thread se termine quand le Sender des commandes est droppé.
pub fn spawn_worker(
    client: CoinGeckoClient,
    command_rx: mpsc::Receiver<FetchCommand>,
    result_tx: mpsc::Sender<FetchResult>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker not started");
                return;
            }
        };

        // Boucle de traitement des commandes
        // - recv() bloque ce thread (pas l'UI)
        // - Err : channel fermé, on quitte
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            let client = client.clone();
            let result_tx = result_tx.clone();

            runtime.spawn(async move {
                let result = execute(&client, command).await;
                debug!(ticket = %result.ticket(), "Sending fetch result");

                if result_tx.send(result).is_err() {
                    // L'UI est déjà fermée
                    warn!("Result channel closed, dropping fetch result");
                }
            });
        }

        info!("Worker thread exiting (channel closed)");
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_execute_price_history_keeps_ticket_and_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/coins/solana/market_chart"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"prices":[[1704067200000, 101.5]]}"#),
            )
            .mount(&mock_server)
            .await;

        let client = CoinGeckoClient::with_base_url(mock_server.uri()).unwrap();
        let command = FetchCommand::LoadPriceHistory {
            ticket: Ticket(7),
            id: "solana".to_string(),
            days: 7,
        };

        match execute(&client, command).await {
            FetchResult::PriceHistory { ticket, id, result } => {
                assert_eq!(ticket, Ticket(7));
                assert_eq!(id, "solana");
                assert_eq!(result.unwrap(), vec![PricePoint(1_704_067_200_000, 101.5)]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_worker_runs_detail_requests_and_reports_both() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"prices":[[1704067200000, 42000.0]]}"#),
            )
            .mount(&mock_server)
            .await;

        let client = CoinGeckoClient::with_base_url(mock_server.uri()).unwrap();
        let (command_tx, command_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn_worker(client, command_rx, result_tx);

        let ticket = Ticket(3);
        command_tx
            .send(FetchCommand::LoadAsset { ticket, id: "bitcoin".to_string() })
            .unwrap();
        command_tx
            .send(FetchCommand::LoadPriceHistory { ticket, id: "bitcoin".to_string(), days: 7 })
            .unwrap();

        // recv_timeout bloque : on le sort du runtime du test
        let results = tokio::task::spawn_blocking(move || {
            let first = result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
            let second = result_rx.recv_timeout(Duration::from_secs(5)).unwrap();
            vec![first, second]
        })
        .await
        .unwrap();

        let mut saw_asset_error = false;
        let mut saw_history = false;
        for result in results {
            assert_eq!(result.ticket(), ticket);
            match result {
                FetchResult::Asset { result, .. } => saw_asset_error = result.is_err(),
                FetchResult::PriceHistory { result, .. } => saw_history = result.is_ok(),
                FetchResult::Assets { .. } => panic!("no listing was requested"),
            }
        }
        assert!(saw_asset_error);
        assert!(saw_history);

        // Fermer le channel arrête le worker
        drop(command_tx);
        tokio::task::spawn_blocking(move || handle.join().unwrap())
            .await
            .unwrap();
    }

    #[test]
    fn test_command_ticket() {
        let command = FetchCommand::ListAssets { ticket: Ticket(9) };
        assert_eq!(command.ticket(), Ticket(9));
    }
}
