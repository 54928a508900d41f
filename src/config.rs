// ============================================================================
// Configuration : ligne de commande
// ============================================================================
// CONCEPT RUST : clap derive
// - La struct décrit les options, clap génère le parseur et --help
// - env = "..." : fallback sur une variable d'environnement
// ============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::api::coingecko::DEFAULT_BASE_URL;
use crate::router::{Route, RouteError};

/// Nom du dossier applicatif (logs)
pub const APP_DIR_NAME: &str = "crypto-tracker";

/// Tableau de bord crypto dans le terminal
#[derive(Debug, Clone, Parser)]
#[command(name = "crypto-tracker", version, about)]
pub struct Cli {
    /// URL de base de l'API CoinGecko
    #[arg(long, env = "CRYPTO_TRACKER_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Répertoire des fichiers de logs
    #[arg(long, env = "CRYPTO_TRACKER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Route initiale ("/" ou "/coin/<id>")
    #[arg(default_value = "/")]
    pub route: String,
}

impl Cli {
    /// Route initiale validée
    pub fn initial_route(&self) -> Result<Route, RouteError> {
        Route::parse(&self.route)
    }

    /// Répertoire de logs effectif
    ///
    /// --log-dir, sinon ~/.local/share/crypto-tracker/logs (Linux),
    /// sinon ./logs
    pub fn resolved_log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) => dir.clone(),
            None => default_log_dir(),
        }
    }
}

/// Répertoire de logs par défaut selon l'OS
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["crypto-tracker"]).unwrap();
        assert_eq!(cli.route, "/");
        assert_eq!(cli.initial_route().unwrap(), Route::Listing);
    }

    #[test]
    fn test_log_dir_falls_back_to_default() {
        // Indépendant de CRYPTO_TRACKER_LOG_DIR dans l'environnement du test
        let cli = Cli {
            log_dir: None,
            ..Cli::try_parse_from(["crypto-tracker"]).unwrap()
        };

        let dir = cli.resolved_log_dir();
        assert_eq!(dir, default_log_dir());
        assert!(dir.ends_with(PathBuf::from(APP_DIR_NAME).join("logs")) || dir == PathBuf::from("./logs"));
    }

    #[test]
    fn test_explicit_options() {
        let cli = Cli::try_parse_from([
            "crypto-tracker",
            "--api-url",
            "http://127.0.0.1:9000",
            "--log-dir",
            "/tmp/ct-logs",
            "/coin/bitcoin",
        ])
        .unwrap();

        assert_eq!(cli.api_url, "http://127.0.0.1:9000");
        assert_eq!(cli.resolved_log_dir(), PathBuf::from("/tmp/ct-logs"));
        assert_eq!(cli.initial_route().unwrap(), Route::detail("bitcoin"));
    }

    #[test]
    fn test_invalid_route_is_rejected() {
        let cli = Cli::try_parse_from(["crypto-tracker", "/coin/bitcoin/extra"]).unwrap();
        assert!(matches!(cli.initial_route(), Err(RouteError::NotFound(_))));
    }
}
