// ============================================================================
// Crypto Tracker - Tableau de bord crypto dans le terminal
// ============================================================================
// Deux vues routées :
// - "/"          : top 50 des coins par market cap, avec recherche
// - "/coin/:id"  : fiche d'un coin et graphique des prix sur 7 jours
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui dessine, lit les touches, applique les résultats
// 3. Worker thread : les requêtes HTTP tournent hors de l'UI (channels mpsc)
// 4. Tickets de montage : un résultat d'une vue démontée est ignoré
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use crypto_tracker::api::CoinGeckoClient;
use crypto_tracker::app::App;
use crypto_tracker::config::Cli;
use crypto_tracker::ui::{events::EventHandler, render};
use crypto_tracker::worker::{spawn_worker, FetchCommand, FetchResult};

// ============================================================================
// Logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans (par défaut) :
/// - Linux : ~/.local/share/crypto-tracker/logs/crypto-tracker.log
/// - macOS : ~/Library/Application Support/crypto-tracker/logs/crypto-tracker.log
///
/// ```bash
/// tail -f ~/.local/share/crypto-tracker/logs/crypto-tracker.log
/// RUST_LOG=crypto_tracker=trace crypto-tracker
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "crypto-tracker.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Worker et UI tournent sur des threads différents
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour crypto_tracker, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crypto_tracker=debug,info".into()),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    info!(?log_dir, "Logging initialized");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging avant tout le reste, mais son échec n'empêche pas de démarrer
    let log_dir = cli.resolved_log_dir();
    if let Err(e) = init_logging(&log_dir) {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    }

    info!(api_url = %cli.api_url, route = %cli.route, "Crypto Tracker starting up");

    // Route invalide : on échoue avant de toucher au terminal
    let initial_route = cli
        .initial_route()
        .with_context(|| format!("Invalid initial route {:?}", cli.route))?;

    let client = CoinGeckoClient::with_base_url(cli.api_url.clone()).context("Failed to build HTTP client")?;

    // Channels UI ↔ worker
    // - command_tx/rx : l'UI demande des fetchs
    // - result_tx/rx : le worker renvoie les résultats
    let (command_tx, command_rx) = mpsc::channel::<FetchCommand>();
    let (result_tx, result_rx) = mpsc::channel::<FetchResult>();

    info!("Spawning background worker thread");
    let worker = spawn_worker(client, command_rx, result_tx);

    // Monte la première vue : ses requêtes partent avant le premier rendu
    let mut app = App::new();
    dispatch(app.navigate(initial_route), &command_tx);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Fermer le channel des commandes arrête le worker
    drop(command_tx);
    if worker.join().is_err() {
        warn!("Worker thread panicked");
    }

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Envoie les commandes de fetch au worker
fn dispatch(commands: Vec<FetchCommand>, command_tx: &mpsc::Sender<FetchCommand>) {
    for command in commands {
        if command_tx.send(command).is_err() {
            error!("Worker thread disconnected, fetch command dropped");
        }
    }
}

// ============================================================================
// Event Loop
// ============================================================================
// 0. RÉSULTATS : applique ce que le worker a renvoyé
// 1. RENDER : dessine la vue montée
// 2. INPUT : lit une touche (ou un Tick après 250ms)
// ============================================================================

/// Exécute la boucle principale de l'application
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<FetchCommand>,
    result_rx: &mpsc::Receiver<FetchResult>,
) -> Result<()> {
    let mut worker_alive = true;

    while app.is_running() {
        // CONCEPT : Non-blocking receive avec try_recv
        // - On vide tout ce qui est arrivé depuis le dernier tour
        // - Les résultats périmés sont ignorés par app.apply()
        loop {
            match result_rx.try_recv() {
                Ok(result) => {
                    app.apply(result);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if worker_alive {
                        error!("Worker thread disconnected!");
                        worker_alive = false;
                    }
                    break;
                }
            }
        }

        terminal.draw(|frame| render(frame, app))?;

        match events.next() {
            Ok(event) => {
                let commands = app.handle_key(&event);
                dispatch(commands, command_tx);
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read terminal event");
            }
        }
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
