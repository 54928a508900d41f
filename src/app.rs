// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Enums pour state machines : une seule vue montée à la fois
// 3. Effets explicites : navigate() renvoie les commandes à émettre
//
// PATTERN : "fetch on mount" explicite
// - Monter une vue = lui donner un nouveau Ticket et émettre ses commandes
// - Un résultat n'est appliqué que si son ticket est celui de la vue montée
// - Les réponses tardives d'une vue démontée sont ignorées
// ============================================================================

use tracing::{debug, error, info, warn};

use crate::api::PRICE_HISTORY_DAYS;
use crate::models::{
    filter_assets, to_chart_points, AssetDetail, AssetSummary, ChartPoint, DataSource,
    FailureVisibility, Remote, Ticket,
};
use crate::router::Route;
use crate::ui::events::{
    get_text_char, is_backspace_event, is_down_event, is_enter_event, is_escape_event, is_quit_event,
    is_search_event, is_space_event, is_up_event, Event,
};
use crate::worker::{FetchCommand, FetchResult};

// ============================================================================
// Listing View
// ============================================================================

/// État de la Listing View
#[derive(Debug, Clone, Default)]
pub struct ListingView {
    /// Ticket du montage courant
    pub ticket: Ticket,

    /// Listing complet, tel que renvoyé par l'API
    pub assets: Remote<Vec<AssetSummary>>,

    /// Texte de recherche (remis à zéro à chaque montage)
    pub search: String,

    /// Le champ de recherche capture-t-il les touches ?
    pub search_focused: bool,

    /// Index sélectionné dans la liste filtrée
    pub selected_index: usize,
}

impl ListingView {
    fn mounted(ticket: Ticket) -> Self {
        Self {
            ticket,
            assets: Remote::Loading,
            ..Self::default()
        }
    }

    /// Liste filtrée, recalculée à chaque appel
    pub fn filtered(&self) -> Vec<&AssetSummary> {
        match &self.assets {
            Remote::Ready(assets) => filter_assets(assets, &self.search),
            _ => Vec::new(),
        }
    }

    /// Coin sélectionné dans la liste filtrée
    pub fn selected_asset(&self) -> Option<&AssetSummary> {
        self.filtered().get(self.selected_index).copied()
    }

    /// Navigue vers le haut
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas, borné à la liste filtrée
    pub fn navigate_down(&mut self) {
        let max_index = self.filtered().len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    pub fn focus_search(&mut self) {
        self.search_focused = true;
    }

    pub fn unfocus_search(&mut self) {
        self.search_focused = false;
    }

    /// Ajoute un caractère à la recherche
    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
        self.selected_index = 0;
    }

    /// Supprime le dernier caractère de la recherche
    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.selected_index = 0;
    }
}

// ============================================================================
// Detail View
// ============================================================================

/// État de la Detail View
///
/// Deux machines à états indépendantes, écrites dans des champs disjoints.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub ticket: Ticket,

    /// Id du coin (segment de la route)
    pub id: String,

    /// Métadonnées : conditionne tout l'affichage
    pub asset: Remote<AssetDetail>,

    /// Série de prix : échec loggé seulement
    pub series: Remote<Vec<ChartPoint>>,
}

impl DetailView {
    fn mounted(ticket: Ticket, id: String) -> Self {
        Self {
            ticket,
            id,
            asset: Remote::Loading,
            series: Remote::Loading,
        }
    }

    /// Points du graphique, None tant que la série n'est pas prête et non vide
    pub fn chart_points(&self) -> Option<&[ChartPoint]> {
        self.series
            .ready()
            .map(Vec::as_slice)
            .filter(|points| !points.is_empty())
    }
}

/// Vue actuellement montée
#[derive(Debug, Clone)]
pub enum View {
    Listing(ListingView),
    Detail(DetailView),
}

impl View {
    pub fn ticket(&self) -> Ticket {
        match self {
            View::Listing(view) => view.ticket,
            View::Detail(view) => view.ticket,
        }
    }
}

// ============================================================================
// App
// ============================================================================

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Route courante
    pub route: Route,

    /// Vue montée pour la route courante
    pub view: View,

    /// Dernier ticket distribué
    last_ticket: Ticket,

    /// Two-step quit : première pression de 'q' → confirmation
    pub confirm_quit: bool,
}

impl App {
    /// Crée une App sur la route "/" non montée
    ///
    /// Appeler navigate() pour monter la première vue et obtenir ses commandes.
    pub fn new() -> Self {
        Self {
            running: true,
            route: Route::Listing,
            view: View::Listing(ListingView::default()),
            last_ticket: Ticket::UNMOUNTED,
            confirm_quit: false,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// La vue courante a-t-elle été montée ?
    pub fn is_mounted(&self) -> bool {
        self.view.ticket() != Ticket::UNMOUNTED
    }

    /// Navigue vers une route et renvoie les commandes à émettre
    ///
    /// CONCEPT : Effet lié au cycle de vie de la vue
    /// - L'ancienne vue est démontée (son état est perdu)
    /// - La nouvelle vue reçoit un ticket neuf et passe en Loading
    /// - Naviguer vers la route déjà montée ne fait rien
    pub fn navigate(&mut self, route: Route) -> Vec<FetchCommand> {
        if self.is_mounted() && route == self.route {
            debug!(route = %route, "Route already mounted, ignoring navigation");
            return Vec::new();
        }

        self.last_ticket = self.last_ticket.next();
        let ticket = self.last_ticket;
        info!(from = %self.route, to = %route, %ticket, "Navigating");

        let commands = match &route {
            Route::Listing => {
                self.view = View::Listing(ListingView::mounted(ticket));
                vec![FetchCommand::ListAssets { ticket }]
            }
            Route::Detail { id } => {
                self.view = View::Detail(DetailView::mounted(ticket, id.clone()));
                vec![
                    FetchCommand::LoadAsset { ticket, id: id.clone() },
                    FetchCommand::LoadPriceHistory {
                        ticket,
                        id: id.clone(),
                        days: PRICE_HISTORY_DAYS,
                    },
                ]
            }
        };

        self.route = route;
        commands
    }

    /// Ouvre la Detail View du coin sélectionné dans le listing
    pub fn open_selected(&mut self) -> Vec<FetchCommand> {
        let id = match &self.view {
            View::Listing(listing) => listing.selected_asset().map(|asset| asset.id.clone()),
            View::Detail(_) => None,
        };

        match id {
            Some(id) => self.navigate(Route::Detail { id }),
            None => Vec::new(),
        }
    }

    /// Retour au listing (lien "← Back")
    pub fn go_back(&mut self) -> Vec<FetchCommand> {
        self.navigate(Route::Listing)
    }

    /// Applique le résultat d'une requête
    ///
    /// Retourne false si le résultat est périmé (vue démontée ou autre coin)
    /// et a été ignoré.
    pub fn apply(&mut self, result: FetchResult) -> bool {
        let current = self.view.ticket();

        match (result, &mut self.view) {
            (FetchResult::Assets { ticket, result }, View::Listing(listing)) if ticket == current => {
                report_failure(DataSource::Listing, &result);
                listing.assets = Remote::settle(result);
                listing.selected_index = 0;
                true
            }
            (FetchResult::Asset { ticket, id, result }, View::Detail(detail))
                if ticket == current && id == detail.id =>
            {
                report_failure(DataSource::AssetDetail, &result);
                detail.asset = Remote::settle(result);
                true
            }
            (FetchResult::PriceHistory { ticket, id, result }, View::Detail(detail))
                if ticket == current && id == detail.id =>
            {
                report_failure(DataSource::PriceHistory, &result);
                detail.series = Remote::settle(result.map(|points| to_chart_points(&points)));
                true
            }
            (stale, _) => {
                debug!(ticket = %stale.ticket(), current = %current, "Discarding stale fetch result");
                false
            }
        }
    }

    /// Vue listing si montée
    pub fn listing(&self) -> Option<&ListingView> {
        match &self.view {
            View::Listing(listing) => Some(listing),
            View::Detail(_) => None,
        }
    }

    pub fn listing_mut(&mut self) -> Option<&mut ListingView> {
        match &mut self.view {
            View::Listing(listing) => Some(listing),
            View::Detail(_) => None,
        }
    }

    /// Vue détail si montée
    pub fn detail(&self) -> Option<&DetailView> {
        match &self.view {
            View::Detail(detail) => Some(detail),
            View::Listing(_) => None,
        }
    }

    /// Vérifie si on est sur le listing
    pub fn is_on_listing(&self) -> bool {
        matches!(self.view, View::Listing(_))
    }

    /// Vérifie si on est sur la fiche d'un coin
    pub fn is_on_detail(&self) -> bool {
        matches!(self.view, View::Detail(_))
    }

    /// Le champ de recherche capture-t-il les touches ?
    pub fn is_searching(&self) -> bool {
        self.listing().map(|listing| listing.search_focused).unwrap_or(false)
    }

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Clavier
    // ========================================================================

    /// Traite une touche et retourne les fetchs à lancer
    ///
    /// CONCEPT RUST : Pattern matching avec guards
    /// - L'ordre des bras compte : la recherche capture le texte avant
    ///   les raccourcis ('q', 'j', 'k' sont des lettres comme les autres)
    /// - Ctrl+C quitte même pendant la saisie
    pub fn handle_key(&mut self, event: &Event) -> Vec<FetchCommand> {
        match event {
            Event::Tick => Vec::new(),

            Event::Key(_) if is_quit_event(event) && (!self.is_searching() || get_text_char(event).is_none()) => {
                // Two-step : première pression → confirmation, deuxième → quit
                if self.is_awaiting_quit_confirmation() {
                    info!("User confirmed quit");
                    self.quit();
                } else {
                    info!("User requested quit (awaiting confirmation)");
                    self.request_quit();
                }
                Vec::new()
            }

            Event::Key(_) if self.is_searching() => {
                self.cancel_quit();
                if let Some(listing) = self.listing_mut() {
                    if is_enter_event(event) || is_escape_event(event) {
                        debug!(search = %listing.search, "Search field unfocused");
                        listing.unfocus_search();
                    } else if is_backspace_event(event) {
                        listing.pop_search_char();
                    } else if let Some(c) = get_text_char(event) {
                        listing.push_search_char(c);
                    }
                }
                Vec::new()
            }

            Event::Key(_) if self.is_on_listing() => {
                self.cancel_quit();
                if is_enter_event(event) {
                    return self.open_selected();
                }
                if let Some(listing) = self.listing_mut() {
                    if is_search_event(event) {
                        debug!("Search field focused");
                        listing.focus_search();
                    } else if is_up_event(event) {
                        listing.navigate_up();
                    } else if is_down_event(event) {
                        listing.navigate_down();
                    }
                }
                Vec::new()
            }

            // ESC, Backspace ou Espace : lien "← Back"
            Event::Key(_) => {
                self.cancel_quit();
                if is_escape_event(event) || is_backspace_event(event) || is_space_event(event) {
                    debug!("User returned to listing");
                    self.go_back()
                } else {
                    Vec::new()
                }
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Logge un échec selon la visibilité déclarée par la source
fn report_failure<T>(source: DataSource, result: &Result<T, crate::api::FetchError>) {
    if let Err(e) = result {
        match source.failure_visibility() {
            FailureVisibility::Banner => {
                warn!(source = source.label(), error = %e, "Fetch failed, showing error banner")
            }
            FailureVisibility::LogOnly => {
                error!(source = source.label(), error = ?e, "Fetch failed")
            }
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
