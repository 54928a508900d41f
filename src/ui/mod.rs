// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// - listing : tableau des coins + recherche
// - detail  : fiche d'un coin + graphique 7 jours
// ============================================================================

pub mod detail;  // Rendu de la Detail View
pub mod events;  // Gestion des événements clavier
pub mod format;  // Formatage des montants et variations
pub mod listing; // Rendu de la Listing View

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, View};

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - La vue montée décide du rendu
/// - Le compilateur garantit l'exhaustivité
pub fn render(frame: &mut Frame, app: &App) {
    match &app.view {
        View::Listing(listing) => listing::render_listing(frame, app, listing),
        View::Detail(detail) => detail::render_detail(frame, app, detail),
    }
}

/// Layout principal : header (3), contenu, footer (3)
///
/// Layout::split() retourne Rc<[Rect]>, converti en Vec
pub(crate) fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Contenu
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

/// Message centré dans un bloc ("Loading...", "Error: ...")
pub(crate) fn status_message(text: &str, color: Color) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(text.to_string(), Style::default().fg(color))))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

/// Footer de confirmation du quit (two-step)
pub(crate) fn render_quit_confirmation(frame: &mut Frame, area: Rect) {
    let warning = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        Span::styled("⚠  Press ", warning),
        Span::styled(
            "[q]",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
        Span::styled(" again to quit, or any other key to cancel ⚠", warning),
    ]);

    let paragraph = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
