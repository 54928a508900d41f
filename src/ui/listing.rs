// ============================================================================
// Listing View - Rendu du tableau des coins
// ============================================================================
// Header (titre + champ de recherche), tableau, footer (raccourcis)
//
// CONCEPTS RATATUI :
// 1. Table : lignes et colonnes avec largeurs contraintes
// 2. TableState : ligne sélectionnée (surlignée)
// 3. Style conditionnel : vert/rouge selon la variation
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, ListingView};
use crate::models::{AssetSummary, Remote};
use crate::ui::format::{format_change, format_usd};
use crate::ui::{create_layout, render_quit_confirmation, status_message};

/// Titre de l'application
pub const TITLE: &str = "💹 Crypto Tracker";

/// Placeholder du champ de recherche
pub const SEARCH_PLACEHOLDER: &str = "Search coins...";

/// Dessine la Listing View
pub fn render_listing(frame: &mut Frame, app: &App, listing: &ListingView) {
    let chunks = create_layout(frame.size());

    render_header(frame, listing, chunks[0]);
    render_content(frame, listing, chunks[1]);
    render_footer(frame, app, listing, chunks[2]);
}

// ============================================================================
// Header : titre et recherche
// ============================================================================

fn render_header(frame: &mut Frame, listing: &ListingView, area: Rect) {
    let border_color = if listing.search_focused {
        Color::Green // Vert pour indiquer la saisie
    } else {
        Color::Cyan
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", TITLE))
        .title_alignment(Alignment::Center);

    let mut spans = vec![Span::styled(
        "🔍 ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    if listing.search.is_empty() && !listing.search_focused {
        spans.push(Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::styled(listing.search.as_str(), Style::default().fg(Color::White)));
    }

    if listing.search_focused {
        spans.push(Span::styled(
            "█", // Curseur
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Contenu : Loading / Error / tableau
// ============================================================================

fn render_content(frame: &mut Frame, listing: &ListingView, area: Rect) {
    match &listing.assets {
        Remote::Idle | Remote::Loading => {
            frame.render_widget(status_message("Loading...", Color::Gray), area);
        }
        Remote::Failed(message) => {
            frame.render_widget(status_message(&format!("Error: {}", message), Color::Red), area);
        }
        Remote::Ready(_) => render_table(frame, listing, area),
    }
}

/// Dessine le tableau filtré
///
/// CONCEPT RUST : Iterator chaining
/// - filtered() recalcule la liste à chaque frame (pas de cache)
/// - .map() transforme chaque coin en Row
fn render_table(frame: &mut Frame, listing: &ListingView, area: Rect) {
    let filtered = listing.filtered();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" 📊 Top coins ({}) ", filtered.len()));

    let header = Row::new(vec!["Coin", "Price", "24h Change", "Market Cap"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = filtered.iter().map(|asset| asset_row(asset)).collect();

    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
        Constraint::Percentage(25),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !filtered.is_empty() {
        state.select(Some(listing.selected_index.min(filtered.len() - 1)));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Une ligne du tableau
fn asset_row(asset: &AssetSummary) -> Row<'static> {
    let (change, tone) = format_change(asset.price_change_percentage_24h);
    let change_style = match tone.color() {
        Some(color) => Style::default().fg(color),
        None => Style::default(),
    };

    Row::new(vec![
        Cell::from(asset.display_name()),
        Cell::from(format_usd(asset.current_price)),
        Cell::from(change).style(change_style),
        Cell::from(format_usd(asset.market_cap)),
    ])
}

// ============================================================================
// Footer : Instructions
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, listing: &ListingView, area: Rect) {
    if app.is_awaiting_quit_confirmation() {
        render_quit_confirmation(frame, area);
        return;
    }

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let shortcuts = if listing.search_focused {
        Line::from(vec![
            Span::styled("[Enter/ESC]", key_style),
            Span::raw(" Done  "),
            Span::styled("[Backspace]", key_style),
            Span::raw(" Delete"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", key_style),
            Span::raw(" Navigate  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Details  "),
            Span::styled("[/]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Search"),
        ])
    };

    let paragraph = Paragraph::new(shortcuts)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::router::Route;
    use crate::ui::render;
    use crate::ui::tests::buffer_text;
    use crate::worker::FetchResult;
    use ratatui::{backend::TestBackend, Terminal};
    use reqwest::StatusCode;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn asset(id: &str, name: &str, symbol: &str, change: Option<f64>) -> AssetSummary {
        AssetSummary {
            current_price: Some(100.0),
            price_change_percentage_24h: change,
            market_cap: Some(1_000_000.0),
            ..AssetSummary::new(id, name, symbol)
        }
    }

    fn mounted_listing(result: Result<Vec<AssetSummary>, FetchError>) -> App {
        let mut app = App::new();
        let ticket = app.navigate(Route::Listing)[0].ticket();
        app.apply(FetchResult::Assets { ticket, result });
        app
    }

    #[test]
    fn test_loading_state() {
        let mut app = App::new();
        app.navigate(Route::Listing);

        let text = draw(&app);
        assert!(text.contains("Loading..."));
        assert!(text.contains("Search coins..."));
    }

    #[test]
    fn test_error_state_has_no_table() {
        let app = mounted_listing(Err(FetchError::Status {
            what: "data",
            status: StatusCode::SERVICE_UNAVAILABLE,
        }));

        let text = draw(&app);
        assert!(text.contains("Error: Failed to fetch data"));
        assert!(!text.contains("Market Cap"));
    }

    #[test]
    fn test_table_rows_and_change_labels() {
        let app = mounted_listing(Ok(vec![
            asset("bitcoin", "Bitcoin", "btc", Some(5.2)),
            asset("ethereum", "Ethereum", "eth", Some(-1.1)),
            asset("newcoin", "New Coin", "new", None),
            asset("tether", "Tether", "usdt", Some(0.0)),
        ]));

        let text = draw(&app);
        assert!(text.contains("Market Cap"));
        assert!(text.contains("Bitcoin (BTC)"));
        assert!(text.contains("5.20%"));
        assert!(text.contains("-1.10%"));
        assert!(text.contains("N/A"));
        assert!(text.contains("0.00%"));
        assert!(text.contains("$1,000,000"));
    }

    #[test]
    fn test_search_hides_non_matching_rows() {
        let mut app = mounted_listing(Ok(vec![
            asset("bitcoin", "Bitcoin", "btc", Some(1.0)),
            asset("ethereum", "Ethereum", "eth", Some(1.0)),
        ]));
        let listing = app.listing_mut().unwrap();
        listing.focus_search();
        listing.push_search_char('e');
        listing.push_search_char('t');

        let text = draw(&app);
        assert!(text.contains("Ethereum (ETH)"));
        assert!(!text.contains("Bitcoin (BTC)"));
    }
}
