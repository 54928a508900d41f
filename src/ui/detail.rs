// ============================================================================
// Detail View - Fiche et graphique d'un coin
// ============================================================================
// Les métadonnées conditionnent toute la vue :
// - Loading  → "Loading..."
// - Failed   → "Error: ..." et rien d'autre (pas de section graphique)
// - Ready    → header, prix, market cap, graphique 7 jours, description
//
// Le graphique n'apparaît que si la série est prête et non vide,
// sinon "Loading chart..." (y compris après un échec loggé).
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de points (x, y)
// 3. Axis : bornes et labels des axes
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, DetailView};
use crate::models::{price_series::price_bounds, AssetDetail, ChartPoint, Remote};
use crate::ui::format::format_usd;
use crate::ui::{render_quit_confirmation, status_message};

/// Titre de la section graphique
pub const CHART_TITLE: &str = "7 Day Price Chart";

/// Couleur de la courbe (indigo)
const LINE_COLOR: Color = Color::Rgb(79, 70, 229);

/// Dessine la Detail View
pub fn render_detail(frame: &mut Frame, app: &App, detail: &DetailView) {
    let area = frame.size();

    let status = match &detail.asset {
        Remote::Idle | Remote::Loading => status_message("Loading...", Color::Gray),
        Remote::Failed(message) => status_message(&format!("Error: {}", message), Color::Red),
        Remote::Ready(asset) => return render_asset(frame, app, detail, asset, area),
    };

    // Loading / Error : le footer reste visible (retour, quit)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    frame.render_widget(status, chunks[0]);
    render_footer(frame, app, chunks[1]);
}

/// Dessine la fiche complète
fn render_asset(frame: &mut Frame, app: &App, detail: &DetailView, asset: &AssetDetail, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Header : retour, nom, prix, market cap
            Constraint::Min(8),    // Graphique
            Constraint::Length(5), // Description
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec();

    render_header(frame, asset, chunks[0]);
    render_chart_section(frame, detail, chunks[1]);
    render_description(frame, asset, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, asset: &AssetDetail, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" ← Back [ESC] ");

    let text = vec![
        Line::from(Span::styled(
            asset.display_name(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Current Price: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_usd(asset.current_price_usd),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Market Cap: ", Style::default().fg(Color::Gray)),
            Span::raw(format_usd(asset.market_cap_usd)),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ============================================================================
// Graphique
// ============================================================================

fn render_chart_section(frame: &mut Frame, detail: &DetailView, area: Rect) {
    match detail.chart_points() {
        Some(points) => render_chart(frame, points, area),
        None => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Loading chart...",
                Style::default().fg(Color::Gray),
            )))
            .block(chart_block());
            frame.render_widget(paragraph, area);
        }
    }
}

fn chart_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", CHART_TITLE))
}

/// Dessine le graphique ligne
///
/// CONCEPT RUST : Iterator chaining
/// - .enumerate() : l'index devient l'abscisse
/// - .map() : (index, prix)
fn render_chart(frame: &mut Frame, points: &[ChartPoint], area: Rect) {
    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, point)| (i as f64, point.price))
        .collect();

    let (min_price, max_price) = match price_bounds(points) {
        Some(bounds) => bounds,
        None => return,
    };

    // Marge de 5% pour que le graphique respire
    // Série plate : marge de 1% du prix pour éviter des bornes identiques
    let margin = if max_price > min_price {
        (max_price - min_price) * 0.05
    } else {
        (max_price.abs() * 0.01).max(f64::EPSILON)
    };
    let y_min = (min_price - margin).max(0.0);
    let y_max = max_price + margin;
    let x_max = (data.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name("price")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(LINE_COLOR))
        .data(&data)];

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, x_max])
        .labels(x_labels(points));

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format_usd(Some(y_min))),
            Span::raw(format_usd(Some((y_min + y_max) / 2.0))),
            Span::raw(format_usd(Some(y_max))),
        ]);

    let chart = Chart::new(datasets)
        .block(chart_block())
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Labels de l'axe X : premier, milieu et dernier jour
fn x_labels(points: &[ChartPoint]) -> Vec<Span<'static>> {
    let label_at = |i: usize| Span::raw(points.get(i).map(|p| p.label.clone()).unwrap_or_default());

    match points.len() {
        0 => Vec::new(),
        1 => vec![label_at(0)],
        n => vec![label_at(0), label_at(n / 2), label_at(n - 1)],
    }
}

// ============================================================================
// Description et footer
// ============================================================================

fn render_description(frame: &mut Frame, asset: &AssetDetail, area: Rect) {
    let paragraph = Paragraph::new(Span::styled(
        asset.description_excerpt(),
        Style::default().fg(Color::Gray),
    ))
    .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(Color::DarkGray)))
    .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    if app.is_awaiting_quit_confirmation() {
        render_quit_confirmation(frame, area);
        return;
    }

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let shortcuts = Line::from(vec![
        Span::styled("[q]", key_style),
        Span::raw(" Quit  "),
        Span::styled("[ESC / Space]", key_style),
        Span::raw(" Back"),
    ]);

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
