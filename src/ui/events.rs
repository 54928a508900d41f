// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Non-blocking I/O : poll avec timeout pour que l'UI reste réactive
//    pendant que le worker charge les données
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Délai max d'attente d'un événement avant un Tick
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier : aucun événement, mais on redessine
    /// (les résultats du worker arrivent entre deux touches)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    timeout: Duration,
}

impl EventHandler {
    /// Crée un nouveau gestionnaire d'événements
    pub fn new() -> Self {
        Self { timeout: POLL_TIMEOUT }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend max 250ms
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.timeout)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                // On ne veut gérer que Press pour éviter les doublons
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),

                // Resize, souris, Release : on redessine simplement
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================

/// Extrait le KeyEvent d'un événement
fn key_of(event: &Event) -> Option<&KeyEvent> {
    match event {
        Event::Key(key) => Some(key),
        Event::Tick => None,
    }
}

/// 'q' (quitter) ou Ctrl+C
pub fn is_quit_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    })
}

/// Échap
pub fn is_escape_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| key.code == KeyCode::Esc)
}

/// Entrée
pub fn is_enter_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| key.code == KeyCode::Enter)
}

/// Backspace
pub fn is_backspace_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| key.code == KeyCode::Backspace)
}

/// Espace
pub fn is_space_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| key.code == KeyCode::Char(' '))
}

/// Flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K')))
}

/// Flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| matches!(key.code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')))
}

/// '/' : focus sur le champ de recherche (vim)
pub fn is_search_event(event: &Event) -> bool {
    key_of(event).is_some_and(|key| key.code == KeyCode::Char('/'))
}

/// Caractère imprimable saisi dans la recherche
///
/// Ctrl/Alt + touche ne sont pas du texte.
pub fn get_text_char(event: &Event) -> Option<char> {
    let key = key_of(event)?;
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Char(c) if !c.is_control() => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
