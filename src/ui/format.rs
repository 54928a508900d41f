// ============================================================================
// Formatage des montants et variations
// ============================================================================
// - Montants : séparateurs de milliers à l'américaine ("43,250.12")
// - Variation 24h : deux décimales + "%", ou "N/A" si absente
// ============================================================================

use ratatui::style::Color;

/// Décimales max pour un montant >= 1
const MAX_FRACTION_DIGITS: usize = 3;

/// Décimales max pour un montant < 1 (sinon les petits coins affichent 0)
const MAX_SMALL_FRACTION_DIGITS: usize = 6;

/// Placeholder pour une valeur absente
pub const NOT_AVAILABLE: &str = "N/A";

/// Ton de la cellule "24h Change"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeTone {
    /// Strictement positif : vert
    Positive,

    /// Nul ou négatif : rouge
    Negative,

    /// Valeur absente : pas de couleur
    Unknown,
}

impl ChangeTone {
    pub fn color(&self) -> Option<Color> {
        match self {
            ChangeTone::Positive => Some(Color::Green),
            ChangeTone::Negative => Some(Color::Red),
            ChangeTone::Unknown => None,
        }
    }
}

/// Formate la variation sur 24h
///
/// 5.2 → ("5.20%", Positive), 0 → ("0.00%", Negative), None → ("N/A", Unknown)
pub fn format_change(change: Option<f64>) -> (String, ChangeTone) {
    match change {
        Some(value) => {
            let tone = if value > 0.0 {
                ChangeTone::Positive
            } else {
                ChangeTone::Negative
            };
            // -0.0 s'afficherait "-0.00%"
            let value = if value == 0.0 { 0.0 } else { value };
            (format!("{:.2}%", value), tone)
        }
        None => (NOT_AVAILABLE.to_string(), ChangeTone::Unknown),
    }
}

/// "$43,250.12", ou "N/A"
pub fn format_usd(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("${}", format_grouped(value)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Nombre avec séparateurs de milliers et zéros finaux supprimés
///
/// CONCEPT RUST : format! avec précision dynamique
/// - {:.*} prend la précision en argument
/// - On arrondit d'abord, puis on groupe la partie entière par 3
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let digits = if value.abs() < 1.0 {
        MAX_SMALL_FRACTION_DIGITS
    } else {
        MAX_FRACTION_DIGITS
    };

    let rounded = format!("{:.*}", digits, value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_change_labels_and_tones() {
        let cases = [
            (Some(5.2), "5.20%", ChangeTone::Positive),
            (Some(-1.1), "-1.10%", ChangeTone::Negative),
            (None, "N/A", ChangeTone::Unknown),
            (Some(0.0), "0.00%", ChangeTone::Negative),
        ];

        for (input, label, tone) in cases {
            assert_eq!(format_change(input), (label.to_string(), tone), "input {input:?}");
        }
    }

    #[test]
    fn test_format_change_negative_zero() {
        assert_eq!(format_change(Some(-0.0)).0, "0.00%");
    }

    #[test]
    fn test_tone_colors() {
        assert_eq!(ChangeTone::Positive.color(), Some(Color::Green));
        assert_eq!(ChangeTone::Negative.color(), Some(Color::Red));
        assert_eq!(ChangeTone::Unknown.color(), None);
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(43_250.12), "43,250.12");
        assert_eq!(format_grouped(846_000_000_000.0), "846,000,000,000");
        assert_eq!(format_grouped(1_234_567.891_4), "1,234,567.891");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1.5), "1.5");
        assert_eq!(format_grouped(0.000_012_34), "0.000012");
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(-1_500.25), "-1,500.25");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(Some(2280.5)), "$2,280.5");
        assert_eq!(format_usd(None), "N/A");
    }
}
