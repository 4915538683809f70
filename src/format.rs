//! Polish display formatting for prices, percentages and dates.
//!
//! Number output follows the `pl-PL` locale: a non-breaking space groups
//! thousands (only from five integer digits up, so `5000` stays as is),
//! and a comma separates decimals.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::StatusCategory;

/// Reference rate, 1 THB in EUR (01.01.2026)
pub const THB_TO_EUR_RATE: f64 = 0.0275;

/// Non-breaking space used by the `pl-PL` locale
const NBSP: char = '\u{a0}';

/// Agreed EUR figures for round THB price points, consulted before conversion
const THB_EUR_PRICE_POINTS: [(f64, f64); 7] = [
    (1_000_000.0, 27_500.0),
    (3_000_000.0, 85_000.0),
    (5_000_000.0, 139_000.0),
    (7_000_000.0, 195_000.0),
    (10_000_000.0, 275_000.0),
    (15_000_000.0, 415_000.0),
    (20_000_000.0, 550_000.0),
];

const MONTHS_NOMINATIVE: [&str; 12] = [
    "styczeń",
    "luty",
    "marzec",
    "kwiecień",
    "maj",
    "czerwiec",
    "lipiec",
    "sierpień",
    "wrzesień",
    "październik",
    "listopad",
    "grudzień",
];

const MONTHS_GENITIVE: [&str; 12] = [
    "stycznia",
    "lutego",
    "marca",
    "kwietnia",
    "maja",
    "czerwca",
    "lipca",
    "sierpnia",
    "września",
    "października",
    "listopada",
    "grudnia",
];

const AVAILABLE_NOW: &str = "Dostępne od zaraz";

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_PATTERN: Regex = Regex::new(r"^[+]?[\d\s\-()]{8,20}$").unwrap();
}

/// How a converted THB amount is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionMode {
    /// Listing prices: agreed price points, then rounded to 500 / 1 000
    #[default]
    Price,
    /// Running costs: keeps one decimal below 100 EUR
    Fee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Eur,
    Thb,
}

/// `Math.round` semantics: halves go towards positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn group_thousands(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(NBSP);
        }
        out.push(c);
    }
    out
}

/// Round a non-negative value to `decimals` places, halves going up
fn round_to(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    round_half_up(value * scale) / scale
}

/// Locale-aware decimal rendering shared by the public formatters
fn format_decimal(value: f64, min_fraction: usize, max_fraction: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞".to_string() } else { "∞".to_string() };
    }

    let rendered = format!("{:.*}", max_fraction, round_to(value.abs(), max_fraction));
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (rendered.clone(), String::new()),
    };

    let mut frac = frac_part;
    while frac.len() > min_fraction && frac.ends_with('0') {
        frac.pop();
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac.chars().all(|c| c == '0');
    let mut out = String::new();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(&int_part));
    if !frac.is_empty() {
        out.push(',');
        out.push_str(&frac);
    }
    out
}

/// Plain number with `pl-PL` grouping, up to three decimals
pub fn format_number(value: f64) -> String {
    format_decimal(value, 0, 3)
}

pub fn thb_to_eur(thb_amount: f64) -> f64 {
    thb_amount * THB_TO_EUR_RATE
}

/// EUR amount; one million and above collapses to `€X,X mln`
pub fn format_eur(amount: f64, decimals: usize) -> String {
    if amount.abs() >= 1_000_000.0 {
        let millions = round_half_up(amount / 1_000_000.0 * 10.0) / 10.0;
        return format!("€{:.1} mln", millions).replace('.', ",");
    }

    format!("{}{}€", format_decimal(amount, decimals, decimals), NBSP)
}

/// Whole-zloty amount, as shown by the calculator
pub fn format_pln(amount: f64) -> String {
    format!("{}{}zł", format_decimal(amount, 0, 0), NBSP)
}

/// Agreed EUR figure for a THB price point, if the amount is one of them
pub fn price_point_eur(thb_amount: f64) -> Option<f64> {
    THB_EUR_PRICE_POINTS
        .iter()
        .find(|(thb, _)| *thb == thb_amount)
        .map(|(_, eur)| *eur)
}

/// Convert a THB amount and format it in EUR
pub fn format_eur_from_thb(thb_amount: f64, mode: ConversionMode) -> String {
    if let Some(mapped) = price_point_eur(thb_amount) {
        return format_eur(mapped, 0);
    }

    let eur = thb_to_eur(thb_amount);

    match mode {
        ConversionMode::Fee => {
            let decimals = if eur.abs() < 100.0 { 1 } else { 0 };
            format_eur(eur, decimals)
        }
        ConversionMode::Price => {
            let rounded = if eur >= 100_000.0 {
                round_half_up(eur / 1_000.0) * 1_000.0
            } else {
                round_half_up(eur / 500.0) * 500.0
            };
            format_eur(rounded, 0)
        }
    }
}

/// Numeric EUR price stored alongside the THB price on admin saves
pub fn nice_eur_from_thb(thb_amount: f64) -> f64 {
    let eur = thb_to_eur(thb_amount);
    if eur >= 1_000_000.0 {
        return round_half_up(eur / 1_000_000.0 * 10.0) / 10.0 * 1_000_000.0;
    }
    if eur >= 100_000.0 {
        round_half_up(eur / 1_000.0) * 1_000.0
    } else {
        round_half_up(eur / 500.0) * 500.0
    }
}

pub fn format_currency(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::Eur => format_eur(amount, 0),
        Currency::Thb => format!("{} THB", format_number(amount)),
    }
}

/// `7.5` -> `7,5%`
pub fn format_percent(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{:.*}%", sign, decimals, round_to(value.abs(), decimals)).replace('.', ",")
}

/// Long Polish date, e.g. `15 stycznia 2025`
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_GENITIVE[date.month0() as usize],
        date.year()
    )
}

/// Completion label for a `YYYY-MM` value; `None` means available now.
///
/// Values that do not parse as `YYYY-MM` are shown verbatim.
pub fn format_completion(completion: Option<&str>) -> String {
    let Some(completion) = completion.filter(|c| !c.is_empty()) else {
        return AVAILABLE_NOW.to_string();
    };

    match parse_completion(completion) {
        Some((year, month)) => format!("{} {}", MONTHS_NOMINATIVE[month as usize - 1], year),
        None => completion.to_string(),
    }
}

/// Split a `YYYY-MM` completion into year and month (1-12)
pub fn parse_completion(completion: &str) -> Option<(i32, u32)> {
    let (year, month) = completion.split_once('-')?;
    if year.len() != 4 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// International format: optional `+`, then 8-20 digits, spaces, dashes or parentheses
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// `wa.me` deep link; the phone is reduced to its digits
pub fn whatsapp_link(phone: &str, message: Option<&str>) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match message.filter(|m| !m.is_empty()) {
        Some(message) => {
            let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
            format!("https://wa.me/{}?text={}", digits, encoded)
        }
        None => format!("https://wa.me/{}", digits),
    }
}

pub fn category_label(category: StatusCategory) -> &'static str {
    match category {
        StatusCategory::Ready => AVAILABLE_NOW,
        StatusCategory::Y2026 => "Oddanie 2026",
        StatusCategory::Y2027 => "Oddanie 2027",
    }
}

/// Stylesheet class for the category badge
pub fn category_badge_class(category: StatusCategory) -> &'static str {
    match category {
        StatusCategory::Ready => "badge-ready",
        StatusCategory::Y2026 => "badge-2026",
        StatusCategory::Y2027 => "badge-2027",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_grouping() {
        assert_eq!(format_number(5000.0), "5000");
        assert_eq!(format_number(27_500.0), "27\u{a0}500");
        assert_eq!(format_number(1_234_567.0), "1\u{a0}234\u{a0}567");
        assert_eq!(format_number(12.5), "12,5");
        assert_eq!(format_number(-45_000.0), "-45\u{a0}000");
    }

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(27_500.0, 0), "27\u{a0}500\u{a0}€");
        assert_eq!(format_eur(82.5, 1), "82,5\u{a0}€");
        assert_eq!(format_eur(1_240_000.0, 0), "€1,2 mln");
        assert_eq!(format_eur(2_000_000.0, 0), "€2,0 mln");
    }

    #[test]
    fn test_price_points_bypass_rounding() {
        for (thb, eur) in THB_EUR_PRICE_POINTS {
            assert_eq!(
                format_eur_from_thb(thb, ConversionMode::Price),
                format_eur(eur, 0)
            );
            assert_eq!(format_eur_from_thb(thb, ConversionMode::Fee), format_eur(eur, 0));
        }
        // 3M THB is 82 500 EUR at the reference rate
        assert_eq!(
            format_eur_from_thb(3_000_000.0, ConversionMode::Price),
            "85\u{a0}000\u{a0}€"
        );
    }

    #[test]
    fn test_price_rounding() {
        // 3 946 800 THB = 108 537 EUR -> nearest thousand
        assert_eq!(
            format_eur_from_thb(3_946_800.0, ConversionMode::Price),
            "109\u{a0}000\u{a0}€"
        );
        // 2 000 000 THB = 55 000 EUR; 2 010 000 THB = 55 275 EUR -> nearest 500
        assert_eq!(
            format_eur_from_thb(2_010_000.0, ConversionMode::Price),
            "55\u{a0}500\u{a0}€"
        );
    }

    #[test]
    fn test_fee_mode_keeps_small_decimals() {
        // 65 THB = 1.7875 EUR
        assert_eq!(format_eur_from_thb(65.0, ConversionMode::Fee), "1,8\u{a0}€");
        // 20 000 THB = 550 EUR
        assert_eq!(format_eur_from_thb(20_000.0, ConversionMode::Fee), "550\u{a0}€");
    }

    #[test]
    fn test_nice_eur() {
        assert_eq!(nice_eur_from_thb(3_946_800.0), 109_000.0);
        assert_eq!(nice_eur_from_thb(2_010_000.0), 55_500.0);
        // 45 000 000 THB = 1 237 500 EUR
        assert_eq!(nice_eur_from_thb(45_000_000.0), 1_200_000.0);
    }

    #[test]
    fn test_exact_halves_round_up() {
        assert_eq!(format_percent(10.25, 1), "10,3%");
        assert_eq!(format_percent(-10.25, 1), "-10,3%");
        assert_eq!(format_pln(250_000.5), "250\u{a0}001\u{a0}zł");
        assert_eq!(format_eur(82.25, 1), "82,3\u{a0}€");

        let rental = crate::calculator::project(500_001.0, 5, 50.0, 0.0).rental_income;
        assert_eq!(format_pln(rental), "1\u{a0}250\u{a0}003\u{a0}zł");
    }

    #[test]
    fn test_percent_and_currency() {
        assert_eq!(format_percent(10.528, 1), "10,5%");
        assert_eq!(format_percent(7.0, 0), "7%");
        assert_eq!(format_currency(3_500_000.0, Currency::Thb), "3\u{a0}500\u{a0}000 THB");
        assert_eq!(format_pln(805_255.4), "805\u{a0}255\u{a0}zł");
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(format_date(date), "15 stycznia 2025");
        assert_eq!(format_completion(Some("2026-12")), "grudzień 2026");
        assert_eq!(format_completion(None), "Dostępne od zaraz");
        assert_eq!(format_completion(Some("")), "Dostępne od zaraz");
        assert_eq!(format_completion(Some("soon")), "soon");
        assert_eq!(parse_completion("2027-13"), None);
    }

    #[test]
    fn test_contact_validation() {
        assert!(is_valid_email("jan@example.pl"));
        assert!(!is_valid_email("jan@example"));
        assert!(is_valid_phone("+48 600 100 200"));
        assert!(is_valid_phone("(081) 679-4414"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+48 600 abc 200"));
    }

    #[test]
    fn test_whatsapp_link() {
        assert_eq!(whatsapp_link("+66 81 679 4414", None), "https://wa.me/66816794414");
        assert_eq!(
            whatsapp_link("+66 81 679 4414", Some("Dzień dobry")),
            "https://wa.me/66816794414?text=Dzie%C5%84+dobry"
        );
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(category_label(StatusCategory::Ready), "Dostępne od zaraz");
        assert_eq!(category_label(StatusCategory::Y2027), "Oddanie 2027");
        assert_eq!(category_badge_class(StatusCategory::Y2026), "badge-2026");
    }
}
