//! Duration and quantity primitives.
//!
//! Durations come from schema.org `prepTime`/`cookTime` fields (ISO 8601
//! style, e.g. `PT1H30M`). Quantities are the leading numbers of ingredient
//! lines: integers, decimals, vulgar fractions (`3/4`) and mixed numbers
//! (`1 1/2`).

use regex::Regex;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^P(?:([0-9]+)D)?T?(?:([0-9]+)H)?(?:([0-9]+)M)?(?:([0-9]+(?:\.[0-9]+)?)S)?$")
        .expect("DURATION_RE should compile")
});

/// Distance from a known fraction (or a whole number) within which a value
/// snaps to it when formatted.
const SNAP_TOLERANCE: f64 = 0.04;

/// Vulgar fractions in the order they are tried when formatting.
pub const FRACTION_GLYPHS: [(f64, &str); 9] = [
    (1.0 / 8.0, "⅛"),
    (1.0 / 4.0, "¼"),
    (1.0 / 3.0, "⅓"),
    (3.0 / 8.0, "⅜"),
    (1.0 / 2.0, "½"),
    (5.0 / 8.0, "⅝"),
    (2.0 / 3.0, "⅔"),
    (3.0 / 4.0, "¾"),
    (7.0 / 8.0, "⅞"),
];

/// Converts a duration such as `PT1H30M` or `P1DT2H` to whole minutes.
///
/// Returns `None` when the text does not follow the pattern or the total
/// does not fit. A seconds component contributes its whole minutes.
pub fn parse_duration_minutes(text: &str) -> Option<u32> {
    let caps = DURATION_RE.captures(text.trim())?;

    let component = |index: usize| -> Option<u32> {
        match caps.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let days = component(1)?;
    let hours = component(2)?;
    let minutes = component(3)?;
    let seconds = match caps.get(4) {
        Some(m) => m.as_str().parse::<f64>().ok()?,
        None => 0.0,
    };

    days.checked_mul(1440)?
        .checked_add(hours.checked_mul(60)?)?
        .checked_add(minutes)?
        .checked_add((seconds / 60.0).floor() as u32)
}

/// Parses `2`, `0.5`, `3/4` or `1 1/2` into a number.
///
/// The denominator is not checked: `1/0` gives infinity and `0/0` NaN.
/// Callers must check `is_finite` before using the result.
pub fn parse_quantity_token(text: &str) -> f64 {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((whole, fraction)) => parse_number(whole) + parse_fraction(fraction.trim()),
        None => parse_fraction(text),
    }
}

fn parse_fraction(text: &str) -> f64 {
    match text.split_once('/') {
        Some((numerator, denominator)) => parse_number(numerator) / parse_number(denominator),
        None => parse_number(text),
    }
}

fn parse_number(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Formats a quantity for display, preferring fraction glyphs.
///
/// Zero, negative and non-finite values give an empty string so the caller
/// can drop the quantity altogether.
pub fn format_quantity(n: f64) -> String {
    if !n.is_finite() || n <= 0.0 {
        return String::new();
    }

    let whole = n.floor();
    let remainder = n - whole;

    if remainder < SNAP_TOLERANCE {
        return format!("{whole:.0}");
    }
    if remainder > 1.0 - SNAP_TOLERANCE {
        return format!("{:.0}", whole + 1.0);
    }

    for (value, glyph) in FRACTION_GLYPHS {
        if (remainder - value).abs() < SNAP_TOLERANCE {
            return if whole > 0.0 {
                format!("{whole:.0} {glyph}")
            } else {
                glyph.to_string()
            };
        }
    }

    format!("{n:.1}")
}

/// Short display form of a minute count: `45 min`, `1h`, `1h 30m`.
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let remaining = minutes % 60;
    if remaining > 0 {
        format!("{hours}h {remaining}m")
    } else {
        format!("{hours}h")
    }
}
