//! Display-time rescaling of ingredient lines.

use crate::quantity::{format_quantity, parse_quantity_token};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

// Mixed number first so "1 1/2" is not read as "1".
static LEADING_QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+\s+[0-9]+/[0-9]+|[0-9]+/[0-9]+|[0-9]+(?:\.[0-9]+)?)\s*")
        .expect("LEADING_QUANTITY_RE should compile")
});

const IDENTITY_TOLERANCE: f64 = 0.001;

/// Ratio between the serving count the user picked and the recipe's own.
///
/// Falls back to `1.0` when either count is unknown or the recipe's is zero.
pub fn scale_factor(base_servings: Option<u32>, desired_servings: Option<u32>) -> f64 {
    match (base_servings, desired_servings) {
        (Some(base), Some(desired)) if base > 0 => f64::from(desired) / f64::from(base),
        _ => 1.0,
    }
}

/// Rewrites the leading quantity of an ingredient line by `factor`.
///
/// Lines without a leading quantity ("Salt to taste") come back unchanged,
/// as do lines whose quantity cannot be computed (`1/0 cup`). When the
/// scaled quantity formats to nothing only the rest of the line is kept.
pub fn scale_ingredient_line(name: &str, factor: f64) -> String {
    if (factor - 1.0).abs() < IDENTITY_TOLERANCE || !factor.is_finite() {
        return name.to_string();
    }

    let Some(caps) = LEADING_QUANTITY_RE.captures(name) else {
        return name.to_string();
    };
    let (Some(whole_match), Some(token)) = (caps.get(0), caps.get(1)) else {
        return name.to_string();
    };

    let quantity = parse_quantity_token(token.as_str());
    if !quantity.is_finite() {
        debug!("Leaving '{}' unscaled: quantity is not finite", name);
        return name.to_string();
    }

    let rest = &name[whole_match.end()..];
    let scaled = format_quantity(quantity * factor);
    match (scaled.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => scaled,
        (false, false) => format!("{scaled} {rest}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_factor_returns_input() {
        assert_eq!(scale_ingredient_line("2 cups flour", 1.0), "2 cups flour");
        assert_eq!(scale_ingredient_line("2 cups flour", 1.0004), "2 cups flour");
        // no reformatting pass at the default scale
        assert_eq!(scale_ingredient_line("0.333 cup oil", 1.0), "0.333 cup oil");
    }

    #[test]
    fn test_scales_fractions() {
        assert_eq!(scale_ingredient_line("1/2 tsp salt", 2.0), "1 tsp salt");
        assert_eq!(scale_ingredient_line("1 1/2 cups milk", 0.5), "¾ cups milk");
        assert_eq!(scale_ingredient_line("3/4 cup sugar", 2.0), "1 ½ cup sugar");
    }

    #[test]
    fn test_scales_integers_and_decimals() {
        assert_eq!(scale_ingredient_line("2 eggs", 1.5), "3 eggs");
        assert_eq!(scale_ingredient_line("1.5 kg potatoes", 2.0), "3 kg potatoes");
        assert_eq!(scale_ingredient_line("4 carrots", 0.25), "1 carrots");
        assert_eq!(scale_ingredient_line("1 onion", 0.2), "0.2 onion");
    }

    #[test]
    fn test_lines_without_quantity_are_untouched() {
        assert_eq!(scale_ingredient_line("Salt to taste", 3.0), "Salt to taste");
        assert_eq!(
            scale_ingredient_line("Juice of 1 lemon", 2.0),
            "Juice of 1 lemon"
        );
    }

    #[test]
    fn test_large_quantity_is_not_truncated() {
        assert_eq!(
            scale_ingredient_line("99999999999999999999 g sugar", 2.0),
            "200000000000000000000 g sugar"
        );
    }

    #[test]
    fn test_non_ascii_digits_are_not_quantities() {
        assert_eq!(scale_ingredient_line("٢ cups rice", 2.0), "٢ cups rice");
    }

    #[test]
    fn test_quantity_without_rest() {
        assert_eq!(scale_ingredient_line("2", 2.0), "4");
    }

    #[test]
    fn test_zero_scale_keeps_only_rest() {
        assert_eq!(scale_ingredient_line("2 cups rice", 0.0), "cups rice");
    }

    #[test]
    fn test_degenerate_quantities_are_left_alone() {
        assert_eq!(scale_ingredient_line("1/0 cup water", 2.0), "1/0 cup water");
        assert_eq!(scale_ingredient_line("2 cups water", f64::NAN), "2 cups water");
    }

    #[test]
    fn test_scale_factor() {
        assert_eq!(scale_factor(Some(4), Some(8)), 2.0);
        assert_eq!(scale_factor(Some(4), Some(2)), 0.5);
        assert_eq!(scale_factor(None, Some(2)), 1.0);
        assert_eq!(scale_factor(Some(4), None), 1.0);
        assert_eq!(scale_factor(Some(0), Some(3)), 1.0);
    }
}
